//! Release asset and library name for each supported OS/arch pair.

use crate::PdfiumAutoError;

/// Where the library lives in a pdfium-binaries release for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: &'static str,
    pub arch: &'static str,
    /// Release asset, e.g. `pdfium-linux-x64.tgz`.
    pub archive: &'static str,
    /// Path of the library inside the archive.
    pub member: &'static str,
    /// File name the library is cached under.
    pub library: &'static str,
}

const fn entry(
    os: &'static str,
    arch: &'static str,
    archive: &'static str,
    library: &'static str,
    member: &'static str,
) -> Platform {
    Platform {
        os,
        arch,
        archive,
        member,
        library,
    }
}

const SO: &str = "libpdfium.so";
const DYLIB: &str = "libpdfium.dylib";
const DLL: &str = "pdfium.dll";

pub const PLATFORMS: &[Platform] = &[
    entry("linux", "x86_64", "pdfium-linux-x64.tgz", SO, "lib/libpdfium.so"),
    entry("linux", "aarch64", "pdfium-linux-arm64.tgz", SO, "lib/libpdfium.so"),
    entry("macos", "x86_64", "pdfium-mac-x64.tgz", DYLIB, "lib/libpdfium.dylib"),
    entry("macos", "aarch64", "pdfium-mac-arm64.tgz", DYLIB, "lib/libpdfium.dylib"),
    entry("windows", "x86_64", "pdfium-win-x64.tgz", DLL, "bin/pdfium.dll"),
    entry("windows", "aarch64", "pdfium-win-arm64.tgz", DLL, "bin/pdfium.dll"),
    entry("windows", "x86", "pdfium-win-x86.tgz", DLL, "bin/pdfium.dll"),
];

/// Look up the entry for `os`/`arch` (as in `std::env::consts`).
pub fn lookup(os: &str, arch: &str) -> Result<Platform, PdfiumAutoError> {
    PLATFORMS
        .iter()
        .find(|p| p.os == os && p.arch == arch)
        .copied()
        .ok_or_else(|| PdfiumAutoError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        })
}

/// The entry for the platform this binary was compiled for.
pub fn current() -> Result<Platform, PdfiumAutoError> {
    lookup(std::env::consts::OS, std::env::consts::ARCH)
}
