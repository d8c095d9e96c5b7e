//! # pdfium-auto
//!
//! Makes sure a PDFium shared library is on disk before `pdfium-render`
//! binds to it, so `s2v` works on machines without libpdfium installed.
//!
//! A library is looked for in this order:
//!
//! 1. `PDFIUM_LIB_PATH`, a library file or a directory holding one.
//! 2. The per-version cache, `<cache>/s2v/pdfium-{VERSION}/` (override the
//!    base with `S2V_PDFIUM_CACHE_DIR`).
//! 3. [`ensure_pdfium_library`] only: a download of the platform archive from
//!    [bblanchon/pdfium-binaries](https://github.com/bblanchon/pdfium-binaries),
//!    unpacked into the cache.
//!
//! With the `bundled` feature the library is embedded at compile time and
//! [`ensure_pdfium_bundled`] writes it into the cache instead of downloading.
//!
//! ```rust,no_run
//! let lib = pdfium_auto::ensure_pdfium_library(Some(&|done, total| {
//!     eprint!("\r{done}/{} bytes", total.unwrap_or(0));
//! }))?;
//! println!("pdfium at {}", lib.display());
//! # Ok::<(), pdfium_auto::PdfiumAutoError>(())
//! ```

mod fetch;
pub mod platform;

pub use fetch::DownloadProgress;
pub use platform::Platform;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info, warn};

/// pdfium-binaries release (`chromium/<VERSION>`) this crate downloads.
pub const PDFIUM_VERSION: &str = "7690";

/// Names an existing pdfium library file or the directory holding it.
pub const LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Replaces the platform cache directory as the base of the pdfium cache.
pub const CACHE_DIR_ENV: &str = "S2V_PDFIUM_CACHE_DIR";

const RELEASES: &str = "https://github.com/bblanchon/pdfium-binaries/releases/download";

#[derive(Error, Debug)]
pub enum PdfiumAutoError {
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Cache directory error: {0}")]
    CacheDir(#[source] std::io::Error),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Archive extraction failed: {0}")]
    Extract(String),
}

static RESOLVED: OnceLock<PathBuf> = OnceLock::new();

/// Per-version cache directory for the library.
///
/// `<base>/s2v/pdfium-{VERSION}` where base is `S2V_PDFIUM_CACHE_DIR` if
/// set, else the platform cache dir (`~/.cache` on Linux).
pub fn pdfium_cache_dir() -> PathBuf {
    let base = std::env::var_os(CACHE_DIR_ENV)
        .map(PathBuf::from)
        .or_else(dirs::cache_dir)
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir);
    cache_dir_under(&base)
}

fn cache_dir_under(base: &Path) -> PathBuf {
    base.join("s2v").join(format!("pdfium-{PDFIUM_VERSION}"))
}

/// The library named by `PDFIUM_LIB_PATH`, if that path exists.
///
/// A directory resolves to the platform library name inside it.
pub fn configured_pdfium_path() -> Option<PathBuf> {
    let configured = PathBuf::from(std::env::var_os(LIB_PATH_ENV)?);
    let candidate = match (configured.is_dir(), platform::current()) {
        (true, Ok(p)) => configured.join(p.library),
        _ => configured,
    };
    if candidate.exists() {
        Some(candidate)
    } else {
        warn!(
            "{LIB_PATH_ENV} points at {}, which does not exist",
            candidate.display()
        );
        None
    }
}

/// A library already on disk, from `PDFIUM_LIB_PATH` or the cache.
///
/// Never touches the network.
pub fn cached_pdfium_path() -> Option<PathBuf> {
    if let Some(path) = RESOLVED.get() {
        return Some(path.clone());
    }
    configured_pdfium_path().or_else(|| {
        let platform = platform::current().ok()?;
        Some(pdfium_cache_dir().join(platform.library)).filter(|p| p.exists())
    })
}

/// Whether [`ensure_pdfium_library`] would return without downloading.
pub fn is_pdfium_cached() -> bool {
    cached_pdfium_path().is_some()
}

/// Return the path of a usable library, downloading it into the cache on
/// first use.
///
/// Blocking. The result is remembered for the rest of the process.
pub fn ensure_pdfium_library(
    on_progress: Option<DownloadProgress<'_>>,
) -> Result<PathBuf, PdfiumAutoError> {
    if let Some(path) = cached_pdfium_path() {
        return Ok(remember(path));
    }
    let path = populate_cache(
        &pdfium_cache_dir(),
        platform::current()?,
        RELEASES,
        on_progress,
    )?;
    Ok(remember(path))
}

/// Write the embedded library into the cache (once) and return its path.
///
/// `PDFIUM_LIB_PATH` still takes precedence when it names an existing file.
#[cfg(feature = "bundled")]
pub fn ensure_pdfium_bundled() -> Result<PathBuf, PdfiumAutoError> {
    mod embedded {
        include!(concat!(env!("OUT_DIR"), "/bundled.rs"));
    }

    if let Some(path) = RESOLVED.get().cloned().or_else(configured_pdfium_path) {
        return Ok(remember(path));
    }
    let dest = pdfium_cache_dir().join(platform::current()?.library);
    write_library(embedded::PDFIUM_BYTES, &dest)?;
    Ok(remember(dest))
}

fn remember(path: PathBuf) -> PathBuf {
    RESOLVED.get_or_init(|| path).clone()
}

/// Make sure `cache_dir` holds the platform library, downloading the release
/// archive from `releases` when it does not.
fn populate_cache(
    cache_dir: &Path,
    platform: Platform,
    releases: &str,
    on_progress: Option<DownloadProgress<'_>>,
) -> Result<PathBuf, PdfiumAutoError> {
    let dest = cache_dir.join(platform.library);
    if dest.exists() {
        debug!("pdfium already cached at {}", dest.display());
        return Ok(dest);
    }

    std::fs::create_dir_all(cache_dir).map_err(PdfiumAutoError::CacheDir)?;
    let url = format!("{releases}/chromium%2F{PDFIUM_VERSION}/{}", platform.archive);
    let archive = fetch::download(&url, on_progress)?;
    fetch::unpack_member(&archive, platform.member, &dest)?;
    info!("pdfium cached at {}", dest.display());
    Ok(dest)
}

/// Write `bytes` to `dest` unless a file of the same size is already there.
#[cfg_attr(not(feature = "bundled"), allow(dead_code))]
fn write_library(bytes: &[u8], dest: &Path) -> Result<(), PdfiumAutoError> {
    if std::fs::metadata(dest).is_ok_and(|m| m.len() == bytes.len() as u64) {
        return Ok(());
    }
    if let Some(dir) = dest.parent() {
        std::fs::create_dir_all(dir).map_err(PdfiumAutoError::CacheDir)?;
    }
    let mut partial = dest.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);
    std::fs::write(&partial, bytes).map_err(PdfiumAutoError::CacheDir)?;
    std::fs::rename(&partial, dest).map_err(PdfiumAutoError::CacheDir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux() -> Platform {
        platform::lookup("linux", "x86_64").unwrap()
    }

    #[test]
    fn cache_dir_is_versioned_under_s2v() {
        let dir = cache_dir_under(Path::new("/var/cache"));
        let expected = Path::new("/var/cache/s2v").join(format!("pdfium-{PDFIUM_VERSION}"));
        assert_eq!(dir, expected);
    }

    #[test]
    fn default_cache_dir_is_stable() {
        assert_eq!(pdfium_cache_dir(), pdfium_cache_dir());
        assert!(pdfium_cache_dir().ends_with(format!("s2v/pdfium-{PDFIUM_VERSION}")));
    }

    #[test]
    fn cached_library_skips_the_download() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("libpdfium.so"), b"lib").unwrap();

        // An unroutable release URL: reaching the network would fail.
        let path = populate_cache(dir.path(), linux(), "http://127.0.0.1:9", None).unwrap();
        assert_eq!(path, dir.path().join("libpdfium.so"));
    }

    #[test]
    fn failed_download_leaves_no_library_behind() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("s2v/pdfium");

        let err = populate_cache(&cache, linux(), "http://127.0.0.1:9", None).unwrap_err();
        assert!(matches!(err, PdfiumAutoError::Download(_)), "got {err:?}");
        assert!(!cache.join("libpdfium.so").exists());
    }

    #[test]
    fn embedded_bytes_are_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested/libpdfium.so");

        write_library(b"pdfium", &dest).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"pdfium");

        let before = std::fs::metadata(&dest).unwrap().modified().unwrap();
        write_library(b"pdfium", &dest).unwrap();
        assert_eq!(std::fs::metadata(&dest).unwrap().modified().unwrap(), before);
        assert!(!dir.path().join("nested/libpdfium.so.part").exists());
    }

    #[test]
    fn stale_embedded_copy_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("libpdfium.so");
        std::fs::write(&dest, b"old").unwrap();

        write_library(b"newer build", &dest).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"newer build");
    }
}
