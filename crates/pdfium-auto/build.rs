// With the `bundled` feature, copy the pdfium library named by
// PDFIUM_BUNDLE_LIB into OUT_DIR and generate `bundled.rs`, which embeds it.
// `include_bytes!` needs a literal path, hence the generated file.

use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=PDFIUM_BUNDLE_LIB");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_BUNDLED");

    if std::env::var_os("CARGO_FEATURE_BUNDLED").is_none() {
        return;
    }

    let source = match std::env::var_os("PDFIUM_BUNDLE_LIB") {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => panic!(
            "pdfium-auto: the `bundled` feature needs PDFIUM_BUNDLE_LIB set to the \
             platform pdfium library (libpdfium.so, libpdfium.dylib or pdfium.dll). \
             Prebuilt libraries: https://github.com/bblanchon/pdfium-binaries/releases"
        ),
    };
    if !source.is_file() {
        panic!(
            "pdfium-auto: PDFIUM_BUNDLE_LIB is not a file: {}",
            source.display()
        );
    }

    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let embedded = out_dir.join("pdfium_embedded");
    if let Err(e) = std::fs::copy(&source, &embedded) {
        panic!(
            "pdfium-auto: copying {} into OUT_DIR failed: {e}",
            source.display()
        );
    }

    let generated = out_dir.join("bundled.rs");
    let code = "/// The pdfium library embedded at compile time.\n\
                pub static PDFIUM_BYTES: &[u8] = include_bytes!(\"pdfium_embedded\");\n";
    if let Err(e) = std::fs::write(&generated, code) {
        panic!("pdfium-auto: writing {} failed: {e}", generated.display());
    }

    println!("cargo:rerun-if-changed={}", source.display());
}
