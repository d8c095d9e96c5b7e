//! Text extraction: PDF path → page-ordered plain text.
//!
//! The file is validated before the PDF engine is touched (existence, read
//! permission, `%PDF` magic bytes), so the common failures come back as
//! precise errors without needing pdfium at all.
//!
//! Page access sits behind [`PageSource`]; [`collect_text`] is the only
//! code that walks pages. The pdfium document is one source, tests use an
//! in-memory one. The pdfium handle lives inside [`extract_text_blocking`]
//! and is released when it returns, on success and on failure alike.
//!
//! pdfium is blocking and keeps thread-local state, so the async entry
//! point moves the work onto `spawn_blocking`. Finding the library itself
//! (env override, cache, download) is `pdfium_auto`'s job.

use crate::error::S2vError;
use pdfium_render::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A document whose pages can be read as text, in order.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Text of the 0-indexed page. `Err` carries a human-readable cause.
    fn page_text(&self, index: usize) -> Result<String, String>;
}

/// Concatenate every page's text in page order, with nothing in between.
///
/// # Errors
/// [`S2vError::ReadError`] naming the first page that failed.
pub fn collect_text(source: &impl PageSource, path: &Path) -> Result<String, S2vError> {
    let count = source.page_count();
    let mut text = String::new();
    for index in 0..count {
        let page = source.page_text(index).map_err(|detail| S2vError::ReadError {
            path: path.to_path_buf(),
            detail: format!("page {}: {}", index + 1, detail),
        })?;
        text.push_str(&page);
    }
    debug!("Extracted {} characters from {} pages", text.chars().count(), count);
    Ok(text)
}

/// Check that `path` names a readable PDF file.
pub fn validate_pdf(path: &Path) -> Result<(), S2vError> {
    if !path.is_file() {
        return Err(S2vError::NotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
                return Err(S2vError::ReadError {
                    path: path.to_path_buf(),
                    detail: format!("not a PDF (first bytes: {magic:?})"),
                });
            }
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(S2vError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(S2vError::NotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// Extract the full text of the PDF at `path`.
///
/// `pdfium_lib` overrides where the pdfium library is loaded from.
pub async fn extract_text(path: &Path, pdfium_lib: Option<&Path>) -> Result<String, S2vError> {
    let path = path.to_path_buf();
    let lib = pdfium_lib.map(Path::to_path_buf);

    tokio::task::spawn_blocking(move || extract_text_blocking(&path, lib.as_deref()))
        .await
        .map_err(|e| S2vError::Internal(format!("Extraction task panicked: {e}")))?
}

/// Blocking implementation of [`extract_text`].
pub fn extract_text_blocking(path: &Path, pdfium_lib: Option<&Path>) -> Result<String, S2vError> {
    validate_pdf(path)?;

    let pdfium = bind_pdfium(pdfium_lib)?;
    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| S2vError::ReadError {
            path: path.to_path_buf(),
            detail: format!("{e:?}"),
        })?;
    let source = PdfiumDocument { document };

    info!("PDF loaded: {} pages", source.page_count());
    collect_text(&source, path)
}

/// Bind pdfium from, in order: the explicit path, whatever
/// [`pdfium_auto::cached_pdfium_path`] finds (`PDFIUM_LIB_PATH` or the
/// download cache), the system library.
///
/// An explicit path that fails to load is an error; it never falls through.
fn bind_pdfium(explicit: Option<&Path>) -> Result<Pdfium, S2vError> {
    let located: Option<PathBuf> = match explicit {
        Some(lib) if lib.is_dir() => Some(Pdfium::pdfium_platform_library_name_at_path(lib)),
        Some(lib) => Some(lib.to_path_buf()),
        None => pdfium_auto::cached_pdfium_path(),
    };

    let bindings = match located {
        Some(lib) => {
            debug!("Binding pdfium from {}", lib.display());
            Pdfium::bind_to_library(&lib)
        }
        None => {
            debug!("No pdfium library configured or cached; trying the system library");
            Pdfium::bind_to_system_library()
        }
    }
    .map_err(|e| S2vError::PdfiumUnavailable(format!("{e:?}")))?;

    Ok(Pdfium::new(bindings))
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl PageSource for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_text(&self, index: usize) -> Result<String, String> {
        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| format!("{e:?}"))?;
        let text = page.text().map_err(|e| format!("{e:?}"))?;
        Ok(text.all())
    }
}
