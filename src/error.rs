//! Error types for the script2video library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`S2vError`] — **Fatal**: the stage cannot proceed at all (document
//!   missing or unreadable, invalid chunking parameters, bad configuration).
//!   Returned as `Err(S2vError)` from the stage entry points in
//!   [`crate::run`].
//!
//! * [`ItemError`] — **Non-fatal**: one chunk or scene failed at the relay
//!   but its siblings are fine. Stored inside [`crate::output::ItemResult`]
//!   next to the placeholder text that replaced the response.
//!
//! * [`RelayError`] — the typed form of a relay failure. The string-based
//!   [`crate::pipeline::generate::TextGenerator`] seam renders it as an
//!   `"Error: …"` sentinel so the generator loop can treat every failure mode
//!   the same way.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the script2video library.
#[derive(Debug, Error)]
pub enum S2vError {
    // ── Extraction errors ─────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    NotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but its text could not be read (not a PDF, corrupt,
    /// encrypted, or a page failed to yield text).
    #[error("Could not read PDF '{path}': {detail}")]
    ReadError { path: PathBuf, detail: String },

    /// No pdfium library could be bound.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Run `s2v` once to download it, set PDFIUM_LIB_PATH=/path/to/libpdfium, or pass --pdfium-lib."
    )]
    PdfiumUnavailable(String),

    // ── Parameter errors ──────────────────────────────────────────────────
    /// A stage parameter is outside its valid domain (e.g. chunk size 0).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configured LLM provider could not be constructed.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single generator-loop item.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ItemError {
    /// The relay (or provider) returned an `"Error:"` sentinel.
    #[error("{kind} {number}: relay call failed: {detail}")]
    RelayFailed {
        kind: String,
        number: usize,
        detail: String,
    },
}

/// Failure modes of one relay request.
///
/// The `Display` text is what follows `"Error: "` in the sentinel string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    /// The relay answered 200 but the body had no string `response` field.
    #[error("Response JSON was malformed.")]
    MalformedBody,

    /// The relay answered with a non-200 status.
    #[error("Relay server responded with status {status}. Details: {details}")]
    Status { status: u16, details: String },

    /// Connection refused, DNS failure, timeout, or any other transport error.
    #[error("Could not connect to the relay server. Reason: {reason}")]
    Unreachable { reason: String },
}

impl RelayError {
    /// Render this failure as the `"Error: …"` sentinel string.
    pub fn to_sentinel(&self) -> String {
        format!("{} {}", crate::prompts::ERROR_SENTINEL, self)
    }
}
