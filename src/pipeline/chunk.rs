//! Fixed-size sliding-window chunker.
//!
//! Windows are measured in characters (Unicode scalar values), never bytes,
//! so a window boundary can never land inside a multi-byte code point.
//! Chunk `i` starts at character `i * (size - overlap)`; the last chunk may
//! be shorter than `size`; the sequence covers the whole text without gaps.

use crate::error::S2vError;
use crate::output::{ChunkedDocument, Warning};
use tracing::{debug, warn};

/// Split `text` into overlapping windows of `size` characters.
///
/// An `overlap` of `size` or more is clamped to `size - 1` so every step
/// advances by at least one character; the clamp is reported as a
/// [`Warning::ClampedOverlap`] in the returned document.
///
/// # Errors
/// [`S2vError::InvalidParameter`] when `size` is 0.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Result<ChunkedDocument, S2vError> {
    if size == 0 {
        return Err(S2vError::InvalidParameter(
            "chunk size must be a positive integer".into(),
        ));
    }

    let mut warnings = Vec::new();
    let overlap = if overlap >= size {
        let applied = size - 1;
        warn!(
            "Overlap size {} was >= chunk size {}; adjusted to {}",
            overlap, size, applied
        );
        warnings.push(Warning::ClampedOverlap {
            requested: overlap,
            applied,
        });
        applied
    } else {
        overlap
    };
    let step = size - overlap;

    let char_len = text.chars().count();

    // `start` and `end` are byte offsets, always on character boundaries.
    let mut chunks = Vec::with_capacity(char_len.div_ceil(step));
    let mut start = 0;
    while start < text.len() {
        let end = skip_chars(text, start, size);
        chunks.push(text[start..end].to_string());
        start = skip_chars(text, start, step);
    }

    debug!(
        "Chunked {} characters into {} chunks (size {}, overlap {})",
        char_len,
        chunks.len(),
        size,
        overlap
    );

    Ok(ChunkedDocument { chunks, warnings })
}

/// Byte offset `n` characters past `from`, or the end of `text`.
fn skip_chars(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(i, _)| from + i)
}
