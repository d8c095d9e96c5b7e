//! Pipeline stages for script-to-video prompt generation.
//!
//! Each submodule implements exactly one step and is testable on its own;
//! only [`relay`] and [`provider`] touch the network, and only [`extract`]
//! touches the file system.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ chunk ──▶ generate ──▶ dedupe ──▶ scenes ──▶ generate
//!  (pdfium)  (windows)  (panels)    (panels)   (PANEL 001)  (prompts)
//! ```
//!
//! 1. [`extract`]  — page-ordered PDF text via pdfium
//! 2. [`chunk`]    — fixed-size overlapping character windows
//! 3. [`generate`] — one [`generate::TextGenerator`] call per item, failures
//!    isolated as placeholders
//! 4. [`dedupe`]   — drop panels whose `ACTION_DESCRIPTION:` line repeats
//! 5. [`scenes`]   — split the storyboard before each `PANEL 001`
//!
//! [`relay`] and [`provider`] are the two `TextGenerator` backends.

pub mod chunk;
pub mod dedupe;
pub mod extract;
pub mod generate;
pub mod provider;
pub mod relay;
pub mod scenes;
