//! Output types returned by the stage entry points.
//!
//! Every type here is `Serialize` so the CLI's `--json` mode can dump a full
//! run (texts, per-item results, stats, warnings) in one document.

use crate::error::ItemError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a generator-loop item is. Rendered upper-case in placeholders and
/// progress output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// A window of script text sent for panel generation.
    Chunk,
    /// A storyboard scene sent for prompt generation.
    Scene,
}

impl ItemKind {
    /// Upper-case label used in placeholders (`CHUNK`, `SCENE`).
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Chunk => "CHUNK",
            ItemKind::Scene => "SCENE",
        }
    }

    /// Placeholder recorded instead of a failed response (1-indexed).
    pub fn error_placeholder(self, number: usize) -> String {
        format!("--- ERROR PROCESSING {} {} ---", self.label(), number)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one generator-loop item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResult {
    /// 0-indexed position in the input sequence.
    pub index: usize,
    pub kind: ItemKind,
    /// Model response, or the error placeholder when `error` is set.
    pub text: String,
    pub duration_ms: u64,
    pub error: Option<ItemError>,
}

impl ItemResult {
    /// 1-indexed item number as shown to users.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Totals for one generator-loop run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub total_items: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

impl RunStats {
    pub fn from_results(results: &[ItemResult], duration_ms: u64) -> Self {
        let failed = results.iter().filter(|r| r.error.is_some()).count();
        Self {
            total_items: results.len(),
            succeeded: results.len() - failed,
            failed,
            duration_ms,
        }
    }
}

/// Non-fatal conditions surfaced alongside a stage's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    /// Overlap was ≥ chunk size and was reduced to `size - 1`.
    ClampedOverlap { requested: usize, applied: usize },
    /// The storyboard contained no `PANEL 001` scene blocks.
    NoScenes,
    /// A generator loop was given nothing to generate.
    EmptyItems { kind: ItemKind },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ClampedOverlap { requested, applied } => write!(
                f,
                "overlap {requested} was >= chunk size; adjusted to {applied}"
            ),
            Warning::NoScenes => f.write_str("no scenes found in the storyboard text"),
            Warning::EmptyItems { kind } => write!(f, "no {kind} items to generate"),
        }
    }
}

/// Output of the chunking stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkedDocument {
    pub chunks: Vec<String>,
    pub warnings: Vec<Warning>,
}

/// Result of a panel de-duplication pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupeReport {
    /// Non-empty panel blocks found in the input.
    pub panels_in: usize,
    pub panels_kept: usize,
    pub duplicates_dropped: usize,
}

/// Output of the storyboard stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryboardOutput {
    /// De-duplicated storyboard text.
    pub storyboard: String,
    pub items: Vec<ItemResult>,
    pub stats: RunStats,
    pub dedupe: DedupeReport,
    pub warnings: Vec<Warning>,
}

/// Output of the prompt-generation stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptsOutput {
    /// Per-scene prompts joined by the scene break.
    pub prompts: String,
    pub scenes: Vec<String>,
    pub items: Vec<ItemResult>,
    pub stats: RunStats,
    pub warnings: Vec<Warning>,
}

/// Output of a full extract → chunk → storyboard → prompts run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub chunk_count: usize,
    pub chunk_warnings: Vec<Warning>,
    pub storyboard: StoryboardOutput,
    pub prompts: PromptsOutput,
    pub total_duration_ms: u64,
}

impl PipelineOutput {
    /// Final prompt text.
    pub fn text(&self) -> &str {
        &self.prompts.prompts
    }

    /// Every warning raised by any stage, in pipeline order.
    pub fn warnings(&self) -> impl Iterator<Item = &Warning> {
        self.chunk_warnings
            .iter()
            .chain(self.storyboard.warnings.iter())
            .chain(self.prompts.warnings.iter())
    }
}
