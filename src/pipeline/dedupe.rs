//! Storyboard panel de-duplication.
//!
//! Overlapping chunks make the model describe the same moment twice, once
//! at the end of one chunk and again at the start of the next. Panels are
//! keyed by their `ACTION_DESCRIPTION:` line and only the first occurrence of
//! each key survives. Panels without that line are always kept.
//!
//! The key is the trimmed line exactly as written: two descriptions that
//! differ only in case after the colon are distinct panels.

use crate::output::DedupeReport;
use crate::prompts::{ACTION_DESCRIPTION_MARKER, PANEL_DELIMITER};
use std::collections::HashSet;
use tracing::info;

/// De-duplicate the panels in `raw` and reassemble them.
///
/// Never fails: input with no non-empty panel blocks yields `""`.
pub fn dedupe_panels(raw: &str) -> (String, DedupeReport) {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut kept: Vec<&str> = Vec::new();
    let mut panels_in = 0;

    for block in raw.split(PANEL_DELIMITER).map(str::trim) {
        if block.is_empty() {
            continue;
        }
        panels_in += 1;

        match action_description(block) {
            Some(key) => {
                if seen.insert(key) {
                    kept.push(block);
                }
            }
            None => kept.push(block),
        }
    }

    let report = DedupeReport {
        panels_in,
        panels_kept: kept.len(),
        duplicates_dropped: panels_in - kept.len(),
    };
    info!(
        "De-duplication complete. Kept {} unique panels ({} duplicates dropped)",
        report.panels_kept, report.duplicates_dropped
    );

    (kept.join(&format!("\n\n{PANEL_DELIMITER}\n\n")), report)
}

/// Convenience wrapper returning only the cleaned storyboard.
pub fn dedupe(raw: &str) -> String {
    dedupe_panels(raw).0
}

/// The panel's key line: the first line whose trimmed, upper-cased form
/// starts with `ACTION_DESCRIPTION:`, returned trimmed with case preserved.
fn action_description(block: &str) -> Option<&str> {
    block
        .split('\n')
        .map(str::trim)
        .find(|line| line.to_uppercase().starts_with(ACTION_DESCRIPTION_MARKER))
}
