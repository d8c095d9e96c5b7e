//! Storyboard → scene splitting.
//!
//! The storyboard prompt asks the model to restart panel numbering at
//! `PANEL 001` for every scene, so each occurrence of that literal opens a
//! new scene. The split is zero-width: the marker stays at the start of the
//! block it opens.

use crate::prompts::SCENE_START_MARKER;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static RE_SCENE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(&regex::escape(SCENE_START_MARKER)).unwrap());

/// Split `storyboard` immediately before every `PANEL 001`.
///
/// Blocks are trimmed; blocks that end up empty or that contain no `PANEL`
/// at all (e.g. a preamble before the first scene) are discarded.
pub fn split_scenes(storyboard: &str) -> Vec<String> {
    let mut cuts: Vec<usize> = RE_SCENE_START
        .find_iter(storyboard)
        .map(|m| m.start())
        .collect();
    cuts.insert(0, 0);
    cuts.push(storyboard.len());
    cuts.dedup();

    let scenes: Vec<String> = cuts
        .windows(2)
        .map(|w| storyboard[w[0]..w[1]].trim())
        .filter(|block| !block.is_empty() && block.contains("PANEL"))
        .map(str::to_string)
        .collect();

    if scenes.is_empty() {
        warn!("No scenes found in the storyboard text");
    } else {
        debug!("Storyboard split into {} scenes", scenes.len());
    }
    scenes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_before_each_first_panel() {
        let scenes = split_scenes("PANEL 001 foo\nPANEL 002 bar\nPANEL 001 baz");
        assert_eq!(scenes, vec!["PANEL 001 foo\nPANEL 002 bar", "PANEL 001 baz"]);
        assert!(scenes.iter().all(|s| s.starts_with("PANEL 001")));
    }

    #[test]
    fn preamble_without_panel_is_dropped() {
        let scenes = split_scenes("Here is your storyboard:\n\nPANEL 001\nACTION_DESCRIPTION: x");
        assert_eq!(scenes, vec!["PANEL 001\nACTION_DESCRIPTION: x"]);
    }

    #[test]
    fn preamble_mentioning_panel_is_kept() {
        let scenes = split_scenes("PANEL notes\nPANEL 001 a");
        assert_eq!(scenes, vec!["PANEL notes", "PANEL 001 a"]);
    }

    #[test]
    fn no_marker_but_panel_text_is_one_scene() {
        let scenes = split_scenes("  PANEL 002 only  ");
        assert_eq!(scenes, vec!["PANEL 002 only"]);
    }

    #[test]
    fn nothing_qualifying_yields_empty() {
        assert!(split_scenes("").is_empty());
        assert!(split_scenes("   \n ").is_empty());
        assert!(split_scenes("no storyboard here").is_empty());
    }

    #[test]
    fn marker_must_be_literal() {
        let scenes = split_scenes("PANEL 0010 a\nPANEL 001");
        assert_eq!(scenes, vec!["PANEL 0010 a", "PANEL 001"]);
        assert_eq!(split_scenes("panel 001 a\npanel 001 b").len(), 0);
    }
}
