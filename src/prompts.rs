//! Prompt templates, separators, and delimiters for every stage.
//!
//! Centralising the text that is sent to (and parsed back from) the LLM
//! keeps the stage modules free of string literals and lets tests inspect
//! the exact framing without a relay.
//!
//! Callers override the default templates via
//! [`crate::config::PipelineConfig`]; the constants here are used only when
//! no override is provided. The delimiters are part of the output contract
//! and are not configurable.

/// Prefix marking a relay result as a failure rather than model output.
pub const ERROR_SENTINEL: &str = "Error:";

/// Delimiter between storyboard panels.
pub const PANEL_DELIMITER: &str = "--- PANEL BREAK ---";

/// Literal marking the first panel of a scene.
pub const SCENE_START_MARKER: &str = "PANEL 001";

/// Line marker identifying a panel's action description (matched
/// case-insensitively after trimming).
pub const ACTION_DESCRIPTION_MARKER: &str = "ACTION_DESCRIPTION:";

/// Joins per-scene prompt responses in the final output.
pub const SCENE_BREAK: &str = "\n\n--- SCENE BREAK ---\n\n";

/// Separator placed between the storyboard template and a script chunk.
pub const CHUNK_SEPARATOR: &str = "\n\n--- SCRIPT CHUNK ---\n\n";

/// Separator placed between the prompt template and a storyboard scene.
pub const SCENE_SEPARATOR: &str = "\n\n--- STORYBOARD SCENE ---\n\n";

/// Default template for turning a script chunk into storyboard panels.
pub const DEFAULT_STORYBOARD_TEMPLATE: &str = r#"You are a storyboard artist. Create storyboard panels from the following script text.

Follow these rules precisely:

1. NUMBERING
   - Number panels within each scene as PANEL 001, PANEL 002, PANEL 003, …
   - Restart numbering at PANEL 001 whenever a new scene begins

2. PANEL CONTENT
   - Give every panel exactly one line starting with ACTION_DESCRIPTION:
   - Add SHOT_TYPE:, CAMERA:, and DIALOGUE: lines where relevant

3. SEPARATORS
   - Separate panels with a line containing only --- PANEL BREAK ---

4. OUTPUT FORMAT
   - Output ONLY the panels
   - Do NOT add commentary or explanations"#;

/// Default template for turning one storyboard scene into video prompts.
pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"You are a prompt engineer for an AI video generator. Convert the following storyboard scene into a series of detailed prompts.

For every panel write:
   - One IMAGE PROMPT describing subject, setting, lighting, lens, and style
   - One VIDEO PROMPT describing the motion and camera movement over the shot

Output ONLY the prompts, in panel order."#;

/// Default instruction for the script summariser.
pub const DEFAULT_SUMMARY_PROMPT: &str = "You are an expert film analyst.\n\
Summarize the following movie script in **concise bullet points**.\n\
Focus on key events, main characters, tone, and story flow.";

/// Default instruction for the script parser.
pub const DEFAULT_PARSING_PROMPT: &str = "You are an expert script parser. Your task is to take the following raw script text and break it down into a structured list of scenes. Identify the scene heading, action lines, dialogue, and camera directions for each scene. Use '---SCENE BREAK---' to separate each scene.";

/// Build the request sent for one generator-loop item.
pub fn frame_item(template: &str, separator: &str, item: &str) -> String {
    format!("{template}{separator}{item}")
}

/// Build the request sent to the summariser.
pub fn frame_summary(prompt: &str, script: &str) -> String {
    format!("{prompt}\n\n--- SCRIPT START ---\n\n{script}\n\n--- END ---")
}

/// Build the request sent to the script parser.
pub fn frame_parse(prompt: &str, text: &str) -> String {
    format!("{prompt}\n\n--- SCRIPT CONTENT ---\n\n{text}")
}

/// True when `response` is a relay failure rather than model output.
pub fn is_error_sentinel(response: &str) -> bool {
    response.starts_with(ERROR_SENTINEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_item_puts_template_first() {
        let framed = frame_item("Draw this.", CHUNK_SEPARATOR, "INT. HOUSE - DAY");
        assert_eq!(framed, "Draw this.\n\n--- SCRIPT CHUNK ---\n\nINT. HOUSE - DAY");
    }

    #[test]
    fn summary_framing_has_end_marker() {
        let framed = frame_summary("Summarise.", "FADE IN:");
        assert!(framed.starts_with("Summarise.\n\n--- SCRIPT START ---"));
        assert!(framed.ends_with("FADE IN:\n\n--- END ---"));
    }

    #[test]
    fn sentinel_detection() {
        assert!(is_error_sentinel("Error: Could not connect"));
        assert!(is_error_sentinel("Error:no space"));
        assert!(!is_error_sentinel("PANEL 001\nACTION_DESCRIPTION: Error: none"));
        assert!(!is_error_sentinel("error: lowercase is model text"));
    }

    #[test]
    fn default_storyboard_template_mentions_delimiters() {
        assert!(DEFAULT_STORYBOARD_TEMPLATE.contains(PANEL_DELIMITER));
        assert!(DEFAULT_STORYBOARD_TEMPLATE.contains(SCENE_START_MARKER));
        assert!(DEFAULT_STORYBOARD_TEMPLATE.contains(ACTION_DESCRIPTION_MARKER));
    }
}
