//! Static registry of the pipeline's stage nodes.
//!
//! Describes each stage the way a node-graph host would show it: a stable
//! name, a display name, a category, typed inputs with defaults and ranges,
//! and named outputs. The CLI prints it with `s2v nodes --json`.

use crate::config::{DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
use crate::prompts::{
    DEFAULT_PARSING_PROMPT, DEFAULT_PROMPT_TEMPLATE, DEFAULT_STORYBOARD_TEMPLATE,
    DEFAULT_SUMMARY_PROMPT,
};
use serde::Serialize;

/// Category every node is listed under.
pub const CATEGORY: &str = "Script To Video Suite";

/// Which entry point a node runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Chunk,
    Storyboard,
    Prompts,
    Summarize,
    Parse,
}

/// Type of a node input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueKind {
    String,
    Int,
    /// Ordered list of chunk strings.
    Chunks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Int(usize),
    Text(&'static str),
}

/// Integer range shown by the host's slider widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntRange {
    pub min: usize,
    pub max: usize,
    pub step: usize,
}

impl IntRange {
    pub fn contains(&self, value: usize) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct InputSpec {
    pub name: &'static str,
    pub kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<IntRange>,
    pub multiline: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct OutputSpec {
    pub name: &'static str,
    pub kind: ValueKind,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct NodeSpec {
    pub name: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub stage: Stage,
    pub inputs: &'static [InputSpec],
    pub outputs: &'static [OutputSpec],
}

impl NodeSpec {
    pub fn input(&self, name: &str) -> Option<&InputSpec> {
        self.inputs.iter().find(|i| i.name == name)
    }
}

const PDF_PATH: InputSpec = InputSpec {
    name: "pdf_path",
    kind: ValueKind::String,
    default: None,
    range: None,
    multiline: false,
};

const fn template(name: &'static str, default: &'static str) -> InputSpec {
    InputSpec {
        name,
        kind: ValueKind::String,
        default: Some(DefaultValue::Text(default)),
        range: None,
        multiline: true,
    }
}

static NODES: [NodeSpec; 5] = [
    NodeSpec {
        name: "PDFChunker_S2V",
        display_name: "1. PDF Chunker (S2V)",
        category: CATEGORY,
        stage: Stage::Chunk,
        inputs: &[
            PDF_PATH,
            InputSpec {
                name: "chunk_size",
                kind: ValueKind::Int,
                default: Some(DefaultValue::Int(DEFAULT_CHUNK_SIZE)),
                range: Some(IntRange {
                    min: 100,
                    max: 16000,
                    step: 100,
                }),
                multiline: false,
            },
            InputSpec {
                name: "overlap_size",
                kind: ValueKind::Int,
                default: Some(DefaultValue::Int(DEFAULT_OVERLAP)),
                range: Some(IntRange {
                    min: 0,
                    max: 8000,
                    step: 50,
                }),
                multiline: false,
            },
        ],
        outputs: &[OutputSpec {
            name: "chunks",
            kind: ValueKind::Chunks,
        }],
    },
    NodeSpec {
        name: "StoryboardGenerator_S2V",
        display_name: "2. Storyboard Generator (S2V)",
        category: CATEGORY,
        stage: Stage::Storyboard,
        inputs: &[
            InputSpec {
                name: "chunks",
                kind: ValueKind::Chunks,
                default: None,
                range: None,
                multiline: false,
            },
            template("prompt_template", DEFAULT_STORYBOARD_TEMPLATE),
        ],
        outputs: &[OutputSpec {
            name: "storyboard_text",
            kind: ValueKind::String,
        }],
    },
    NodeSpec {
        name: "PromptGenerator_S2V",
        display_name: "3. Prompt Generator (S2V)",
        category: CATEGORY,
        stage: Stage::Prompts,
        inputs: &[
            InputSpec {
                name: "storyboard_text",
                kind: ValueKind::String,
                default: None,
                range: None,
                multiline: true,
            },
            template("prompt_template", DEFAULT_PROMPT_TEMPLATE),
        ],
        outputs: &[OutputSpec {
            name: "final_prompts",
            kind: ValueKind::String,
        }],
    },
    NodeSpec {
        name: "ScriptSummarizer_S2V",
        display_name: "Script Summarizer (S2V)",
        category: CATEGORY,
        stage: Stage::Summarize,
        inputs: &[
            InputSpec {
                name: "script_text",
                kind: ValueKind::String,
                default: None,
                range: None,
                multiline: true,
            },
            template("summary_prompt", DEFAULT_SUMMARY_PROMPT),
        ],
        outputs: &[OutputSpec {
            name: "summary_text",
            kind: ValueKind::String,
        }],
    },
    NodeSpec {
        name: "PDFToParsedScript_S2V",
        display_name: "PDF to Parsed Script (S2V)",
        category: CATEGORY,
        stage: Stage::Parse,
        inputs: &[PDF_PATH, template("parsing_prompt", DEFAULT_PARSING_PROMPT)],
        outputs: &[OutputSpec {
            name: "parsed_script",
            kind: ValueKind::String,
        }],
    },
];

/// Every registered node, in pipeline order.
pub fn all() -> &'static [NodeSpec] {
    &NODES
}

/// Look a node up by its stable name.
pub fn find(name: &str) -> Option<&'static NodeSpec> {
    NODES.iter().find(|n| n.name == name)
}
