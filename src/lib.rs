//! # script2video
//!
//! Turn a screenplay PDF into storyboard panels and then into per-scene
//! image/video generation prompts, using a text-generation relay (or an LLM
//! provider) for the creative steps.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Extract     page-ordered text via pdfium (spawn_blocking)
//!  ├─ 2. Chunk       fixed-size overlapping character windows
//!  ├─ 3. Storyboard  one generation per chunk, joined, panels de-duplicated
//!  ├─ 4. Scenes      split before every `PANEL 001`
//!  └─ 5. Prompts     one generation per scene, joined by a scene break
//! ```
//!
//! A relay failure never aborts a run: the failed item is replaced by a
//! `--- ERROR PROCESSING <KIND> <n> ---` placeholder and recorded in the
//! item's [`ItemResult::error`]. Only extraction failures are fatal.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use script2video::{run_pipeline, PipelineConfig, RelayClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::builder()
//!         .relay_url("http://localhost:8000/generate")
//!         .build()?;
//!     let relay = RelayClient::from_config(&config)?;
//!     let output = run_pipeline("script.pdf", &relay, &config).await?;
//!     println!("{}", output.text());
//!     for warning in output.warnings() {
//!         eprintln!("warning: {warning}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! The library emits `tracing` events and never installs a subscriber;
//! without one, logging is a no-op.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `s2v` binary (clap + anyhow + indicatif + tracing-subscriber) |
//! | `bundled` | off   | Embeds libpdfium (from `PDFIUM_BUNDLE_LIB` at build time) so `s2v` never downloads it |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod nodes;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod run;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::{ItemError, RelayError, S2vError};
pub use output::{
    ChunkedDocument, DedupeReport, ItemKind, ItemResult, PipelineOutput, PromptsOutput, RunStats,
    StoryboardOutput, Warning,
};
pub use pipeline::chunk::chunk_text;
pub use pipeline::dedupe::{dedupe, dedupe_panels};
pub use pipeline::generate::TextGenerator;
pub use pipeline::provider::ProviderGenerator;
pub use pipeline::relay::RelayClient;
pub use pipeline::scenes::split_scenes;
pub use progress::{GenerationProgressCallback, NoopProgressCallback, ProgressCallback};
pub use run::{
    chunk_document, generate_prompts, generate_storyboard, parse_script, parse_text, run_pipeline,
    run_pipeline_sync, run_pipeline_to_file, run_text_pipeline, summarize_script,
};
