//! Stage entry points.
//!
//! One async function per stage of the original node suite (chunker,
//! storyboard generator, prompt generator, summariser, parser), plus
//! [`run_pipeline`] chaining the main path end to end. Only extraction
//! failures and invalid parameters are fatal; relay failures show up as
//! placeholders inside the returned outputs.

use crate::config::PipelineConfig;
use crate::error::S2vError;
use crate::output::{
    ChunkedDocument, ItemKind, PipelineOutput, PromptsOutput, RunStats, StoryboardOutput, Warning,
};
use crate::pipeline::generate::{run_items, texts, LoopSpec, TextGenerator};
use crate::pipeline::{chunk, dedupe, extract, scenes};
use crate::prompts::{
    frame_parse, frame_summary, is_error_sentinel, CHUNK_SEPARATOR, SCENE_BREAK, SCENE_SEPARATOR,
};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Extract the PDF at `path` and split it into chunks.
///
/// # Errors
/// Extraction failures ([`S2vError::NotFound`], [`S2vError::ReadError`], …)
/// and [`S2vError::InvalidParameter`] for a zero chunk size.
pub async fn chunk_document(
    path: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<ChunkedDocument, S2vError> {
    let path = path.as_ref();
    info!("Chunking PDF: {}", path.display());
    let text = extract::extract_text(path, config.pdfium_lib_path.as_deref()).await?;
    let doc = chunk::chunk_text(&text, config.chunk_size, config.overlap)?;
    info!("PDF processed into {} chunks", doc.chunks.len());
    Ok(doc)
}

/// Generate storyboard panels for every chunk, then de-duplicate them.
///
/// Chunk responses (placeholders included) are joined with `"\n"` before
/// de-duplication, so a placeholder survives as its own panel text.
pub async fn generate_storyboard<G>(
    chunks: &[String],
    generator: &G,
    config: &PipelineConfig,
) -> StoryboardOutput
where
    G: TextGenerator + ?Sized,
{
    let mut warnings = Vec::new();
    if chunks.is_empty() {
        warn!("No chunks to generate a storyboard from");
        warnings.push(Warning::EmptyItems {
            kind: ItemKind::Chunk,
        });
    }

    let plan = LoopSpec {
        kind: ItemKind::Chunk,
        template: &config.storyboard_template,
        separator: CHUNK_SEPARATOR,
        concurrency: config.concurrency,
        progress: config.progress_callback.as_ref(),
    };
    let (items, stats) = run_items(chunks, generator, plan).await;

    let raw = texts(&items).join("\n");
    let (storyboard, dedupe) = dedupe::dedupe_panels(&raw);

    StoryboardOutput {
        storyboard,
        items,
        stats,
        dedupe,
        warnings,
    }
}

/// Split `storyboard` into scenes and generate prompts for each.
///
/// A storyboard without scenes yields empty prompts and a
/// [`Warning::NoScenes`], not an error.
pub async fn generate_prompts<G>(
    storyboard: &str,
    generator: &G,
    config: &PipelineConfig,
) -> PromptsOutput
where
    G: TextGenerator + ?Sized,
{
    let scenes = scenes::split_scenes(storyboard);
    if scenes.is_empty() {
        return PromptsOutput {
            prompts: String::new(),
            scenes,
            items: Vec::new(),
            stats: RunStats::default(),
            warnings: vec![Warning::NoScenes],
        };
    }

    let plan = LoopSpec {
        kind: ItemKind::Scene,
        template: &config.prompt_template,
        separator: SCENE_SEPARATOR,
        concurrency: config.concurrency,
        progress: config.progress_callback.as_ref(),
    };
    let (items, stats) = run_items(&scenes, generator, plan).await;
    let prompts = texts(&items).join(SCENE_BREAK);

    PromptsOutput {
        prompts,
        scenes,
        items,
        stats,
        warnings: Vec::new(),
    }
}

/// Summarise a whole script in one call.
///
/// Never fails: a relay error comes back as
/// `"[Error during summarization]\n<error>"`.
pub async fn summarize_script<G>(script: &str, generator: &G, config: &PipelineConfig) -> String
where
    G: TextGenerator + ?Sized,
{
    info!("Summarising script ({} chars)", script.chars().count());
    let response = generator
        .generate(&frame_summary(&config.summary_prompt, script))
        .await;
    if is_error_sentinel(&response) {
        warn!("Relay error during summarization: {}", response);
        return format!("[Error during summarization]\n{response}");
    }
    info!("Script summary generated successfully");
    response
}

/// Extract the PDF at `path` and ask the model to parse it into scenes.
///
/// # Errors
/// Extraction failures only; see [`parse_text`] for the relay side.
pub async fn parse_script<G>(
    path: impl AsRef<Path>,
    generator: &G,
    config: &PipelineConfig,
) -> Result<String, S2vError>
where
    G: TextGenerator + ?Sized,
{
    let text = extract::extract_text(path.as_ref(), config.pdfium_lib_path.as_deref()).await?;
    Ok(parse_text(&text, generator, config).await)
}

/// Ask the model to parse already-extracted script text into scenes.
///
/// A relay error string is returned as the output unchanged.
pub async fn parse_text<G>(text: &str, generator: &G, config: &PipelineConfig) -> String
where
    G: TextGenerator + ?Sized,
{
    info!("Sending script to relay for parsing");
    let parsed = generator
        .generate(&frame_parse(&config.parsing_prompt, text))
        .await;
    if is_error_sentinel(&parsed) {
        warn!("{}", parsed);
    } else {
        info!("Successfully received parsed script");
    }
    parsed
}

/// Run extract → chunk → storyboard → prompts on the PDF at `path`.
///
/// # Errors
/// Extraction failures and invalid chunk parameters abort the run; relay
/// failures never do.
pub async fn run_pipeline<G>(
    path: impl AsRef<Path>,
    generator: &G,
    config: &PipelineConfig,
) -> Result<PipelineOutput, S2vError>
where
    G: TextGenerator + ?Sized,
{
    let path = path.as_ref();
    info!("Starting pipeline: {}", path.display());
    let text = extract::extract_text(path, config.pdfium_lib_path.as_deref()).await?;
    run_text_pipeline(&text, generator, config).await
}

/// [`run_pipeline`] starting from already-extracted text.
pub async fn run_text_pipeline<G>(
    text: &str,
    generator: &G,
    config: &PipelineConfig,
) -> Result<PipelineOutput, S2vError>
where
    G: TextGenerator + ?Sized,
{
    let start = Instant::now();

    let chunked = chunk::chunk_text(text, config.chunk_size, config.overlap)?;
    info!("Text split into {} chunks", chunked.chunks.len());

    let storyboard = generate_storyboard(&chunked.chunks, generator, config).await;
    let prompts = generate_prompts(&storyboard.storyboard, generator, config).await;

    let output = PipelineOutput {
        chunk_count: chunked.chunks.len(),
        chunk_warnings: chunked.warnings,
        storyboard,
        prompts,
        total_duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Pipeline complete: {} chunks, {} panels, {} scenes, {}ms",
        output.chunk_count,
        output.storyboard.dedupe.panels_kept,
        output.prompts.scenes.len(),
        output.total_duration_ms
    );
    Ok(output)
}

/// Run the pipeline and write the final prompts to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn run_pipeline_to_file<G>(
    path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    generator: &G,
    config: &PipelineConfig,
) -> Result<PipelineOutput, S2vError>
where
    G: TextGenerator + ?Sized,
{
    let output = run_pipeline(path, generator, config).await?;
    write_atomic(output_path.as_ref(), output.text()).await?;
    Ok(output)
}

/// Synchronous wrapper around [`run_pipeline`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_pipeline_sync<G>(
    path: impl AsRef<Path>,
    generator: &G,
    config: &PipelineConfig,
) -> Result<PipelineOutput, S2vError>
where
    G: TextGenerator + ?Sized,
{
    tokio::runtime::Runtime::new()
        .map_err(|e| S2vError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(run_pipeline(path, generator, config))
}

/// Write `contents` to `path` via a sibling temp file and a rename.
pub async fn write_atomic(path: &Path, contents: &str) -> Result<(), S2vError> {
    let write_err = |source| S2vError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Fixed(&'static str);

    #[async_trait]
    impl TextGenerator for Fixed {
        async fn generate(&self, _prompt: &str) -> String {
            self.0.to_string()
        }
    }

    #[tokio::test]
    async fn summary_error_is_wrapped() {
        let out = summarize_script(
            "FADE IN:",
            &Fixed("Error: Could not connect to the relay server. Reason: refused"),
            &PipelineConfig::default(),
        )
        .await;
        assert_eq!(
            out,
            "[Error during summarization]\nError: Could not connect to the relay server. Reason: refused"
        );
    }

    #[tokio::test]
    async fn summary_passes_through_response() {
        let out = summarize_script("FADE IN:", &Fixed("- a heist"), &PipelineConfig::default()).await;
        assert_eq!(out, "- a heist");
    }

    #[tokio::test]
    async fn empty_storyboard_means_no_prompts() {
        let out = generate_prompts("nothing useful", &Fixed("unused"), &PipelineConfig::default()).await;
        assert_eq!(out.prompts, "");
        assert!(out.items.is_empty());
        assert_eq!(out.warnings, vec![Warning::NoScenes]);
    }

    #[tokio::test]
    async fn empty_chunk_list_warns() {
        let out = generate_storyboard(&[], &Fixed("unused"), &PipelineConfig::default()).await;
        assert_eq!(out.storyboard, "");
        assert_eq!(
            out.warnings,
            vec![Warning::EmptyItems {
                kind: ItemKind::Chunk
            }]
        );
    }

    #[tokio::test]
    async fn parse_error_string_is_returned_unchanged() {
        let sentinel = "Error: Relay server responded with status 502. Details: upstream down";
        let out = parse_text("INT. DINER - NIGHT", &Fixed(sentinel), &PipelineConfig::default()).await;
        assert_eq!(out, sentinel);
    }

    #[tokio::test]
    async fn parse_sends_prompt_then_script() {
        struct Echo;

        #[async_trait]
        impl TextGenerator for Echo {
            async fn generate(&self, prompt: &str) -> String {
                prompt.to_string()
            }
        }

        let config = PipelineConfig::builder()
            .parsing_prompt("Split into scenes.")
            .build()
            .unwrap();
        let out = parse_text("INT. DINER - NIGHT", &Echo, &config).await;
        assert!(out.starts_with("Split into scenes."), "got: {out}");
        assert!(out.ends_with("INT. DINER - NIGHT"), "got: {out}");
    }

    #[tokio::test]
    async fn parse_script_aborts_on_missing_pdf() {
        let err = parse_script("/no/such.pdf", &Fixed("unused"), &PipelineConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, S2vError::NotFound { .. }));
    }

    #[tokio::test]
    async fn write_atomic_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out/prompts.txt");
        write_atomic(&target, "IMAGE PROMPT").await.unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "IMAGE PROMPT");
        assert!(!dir.path().join("out/prompts.txt.tmp").exists());
    }

    #[test]
    fn sync_wrapper_propagates_extraction_failure() {
        let err = run_pipeline_sync("/no/such.pdf", &Fixed("x"), &PipelineConfig::default())
            .unwrap_err();
        assert!(matches!(err, S2vError::NotFound { .. }));
    }
}
