//! CLI binary for script2video.
//!
//! One subcommand per pipeline stage plus `run` for the whole chain. Flags
//! map onto `PipelineConfig`; the backend is the relay when `--relay-url` is
//! set and no `--provider` is named, otherwise an LLM provider.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use script2video::run::write_atomic;
use script2video::{
    chunk_document, generate_prompts, generate_storyboard, nodes, parse_script, run_pipeline,
    summarize_script, GenerationProgressCallback, ItemKind, PipelineConfig, ProgressCallback,
    ProviderGenerator, RelayClient, TextGenerator, Warning,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Terminal progress: one bar per generator run and a log line per item.
/// Items may finish out of order when `--concurrency` > 1.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<(usize, usize), Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn elapsed_secs(&self, kind: ItemKind, number: usize) -> f64 {
        self.start_times
            .lock()
            .ok()
            .and_then(|mut m| m.remove(&(kind as usize, number)))
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl GenerationProgressCallback for CliProgressCallback {
    fn on_run_start(&self, kind: ItemKind, total: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len}  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_style(style);
        self.bar.set_prefix(match kind {
            ItemKind::Chunk => "Storyboard",
            ItemKind::Scene => "Prompts",
        });
        self.bar.reset_eta();
        self.bar.println(format!(
            "{} {}",
            bold("◆"),
            bold(&format!("Generating from {total} {}s…", kind.label().to_lowercase()))
        ));
    }

    fn on_item_start(&self, kind: ItemKind, number: usize, _total: usize) {
        if let Ok(mut m) = self.start_times.lock() {
            m.insert((kind as usize, number), Instant::now());
        }
        self.bar.set_message(format!("{} {number}", kind.label().to_lowercase()));
    }

    fn on_item_complete(&self, kind: ItemKind, number: usize, total: usize, response_len: usize) {
        let secs = self.elapsed_secs(kind, number);
        self.bar.println(format!(
            "  {} {} {:>3}/{:<3}  {:<8}  {}",
            green("✓"),
            kind,
            number,
            total,
            dim(&format!("{response_len:>5} chars")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_item_error(&self, kind: ItemKind, number: usize, total: usize, error: &str) {
        let secs = self.elapsed_secs(kind, number);
        let msg: String = if error.chars().count() > 80 {
            error.chars().take(79).chain(std::iter::once('…')).collect()
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            kind,
            number,
            total,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, kind: ItemKind, total: usize, success_count: usize) {
        let failed = total.saturating_sub(success_count);
        let noun = kind.label().to_lowercase();
        if failed == 0 {
            self.bar
                .println(format!("{} {} {noun}s processed", green("✔"), bold(&total.to_string())));
        } else {
            self.bar.println(format!(
                "{} {}/{} {noun}s processed  ({} failed)",
                if failed == total { red("✘") } else { yellow("⚠") },
                bold(&success_count.to_string()),
                total,
                red(&failed.to_string()),
            ));
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Full run through a relay, prompts to a file
  s2v --relay-url http://localhost:8000/generate run script.pdf -o prompts.txt

  # Stage by stage
  s2v chunk script.pdf --json > chunks.json
  s2v --relay-url http://localhost:8000/generate storyboard chunks.json > storyboard.txt
  s2v --relay-url http://localhost:8000/generate prompts storyboard.txt

  # Use an LLM provider directly instead of a relay
  s2v --provider openai --model gpt-4.1-mini run script.pdf

  # Summarise plain text from stdin
  cat script.txt | s2v --relay-url http://localhost:8000/generate summarize -

  # Describe the stage nodes
  s2v nodes --json

RELAY CONTRACT:
  POST <relay-url>  {"prompt": "<text>"}
  200  {"response": "<text>"}
  *    {"error": "<details>"}

ENVIRONMENT VARIABLES:
  S2V_RELAY_URL           Relay endpoint
  OPENAI_API_KEY          OpenAI API key (provider backend)
  ANTHROPIC_API_KEY       Anthropic API key (provider backend)
  EDGEQUAKE_PROVIDER      Provider name (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Model ID
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory); skips the download
  S2V_PDFIUM_CACHE_DIR    Where the downloaded libpdfium is cached
  RUST_LOG                Overrides the log filter
"#;

/// Turn screenplay PDFs into storyboards and video-generation prompts.
#[derive(Parser, Debug)]
#[command(
    name = "s2v",
    version,
    about = "Turn screenplay PDFs into storyboards and video-generation prompts",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Relay endpoint receiving {"prompt": ...} POSTs.
    #[arg(long, global = true, env = "S2V_RELAY_URL")]
    relay_url: Option<String>,

    /// Per-request relay timeout in seconds.
    #[arg(long, global = true, env = "S2V_RELAY_TIMEOUT", default_value_t = 120)]
    relay_timeout: u64,

    /// LLM provider; takes precedence over the relay. Auto-detected when
    /// neither this nor a relay URL is set.
    #[arg(long, global = true, env = "EDGEQUAKE_PROVIDER")]
    provider: Option<String>,

    /// LLM model ID for the provider backend.
    #[arg(long, global = true, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM temperature (0.0–2.0) for the provider backend.
    #[arg(long, global = true, env = "S2V_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Max output tokens per call for the provider backend.
    #[arg(long, global = true, env = "S2V_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Generation calls in flight at once. Output order never changes.
    #[arg(short, long, global = true, env = "S2V_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    /// Path to libpdfium, or a directory containing it.
    #[arg(long, global = true, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Write output to this file instead of stdout.
    #[arg(short, long, global = true, env = "S2V_OUTPUT")]
    output: Option<PathBuf>,

    /// Output structured JSON instead of plain text.
    #[arg(long, global = true, env = "S2V_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, global = true, env = "S2V_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "S2V_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "S2V_QUIET")]
    quiet: bool,
}

#[derive(Args, Debug, Clone)]
struct ChunkArgs {
    /// Characters per chunk.
    #[arg(long, env = "S2V_CHUNK_SIZE", default_value_t = 4000,
          value_parser = clap::value_parser!(u64).range(1..))]
    chunk_size: u64,

    /// Characters shared by consecutive chunks.
    #[arg(long, env = "S2V_OVERLAP", default_value_t = 400)]
    overlap: usize,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a PDF and split it into overlapping chunks.
    Chunk {
        pdf: PathBuf,
        #[command(flatten)]
        chunking: ChunkArgs,
    },

    /// Generate a de-duplicated storyboard from a chunk file (`chunk --json` output).
    Storyboard {
        /// Chunk JSON file, or `-` for stdin.
        chunks: PathBuf,
        /// File holding a custom storyboard template.
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Split a storyboard into scenes and generate prompts for each.
    Prompts {
        /// Storyboard text file, or `-` for stdin.
        storyboard: PathBuf,
        /// File holding a custom prompt template.
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Summarise script text in one call.
    Summarize {
        /// Script text file, or `-` for stdin.
        script: PathBuf,
        /// File holding a custom summary instruction.
        #[arg(long)]
        instruction: Option<PathBuf>,
    },

    /// Extract a PDF and ask the model to parse it into scenes.
    Parse {
        pdf: PathBuf,
        /// File holding a custom parsing instruction.
        #[arg(long)]
        instruction: Option<PathBuf>,
    },

    /// Run chunk → storyboard → prompts end to end.
    Run {
        pdf: PathBuf,
        #[command(flatten)]
        chunking: ChunkArgs,
    },

    /// Print the stage node registry.
    Nodes,
}

impl Command {
    /// Commands that open a PDF and therefore need pdfium.
    fn reads_pdf(&self) -> bool {
        matches!(
            self,
            Command::Chunk { .. } | Command::Parse { .. } | Command::Run { .. }
        )
    }
}

/// Accepts either `chunk --json` output or a bare JSON array of strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum ChunkInput {
    Document { chunks: Vec<String> },
    List(Vec<String>),
}

impl ChunkInput {
    fn into_chunks(self) -> Vec<String> {
        match self {
            ChunkInput::Document { chunks } | ChunkInput::List(chunks) => chunks,
        }
    }
}

#[derive(Serialize)]
struct TextOutput<'a> {
    text: &'a str,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let g = &cli.global;

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar covers INFO-level feedback while it is shown.
    let show_progress = !g.quiet && !g.no_progress && !g.json;
    let filter = if g.verbose {
        "debug"
    } else if g.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Command::Nodes = cli.command {
        return print_nodes(g.json);
    }

    // ── Make sure a PDF engine is on disk ────────────────────────────────
    // An explicit --pdfium-lib is used as given. Otherwise the first run
    // downloads libpdfium (~30 MB) into the pdfium-auto cache, or unpacks
    // the embedded copy with `--features bundled`.
    if cli.command.reads_pdf() && g.pdfium_lib.is_none() {
        ensure_pdfium(!g.quiet && !g.no_progress)?;
    }

    let progress = if show_progress {
        Some(CliProgressCallback::new())
    } else {
        None
    };
    let config = build_config(&cli, progress.clone().map(|p| p as ProgressCallback)).await?;

    match &cli.command {
        Command::Chunk { pdf, .. } => {
            let doc = chunk_document(pdf, &config)
                .await
                .context("Chunking failed")?;
            finish_progress(&progress);
            report_warnings(g, &doc.warnings);
            if g.json {
                emit_json(g, &doc).await?;
            } else {
                emit_text(g, &doc.chunks.join("\n\n")).await?;
            }
            if !g.quiet {
                eprintln!("{} {} chunks", green("✔"), bold(&doc.chunks.len().to_string()));
            }
        }

        Command::Storyboard { chunks, .. } => {
            let raw = read_input(chunks).await?;
            let chunks = serde_json::from_str::<ChunkInput>(&raw)
                .context("Chunk file must be `chunk --json` output or a JSON array of strings")?
                .into_chunks();
            let backend = build_backend(&config)?;
            let out = generate_storyboard(&chunks, backend.as_ref(), &config).await;
            finish_progress(&progress);
            report_warnings(g, &out.warnings);
            if g.json {
                emit_json(g, &out).await?;
            } else {
                emit_text(g, &out.storyboard).await?;
            }
            if !g.quiet {
                eprintln!(
                    "   {} panels kept, {} duplicates dropped",
                    out.dedupe.panels_kept,
                    dim(&out.dedupe.duplicates_dropped.to_string()),
                );
            }
        }

        Command::Prompts { storyboard, .. } => {
            let storyboard = read_input(storyboard).await?;
            let backend = build_backend(&config)?;
            let out = generate_prompts(&storyboard, backend.as_ref(), &config).await;
            finish_progress(&progress);
            report_warnings(g, &out.warnings);
            if g.json {
                emit_json(g, &out).await?;
            } else {
                emit_text(g, &out.prompts).await?;
            }
        }

        Command::Summarize { script, .. } => {
            let script = read_input(script).await?;
            let backend = build_backend(&config)?;
            let summary = summarize_script(&script, backend.as_ref(), &config).await;
            finish_progress(&progress);
            if g.json {
                emit_json(g, &TextOutput { text: &summary }).await?;
            } else {
                emit_text(g, &summary).await?;
            }
        }

        Command::Parse { pdf, .. } => {
            let backend = build_backend(&config)?;
            let parsed = parse_script(pdf, backend.as_ref(), &config)
                .await
                .context("Parsing failed")?;
            finish_progress(&progress);
            if g.json {
                emit_json(g, &TextOutput { text: &parsed }).await?;
            } else {
                emit_text(g, &parsed).await?;
            }
        }

        Command::Run { pdf, .. } => {
            let backend = build_backend(&config)?;
            let output = run_pipeline(pdf, backend.as_ref(), &config)
                .await
                .context("Pipeline failed")?;
            finish_progress(&progress);
            let warnings: Vec<Warning> = output.warnings().cloned().collect();
            report_warnings(g, &warnings);
            if g.json {
                emit_json(g, &output).await?;
            } else {
                emit_text(g, output.text()).await?;
            }

            if !g.quiet {
                let failed = output.storyboard.stats.failed + output.prompts.stats.failed;
                eprintln!(
                    "{}  {} chunks  {} panels  {} scenes  {}ms{}",
                    if failed == 0 { green("✔") } else { yellow("⚠") },
                    output.chunk_count,
                    output.storyboard.dedupe.panels_kept,
                    output.prompts.scenes.len(),
                    output.total_duration_ms,
                    match g.output {
                        Some(ref p) => format!("  →  {}", bold(&p.display().to_string())),
                        None => String::new(),
                    },
                );
                if failed > 0 {
                    eprintln!("   {} generation calls failed", red(&failed.to_string()));
                }
            }
        }

        Command::Nodes => print_nodes(g.json)?,
    }

    Ok(())
}

/// Map CLI args to `PipelineConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<PipelineConfig> {
    let g = &cli.global;
    let mut builder = PipelineConfig::builder()
        .relay_timeout_secs(g.relay_timeout)
        .concurrency(g.concurrency)
        .temperature(g.temperature)
        .max_tokens(g.max_tokens);

    if let Some(ref url) = g.relay_url {
        builder = builder.relay_url(url);
    }
    if let Some(ref provider) = g.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(ref model) = g.model {
        builder = builder.model(model);
    }
    if let Some(ref lib) = g.pdfium_lib {
        builder = builder.pdfium_lib_path(lib);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder = match &cli.command {
        Command::Chunk { chunking, .. } | Command::Run { chunking, .. } => builder
            .chunk_size(chunking.chunk_size as usize)
            .overlap(chunking.overlap),
        Command::Storyboard {
            template: Some(path),
            ..
        } => builder.storyboard_template(read_file(path).await?),
        Command::Prompts {
            template: Some(path),
            ..
        } => builder.prompt_template(read_file(path).await?),
        Command::Summarize {
            instruction: Some(path),
            ..
        } => builder.summary_prompt(read_file(path).await?),
        Command::Parse {
            instruction: Some(path),
            ..
        } => builder.parsing_prompt(read_file(path).await?),
        _ => builder,
    };

    builder.build().context("Invalid configuration")
}

/// An explicit `--provider` wins; otherwise the relay when a URL is set, and
/// an auto-detected provider as the last resort.
fn build_backend(config: &PipelineConfig) -> Result<Box<dyn TextGenerator>> {
    if config.provider_name.is_none() && config.relay_url.is_some() {
        let relay = RelayClient::from_config(config).context("Failed to create relay client")?;
        tracing::info!("Using relay at {}", relay.url());
        return Ok(Box::new(relay));
    }
    let provider =
        ProviderGenerator::from_config(config).context("Failed to initialise LLM provider")?;
    Ok(Box::new(provider))
}

fn finish_progress(progress: &Option<Arc<CliProgressCallback>>) {
    if let Some(p) = progress {
        p.bar.finish_and_clear();
    }
}

async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))
}

/// Read a file, or stdin when `path` is `-`.
async fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        read_file(path).await
    }
}

#[cfg(feature = "bundled")]
fn ensure_pdfium(_show_bar: bool) -> Result<()> {
    tokio::task::block_in_place(pdfium_auto::ensure_pdfium_bundled)
        .context("Failed to unpack the bundled PDFium library")?;
    Ok(())
}

/// Download libpdfium into the cache unless one is already there.
///
/// A failed download is only a warning: extraction still tries the system
/// library and reports `PdfiumUnavailable` if that is missing too.
#[cfg(not(feature = "bundled"))]
fn ensure_pdfium(show_bar: bool) -> Result<()> {
    if pdfium_auto::is_pdfium_cached() {
        return Ok(());
    }

    let bar = if show_bar {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS),
        );
        bar.set_prefix("PDF engine");
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    } else {
        ProgressBar::hidden()
    };

    // block_in_place lets the callback borrow `bar` without a 'static bound.
    let fetched = tokio::task::block_in_place(|| {
        pdfium_auto::ensure_pdfium_library(Some(&|done, total| {
            if let Some(total) = total {
                if bar.length() != Some(total) {
                    bar.set_length(total);
                }
            }
            bar.set_position(done);
        }))
    });

    match fetched {
        Ok(path) => {
            bar.finish_with_message(format!("ready {}", dim(&path.display().to_string())));
        }
        Err(e) => {
            bar.abandon();
            tracing::warn!("Could not download PDFium ({e}); falling back to the system library");
            eprintln!("{} PDFium download failed: {}", yellow("⚠"), e);
        }
    }
    Ok(())
}

async fn emit_text(g: &GlobalArgs, text: &str) -> Result<()> {
    match g.output {
        Some(ref path) => write_atomic(path, text)
            .await
            .with_context(|| format!("Failed to write {:?}", path)),
        None => write_text(&mut io::stdout().lock(), text).context("Failed to write to stdout"),
    }
}

/// Write `text`, adding a trailing newline if it lacks one.
fn write_text(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}

async fn emit_json<T: Serialize>(g: &GlobalArgs, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialise output")?;
    emit_text(g, &json).await
}

fn report_warnings(g: &GlobalArgs, warnings: &[Warning]) {
    if g.quiet {
        return;
    }
    for w in warnings {
        eprintln!("{} {}", yellow("⚠"), w);
    }
}

fn print_nodes(json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(nodes::all()).context("Failed to serialise nodes")?
        );
        return Ok(());
    }

    for node in nodes::all() {
        println!("{}  {}", bold(node.name), dim(node.display_name));
        for input in node.inputs {
            let range = input
                .range
                .map(|r| format!("  [{}..={} step {}]", r.min, r.max, r.step))
                .unwrap_or_default();
            println!("    in   {:<16} {:?}{}", input.name, input.kind, range);
        }
        for output in node.outputs {
            println!("    out  {:<16} {:?}", output.name, output.kind);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts `room` bytes, then fails every write.
    struct ShortWriter {
        written: Vec<u8>,
        room: usize,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written.len() + buf.len() > self.room {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn text_gets_a_trailing_newline() {
        let mut out = Vec::new();
        write_text(&mut out, "PANEL 001").unwrap();
        assert_eq!(out, b"PANEL 001\n");
    }

    #[test]
    fn existing_newline_is_not_doubled() {
        let mut out = Vec::new();
        write_text(&mut out, "PANEL 001\n").unwrap();
        assert_eq!(out, b"PANEL 001\n");
    }

    #[test]
    fn failed_newline_write_is_reported() {
        let mut out = ShortWriter {
            written: Vec::new(),
            room: 9,
        };
        let err = write_text(&mut out, "PANEL 001").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(out.written, b"PANEL 001");
    }

    #[test]
    fn only_pdf_commands_need_pdfium() {
        let cli = Cli::try_parse_from(["s2v", "run", "script.pdf"]).unwrap();
        assert!(cli.command.reads_pdf());
        let cli = Cli::try_parse_from(["s2v", "summarize", "-"]).unwrap();
        assert!(!cli.command.reads_pdf());
        let cli = Cli::try_parse_from(["s2v", "nodes"]).unwrap();
        assert!(!cli.command.reads_pdf());
    }
}
