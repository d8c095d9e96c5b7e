//! Configuration for the script-to-video pipeline.
//!
//! Every stage reads its knobs from one [`PipelineConfig`], built via
//! [`PipelineConfigBuilder`]. Nothing is read from process-global state at
//! call time except the documented pdfium lookup (`PDFIUM_LIB_PATH`, then the cache); the relay URL
//! in particular is always passed in explicitly.

use crate::error::S2vError;
use crate::progress::ProgressCallback;
use crate::prompts::{
    DEFAULT_PARSING_PROMPT, DEFAULT_PROMPT_TEMPLATE, DEFAULT_STORYBOARD_TEMPLATE,
    DEFAULT_SUMMARY_PROMPT,
};
use std::fmt;
use std::path::PathBuf;

/// Default window size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 4000;
/// Default overlap between consecutive windows, in characters.
pub const DEFAULT_OVERLAP: usize = 400;
/// Default per-request relay timeout.
pub const DEFAULT_RELAY_TIMEOUT_SECS: u64 = 120;

/// Configuration for a pipeline run.
///
/// Built via [`PipelineConfig::builder()`] or using
/// [`PipelineConfig::default()`].
///
/// # Example
/// ```rust
/// use script2video::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .chunk_size(3000)
///     .overlap(300)
///     .relay_url("http://localhost:8000/generate")
///     .build()
///     .unwrap();
/// assert_eq!(config.chunk_size, 3000);
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// Characters per chunk. Must be ≥ 1. Default: 4000.
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks. Default: 400.
    ///
    /// Values ≥ `chunk_size` are not rejected here; the chunker clamps them
    /// to `chunk_size - 1` and reports a warning.
    pub overlap: usize,

    /// Relay endpoint receiving `{"prompt": …}` POSTs. Required only when
    /// the relay backend is used.
    pub relay_url: Option<String>,

    /// Per-request relay timeout in seconds. Default: 120.
    pub relay_timeout_secs: u64,

    /// Template prepended to each chunk for panel generation.
    pub storyboard_template: String,

    /// Template prepended to each scene for prompt generation.
    pub prompt_template: String,

    /// Instruction for the script summariser.
    pub summary_prompt: String,

    /// Instruction for the script parser.
    pub parsing_prompt: String,

    /// Maximum relay calls in flight. Default: 1 (strictly sequential).
    ///
    /// Output order always equals input order regardless of this value.
    pub concurrency: usize,

    /// Explicit pdfium library (file or directory). Falls back to
    /// `PDFIUM_LIB_PATH`, then the pdfium-auto cache, then the system library.
    pub pdfium_lib_path: Option<PathBuf>,

    /// LLM provider name for the provider backend (e.g. "openai").
    pub provider_name: Option<String>,

    /// LLM model identifier for the provider backend.
    pub model: Option<String>,

    /// Sampling temperature for the provider backend. Default: 0.7.
    pub temperature: f32,

    /// Maximum tokens per provider completion. Default: 4096.
    pub max_tokens: usize,

    /// Receives generator-loop events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
            relay_url: None,
            relay_timeout_secs: DEFAULT_RELAY_TIMEOUT_SECS,
            storyboard_template: DEFAULT_STORYBOARD_TEMPLATE.to_string(),
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            summary_prompt: DEFAULT_SUMMARY_PROMPT.to_string(),
            parsing_prompt: DEFAULT_PARSING_PROMPT.to_string(),
            concurrency: 1,
            pdfium_lib_path: None,
            provider_name: None,
            model: None,
            temperature: 0.7,
            max_tokens: 4096,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("chunk_size", &self.chunk_size)
            .field("overlap", &self.overlap)
            .field("relay_url", &self.relay_url)
            .field("relay_timeout_secs", &self.relay_timeout_secs)
            .field("concurrency", &self.concurrency)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn GenerationProgressCallback>"),
            )
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    pub fn overlap(mut self, overlap: usize) -> Self {
        self.config.overlap = overlap;
        self
    }

    pub fn relay_url(mut self, url: impl Into<String>) -> Self {
        self.config.relay_url = Some(url.into());
        self
    }

    pub fn relay_timeout_secs(mut self, secs: u64) -> Self {
        self.config.relay_timeout_secs = secs.max(1);
        self
    }

    pub fn storyboard_template(mut self, template: impl Into<String>) -> Self {
        self.config.storyboard_template = template.into();
        self
    }

    pub fn prompt_template(mut self, template: impl Into<String>) -> Self {
        self.config.prompt_template = template.into();
        self
    }

    pub fn summary_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.summary_prompt = prompt.into();
        self
    }

    pub fn parsing_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.parsing_prompt = prompt.into();
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, S2vError> {
        let c = &self.config;
        if c.chunk_size == 0 {
            return Err(S2vError::InvalidConfig(
                "chunk size must be ≥ 1".into(),
            ));
        }
        if let Some(ref url) = c.relay_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(S2vError::InvalidConfig(format!(
                    "relay URL must be http:// or https://, got '{url}'"
                )));
            }
        }
        Ok(self.config)
    }
}
