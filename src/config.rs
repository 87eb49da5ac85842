use serde::{Deserialize, Serialize};

/// Main configuration structure loaded from feedback_lens.toml and environment variables
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub system: SystemConfig,
    pub analysis: AnalysisConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// System-level configuration for the inference capability provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SystemConfig {
    /// Capability provider: "huggingface" (remote inference API) or "lexicon" (local fallback)
    pub capability_provider: String,
    pub sentiment_model: String,
    pub topic_model: String,
    pub summarizer_model: String,
}

/// Analysis behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Candidate labels handed to the zero-shot topic capability
    pub topic_labels: Vec<String>,
    /// Sentiment confidence below this becomes "neutral" on the narrow endpoint
    pub neutral_threshold: f64,
    /// Batch summarization input is cut to this many chars before the capability call
    pub batch_char_limit: usize,
    pub summary_max_length: usize,
    pub summary_min_length: usize,
}

/// Which contract POST /analyze serves for this deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeMode {
    /// Sentiment + topic + aspects, each field present iff its capability loaded
    Full,
    /// Single neutral-thresholded sentiment label; requires the sentiment capability
    Narrow,
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub http_bind: std::net::SocketAddr,
    pub analyze_mode: AnalyzeMode,
    pub log_level: String,
    pub hf_api_base: String,
    pub hf_api_token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            http_bind: "127.0.0.1:5001"
                .parse()
                .expect("default bind address should parse"),
            analyze_mode: AnalyzeMode::Full,
            log_level: "feedback_lens=info".to_string(),
            hf_api_base: "https://api-inference.huggingface.co/models".to_string(),
            hf_api_token: None,
            request_timeout_secs: 30,
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("FBL_HTTP_BIND")
            && let Ok(bind) = v.parse::<std::net::SocketAddr>()
        {
            cfg.http_bind = bind;
        }
        if let Ok(mode) = std::env::var("FBL_ANALYZE_MODE") {
            match mode.as_str() {
                "narrow" => cfg.analyze_mode = AnalyzeMode::Narrow,
                "full" => cfg.analyze_mode = AnalyzeMode::Full,
                other => {
                    tracing::warn!("Unknown FBL_ANALYZE_MODE '{}', using 'full'", other);
                }
            }
        }
        cfg.log_level =
            std::env::var("RUST_LOG").unwrap_or_else(|_| "feedback_lens=info".to_string());
        if let Ok(base) = std::env::var("FBL_HF_API_BASE") {
            cfg.hf_api_base = base.trim_end_matches('/').to_string();
        }
        cfg.hf_api_token = std::env::var("HF_API_TOKEN").ok();
        if let Some(timeout) = std::env::var("FBL_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            cfg.request_timeout_secs = timeout;
        }

        cfg
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables.
    /// Uses FEEDBACK_LENS_CONFIG environment variable or defaults to "feedback_lens.toml"
    pub fn load() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();

        let config_path = std::env::var("FEEDBACK_LENS_CONFIG")
            .unwrap_or_else(|_| "feedback_lens.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            toml::from_str(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        // Apply env overrides for the provider selection (env-first)
        if let Ok(provider) = std::env::var("FBL_CAPABILITY_PROVIDER") {
            config.system.capability_provider = provider;
        }

        config.runtime = RuntimeConfig::load_from_env();

        // Validate configuration
        match config.system.capability_provider.as_str() {
            "huggingface" | "lexicon" => {}
            other => {
                tracing::warn!(
                    "Unknown capability provider '{}', no capabilities will load",
                    other
                );
            }
        }

        if !(0.0..=1.0).contains(&config.analysis.neutral_threshold) {
            anyhow::bail!(
                "neutral_threshold must be between 0.0 and 1.0, got {}",
                config.analysis.neutral_threshold
            );
        }
        if config.analysis.topic_labels.is_empty() {
            tracing::warn!("topic_labels is empty; topic classification will return no candidates");
        }
        if config.analysis.summary_min_length >= config.analysis.summary_max_length {
            anyhow::bail!(
                "summary_min_length {} must be below summary_max_length {}",
                config.analysis.summary_min_length,
                config.analysis.summary_max_length
            );
        }
        if config.analysis.batch_char_limit == 0 {
            anyhow::bail!("batch_char_limit must be > 0");
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system: SystemConfig {
                capability_provider: "huggingface".to_string(),
                sentiment_model: "distilbert-base-uncased-finetuned-sst-2-english".to_string(),
                topic_model: "valhalla/distilbart-mnli-12-3".to_string(),
                summarizer_model: "sshleifer/distilbart-cnn-12-6".to_string(),
            },
            analysis: AnalysisConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            topic_labels: [
                "Teaching Quality",
                "Infrastructure",
                "Canteen Food",
                "Curriculum",
                "Lab Facilities",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            neutral_threshold: 0.70,
            batch_char_limit: 2000,
            summary_max_length: 60,
            summary_min_length: 20,
        }
    }
}
