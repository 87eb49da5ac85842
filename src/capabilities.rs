//! Inference capability contracts and providers.
//!
//! Three independent capabilities sit behind object-safe traits: sentiment,
//! zero-shot topic classification, and summarization. Each may fail to
//! initialize at startup; the [`Capabilities`] registry records what actually
//! loaded and callers check availability before dispatch.

use crate::config::Config;
use crate::error::{FeedbackLensError, Result};
use aho_corasick::AhoCorasick;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A (label, confidence) pair returned by any capability
#[derive(Debug, Clone)]
pub struct Classification {
    pub label: String,
    pub score: f64,
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification>;
}

/// Zero-shot topic classification: the candidate label set is supplied by the
/// caller on every call, never baked into the capability.
#[async_trait]
pub trait TopicClassifier: Send + Sync {
    /// Returns candidates sorted descending by confidence.
    async fn classify(&self, text: &str, candidate_labels: &[String])
    -> Result<Vec<Classification>>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Output length is bounded by `min_length..=max_length` in the model's
    /// native unit. Deterministic for identical input (no sampling).
    async fn summarize(&self, text: &str, max_length: usize, min_length: usize) -> Result<String>;
}

/// Process-wide registry of the capabilities that initialized successfully.
///
/// Built once at startup and shared read-only across requests; an absent
/// capability is a documented degradation, not an error.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub sentiment: Option<Arc<dyn SentimentClassifier>>,
    pub topic: Option<Arc<dyn TopicClassifier>>,
    pub summarizer: Option<Arc<dyn Summarizer>>,
}

impl Capabilities {
    pub fn sentiment_available(&self) -> bool {
        self.sentiment.is_some()
    }

    pub fn topic_available(&self) -> bool {
        self.topic.is_some()
    }

    pub fn summarizer_available(&self) -> bool {
        self.summarizer.is_some()
    }
}

/// Initialize capabilities per the configured provider.
///
/// Mirrors the reference startup policy: each capability is attempted
/// independently, a failure is logged and leaves that capability unavailable,
/// and the process keeps serving with whatever loaded.
pub fn init_capabilities(config: &Config) -> Capabilities {
    let mut caps = Capabilities::default();

    match config.system.capability_provider.as_str() {
        "huggingface" => match HfClient::new(config) {
            Ok(client) => {
                let client = Arc::new(client);
                caps.sentiment = Some(Arc::new(HfSentiment {
                    client: client.clone(),
                    model: config.system.sentiment_model.clone(),
                }));
                info!("Sentiment model ready: {}", config.system.sentiment_model);
                caps.topic = Some(Arc::new(HfZeroShot {
                    client: client.clone(),
                    model: config.system.topic_model.clone(),
                }));
                info!("Topic model ready: {}", config.system.topic_model);
                caps.summarizer = Some(Arc::new(HfSummarizer {
                    client,
                    model: config.system.summarizer_model.clone(),
                }));
                info!("Summarizer model ready: {}", config.system.summarizer_model);
            }
            Err(e) => {
                warn!("Failed to initialize inference client: {}", e);
            }
        },
        "lexicon" => {
            match LexiconSentiment::new() {
                Ok(lex) => {
                    caps.sentiment = Some(Arc::new(lex));
                    info!("Lexicon sentiment classifier ready");
                }
                Err(e) => warn!("Failed to build lexicon classifier: {}", e),
            }
            warn!("Lexicon provider has no topic or summarization capability");
        }
        other => {
            warn!("Unknown capability provider '{}'; nothing loaded", other);
        }
    }

    caps
}

// HuggingFace Inference API implementations

/// Shared HTTP client for the hosted inference API
pub struct HfClient {
    http: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl HfClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(
                config.runtime.request_timeout_secs,
            ))
            .build()
            .map_err(|e| FeedbackLensError::Config {
                message: format!("Failed to build inference HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            base: config.runtime.hf_api_base.clone(),
            token: config.runtime.hf_api_token.clone(),
        })
    }

    async fn post(&self, model: &str, body: serde_json::Value) -> Result<reqwest::Response> {
        let url = format!("{}/{}", self.base, model);
        debug!("Inference call to {}", url);

        let mut req = self.http.post(&url).json(&body);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let response = req.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(FeedbackLensError::Processing {
                message: format!("Inference API error {} from {}: {}", status, model, detail),
            });
        }
        Ok(response)
    }
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

pub struct HfSentiment {
    client: Arc<HfClient>,
    model: String,
}

#[async_trait]
impl SentimentClassifier for HfSentiment {
    async fn classify(&self, text: &str) -> Result<Classification> {
        let response = self
            .client
            .post(&self.model, json!({ "inputs": text }))
            .await?;
        // Text-classification returns one candidate list per input, best first
        let parsed: Vec<Vec<LabelScore>> = response.json().await?;
        parsed
            .into_iter()
            .next()
            .and_then(|candidates| candidates.into_iter().next())
            .map(|c| Classification {
                label: c.label,
                score: c.score,
            })
            .ok_or_else(|| FeedbackLensError::Processing {
                message: format!("Empty sentiment response from {}", self.model),
            })
    }
}

pub struct HfZeroShot {
    client: Arc<HfClient>,
    model: String,
}

#[derive(Deserialize)]
struct ZeroShotResponse {
    labels: Vec<String>,
    scores: Vec<f64>,
}

#[async_trait]
impl TopicClassifier for HfZeroShot {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[String],
    ) -> Result<Vec<Classification>> {
        let response = self
            .client
            .post(
                &self.model,
                json!({
                    "inputs": text,
                    "parameters": { "candidate_labels": candidate_labels }
                }),
            )
            .await?;
        // Labels arrive sorted descending by score
        let parsed: ZeroShotResponse = response.json().await?;
        Ok(parsed
            .labels
            .into_iter()
            .zip(parsed.scores)
            .map(|(label, score)| Classification { label, score })
            .collect())
    }
}

pub struct HfSummarizer {
    client: Arc<HfClient>,
    model: String,
}

#[derive(Serialize)]
struct SummaryParams {
    max_length: usize,
    min_length: usize,
    do_sample: bool,
}

#[derive(Deserialize)]
struct SummaryResponse {
    summary_text: String,
}

#[async_trait]
impl Summarizer for HfSummarizer {
    async fn summarize(&self, text: &str, max_length: usize, min_length: usize) -> Result<String> {
        let params = SummaryParams {
            max_length,
            min_length,
            do_sample: false,
        };
        let response = self
            .client
            .post(
                &self.model,
                json!({ "inputs": text, "parameters": params }),
            )
            .await?;
        let parsed: Vec<SummaryResponse> = response.json().await?;
        parsed
            .into_iter()
            .next()
            .map(|s| s.summary_text)
            .ok_or_else(|| FeedbackLensError::Processing {
                message: format!("Empty summary response from {}", self.model),
            })
    }
}

// Lexicon fallback

/// Keyword-counting sentiment classifier for offline deployments.
///
/// Score is the share of positive hits among all hits, 0.5 when nothing
/// matches. Good enough to keep the analyze surface alive without a model.
pub struct LexiconSentiment {
    positive: AhoCorasick,
    negative: AhoCorasick,
}

impl LexiconSentiment {
    pub fn new() -> Result<Self> {
        let positive = [
            "good",
            "great",
            "excellent",
            "love",
            "amazing",
            "wonderful",
            "helpful",
            "engaging",
            "fantastic",
            "best",
        ];
        let negative = [
            "bad",
            "terrible",
            "awful",
            "hate",
            "horrible",
            "worst",
            "boring",
            "crowded",
            "disappointed",
            "poor",
        ];

        let build = |words: &[&str]| {
            AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(words)
                .map_err(|e| FeedbackLensError::Config {
                    message: format!("Failed to build sentiment matcher: {}", e),
                })
        };

        Ok(Self {
            positive: build(&positive)?,
            negative: build(&negative)?,
        })
    }
}

#[async_trait]
impl SentimentClassifier for LexiconSentiment {
    async fn classify(&self, text: &str) -> Result<Classification> {
        let positive_hits = self.positive.find_iter(text).count() as f64;
        let negative_hits = self.negative.find_iter(text).count() as f64;
        let total = positive_hits + negative_hits;

        let score = if total == 0.0 {
            0.5
        } else {
            positive_hits / total
        };
        let label = if score >= 0.5 { "POSITIVE" } else { "NEGATIVE" };

        Ok(Classification {
            label: label.to_string(),
            score: if label == "POSITIVE" {
                score
            } else {
                1.0 - score
            },
        })
    }
}
