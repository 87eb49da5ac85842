//! Orchestration of the inference capabilities into response contracts.
//!
//! Raw text flows segmenter -> capabilities -> normalization here; the
//! capabilities themselves are opaque. Requests own their data end to end and
//! nothing is retried: a failed capability call surfaces immediately.

use crate::capabilities::Capabilities;
use crate::config::AnalysisConfig;
use crate::error::{FeedbackLensError, Result};
use crate::segmenter;
use serde::Serialize;
use tracing::error;

/// Full-variant analysis response. Each field is present iff the capability
/// that produces it was available at startup.
#[derive(Debug, Clone, Serialize, Default)]
pub struct AnalysisReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspects: Option<Vec<AspectReport>>,
}

/// One independently scored sub-segment of a feedback text
#[derive(Debug, Clone, Serialize)]
pub struct AspectReport {
    pub segment: String,
    pub sentiment: String,
    pub score: f64,
}

/// Round a confidence to 2 decimal places for the response contract
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Threshold a classifier decision into a final categorical label.
///
/// Below the threshold the label becomes "neutral" regardless of what the
/// model said; at or above it the model's label is kept, lower-cased. Only
/// the narrow sentiment endpoint applies this.
pub fn normalize_label(label: &str, confidence: f64, threshold: f64) -> String {
    if confidence < threshold {
        "neutral".to_string()
    } else {
        label.to_lowercase()
    }
}

/// Stateless per-request orchestrator over the shared capability registry
#[derive(Clone)]
pub struct Analyzer {
    capabilities: Capabilities,
    settings: AnalysisConfig,
}

impl Analyzer {
    pub fn new(capabilities: Capabilities, settings: AnalysisConfig) -> Self {
        Self {
            capabilities,
            settings,
        }
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Full analysis: overall sentiment, primary topic, and per-segment
    /// aspects. A missing capability silently omits its fields; only blank
    /// input is an error.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisReport> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FeedbackLensError::Validation {
                message: "No text provided".to_string(),
            });
        }

        let mut report = AnalysisReport::default();

        if let Some(sentiment) = &self.capabilities.sentiment {
            let result = sentiment.classify(text).await?;
            report.sentiment = Some(result.label);
            report.sentiment_score = Some(round2(result.score));
        }

        if let Some(topic) = &self.capabilities.topic {
            let candidates = topic.classify(text, &self.settings.topic_labels).await?;
            if let Some(best) = candidates.into_iter().next() {
                report.primary_topic = Some(best.label);
                report.topic_confidence = Some(round2(best.score));
            }
        }

        if let Some(sentiment) = &self.capabilities.sentiment {
            let mut aspects = Vec::new();
            for chunk in segmenter::segment(text) {
                let result = sentiment.classify(&chunk).await?;
                aspects.push(AspectReport {
                    segment: chunk,
                    sentiment: result.label,
                    score: round2(result.score),
                });
            }
            report.aspects = Some(aspects);
        }

        Ok(report)
    }

    /// Narrow analysis: one neutral-thresholded categorical label.
    ///
    /// Availability is checked before input validation so a downed model
    /// reports 503 regardless of the request body.
    pub async fn classify_overall(&self, text: &str) -> Result<String> {
        let Some(sentiment) = &self.capabilities.sentiment else {
            return Err(FeedbackLensError::Unavailable {
                message: "Model is not available".to_string(),
            });
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(FeedbackLensError::Validation {
                message: "No text provided in the request body".to_string(),
            });
        }

        match sentiment.classify(text).await {
            Ok(result) => Ok(normalize_label(
                &result.label,
                result.score,
                self.settings.neutral_threshold,
            )),
            Err(e) => {
                error!("Sentiment classification failed: {}", e);
                Err(FeedbackLensError::Processing {
                    message: "Failed to process the text".to_string(),
                })
            }
        }
    }

    /// Bound and concatenate a batch of feedback texts, then summarize.
    ///
    /// Truncation to `batch_char_limit` chars happens before the capability
    /// call; content beyond the bound is never seen by the model.
    pub async fn summarize_batch(&self, texts: &[String]) -> Result<String> {
        if texts.is_empty() {
            return Err(FeedbackLensError::Validation {
                message: "No texts provided".to_string(),
            });
        }

        let combined = texts.join(" ");
        let bounded = truncate_chars(&combined, self.settings.batch_char_limit);

        let Some(summarizer) = &self.capabilities.summarizer else {
            return Err(FeedbackLensError::Unavailable {
                message: "Summarizer model not loaded".to_string(),
            });
        };

        summarizer
            .summarize(
                bounded,
                self.settings.summary_max_length,
                self.settings.summary_min_length,
            )
            .await
    }
}

/// First `limit` chars of `text`, respecting char boundaries
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_becomes_neutral() {
        assert_eq!(normalize_label("POSITIVE", 0.55, 0.70), "neutral");
        assert_eq!(normalize_label("NEGATIVE", 0.0, 0.70), "neutral");
        assert_eq!(normalize_label("NEGATIVE", 0.6999, 0.70), "neutral");
    }

    #[test]
    fn at_or_above_threshold_keeps_lowercased_label() {
        assert_eq!(normalize_label("POSITIVE", 0.70, 0.70), "positive");
        assert_eq!(normalize_label("NEGATIVE", 0.99, 0.70), "negative");
    }

    #[test]
    fn rounding_is_two_decimals() {
        assert_eq!(round2(0.987654), 0.99);
        assert_eq!(round2(0.554), 0.55);
        assert_eq!(round2(1.0), 1.0);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // multibyte chars count as one
        assert_eq!(truncate_chars("ééééé", 3), "ééé");
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let report = AnalysisReport {
            sentiment: Some("POSITIVE".to_string()),
            sentiment_score: Some(0.98),
            ..Default::default()
        };
        let value = serde_json::to_value(&report).expect("serialize");
        let obj = value.as_object().expect("object");
        assert!(obj.contains_key("sentiment"));
        assert!(!obj.contains_key("primary_topic"));
        assert!(!obj.contains_key("aspects"));
    }
}
