//! Integration tests for the analysis orchestration with stubbed capabilities.

use async_trait::async_trait;
use feedback_lens::analyzer::Analyzer;
use feedback_lens::capabilities::{
    Capabilities, Classification, SentimentClassifier, Summarizer, TopicClassifier,
};
use feedback_lens::config::AnalysisConfig;
use feedback_lens::error::{FeedbackLensError, Result};
use std::sync::{Arc, Mutex};

/// Sentiment stub returning a fixed label/score for every input
struct FixedSentiment {
    label: &'static str,
    score: f64,
}

#[async_trait]
impl SentimentClassifier for FixedSentiment {
    async fn classify(&self, _text: &str) -> Result<Classification> {
        Ok(Classification {
            label: self.label.to_string(),
            score: self.score,
        })
    }
}

/// Topic stub echoing candidate labels with descending scores
struct EchoTopic;

#[async_trait]
impl TopicClassifier for EchoTopic {
    async fn classify(
        &self,
        _text: &str,
        candidate_labels: &[String],
    ) -> Result<Vec<Classification>> {
        Ok(candidate_labels
            .iter()
            .enumerate()
            .map(|(i, label)| Classification {
                label: label.clone(),
                score: 0.9 - 0.1 * i as f64,
            })
            .collect())
    }
}

/// Summarizer stub that records the exact input it was handed
struct RecordingSummarizer {
    seen: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Summarizer for RecordingSummarizer {
    async fn summarize(&self, text: &str, _max: usize, _min: usize) -> Result<String> {
        self.seen.lock().unwrap().push(text.to_string());
        Ok("a condensed summary".to_string())
    }
}

struct FailingSentiment;

#[async_trait]
impl SentimentClassifier for FailingSentiment {
    async fn classify(&self, _text: &str) -> Result<Classification> {
        Err(FeedbackLensError::Processing {
            message: "model exploded".to_string(),
        })
    }
}

fn analyzer_with(caps: Capabilities) -> Analyzer {
    Analyzer::new(caps, AnalysisConfig::default())
}

fn full_caps(seen: Arc<Mutex<Vec<String>>>) -> Capabilities {
    Capabilities {
        sentiment: Some(Arc::new(FixedSentiment {
            label: "POSITIVE",
            score: 0.987654,
        })),
        topic: Some(Arc::new(EchoTopic)),
        summarizer: Some(Arc::new(RecordingSummarizer { seen })),
    }
}

#[tokio::test]
async fn full_analysis_populates_every_field() {
    let analyzer = analyzer_with(full_caps(Arc::new(Mutex::new(Vec::new()))));

    let report = analyzer
        .analyze("Teaching was great but the canteen food was terrible")
        .await
        .expect("analysis should succeed");

    assert_eq!(report.sentiment.as_deref(), Some("POSITIVE"));
    assert_eq!(report.sentiment_score, Some(0.99));
    assert_eq!(report.primary_topic.as_deref(), Some("Teaching Quality"));
    assert_eq!(report.topic_confidence, Some(0.9));

    let aspects = report.aspects.expect("aspects present");
    assert_eq!(aspects.len(), 2);
    assert_eq!(aspects[0].segment, "Teaching was great");
    assert_eq!(aspects[1].segment, "the canteen food was terrible");
    assert_eq!(aspects[0].sentiment, "POSITIVE");
    assert_eq!(aspects[0].score, 0.99);
}

#[tokio::test]
async fn blank_text_is_a_validation_error() {
    let analyzer = analyzer_with(full_caps(Arc::new(Mutex::new(Vec::new()))));

    for input in ["", "   ", "\n\t"] {
        match analyzer.analyze(input).await {
            Err(FeedbackLensError::Validation { message }) => {
                assert_eq!(message, "No text provided")
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }
}

#[tokio::test]
async fn missing_capabilities_omit_fields_without_failing() {
    let analyzer = analyzer_with(Capabilities {
        sentiment: None,
        topic: Some(Arc::new(EchoTopic)),
        summarizer: None,
    });

    let report = analyzer
        .analyze("The new lab equipment works well")
        .await
        .expect("degraded analysis still succeeds");

    assert!(report.sentiment.is_none());
    assert!(report.sentiment_score.is_none());
    assert!(report.aspects.is_none());
    assert_eq!(report.primary_topic.as_deref(), Some("Teaching Quality"));
}

#[tokio::test]
async fn analysis_with_no_capabilities_returns_empty_report() {
    let analyzer = analyzer_with(Capabilities::default());

    let report = analyzer
        .analyze("Completely fine lecture series")
        .await
        .expect("no capability is not an error for the full variant");

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value, serde_json::json!({}));
}

#[tokio::test]
async fn repeated_analysis_is_structurally_identical() {
    let analyzer = analyzer_with(full_caps(Arc::new(Mutex::new(Vec::new()))));
    let text = "Curriculum is solid however the pacing is rushed";

    let first = serde_json::to_value(analyzer.analyze(text).await.unwrap()).unwrap();
    let second = serde_json::to_value(analyzer.analyze(text).await.unwrap()).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn narrow_mode_applies_neutral_threshold() {
    let analyzer = analyzer_with(Capabilities {
        sentiment: Some(Arc::new(FixedSentiment {
            label: "POSITIVE",
            score: 0.55,
        })),
        ..Default::default()
    });

    let label = analyzer.classify_overall("The course was fine").await.unwrap();
    assert_eq!(label, "neutral");
}

#[tokio::test]
async fn narrow_mode_lowercases_confident_labels() {
    let analyzer = analyzer_with(Capabilities {
        sentiment: Some(Arc::new(FixedSentiment {
            label: "NEGATIVE",
            score: 0.93,
        })),
        ..Default::default()
    });

    let label = analyzer.classify_overall("Terrible labs").await.unwrap();
    assert_eq!(label, "negative");
}

#[tokio::test]
async fn narrow_mode_without_sentiment_is_unavailable_even_for_blank_input() {
    let analyzer = analyzer_with(Capabilities::default());

    match analyzer.classify_overall("").await {
        Err(FeedbackLensError::Unavailable { message }) => {
            assert_eq!(message, "Model is not available")
        }
        other => panic!("expected unavailable, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn narrow_mode_wraps_runtime_failures() {
    let analyzer = analyzer_with(Capabilities {
        sentiment: Some(Arc::new(FailingSentiment)),
        ..Default::default()
    });

    match analyzer.classify_overall("Anything at all").await {
        Err(FeedbackLensError::Processing { message }) => {
            assert_eq!(message, "Failed to process the text")
        }
        other => panic!("expected processing error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn batch_summary_truncates_before_the_capability_call() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let analyzer = analyzer_with(full_caps(seen.clone()));

    // 60 texts of 50 chars each joined well past the 2000-char bound
    let texts: Vec<String> = (0..60).map(|i| format!("{:049}x", i)).collect();
    let summary = analyzer.summarize_batch(&texts).await.unwrap();
    assert_eq!(summary, "a condensed summary");

    let inputs = seen.lock().unwrap();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].chars().count(), 2000);
    // prefix of the in-order concatenation
    assert!(texts.join(" ").starts_with(&inputs[0]));
}

#[tokio::test]
async fn short_batches_pass_through_unmodified() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let analyzer = analyzer_with(full_caps(seen.clone()));

    let texts = vec![
        "Great teaching staff".to_string(),
        "Labs need newer machines".to_string(),
    ];
    analyzer.summarize_batch(&texts).await.unwrap();

    let inputs = seen.lock().unwrap();
    assert_eq!(inputs[0], "Great teaching staff Labs need newer machines");
}

#[tokio::test]
async fn empty_batch_is_a_validation_error() {
    let analyzer = analyzer_with(full_caps(Arc::new(Mutex::new(Vec::new()))));

    match analyzer.summarize_batch(&[]).await {
        Err(FeedbackLensError::Validation { message }) => {
            assert_eq!(message, "No texts provided")
        }
        other => panic!("expected validation error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn batch_summary_without_summarizer_is_unavailable() {
    let analyzer = analyzer_with(Capabilities::default());

    match analyzer.summarize_batch(&["some feedback".to_string()]).await {
        Err(FeedbackLensError::Unavailable { message }) => {
            assert_eq!(message, "Summarizer model not loaded")
        }
        other => panic!("expected unavailable, got {:?}", other.map(|_| ())),
    }
}
