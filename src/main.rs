use anyhow::Result;
use feedback_lens::analyzer::Analyzer;
use feedback_lens::capabilities;
use feedback_lens::config::Config;
use feedback_lens::http;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(config.runtime.log_level.clone())
        .init();

    info!(
        "Loading capabilities (provider: {})",
        config.system.capability_provider
    );
    let caps = capabilities::init_capabilities(&config);
    info!(
        "Capabilities ready: sentiment={}, topic={}, summarizer={}",
        caps.sentiment_available(),
        caps.topic_available(),
        caps.summarizer_available()
    );

    let analyzer = Analyzer::new(caps, config.analysis.clone());
    http::start_http_server(&config, analyzer).await?;

    Ok(())
}
