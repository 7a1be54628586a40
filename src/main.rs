mod app;

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use option_chain_analyzer::config::Config;
use option_chain_analyzer::fetch::NseClient;

use crate::app::AnalyzerApp;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    cfg.validate()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let source = Box::new(NseClient::new(&cfg)?);

    let mut app = AnalyzerApp::new(cfg, source);
    app.run().await?;

    Ok(())
}
