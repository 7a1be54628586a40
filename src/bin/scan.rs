use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use option_chain_analyzer::config::Config;
use option_chain_analyzer::engine::AnalysisEngine;
use option_chain_analyzer::fetch::{build_snapshot, today_ist, NseClient};
use option_chain_analyzer::signals::SignalEngine;

/// One-shot scan: fetch and analyze each symbol once, print the results,
/// exit. Symbols can be passed as CLI args, otherwise the configured list
/// is used.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cfg = Config::from_env();
    cfg.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let args: Vec<String> = std::env::args().skip(1).map(|s| s.to_uppercase()).collect();
    let symbols = if args.is_empty() {
        cfg.symbols.clone()
    } else {
        args
    };

    let mut client = NseClient::new(&cfg)?;
    let mut engine = AnalysisEngine::new(&cfg);
    let signal_engine = SignalEngine::new(&cfg);

    println!("{}", "=".repeat(70));
    println!("  OPTION CHAIN SCAN");
    println!("{}", "=".repeat(70));

    for symbol in &symbols {
        println!("\nFetching {}...", symbol);

        let raw = match client.fetch_chain(symbol).await {
            Ok(raw) => raw,
            Err(e) => {
                println!("  FAILED: {:#}", e);
                continue;
            }
        };

        let snapshot = match build_snapshot(symbol, &raw, today_ist()) {
            Ok(snap) => snap,
            Err(e) => {
                println!("  SKIPPED: {}", e);
                continue;
            }
        };

        let result = match engine.analyze(&snapshot) {
            Ok(r) => r,
            Err(e) => {
                println!("  SKIPPED: {}", e);
                continue;
            }
        };

        println!("  Spot:        {:.2}", result.spot_price);
        println!("  Expiry:      {}", snapshot.expiry);
        println!("  Strikes:     {}", result.strike_data.len());
        println!(
            "  PCR:         OI {:.2} | Volume {:.2}",
            result.pcr.pcr_oi, result.pcr.pcr_volume
        );
        println!("  Max Pain:    {}", result.max_pain);
        println!("  Sentiment:   {}/100", result.sentiment_score);
        println!("  Support:     {:?}", result.support_resistance.support);
        println!("  Resistance:  {:?}", result.support_resistance.resistance);

        match signal_engine.generate(&result) {
            Some(signal) => {
                println!("  SIGNAL:      {} {} @ {}", signal.signal, signal.option_type, signal.selected_strike);
                println!("  Confidence:  {}%", signal.confidence);
                for reason in &signal.reasons {
                    println!("    - {}", reason);
                }
            }
            None => println!("  SIGNAL:      none"),
        }
    }

    println!("\n{}", "=".repeat(70));
    Ok(())
}
