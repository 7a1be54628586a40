use anyhow::Result;
use tracing::{error, info};

use option_chain_analyzer::config::Config;
use option_chain_analyzer::engine::AnalysisEngine;
use option_chain_analyzer::fetch::{build_snapshot, today_ist, ChainSource};
use option_chain_analyzer::models::AnalysisResult;
use option_chain_analyzer::report::ReportWriter;
use option_chain_analyzer::signals::{SignalEngine, TradingSignal};

pub struct AnalyzerApp {
    config: Config,
    source: Box<dyn ChainSource>,
    engine: AnalysisEngine,
    signals: SignalEngine,
    reports: ReportWriter,
}

impl AnalyzerApp {
    pub fn new(config: Config, source: Box<dyn ChainSource>) -> Self {
        info!("{}", "=".repeat(60));
        info!("Option Chain Analyzer starting up");
        info!("Symbols: {}", config.symbols.join(", "));
        info!("Refresh interval: {}s", config.refresh_interval);
        info!("History capacity: {} points/symbol", config.history_capacity);
        info!("Reports: {}", config.report_dir);
        info!("{}", "=".repeat(60));

        let engine = AnalysisEngine::new(&config);
        let signals = SignalEngine::new(&config);
        let reports = ReportWriter::new(&config);

        Self {
            config,
            source,
            engine,
            signals,
            reports,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("Analyzer is now running. Press Ctrl+C to stop.");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutting down...");
                    return Ok(());
                }
                _ = self.tick() => {}
            }
        }
    }

    async fn tick(&mut self) {
        self.run_cycle().await;
        tokio::time::sleep(tokio::time::Duration::from_secs(self.config.refresh_interval)).await;
    }

    /// One polling cycle over every configured symbol. A symbol that fails
    /// to fetch or analyze is logged and skipped; the rest still run.
    pub async fn run_cycle(&mut self) -> (Vec<AnalysisResult>, Vec<TradingSignal>) {
        let mut results = Vec::new();
        let mut signals = Vec::new();

        let symbols = self.config.symbols.clone();
        for symbol in &symbols {
            match self.process_symbol(symbol).await {
                Ok((result, signal)) => {
                    results.push(result);
                    if let Some(s) = signal {
                        signals.push(s);
                    }
                }
                Err(e) => {
                    error!("{}: cycle skipped: {:#}", symbol, e);
                }
            }
        }

        if !results.is_empty() {
            if let Err(e) = self.write_reports(&results, &signals) {
                error!("Report write failed: {:#}", e);
            }
        }

        (results, signals)
    }

    async fn process_symbol(
        &mut self,
        symbol: &str,
    ) -> Result<(AnalysisResult, Option<TradingSignal>)> {
        let raw = self.source.fetch_chain(symbol).await?;
        let snapshot = build_snapshot(symbol, &raw, today_ist())?;
        let result = self.engine.analyze(&snapshot)?;
        let signal = self.signals.generate(&result);

        self.log_analysis(&result, signal.as_ref());
        Ok((result, signal))
    }

    fn log_analysis(&self, result: &AnalysisResult, signal: Option<&TradingSignal>) {
        info!(
            "{}: spot={:.2} pcr_oi={:.2} max_pain={} sentiment={} support={:?} resistance={:?}",
            result.symbol,
            result.spot_price,
            result.pcr.pcr_oi,
            result.max_pain,
            result.sentiment_score,
            result.support_resistance.support,
            result.support_resistance.resistance,
        );

        if let Some(s) = signal {
            info!("{}", "=".repeat(60));
            info!("SIGNAL — {} {}", s.symbol, s.signal);
            info!("  Option: {} {}", s.selected_strike, s.option_type);
            info!("  Spot: {:.2}", s.spot_price);
            info!("  Confidence: {}%", s.confidence);
            for reason in &s.reasons {
                info!("  - {}", reason);
            }
            info!("{}", "=".repeat(60));
        }
    }

    fn write_reports(
        &self,
        results: &[AnalysisResult],
        signals: &[TradingSignal],
    ) -> Result<()> {
        self.reports.write_signals_csv(signals)?;
        self.reports.write_summary_csv(results)?;
        self.reports.write_html(results, signals)?;
        self.reports.write_json(results, signals)?;
        Ok(())
    }
}
