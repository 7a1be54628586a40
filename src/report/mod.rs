use anyhow::{Context, Result};
use chrono::Utc;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::models::AnalysisResult;
use crate::signals::TradingSignal;

/// Serializes engine output to flat files under the configured report
/// directory. Pure presentation; nothing here feeds back into analysis.
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(cfg: &Config) -> Self {
        Self {
            dir: PathBuf::from(&cfg.report_dir),
        }
    }

    pub fn write_signals_csv(&self, signals: &[TradingSignal]) -> Result<PathBuf> {
        let mut out = String::new();
        out.push_str("symbol,signal,option_type,strike,spot,confidence,timestamp,reasons\n");
        for s in signals {
            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{},{}",
                s.symbol,
                s.signal,
                s.option_type,
                s.selected_strike,
                s.spot_price,
                s.confidence,
                s.timestamp.format("%Y-%m-%d %H:%M:%S"),
                csv_field(&s.reasons.join("; ")),
            );
        }
        self.write_file("option_signals.csv", &out)
    }

    pub fn write_summary_csv(&self, results: &[AnalysisResult]) -> Result<PathBuf> {
        let mut out = String::new();
        out.push_str(
            "symbol,spot,pcr_oi,pcr_volume,max_pain,sentiment,support,resistance,timestamp\n",
        );
        for r in results {
            let _ = writeln!(
                out,
                "{},{},{:.4},{:.4},{},{},{},{},{}",
                r.symbol,
                r.spot_price,
                r.pcr.pcr_oi,
                r.pcr.pcr_volume,
                r.max_pain,
                r.sentiment_score,
                csv_field(&join_levels(&r.support_resistance.support)),
                csv_field(&join_levels(&r.support_resistance.resistance)),
                r.timestamp.format("%Y-%m-%d %H:%M:%S"),
            );
        }
        self.write_file("market_summary.csv", &out)
    }

    pub fn write_html(
        &self,
        results: &[AnalysisResult],
        signals: &[TradingSignal],
    ) -> Result<PathBuf> {
        let mut body = String::new();
        body.push_str("<h1>Option Chain Signals</h1>\n");
        let _ = writeln!(
            body,
            "<p>Last updated: {}</p>",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        );

        body.push_str("<h2>Market Summary</h2>\n<table>\n");
        body.push_str(
            "<tr><th>Symbol</th><th>Spot</th><th>PCR (OI)</th><th>Max Pain</th>\
             <th>Sentiment</th><th>Support</th><th>Resistance</th></tr>\n",
        );
        for r in results {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{}</td>\
                 <td>{}</td><td>{}</td><td>{}</td></tr>",
                html_escape(&r.symbol),
                r.spot_price,
                r.pcr.pcr_oi,
                r.max_pain,
                r.sentiment_score,
                join_levels(&r.support_resistance.support),
                join_levels(&r.support_resistance.resistance),
            );
        }
        body.push_str("</table>\n");

        body.push_str("<h2>Signals</h2>\n");
        if signals.is_empty() {
            body.push_str("<p>No signals generated</p>\n");
        } else {
            body.push_str("<table>\n");
            body.push_str(
                "<tr><th>Symbol</th><th>Signal</th><th>Type</th><th>Strike</th>\
                 <th>Confidence</th><th>Reasons</th></tr>\n",
            );
            for s in signals {
                let _ = writeln!(
                    body,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
                     <td>{}</td><td>{}</td></tr>",
                    html_escape(&s.symbol),
                    s.signal,
                    s.option_type,
                    s.selected_strike,
                    s.confidence,
                    html_escape(&s.reasons.join("; ")),
                );
            }
            body.push_str("</table>\n");
        }

        let page = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<title>Option Chain Signals</title>\n\
             <style>\nbody {{ font-family: Arial, sans-serif; margin: 20px; }}\n\
             table {{ border-collapse: collapse; width: 100%; margin-bottom: 20px; }}\n\
             th, td {{ padding: 8px; text-align: left; border-bottom: 1px solid #ddd; }}\n\
             th {{ background-color: #f2f2f2; }}\n</style>\n</head>\n<body>\n{}</body>\n</html>\n",
            body
        );
        self.write_file("index.html", &page)
    }

    /// Machine-readable dump of the cycle: analysis keyed by symbol plus
    /// the emitted signals.
    pub fn write_json(
        &self,
        results: &[AnalysisResult],
        signals: &[TradingSignal],
    ) -> Result<PathBuf> {
        let dashboard: serde_json::Map<String, serde_json::Value> = results
            .iter()
            .map(|r| Ok((r.symbol.clone(), serde_json::to_value(r)?)))
            .collect::<Result<_>>()?;
        let payload = serde_json::json!({
            "analysis": dashboard,
            "signals": signals,
        });
        self.write_file("dashboard.json", &serde_json::to_string_pretty(&payload)?)
    }

    fn write_file(&self, name: &str, contents: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.dir.join(name);
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn join_levels(levels: &[f64]) -> String {
    levels
        .iter()
        .map(|l| format!("{}", l))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AnalysisEngine;
    use crate::models::{OptionSide, SignalTier};
    use crate::test_helpers::{base_timestamp, default_test_config, make_snapshot, strike};

    fn sample_result() -> AnalysisResult {
        let mut snap = make_snapshot(22150.0, &[]);
        snap.strikes = vec![
            strike(22000.0, 8000.0, 42000.0),
            strike(22100.0, 15000.0, 30000.0),
            strike(22200.0, 40000.0, 9000.0),
        ];
        AnalysisEngine::new(&default_test_config())
            .analyze(&snap)
            .unwrap()
    }

    fn sample_signal() -> TradingSignal {
        TradingSignal {
            symbol: "NIFTY".to_string(),
            signal: SignalTier::Buy,
            option_type: OptionSide::Ce,
            selected_strike: 22200.0,
            spot_price: 22150.0,
            confidence: 60,
            reasons: vec!["At-the-money strike".to_string(), "High volume: 1500".to_string()],
            timestamp: base_timestamp(),
        }
    }

    #[test]
    fn signals_csv_has_header_and_rows() {
        let writer = ReportWriter::new(&default_test_config());
        let path = writer.write_signals_csv(&[sample_signal()]).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        let mut lines = contents.lines();
        assert!(lines.next().unwrap().starts_with("symbol,signal"));
        let row = lines.next().unwrap();
        assert!(row.contains("NIFTY"));
        assert!(row.contains("BUY"));
        assert!(row.contains("22200"));
    }

    #[test]
    fn summary_csv_written_for_each_symbol() {
        let writer = ReportWriter::new(&default_test_config());
        let path = writer.write_summary_csv(&[sample_result()]).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn html_renders_empty_signal_state() {
        let writer = ReportWriter::new(&default_test_config());
        let path = writer.write_html(&[sample_result()], &[]).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("No signals generated"));
        assert!(contents.contains("NIFTY"));
    }

    #[test]
    fn json_dashboard_keyed_by_symbol() {
        let writer = ReportWriter::new(&default_test_config());
        let path = writer
            .write_json(&[sample_result()], &[sample_signal()])
            .unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert!(parsed["analysis"]["NIFTY"]["pcr"]["pcr_oi"].is_number());
        assert_eq!(parsed["signals"][0]["option_type"], "CE");
    }

    #[test]
    fn csv_field_quotes_commas() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
