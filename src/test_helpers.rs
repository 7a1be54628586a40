use chrono::{DateTime, NaiveDate, Utc};

use crate::config::Config;
use crate::models::{ChainSnapshot, StrikeRecord};

pub fn base_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T09:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// A strike record with OI on both sides and everything else zeroed.
pub fn strike(strike_price: f64, ce_oi: f64, pe_oi: f64) -> StrikeRecord {
    let mut rec = StrikeRecord::at(strike_price);
    rec.ce_oi = ce_oi;
    rec.pe_oi = pe_oi;
    rec
}

/// A NIFTY snapshot with zero-OI records at the given strikes.
pub fn make_snapshot(spot_price: f64, strikes: &[f64]) -> ChainSnapshot {
    ChainSnapshot {
        symbol: "NIFTY".to_string(),
        spot_price,
        expiry: NaiveDate::from_ymd_opt(2024, 1, 25).unwrap(),
        strikes: strikes.iter().map(|&k| strike(k, 0.0, 0.0)).collect(),
        timestamp: base_timestamp(),
    }
}

/// A Config suitable for testing — fixed symbols, temp report dir.
pub fn default_test_config() -> Config {
    Config {
        symbols: vec!["NIFTY".to_string(), "BANKNIFTY".to_string()],
        refresh_interval: 30,
        buildup_threshold: 1000.0,
        otm_offset: 200.0,
        skew_dominance_ratio: 1.2,
        history_capacity: 100,
        atm_window: 5,
        request_timeout: 15,
        max_retries: 3,
        retry_delay: 5,
        min_request_gap_ms: 0,
        report_dir: std::env::temp_dir()
            .join("oc_analyzer_test")
            .to_string_lossy()
            .to_string(),
        log_level: "ERROR".to_string(),
    }
}
