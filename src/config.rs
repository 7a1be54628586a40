use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Symbols to track, polled round-robin each cycle
    pub symbols: Vec<String>,
    pub refresh_interval: u64,

    // Analysis
    pub buildup_threshold: f64,
    pub otm_offset: f64,
    pub skew_dominance_ratio: f64,
    pub history_capacity: usize,
    /// Strikes on each side of ATM considered for selection.
    pub atm_window: usize,

    // NSE client
    pub request_timeout: u64,
    pub max_retries: u32,
    pub retry_delay: u64,
    pub min_request_gap_ms: u64,

    // Output
    pub report_dir: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let symbols: Vec<String> = env("SYMBOLS", "NIFTY,BANKNIFTY")
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();

        Config {
            symbols,
            refresh_interval: env("REFRESH_INTERVAL", "30").parse().unwrap_or(30),
            buildup_threshold: 1000.0,
            otm_offset: 200.0,
            skew_dominance_ratio: 1.2,
            history_capacity: env("HISTORY_CAPACITY", "100").parse().unwrap_or(100),
            atm_window: env("ATM_WINDOW", "5").parse().unwrap_or(5),
            request_timeout: 15,
            max_retries: 3,
            retry_delay: 5,
            min_request_gap_ms: env("MIN_REQUEST_GAP_MS", "3000").parse().unwrap_or(3000),
            report_dir: env("REPORT_DIR", "reports"),
            log_level: env("LOG_LEVEL", "INFO"),
        }
    }

    /// Reject configurations that can't run before the first cycle starts.
    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            bail!("no symbols configured");
        }
        if self.refresh_interval == 0 {
            bail!("refresh_interval must be at least 1 second");
        }
        if self.history_capacity == 0 {
            bail!("history_capacity must be at least 1");
        }
        if self.atm_window == 0 {
            bail!("atm_window must be at least 1 strike");
        }
        if self.buildup_threshold < 0.0 {
            bail!("buildup_threshold cannot be negative");
        }
        if self.otm_offset < 0.0 {
            bail!("otm_offset cannot be negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::default_test_config;

    #[test]
    fn default_config_is_valid() {
        assert!(default_test_config().validate().is_ok());
    }

    #[test]
    fn zero_history_capacity_rejected() {
        let mut cfg = default_test_config();
        cfg.history_capacity = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_symbols_rejected() {
        let mut cfg = default_test_config();
        cfg.symbols.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_atm_window_rejected() {
        let mut cfg = default_test_config();
        cfg.atm_window = 0;
        assert!(cfg.validate().is_err());
    }
}
