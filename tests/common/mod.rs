use option_chain_analyzer::config::Config;
use option_chain_analyzer::fetch::{RawLeg, RawOptionChain, RawRecords, RawStrikeEntry};

/// A raw NSE-shaped payload from (strike, ce_oi, pe_oi) triples, single
/// expiry, fixed volumes and prices on both legs.
pub fn make_raw_chain(spot: f64, expiry: &str, rows: &[(f64, f64, f64)]) -> RawOptionChain {
    let data: Vec<RawStrikeEntry> = rows
        .iter()
        .map(|&(strike, ce_oi, pe_oi)| RawStrikeEntry {
            strike_price: Some(strike),
            expiry_date: Some(expiry.to_string()),
            ce: Some(leg(ce_oi)),
            pe: Some(leg(pe_oi)),
        })
        .collect();

    RawOptionChain {
        records: RawRecords {
            timestamp: Some("15-Jan-2024 15:30:00".to_string()),
            underlying_value: Some(spot),
            expiry_dates: vec![expiry.to_string()],
            data,
        },
    }
}

fn leg(oi: f64) -> RawLeg {
    RawLeg {
        open_interest: oi,
        change_in_oi: 0.0,
        total_traded_volume: 500.0,
        last_price: 85.0,
        p_change: 0.0,
        implied_volatility: Some(14.5),
        delta: None,
        gamma: None,
    }
}

pub fn test_config() -> Config {
    let mut cfg = Config::from_env();
    cfg.symbols = vec!["NIFTY".to_string()];
    cfg.report_dir = std::env::temp_dir()
        .join(format!("oc_analyzer_integ_{}", std::process::id()))
        .to_string_lossy()
        .to_string();
    cfg
}
