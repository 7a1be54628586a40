pub mod classifier;
pub mod selector;

pub use selector::SelectedStrike;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::models::{AnalysisResult, OptionSide, SignalTier};

/// An actionable directional call on one symbol: which tier, which side,
/// which strike, and the evidence trail behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSignal {
    pub symbol: String,
    pub signal: SignalTier,
    pub option_type: OptionSide,
    pub selected_strike: f64,
    pub spot_price: f64,
    pub confidence: u8,
    pub reasons: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Turns a finished analysis into at most one trading signal.
pub struct SignalEngine {
    atm_window: usize,
}

impl SignalEngine {
    pub fn new(cfg: &Config) -> Self {
        Self {
            atm_window: cfg.atm_window,
        }
    }

    /// Classify direction, pick a strike for the implied side, and attach
    /// confidence. Returns None when the evidence is below threshold or no
    /// eligible strike exists on the required side — suppression, not an
    /// error.
    pub fn generate(&self, result: &AnalysisResult) -> Option<TradingSignal> {
        let window =
            selector::atm_window(&result.strike_data, result.spot_price, self.atm_window);
        let oi_ratio = classifier::oi_concentration(window);

        let bias = classifier::classify(result.pcr.pcr_oi, oi_ratio);
        let tier = match classifier::tier(&bias) {
            Some(t) => t,
            None => {
                debug!(
                    "{}: no signal (bullish={} bearish={})",
                    result.symbol, bias.bullish, bias.bearish
                );
                return None;
            }
        };

        let side = tier.option_side();
        let picked = selector::select_strike(
            &result.strike_data,
            result.spot_price,
            side,
            self.atm_window,
        )?;

        let (confidence, mut reasons) = classifier::confidence_rules(result);
        reasons.extend(picked.reasons);

        Some(TradingSignal {
            symbol: result.symbol.clone(),
            signal: tier,
            option_type: side,
            selected_strike: picked.strike,
            spot_price: result.spot_price,
            confidence,
            reasons,
            timestamp: result.timestamp,
        })
    }
}
