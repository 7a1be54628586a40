use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::analytics::{aggregates, sentiment, strike_metrics, RollingHistory};
use crate::config::Config;
use crate::models::{AnalysisResult, ChainSnapshot, HistoryPoint};

/// Why a snapshot could not be analyzed. These are per-cycle, per-symbol
/// conditions; one symbol failing must never take down another's pass.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{symbol}: option chain has no strikes")]
    EmptyChain { symbol: String },
    #[error("{symbol}: missing or non-positive spot price")]
    InvalidSpot { symbol: String },
    #[error("{symbol}: payload lists no expiry dates")]
    NoExpiry { symbol: String },
}

/// Owns the analysis pipeline and one rolling history buffer per symbol.
///
/// One `analyze` call is one full pass: strike metrics, aggregate metrics,
/// sentiment, history append. The engine is synchronous and holds no
/// external resources; callers running symbols concurrently should give
/// each symbol its own serialized access.
pub struct AnalysisEngine {
    buildup_threshold: f64,
    otm_offset: f64,
    skew_dominance_ratio: f64,
    history_capacity: usize,
    history: HashMap<String, RollingHistory>,
}

impl AnalysisEngine {
    pub fn new(cfg: &Config) -> Self {
        Self {
            buildup_threshold: cfg.buildup_threshold,
            otm_offset: cfg.otm_offset,
            skew_dominance_ratio: cfg.skew_dominance_ratio,
            history_capacity: cfg.history_capacity,
            history: HashMap::new(),
        }
    }

    pub fn analyze(&mut self, snapshot: &ChainSnapshot) -> Result<AnalysisResult, EngineError> {
        if snapshot.spot_price <= 0.0 {
            return Err(EngineError::InvalidSpot {
                symbol: snapshot.symbol.clone(),
            });
        }
        if snapshot.is_empty() {
            return Err(EngineError::EmptyChain {
                symbol: snapshot.symbol.clone(),
            });
        }

        let mut strikes = snapshot.strikes.clone();
        strike_metrics::apply(&mut strikes, self.buildup_threshold);

        let pcr = aggregates::pcr(&strikes);
        let max_pain =
            aggregates::max_pain(&strikes).ok_or_else(|| EngineError::EmptyChain {
                symbol: snapshot.symbol.clone(),
            })?;
        let skew_patterns = aggregates::skew_patterns(
            &strikes,
            snapshot.spot_price,
            self.otm_offset,
            self.skew_dominance_ratio,
        );
        let support_resistance =
            aggregates::support_resistance(&strikes, snapshot.spot_price);
        let sentiment_score = sentiment::sentiment_score(&pcr, &skew_patterns, &strikes);

        debug!(
            "{}: pcr_oi={:.2} max_pain={} sentiment={}",
            snapshot.symbol, pcr.pcr_oi, max_pain, sentiment_score
        );

        let result = AnalysisResult {
            symbol: snapshot.symbol.clone(),
            spot_price: snapshot.spot_price,
            pcr,
            max_pain,
            skew_patterns,
            support_resistance,
            sentiment_score,
            strike_data: strikes,
            timestamp: snapshot.timestamp,
        };

        self.record_history(&result);
        Ok(result)
    }

    pub fn history(&self, symbol: &str) -> Option<&RollingHistory> {
        self.history.get(symbol)
    }

    fn record_history(&mut self, result: &AnalysisResult) {
        let buffer = self
            .history
            .entry(result.symbol.clone())
            .or_insert_with(|| RollingHistory::new(self.history_capacity));
        buffer.push(HistoryPoint {
            timestamp: result.timestamp,
            spot_price: result.spot_price,
            pcr_oi: result.pcr.pcr_oi,
            sentiment_score: result.sentiment_score,
            max_pain: result.max_pain,
        });
    }
}
