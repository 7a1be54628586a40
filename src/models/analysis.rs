use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::StrikeRecord;

/// Put/call ratios plus the side totals they were computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PcrSummary {
    pub pcr_oi: f64,
    pub pcr_volume: f64,
    pub total_ce_oi: f64,
    pub total_pe_oi: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SkewPatterns {
    pub bullish: bool,
    pub bearish: bool,
    /// Carried for payload compatibility; always true and never consulted.
    pub neutral: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportResistance {
    /// Up to 3 OI-backed levels below spot, ascending (closest to spot last).
    pub support: Vec<f64>,
    /// Up to 3 OI-backed levels above spot, ascending (closest to spot first).
    pub resistance: Vec<f64>,
    pub strong_support: Option<f64>,
    pub strong_resistance: Option<f64>,
}

/// The full output of one analysis pass over one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub symbol: String,
    pub spot_price: f64,
    pub pcr: PcrSummary,
    pub max_pain: f64,
    pub skew_patterns: SkewPatterns,
    pub support_resistance: SupportResistance,
    pub sentiment_score: u8,
    pub strike_data: Vec<StrikeRecord>,
    pub timestamp: DateTime<Utc>,
}

/// Summary metrics retained per analysis cycle in the rolling history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub spot_price: f64,
    pub pcr_oi: f64,
    pub sentiment_score: u8,
    pub max_pain: f64,
}
