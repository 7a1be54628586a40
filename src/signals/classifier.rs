use crate::models::{AnalysisResult, SignalTier, StrikeRecord};

// PCR point buckets
const PCR_STRONG_BULL: f64 = 1.5;
const PCR_MILD_BULL: f64 = 1.2;
const PCR_STRONG_BEAR: f64 = 0.6;
const PCR_MILD_BEAR: f64 = 0.8;

// ATM-window OI concentration buckets
const OI_RATIO_BULL: f64 = 1.3;
const OI_RATIO_BEAR: f64 = 0.7;

// Tier thresholds
const STRONG_POINTS: u32 = 3;
const SIGNAL_POINTS: u32 = 2;

// Confidence rule weights, capped at 100
const PCR_EXTREME_WEIGHT: u32 = 25;
const SKEW_WEIGHT: u32 = 20;
const MAX_PAIN_WEIGHT: u32 = 15;
const LEVEL_BREAK_WEIGHT: u32 = 20;
const SENTIMENT_WEIGHT: u32 = 20;

const PCR_OVERSOLD: f64 = 1.4;
const PCR_OVERBOUGHT: f64 = 0.6;
const SENTIMENT_BULL: u8 = 70;
const SENTIMENT_BEAR: u8 = 30;

/// Independent bullish/bearish evidence counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionalBias {
    pub bullish: u32,
    pub bearish: u32,
}

/// Accumulate directional points from the OI-basis PCR and the put/call
/// OI concentration over the ATM window.
pub fn classify(pcr_oi: f64, atm_oi_ratio: f64) -> DirectionalBias {
    let mut bias = DirectionalBias::default();

    if pcr_oi > PCR_STRONG_BULL {
        bias.bullish += 2;
    } else if pcr_oi > PCR_MILD_BULL {
        bias.bullish += 1;
    } else if pcr_oi < PCR_STRONG_BEAR {
        bias.bearish += 2;
    } else if pcr_oi < PCR_MILD_BEAR {
        bias.bearish += 1;
    }

    if atm_oi_ratio > OI_RATIO_BULL {
        bias.bullish += 1;
    } else if atm_oi_ratio < OI_RATIO_BEAR {
        bias.bearish += 1;
    }

    bias
}

/// Map evidence counts to a signal tier; below threshold means no signal.
pub fn tier(bias: &DirectionalBias) -> Option<SignalTier> {
    if bias.bullish >= STRONG_POINTS {
        Some(SignalTier::StrongBuy)
    } else if bias.bullish >= SIGNAL_POINTS {
        Some(SignalTier::Buy)
    } else if bias.bearish >= STRONG_POINTS {
        Some(SignalTier::StrongSell)
    } else if bias.bearish >= SIGNAL_POINTS {
        Some(SignalTier::Sell)
    } else {
        None
    }
}

/// Put/call OI concentration over a strike window; 0 when the call side
/// carries no OI.
pub fn oi_concentration(window: &[StrikeRecord]) -> f64 {
    let ce: f64 = window.iter().map(|s| s.ce_oi).sum();
    let pe: f64 = window.iter().map(|s| s.pe_oi).sum();
    if ce > 0.0 {
        pe / ce
    } else {
        0.0
    }
}

/// Score how much independent evidence backs the analysis, with one
/// reason per fired rule. Each rule contributes a fixed weight; the total
/// is capped at 100.
pub fn confidence_rules(result: &AnalysisResult) -> (u8, Vec<String>) {
    let mut confidence: u32 = 0;
    let mut reasons = Vec::new();

    let pcr_oi = result.pcr.pcr_oi;
    if pcr_oi > PCR_OVERSOLD {
        reasons.push(format!("PCR {:.2} indicates oversold conditions", pcr_oi));
        confidence += PCR_EXTREME_WEIGHT;
    } else if pcr_oi < PCR_OVERBOUGHT {
        reasons.push(format!("PCR {:.2} indicates overbought conditions", pcr_oi));
        confidence += PCR_EXTREME_WEIGHT;
    }

    if result.skew_patterns.bullish {
        reasons.push("OI skew suggests bullish bias".to_string());
        confidence += SKEW_WEIGHT;
    } else if result.skew_patterns.bearish {
        reasons.push("OI skew suggests bearish bias".to_string());
        confidence += SKEW_WEIGHT;
    }

    if result.spot_price > result.max_pain {
        reasons.push("Spot above max pain - mildly bearish".to_string());
    } else {
        reasons.push("Spot below max pain - mildly bullish".to_string());
    }
    confidence += MAX_PAIN_WEIGHT;

    let sr = &result.support_resistance;
    if let Some(resistance) = sr.strong_resistance {
        if result.spot_price > resistance {
            reasons.push("Breaking strong resistance - bullish".to_string());
            confidence += LEVEL_BREAK_WEIGHT;
        }
    }
    if let Some(support) = sr.strong_support {
        if result.spot_price < support {
            reasons.push("Breaking strong support - bearish".to_string());
            confidence += LEVEL_BREAK_WEIGHT;
        }
    }

    if result.sentiment_score > SENTIMENT_BULL {
        reasons.push("Strong bullish sentiment".to_string());
        confidence += SENTIMENT_WEIGHT;
    } else if result.sentiment_score < SENTIMENT_BEAR {
        reasons.push("Strong bearish sentiment".to_string());
        confidence += SENTIMENT_WEIGHT;
    }

    (confidence.min(100) as u8, reasons)
}
