use crate::models::{PcrSummary, SkewPatterns, StrikeRecord, SupportResistance};

/// How many top-OI strikes feed the support/resistance candidate sets.
const OI_CONCENTRATION_TOP_N: usize = 5;
/// How many levels to keep per side, closest to spot.
const LEVELS_PER_SIDE: usize = 3;

/// Put/call ratios over the full strike set. Both ratios are 0 when the
/// call-side total is 0.
pub fn pcr(strikes: &[StrikeRecord]) -> PcrSummary {
    let total_ce_oi: f64 = strikes.iter().map(|s| s.ce_oi).sum();
    let total_pe_oi: f64 = strikes.iter().map(|s| s.pe_oi).sum();
    let total_ce_volume: f64 = strikes.iter().map(|s| s.ce_volume).sum();
    let total_pe_volume: f64 = strikes.iter().map(|s| s.pe_volume).sum();

    PcrSummary {
        pcr_oi: if total_ce_oi > 0.0 {
            total_pe_oi / total_ce_oi
        } else {
            0.0
        },
        pcr_volume: if total_ce_volume > 0.0 {
            total_pe_volume / total_ce_volume
        } else {
            0.0
        },
        total_ce_oi,
        total_pe_oi,
    }
}

/// The strike at which aggregate option-writer settlement loss is smallest.
///
/// For a candidate strike `c`, writers lose `ce_oi(s) * (c - s)` on every
/// call below it and `pe_oi(s) * (s - c)` on every put above it. Candidates
/// are evaluated in ascending strike order so the lowest strike wins a tie.
/// O(n^2); chains run to a few dozen strikes.
pub fn max_pain(strikes: &[StrikeRecord]) -> Option<f64> {
    if strikes.is_empty() {
        return None;
    }

    let mut candidates: Vec<f64> = strikes.iter().map(|s| s.strike).collect();
    candidates.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut max_pain = None;
    let mut min_loss = f64::INFINITY;

    for &c in &candidates {
        let mut total_loss = 0.0;
        for s in strikes {
            if s.strike < c {
                total_loss += s.ce_oi * (c - s.strike);
            } else if s.strike > c {
                total_loss += s.pe_oi * (s.strike - c);
            }
        }
        if total_loss < min_loss {
            min_loss = total_loss;
            max_pain = Some(c);
        }
    }

    max_pain
}

/// Compare average OTM call OI against average OTM put OI.
///
/// OTM sets are cut at a fixed point offset from spot, not a percentage.
/// The `neutral` flag is always true; it rides along in the payload and is
/// never consulted downstream.
pub fn skew_patterns(
    strikes: &[StrikeRecord],
    spot_price: f64,
    otm_offset: f64,
    dominance_ratio: f64,
) -> SkewPatterns {
    let otm_ce: Vec<&StrikeRecord> = strikes
        .iter()
        .filter(|s| s.strike > spot_price + otm_offset)
        .collect();
    let otm_pe: Vec<&StrikeRecord> = strikes
        .iter()
        .filter(|s| s.strike < spot_price - otm_offset)
        .collect();

    let avg_ce_oi_otm = if otm_ce.is_empty() {
        0.0
    } else {
        otm_ce.iter().map(|s| s.ce_oi).sum::<f64>() / otm_ce.len() as f64
    };
    let avg_pe_oi_otm = if otm_pe.is_empty() {
        0.0
    } else {
        otm_pe.iter().map(|s| s.pe_oi).sum::<f64>() / otm_pe.len() as f64
    };

    SkewPatterns {
        bullish: avg_ce_oi_otm > avg_pe_oi_otm * dominance_ratio,
        bearish: avg_pe_oi_otm > avg_ce_oi_otm * dominance_ratio,
        neutral: true,
    }
}

/// Support and resistance levels from OI concentration.
///
/// Resistance: of the 5 highest-CE-OI strikes, those strictly above spot.
/// Support: of the 5 highest-PE-OI strikes, those strictly below spot.
/// Each side keeps its 3 levels closest to spot; the strong level is the
/// outermost candidate (min support / max resistance).
pub fn support_resistance(strikes: &[StrikeRecord], spot_price: f64) -> SupportResistance {
    let mut by_ce_oi: Vec<&StrikeRecord> = strikes.iter().collect();
    by_ce_oi.sort_by(|a, b| b.ce_oi.partial_cmp(&a.ce_oi).unwrap());

    let mut by_pe_oi: Vec<&StrikeRecord> = strikes.iter().collect();
    by_pe_oi.sort_by(|a, b| b.pe_oi.partial_cmp(&a.pe_oi).unwrap());

    let mut resistance_levels: Vec<f64> = by_ce_oi
        .iter()
        .take(OI_CONCENTRATION_TOP_N)
        .filter(|s| s.strike > spot_price)
        .map(|s| s.strike)
        .collect();
    let mut support_levels: Vec<f64> = by_pe_oi
        .iter()
        .take(OI_CONCENTRATION_TOP_N)
        .filter(|s| s.strike < spot_price)
        .map(|s| s.strike)
        .collect();

    resistance_levels.sort_by(|a, b| a.partial_cmp(b).unwrap());
    support_levels.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let strong_support = support_levels.first().copied();
    let strong_resistance = resistance_levels.last().copied();

    let support = if support_levels.len() > LEVELS_PER_SIDE {
        support_levels.split_off(support_levels.len() - LEVELS_PER_SIDE)
    } else {
        support_levels
    };
    resistance_levels.truncate(LEVELS_PER_SIDE);

    SupportResistance {
        support,
        resistance: resistance_levels,
        strong_support,
        strong_resistance,
    }
}
