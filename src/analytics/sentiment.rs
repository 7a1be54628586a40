use crate::models::{Buildup, PcrSummary, SkewPatterns, StrikeRecord};

const NEUTRAL_BASE: i32 = 50;

// PCR bands
const PCR_STRONG_BULL: f64 = 1.4;
const PCR_MILD_BULL: f64 = 1.1;
const PCR_STRONG_BEAR: f64 = 0.6;
const PCR_MILD_BEAR: f64 = 0.9;

// Buildup breadth: one side needs this many more LONG strikes than the other
const BUILDUP_MARGIN: usize = 5;

// Volume/OI conviction: a strike is "active" past this ratio; the bonus
// needs strictly more than this many active strikes
const HIGH_EFFICIENCY_RATIO: f64 = 0.5;
const HIGH_EFFICIENCY_BREADTH: usize = 10;

/// Composite market sentiment on a 0–100 scale, 50 neutral.
///
/// Adjustments are independent and evaluated against the single snapshot;
/// no smoothing against history.
pub fn sentiment_score(
    pcr: &PcrSummary,
    skew: &SkewPatterns,
    strikes: &[StrikeRecord],
) -> u8 {
    let mut score = NEUTRAL_BASE;

    // PCR band: high put OI reads contrarian-bullish
    let pcr_oi = pcr.pcr_oi;
    if pcr_oi > PCR_STRONG_BULL {
        score += 15;
    } else if pcr_oi > PCR_MILD_BULL {
        score += 8;
    } else if pcr_oi < PCR_STRONG_BEAR {
        score -= 15;
    } else if pcr_oi < PCR_MILD_BEAR {
        score -= 8;
    }

    // OTM skew bias
    if skew.bullish {
        score += 15;
    } else if skew.bearish {
        score -= 15;
    }

    // Which side is seeing fresh long positioning across more strikes
    let ce_longs = strikes
        .iter()
        .filter(|s| s.ce_buildup == Buildup::Long)
        .count();
    let pe_longs = strikes
        .iter()
        .filter(|s| s.pe_buildup == Buildup::Long)
        .count();
    if ce_longs > pe_longs + BUILDUP_MARGIN {
        score += 10;
    } else if pe_longs > ce_longs + BUILDUP_MARGIN {
        score -= 10;
    }

    // Broad high-conviction turnover on either side
    let active_strikes = strikes
        .iter()
        .filter(|s| {
            s.ce_volume_oi_ratio > HIGH_EFFICIENCY_RATIO
                || s.pe_volume_oi_ratio > HIGH_EFFICIENCY_RATIO
        })
        .count();
    if active_strikes > HIGH_EFFICIENCY_BREADTH {
        score += 10;
    }

    score.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::strike;

    fn pcr_of(pcr_oi: f64) -> PcrSummary {
        PcrSummary {
            pcr_oi,
            pcr_volume: 1.0,
            total_ce_oi: 1.0,
            total_pe_oi: pcr_oi,
        }
    }

    fn no_skew() -> SkewPatterns {
        SkewPatterns {
            bullish: false,
            bearish: false,
            neutral: true,
        }
    }

    #[test]
    fn neutral_inputs_stay_at_fifty() {
        let strikes = vec![strike(22000.0, 1000.0, 1000.0)];
        assert_eq!(sentiment_score(&pcr_of(1.0), &no_skew(), &strikes), 50);
    }

    #[test]
    fn pcr_bands_adjust_as_expected() {
        let strikes: Vec<StrikeRecord> = Vec::new();
        assert_eq!(sentiment_score(&pcr_of(1.5), &no_skew(), &strikes), 65);
        assert_eq!(sentiment_score(&pcr_of(1.2), &no_skew(), &strikes), 58);
        assert_eq!(sentiment_score(&pcr_of(0.5), &no_skew(), &strikes), 35);
        assert_eq!(sentiment_score(&pcr_of(0.7), &no_skew(), &strikes), 42);
        // band edges: 1.1 and 0.9 are both outside their bands
        assert_eq!(sentiment_score(&pcr_of(1.1), &no_skew(), &strikes), 50);
        assert_eq!(sentiment_score(&pcr_of(0.9), &no_skew(), &strikes), 50);
    }

    #[test]
    fn skew_flags_shift_fifteen() {
        let strikes: Vec<StrikeRecord> = Vec::new();
        let bull = SkewPatterns {
            bullish: true,
            bearish: false,
            neutral: true,
        };
        let bear = SkewPatterns {
            bullish: false,
            bearish: true,
            neutral: true,
        };
        assert_eq!(sentiment_score(&pcr_of(1.0), &bull, &strikes), 65);
        assert_eq!(sentiment_score(&pcr_of(1.0), &bear, &strikes), 35);
    }

    #[test]
    fn buildup_breadth_needs_margin() {
        // 6 CE longs vs 0 PE longs: margin of 5 exceeded
        let mut strikes: Vec<StrikeRecord> = (0..6)
            .map(|i| {
                let mut r = strike(22000.0 + i as f64 * 50.0, 1000.0, 1000.0);
                r.ce_buildup = Buildup::Long;
                r
            })
            .collect();
        assert_eq!(sentiment_score(&pcr_of(1.0), &no_skew(), &strikes), 60);

        // 5 vs 0 is not strictly greater than the margin
        strikes.pop();
        assert_eq!(sentiment_score(&pcr_of(1.0), &no_skew(), &strikes), 50);
    }

    #[test]
    fn efficiency_breadth_bonus() {
        let strikes: Vec<StrikeRecord> = (0..11)
            .map(|i| {
                let mut r = strike(22000.0 + i as f64 * 50.0, 1000.0, 1000.0);
                r.ce_volume_oi_ratio = 0.8;
                r
            })
            .collect();
        assert_eq!(sentiment_score(&pcr_of(1.0), &no_skew(), &strikes), 60);
    }

    #[test]
    fn score_clamped_to_bounds_under_extremes() {
        // Everything bullish at once: 50+15+15+10+10 = 100
        let bull = SkewPatterns {
            bullish: true,
            bearish: false,
            neutral: true,
        };
        let strikes: Vec<StrikeRecord> = (0..12)
            .map(|i| {
                let mut r = strike(22000.0 + i as f64 * 50.0, 1000.0, 1000.0);
                r.ce_buildup = Buildup::Long;
                r.ce_volume_oi_ratio = 0.9;
                r
            })
            .collect();
        assert_eq!(sentiment_score(&pcr_of(5.0), &bull, &strikes), 100);

        // Everything bearish: 50-15-15-10 = 10, still within bounds
        let bear = SkewPatterns {
            bullish: false,
            bearish: true,
            neutral: true,
        };
        let strikes: Vec<StrikeRecord> = (0..12)
            .map(|i| {
                let mut r = strike(22000.0 + i as f64 * 50.0, 1000.0, 1000.0);
                r.pe_buildup = Buildup::Long;
                r
            })
            .collect();
        let s = sentiment_score(&pcr_of(0.1), &bear, &strikes);
        assert_eq!(s, 10);
    }

    #[test]
    fn fuzzed_extremes_never_leave_range() {
        for i in 0..200 {
            let pcr_oi = (i as f64 - 100.0) * 0.37;
            let skew = SkewPatterns {
                bullish: i % 3 == 0,
                bearish: i % 3 == 1,
                neutral: true,
            };
            let strikes: Vec<StrikeRecord> = (0..(i % 30))
                .map(|j| {
                    let mut r = strike(22000.0 + j as f64 * 50.0, 1.0, 1.0);
                    r.ce_buildup = if j % 2 == 0 { Buildup::Long } else { Buildup::Neutral };
                    r.pe_buildup = if j % 5 == 0 { Buildup::Long } else { Buildup::Neutral };
                    r.ce_volume_oi_ratio = j as f64;
                    r
                })
                .collect();
            let s = sentiment_score(&pcr_of(pcr_oi.abs()), &skew, &strikes);
            assert!(s <= 100);
        }
    }
}
