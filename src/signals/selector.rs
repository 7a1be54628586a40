use crate::models::{OptionSide, StrikeRecord};

// Score weights: proximity dominates, liquidity factors refine
const ATM_SCORE: f64 = 60.0;
const NEAR_ATM_SCORE: f64 = 50.0;
const PROXIMITY_BASE: f64 = 40.0;
const PROXIMITY_DECAY: f64 = 5.0;
const OI_UNIT: f64 = 10_000.0;
const OI_CAP: f64 = 5.0;
const CHANGE_OI_UNIT: f64 = 500.0;
const VOLUME_UNIT: f64 = 1_000.0;
const VOLUME_CAP: f64 = 3.0;
const IV_BASE: f64 = 5.0;
const IV_UNIT: f64 = 5.0;
const MOMENTUM_BONUS: f64 = 2.0;

const HIGH_VOLUME_FLAG: f64 = 1_000.0;
const LOW_IV_FLAG: f64 = 20.0;

/// A strike chosen for trading, with the score that won and why.
#[derive(Debug, Clone)]
pub struct SelectedStrike {
    pub strike: f64,
    pub side: OptionSide,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Slice of the ladder within `half_width` strikes of ATM.
pub fn atm_window(strikes: &[StrikeRecord], spot_price: f64, half_width: usize) -> &[StrikeRecord] {
    let Some(atm_idx) = nearest_strike_index(strikes, spot_price) else {
        return &[];
    };
    let start = atm_idx.saturating_sub(half_width);
    let end = (atm_idx + half_width + 1).min(strikes.len());
    &strikes[start..end]
}

/// Pick the best tradeable strike for `side` from the ATM-centered window.
///
/// Only at/out-of-the-money candidates are eligible: calls at or above
/// floor(spot), puts at or below ceil(spot). Returns None when nothing in
/// the window qualifies; callers treat that as signal suppression.
pub fn select_strike(
    strikes: &[StrikeRecord],
    spot_price: f64,
    side: OptionSide,
    half_width: usize,
) -> Option<SelectedStrike> {
    let atm_idx = nearest_strike_index(strikes, spot_price)?;
    let start = atm_idx.saturating_sub(half_width);
    let end = (atm_idx + half_width + 1).min(strikes.len());

    let mut best: Option<(f64, f64, usize)> = None; // (score, volume, index)

    for idx in start..end {
        let rec = &strikes[idx];
        let eligible = match side {
            OptionSide::Ce => rec.strike >= spot_price.floor(),
            OptionSide::Pe => rec.strike <= spot_price.ceil(),
        };
        if !eligible {
            continue;
        }

        let steps = atm_idx.abs_diff(idx);
        let score = score_candidate(rec, side, steps);
        let volume = rec.volume(side);

        let better = match best {
            None => true,
            Some((best_score, best_volume, _)) => {
                score > best_score || (score == best_score && volume > best_volume)
            }
        };
        if better {
            best = Some((score, volume, idx));
        }
    }

    let (score, _, idx) = best?;
    let rec = &strikes[idx];
    Some(SelectedStrike {
        strike: rec.strike,
        side,
        score,
        reasons: justify(rec, side, atm_idx.abs_diff(idx)),
    })
}

fn score_candidate(rec: &StrikeRecord, side: OptionSide, steps: usize) -> f64 {
    let proximity = match steps {
        0 => ATM_SCORE,
        1 => NEAR_ATM_SCORE,
        n => (PROXIMITY_BASE - PROXIMITY_DECAY * n as f64).max(0.0),
    };

    let oi_score = (rec.oi(side) / OI_UNIT).min(OI_CAP) * 2.0;
    let change_oi_score = rec.change_oi(side) / CHANGE_OI_UNIT;
    let volume_score = (rec.volume(side) / VOLUME_UNIT).min(VOLUME_CAP);
    let iv_score = rec
        .iv(side)
        .map_or(0.0, |iv| (IV_BASE - iv / IV_UNIT).max(0.0));
    let momentum = if rec.pct_change(side) > 0.0 {
        MOMENTUM_BONUS
    } else {
        0.0
    };

    proximity + oi_score + change_oi_score + volume_score + iv_score + momentum
}

fn justify(rec: &StrikeRecord, side: OptionSide, steps: usize) -> Vec<String> {
    let mut reasons = Vec::new();

    match steps {
        0 => reasons.push("At-the-money strike".to_string()),
        1 => reasons.push("Near ATM (1 strike away)".to_string()),
        _ => {}
    }

    let change_oi = rec.change_oi(side);
    if change_oi > 0.0 {
        reasons.push(format!("Fresh long buildup (+{:.0} OI)", change_oi));
    } else if change_oi < 0.0 {
        reasons.push(format!("OI unwinding ({:.0})", change_oi));
    }

    let volume = rec.volume(side);
    if volume > HIGH_VOLUME_FLAG {
        reasons.push(format!("High volume: {:.0}", volume));
    }

    if let Some(iv) = rec.iv(side) {
        if iv < LOW_IV_FLAG {
            reasons.push(format!("Low IV: {:.1}", iv));
        }
    }

    reasons
}

fn nearest_strike_index(strikes: &[StrikeRecord], spot_price: f64) -> Option<usize> {
    strikes
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (a.strike - spot_price)
                .abs()
                .partial_cmp(&(b.strike - spot_price).abs())
                .unwrap()
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::strike;

    fn ladder(spot_centered: f64) -> Vec<StrikeRecord> {
        (-4..=4)
            .map(|i| {
                let mut r = strike(spot_centered + i as f64 * 50.0, 20000.0, 20000.0);
                r.ce_volume = 500.0;
                r.pe_volume = 500.0;
                r
            })
            .collect()
    }

    #[test]
    fn ce_pick_never_below_floor_of_spot() {
        let strikes = ladder(22150.0);
        for half_width in 1..5 {
            let picked = select_strike(&strikes, 22150.0, OptionSide::Ce, half_width).unwrap();
            assert!(picked.strike >= 22150.0_f64.floor());
        }
    }

    #[test]
    fn pe_pick_never_above_ceil_of_spot() {
        let strikes = ladder(22150.0);
        for half_width in 1..5 {
            let picked = select_strike(&strikes, 22150.0, OptionSide::Pe, half_width).unwrap();
            assert!(picked.strike <= 22150.0_f64.ceil());
        }
    }

    #[test]
    fn atm_preferred_when_liquidity_equal() {
        let strikes = ladder(22150.0);
        let picked = select_strike(&strikes, 22150.0, OptionSide::Ce, 4).unwrap();
        assert_eq!(picked.strike, 22150.0);
        assert!(picked.reasons.iter().any(|r| r.contains("At-the-money")));
    }

    #[test]
    fn heavy_liquidity_outweighs_one_proximity_step() {
        let mut strikes = ladder(22150.0);
        // ATM proximity edge is 10 points; load the next strike up with
        // enough OI/volume/COI to clear it
        let next = strikes.iter_mut().find(|s| s.strike == 22200.0).unwrap();
        next.ce_oi = 60000.0;
        next.ce_volume = 4000.0;
        next.ce_change_oi = 4000.0;
        let picked = select_strike(&strikes, 22150.0, OptionSide::Ce, 4).unwrap();
        assert_eq!(picked.strike, 22200.0);
        assert!(picked
            .reasons
            .iter()
            .any(|r| r.contains("Fresh long buildup")));
        assert!(picked.reasons.iter().any(|r| r.contains("High volume")));
    }

    #[test]
    fn tie_breaks_on_volume() {
        // Spot just above 22150 so the ATM strike itself is CE-ineligible,
        // leaving two eligible candidates whose scores tie exactly:
        //   22250: steps 1 -> 50, volume capped at 3       = 53
        //   22300: steps 2 -> 30, OI capped 10 + COI 10,
        //          volume capped at 3                       = 53
        // Equal scores, so the higher-volume strike must win.
        let mut near = strike(22250.0, 0.0, 0.0);
        near.ce_volume = 4000.0;
        let mut far = strike(22300.0, 100000.0, 0.0);
        far.ce_change_oi = 5000.0;
        far.ce_volume = 6000.0;
        let strikes = vec![
            strike(22000.0, 0.0, 0.0),
            strike(22050.0, 0.0, 0.0),
            strike(22100.0, 0.0, 0.0),
            strike(22150.0, 0.0, 0.0),
            near,
            far,
        ];
        let picked = select_strike(&strikes, 22151.0, OptionSide::Ce, 3).unwrap();
        assert_eq!(picked.strike, 22300.0);
    }

    #[test]
    fn no_selection_when_window_has_no_eligible_side() {
        // Every strike sits below spot: no CE candidate can be at/above
        // floor(spot)
        let strikes: Vec<StrikeRecord> =
            (0..4).map(|i| strike(21000.0 + i as f64 * 50.0, 1000.0, 1000.0)).collect();
        let picked = select_strike(&strikes, 22150.0, OptionSide::Ce, 2);
        assert!(picked.is_none());
    }

    #[test]
    fn empty_chain_selects_nothing() {
        assert!(select_strike(&[], 22150.0, OptionSide::Ce, 5).is_none());
    }

    #[test]
    fn atm_window_clamps_at_ladder_edges() {
        let strikes = ladder(22150.0);
        let window = atm_window(&strikes, 21900.0, 3);
        // nearest strike to 21900 is index 0 (21950); window is [0, 4)
        assert_eq!(window.len(), 4);
        assert_eq!(window[0].strike, 21950.0);
    }
}
