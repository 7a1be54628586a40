use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Buildup, OptionSide};

/// One row of the option chain: both legs of a single strike for one expiry.
///
/// Raw fields come straight from the exchange payload; derived fields are
/// filled in by the strike metrics pass and default to zero / NEUTRAL until
/// then.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrikeRecord {
    pub strike: f64,

    // Raw call side
    pub ce_oi: f64,
    pub ce_change_oi: f64,
    pub ce_volume: f64,
    pub ce_last_price: f64,
    pub ce_pct_change: f64,
    pub ce_iv: Option<f64>,
    pub ce_delta: Option<f64>,
    pub ce_gamma: Option<f64>,

    // Raw put side
    pub pe_oi: f64,
    pub pe_change_oi: f64,
    pub pe_volume: f64,
    pub pe_last_price: f64,
    pub pe_pct_change: f64,
    pub pe_iv: Option<f64>,
    pub pe_delta: Option<f64>,
    pub pe_gamma: Option<f64>,

    // Derived
    pub oi_skew: f64,
    pub oi_skew_absolute: f64,
    pub ce_volume_oi_ratio: f64,
    pub pe_volume_oi_ratio: f64,
    pub ce_buildup: Buildup,
    pub pe_buildup: Buildup,
}

impl StrikeRecord {
    /// A record with only the strike set; every other field zeroed.
    pub fn at(strike: f64) -> Self {
        Self {
            strike,
            ce_oi: 0.0,
            ce_change_oi: 0.0,
            ce_volume: 0.0,
            ce_last_price: 0.0,
            ce_pct_change: 0.0,
            ce_iv: None,
            ce_delta: None,
            ce_gamma: None,
            pe_oi: 0.0,
            pe_change_oi: 0.0,
            pe_volume: 0.0,
            pe_last_price: 0.0,
            pe_pct_change: 0.0,
            pe_iv: None,
            pe_delta: None,
            pe_gamma: None,
            oi_skew: 0.0,
            oi_skew_absolute: 0.0,
            ce_volume_oi_ratio: 0.0,
            pe_volume_oi_ratio: 0.0,
            ce_buildup: Buildup::Neutral,
            pe_buildup: Buildup::Neutral,
        }
    }

    pub fn oi(&self, side: OptionSide) -> f64 {
        match side {
            OptionSide::Ce => self.ce_oi,
            OptionSide::Pe => self.pe_oi,
        }
    }

    pub fn change_oi(&self, side: OptionSide) -> f64 {
        match side {
            OptionSide::Ce => self.ce_change_oi,
            OptionSide::Pe => self.pe_change_oi,
        }
    }

    pub fn volume(&self, side: OptionSide) -> f64 {
        match side {
            OptionSide::Ce => self.ce_volume,
            OptionSide::Pe => self.pe_volume,
        }
    }

    pub fn last_price(&self, side: OptionSide) -> f64 {
        match side {
            OptionSide::Ce => self.ce_last_price,
            OptionSide::Pe => self.pe_last_price,
        }
    }

    pub fn pct_change(&self, side: OptionSide) -> f64 {
        match side {
            OptionSide::Ce => self.ce_pct_change,
            OptionSide::Pe => self.pe_pct_change,
        }
    }

    pub fn iv(&self, side: OptionSide) -> Option<f64> {
        match side {
            OptionSide::Ce => self.ce_iv,
            OptionSide::Pe => self.pe_iv,
        }
    }

    pub fn buildup(&self, side: OptionSide) -> Buildup {
        match side {
            OptionSide::Ce => self.ce_buildup,
            OptionSide::Pe => self.pe_buildup,
        }
    }
}

/// One symbol's option chain at one point in time, restricted to a single
/// expiry. Strikes are sorted ascending; `spot_price` is always positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub symbol: String,
    pub spot_price: f64,
    pub expiry: NaiveDate,
    pub strikes: Vec<StrikeRecord>,
    pub timestamp: DateTime<Utc>,
}

impl ChainSnapshot {
    pub fn len(&self) -> usize {
        self.strikes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strikes.is_empty()
    }

    /// Index of the strike closest to spot.
    pub fn atm_index(&self) -> Option<usize> {
        self.strikes
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (a.strike - self.spot_price)
                    .abs()
                    .partial_cmp(&(b.strike - self.spot_price).abs())
                    .unwrap()
            })
            .map(|(i, _)| i)
    }
}
