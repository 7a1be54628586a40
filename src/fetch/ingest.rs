use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Asia::Kolkata;
use serde::Deserialize;

use crate::engine::EngineError;
use crate::models::{ChainSnapshot, StrikeRecord};

/// NSE date format used for expiries and the payload timestamp.
const NSE_DATE_FMT: &str = "%d-%b-%Y";
const NSE_TIMESTAMP_FMT: &str = "%d-%b-%Y %H:%M:%S";

/// Raw option-chain payload as served by the exchange API.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOptionChain {
    pub records: RawRecords,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRecords {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(rename = "underlyingValue")]
    pub underlying_value: Option<f64>,
    #[serde(rename = "expiryDates", default)]
    pub expiry_dates: Vec<String>,
    #[serde(default)]
    pub data: Vec<RawStrikeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStrikeEntry {
    #[serde(rename = "strikePrice")]
    pub strike_price: Option<f64>,
    #[serde(rename = "expiryDate")]
    pub expiry_date: Option<String>,
    #[serde(rename = "CE")]
    pub ce: Option<RawLeg>,
    #[serde(rename = "PE")]
    pub pe: Option<RawLeg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLeg {
    #[serde(rename = "openInterest", default)]
    pub open_interest: f64,
    #[serde(rename = "changeinOpenInterest", default)]
    pub change_in_oi: f64,
    #[serde(rename = "totalTradedVolume", default)]
    pub total_traded_volume: f64,
    #[serde(rename = "lastPrice", default)]
    pub last_price: f64,
    #[serde(rename = "pChange", default)]
    pub p_change: f64,
    #[serde(rename = "impliedVolatility")]
    pub implied_volatility: Option<f64>,
    pub delta: Option<f64>,
    pub gamma: Option<f64>,
}

/// Today's date in exchange-local terms.
pub fn today_ist() -> NaiveDate {
    Utc::now().with_timezone(&Kolkata).date_naive()
}

/// The expiry an analysis pass should target: the nearest one on or after
/// `today`, or the earliest listed when every expiry has passed.
pub fn select_expiry(expiry_dates: &[String], today: NaiveDate) -> Option<NaiveDate> {
    let mut parsed: Vec<NaiveDate> = expiry_dates
        .iter()
        .filter_map(|s| NaiveDate::parse_from_str(s, NSE_DATE_FMT).ok())
        .collect();
    parsed.sort();
    parsed
        .iter()
        .find(|d| **d >= today)
        .or(parsed.first())
        .copied()
}

/// Build a validated snapshot from the raw payload: pick the target expiry,
/// keep only its rows, merge CE/PE legs per strike, sort ascending.
pub fn build_snapshot(
    symbol: &str,
    raw: &RawOptionChain,
    today: NaiveDate,
) -> Result<ChainSnapshot, EngineError> {
    let expiry =
        select_expiry(&raw.records.expiry_dates, today).ok_or_else(|| EngineError::NoExpiry {
            symbol: symbol.to_string(),
        })?;

    let spot_price = raw
        .records
        .underlying_value
        .filter(|v| *v > 0.0)
        .ok_or_else(|| EngineError::InvalidSpot {
            symbol: symbol.to_string(),
        })?;

    let mut strikes: Vec<StrikeRecord> = raw
        .records
        .data
        .iter()
        .filter(|entry| {
            entry
                .expiry_date
                .as_deref()
                .and_then(|s| NaiveDate::parse_from_str(s, NSE_DATE_FMT).ok())
                == Some(expiry)
        })
        .filter_map(|entry| {
            let strike_price = entry.strike_price?;
            let mut rec = StrikeRecord::at(strike_price);
            if let Some(ce) = &entry.ce {
                rec.ce_oi = ce.open_interest;
                rec.ce_change_oi = ce.change_in_oi;
                rec.ce_volume = ce.total_traded_volume;
                rec.ce_last_price = ce.last_price;
                rec.ce_pct_change = ce.p_change;
                rec.ce_iv = ce.implied_volatility.filter(|iv| *iv > 0.0);
                rec.ce_delta = ce.delta;
                rec.ce_gamma = ce.gamma;
            }
            if let Some(pe) = &entry.pe {
                rec.pe_oi = pe.open_interest;
                rec.pe_change_oi = pe.change_in_oi;
                rec.pe_volume = pe.total_traded_volume;
                rec.pe_last_price = pe.last_price;
                rec.pe_pct_change = pe.p_change;
                rec.pe_iv = pe.implied_volatility.filter(|iv| *iv > 0.0);
                rec.pe_delta = pe.delta;
                rec.pe_gamma = pe.gamma;
            }
            Some(rec)
        })
        .collect();

    if strikes.is_empty() {
        return Err(EngineError::EmptyChain {
            symbol: symbol.to_string(),
        });
    }

    strikes.sort_by(|a, b| a.strike.partial_cmp(&b.strike).unwrap());

    Ok(ChainSnapshot {
        symbol: symbol.to_string(),
        spot_price,
        expiry,
        strikes,
        timestamp: parse_payload_timestamp(raw.records.timestamp.as_deref())
            .unwrap_or_else(Utc::now),
    })
}

/// Payload timestamps are exchange-local wall-clock time.
fn parse_payload_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw?, NSE_TIMESTAMP_FMT).ok()?;
    Kolkata
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
