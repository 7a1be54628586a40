use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionSide {
    #[serde(rename = "CE")]
    Ce,
    #[serde(rename = "PE")]
    Pe,
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSide::Ce => write!(f, "CE"),
            OptionSide::Pe => write!(f, "PE"),
        }
    }
}

impl OptionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionSide::Ce => "CE",
            OptionSide::Pe => "PE",
        }
    }
}

/// Open-interest buildup classification for one side of a strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Buildup {
    Long,
    Short,
    Neutral,
}

impl fmt::Display for Buildup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Buildup::Long => write!(f, "LONG"),
            Buildup::Short => write!(f, "SHORT"),
            Buildup::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalTier {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
}

impl fmt::Display for SignalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalTier::StrongBuy => write!(f, "STRONG BUY"),
            SignalTier::Buy => write!(f, "BUY"),
            SignalTier::Sell => write!(f, "SELL"),
            SignalTier::StrongSell => write!(f, "STRONG SELL"),
        }
    }
}

impl SignalTier {
    /// The option side a trader would buy to express this signal.
    pub fn option_side(&self) -> OptionSide {
        match self {
            SignalTier::StrongBuy | SignalTier::Buy => OptionSide::Ce,
            SignalTier::Sell | SignalTier::StrongSell => OptionSide::Pe,
        }
    }
}
