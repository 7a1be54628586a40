pub mod analysis;
pub mod chain;
pub mod side;

pub use analysis::{AnalysisResult, HistoryPoint, PcrSummary, SkewPatterns, SupportResistance};
pub use chain::{ChainSnapshot, StrikeRecord};
pub use side::{Buildup, OptionSide, SignalTier};
