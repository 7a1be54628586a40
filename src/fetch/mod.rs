pub mod ingest;
pub mod nse;

pub use ingest::{build_snapshot, today_ist, RawLeg, RawOptionChain, RawRecords, RawStrikeEntry};
pub use nse::NseClient;

use anyhow::Result;
use async_trait::async_trait;

/// Anything that can produce a raw option-chain payload for a symbol.
#[async_trait]
pub trait ChainSource: Send + Sync {
    async fn fetch_chain(&mut self, symbol: &str) -> Result<RawOptionChain>;
}
