use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::Config;
use crate::fetch::{ChainSource, RawOptionChain};

const BASE_URL: &str = "https://www.nseindia.com";
const INDEX_SYMBOLS: &[&str] = &["NIFTY", "BANKNIFTY", "FINNIFTY", "MIDCPNIFTY"];

/// The API refuses requests that don't look like they come from the
/// option-chain page of a real browser session.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub struct NseClient {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
    min_request_gap: Duration,
    last_request: Option<Instant>,
    warmed_up: bool,
}

impl NseClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert("Accept-Language", HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert("Connection", HeaderValue::from_static("keep-alive"));
        headers.insert(
            "Referer",
            HeaderValue::from_static("https://www.nseindia.com/option-chain"),
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(cfg.request_timeout))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            max_retries: cfg.max_retries,
            retry_delay: Duration::from_secs(cfg.retry_delay),
            min_request_gap: Duration::from_millis(cfg.min_request_gap_ms),
            last_request: None,
            warmed_up: false,
        })
    }

    fn chain_url(symbol: &str) -> String {
        if INDEX_SYMBOLS.contains(&symbol) {
            format!("{}/api/option-chain-indices?symbol={}", BASE_URL, symbol)
        } else {
            format!("{}/api/option-chain-equities?symbol={}", BASE_URL, symbol)
        }
    }

    async fn rate_limit(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_request_gap {
                tokio::time::sleep(self.min_request_gap - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    /// Hit the home page once to pick up session cookies; the API rejects
    /// cookie-less requests.
    async fn warm_up(&mut self) -> Result<()> {
        let resp = self
            .client
            .get(BASE_URL)
            .send()
            .await
            .context("Session warm-up request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("Session warm-up returned {}", resp.status());
        }

        debug!("Obtained NSE session cookies");
        self.warmed_up = true;
        Ok(())
    }

    async fn fetch_once(&mut self, symbol: &str) -> Result<RawOptionChain> {
        if !self.warmed_up {
            self.warm_up().await?;
        }

        self.rate_limit().await;

        let resp = self
            .client
            .get(Self::chain_url(symbol))
            .send()
            .await
            .with_context(|| format!("Failed to fetch option chain for {}", symbol))?;

        let status = resp.status();
        if !status.is_success() {
            // Expired cookies usually surface as a 401/403; start fresh
            self.warmed_up = false;
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("NSE API error {} for {}: {:.120}", status, symbol, body);
        }

        resp.json::<RawOptionChain>()
            .await
            .with_context(|| format!("Failed to parse option chain for {}", symbol))
    }

    pub async fn fetch_chain(&mut self, symbol: &str) -> Result<RawOptionChain> {
        let mut last_err = None;

        for attempt in 1..=self.max_retries {
            match self.fetch_once(symbol).await {
                Ok(raw) => return Ok(raw),
                Err(e) => {
                    warn!("{} fetch attempt {}/{}: {}", symbol, attempt, self.max_retries, e);
                    last_err = Some(e);
                    if attempt < self.max_retries {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("fetch failed for {}", symbol)))
    }
}

#[async_trait]
impl ChainSource for NseClient {
    async fn fetch_chain(&mut self, symbol: &str) -> Result<RawOptionChain> {
        self.fetch_chain(symbol).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_symbols_use_indices_endpoint() {
        assert!(NseClient::chain_url("NIFTY").contains("option-chain-indices"));
        assert!(NseClient::chain_url("BANKNIFTY").contains("option-chain-indices"));
        assert!(NseClient::chain_url("RELIANCE").contains("option-chain-equities"));
    }
}
