//! Binance and DexScreener lookups with their own retry loop.

use std::sync::Arc;

use rcommon::BoxFuture;
use reqwest::Url;
use rprovider::RetryPolicy;
use rtooling::ToolError;
use serde_json::Value;

use super::http::JsonFetcher;

pub type SleepFn = Arc<dyn Fn(std::time::Duration) -> BoxFuture<'static, ()> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct SpotPrice {
    pub symbol: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairBuy {
    pub transaction_hash: String,
    pub amount_usd: String,
}

pub struct MarketDataClient {
    fetcher: Arc<dyn JsonFetcher>,
    binance_base_url: String,
    dexscreener_base_url: String,
    retry_policy: RetryPolicy,
    sleep: SleepFn,
}

impl MarketDataClient {
    pub fn new(
        fetcher: Arc<dyn JsonFetcher>,
        binance_base_url: impl Into<String>,
        dexscreener_base_url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            binance_base_url: binance_base_url.into(),
            dexscreener_base_url: dexscreener_base_url.into(),
            retry_policy: RetryPolicy::default(),
            sleep: Arc::new(|delay| -> BoxFuture<'static, ()> {
                Box::pin(tokio::time::sleep(delay))
            }),
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_sleep(mut self, sleep: SleepFn) -> Self {
        self.sleep = sleep;
        self
    }

    pub fn binance_symbol(ticker: &str) -> String {
        format!("{}USDT", ticker.trim().to_uppercase())
    }

    pub async fn spot_price(&self, ticker: &str) -> Result<SpotPrice, ToolError> {
        if ticker.trim().is_empty() {
            return Err(ToolError::invalid_arguments("ticker must not be empty"));
        }

        let symbol = Self::binance_symbol(ticker);
        let mut url = endpoint(&self.binance_base_url, &["api", "v3", "ticker", "price"])?;
        url.query_pairs_mut().append_pair("symbol", &symbol);
        let body = self.get_with_retry(url.as_str()).await?;

        let price = match body.get("price") {
            Some(Value::String(raw)) => raw.parse::<f64>().ok(),
            Some(Value::Number(number)) => number.as_f64(),
            _ => None,
        }
        .ok_or_else(|| ToolError::execution(format!("no price for {symbol} in response")))?;

        Ok(SpotPrice { symbol, price })
    }

    /// Returns the `pair` object for `pair_address`.
    pub async fn pair(&self, pair_address: &str) -> Result<Value, ToolError> {
        let pair_address = pair_address.trim();
        if pair_address.is_empty() {
            return Err(ToolError::invalid_arguments("pair_address must not be empty"));
        }

        let url = endpoint(
            &self.dexscreener_base_url,
            &["latest", "dex", "pairs", pair_address],
        )?;
        let mut body = self.get_with_retry(url.as_str()).await?;

        match body.get_mut("pair").map(Value::take) {
            Some(pair @ Value::Object(_)) => Ok(pair),
            _ => Err(ToolError::execution(format!("pair {pair_address} not found"))),
        }
    }

    pub async fn pair_price_usd(&self, pair_address: &str) -> Result<String, ToolError> {
        let pair = self.pair(pair_address).await?;
        match pair.get("priceUsd") {
            Some(Value::String(price)) => Ok(price.clone()),
            Some(Value::Number(price)) => Ok(price.to_string()),
            _ => Err(ToolError::execution(format!(
                "pair {pair_address} has no USD price"
            ))),
        }
    }

    /// Buy transactions for a pair, newest first as the feed reports them.
    pub async fn pair_buys(&self, pair_address: &str) -> Result<Vec<PairBuy>, ToolError> {
        let pair = self.pair(pair_address).await?;
        let buys = pair
            .pointer("/transactions/buys")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(buys
            .iter()
            .filter_map(|buy| {
                let transaction_hash = buy.get("transactionHash")?.as_str()?.to_string();
                let amount_usd = match buy.get("amountUsd")? {
                    Value::String(amount) => amount.clone(),
                    other => other.to_string(),
                };
                Some(PairBuy {
                    transaction_hash,
                    amount_usd,
                })
            })
            .collect())
    }

    async fn get_with_retry(&self, url: &str) -> Result<Value, ToolError> {
        let mut attempt = 1;
        loop {
            let error = match self.fetcher.get_json(url).await {
                Ok(body) => return Ok(body),
                Err(error) => error,
            };

            match self.retry_policy.delay_after(attempt, error.is_retryable()) {
                Some(delay) => {
                    tracing::warn!(
                        phase = "tool",
                        event = "http_retry_scheduled",
                        url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error
                    );
                    (self.sleep)(delay).await;
                    attempt += 1;
                }
                None => {
                    tracing::error!(
                        phase = "tool",
                        event = "http_failure",
                        url,
                        attempt,
                        error = %error
                    );
                    return Err(error);
                }
            }
        }
    }
}

/// `base` with `segments` appended, each percent-encoded as a single segment.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, ToolError> {
    let mut url = Url::parse(base)
        .map_err(|err| ToolError::other(format!("invalid base URL `{base}`: {err}")))?;
    url.path_segments_mut()
        .map_err(|()| ToolError::other(format!("base URL `{base}` cannot take a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

impl std::fmt::Debug for MarketDataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataClient")
            .field("fetcher", &self.fetcher)
            .field("binance_base_url", &self.binance_base_url)
            .field("dexscreener_base_url", &self.dexscreener_base_url)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}
