use std::sync::Arc;

use rtooling::{ToolError, ToolRegistry, ToolSpec, required_string};
use serde_json::json;

use super::market::MarketDataClient;
use crate::tool_params;

pub fn register(
    registry: &mut ToolRegistry,
    market: &Arc<MarketDataClient>,
) -> Result<(), ToolError> {
    let binance = Arc::clone(market);
    registry.register_fn(
        ToolSpec::new(
            "get_crypto_price",
            "Get the current price of a cryptocurrency in USD from Binance.",
        )
        .with_params(tool_params![
            ticker: String => "The cryptocurrency ticker symbol (e.g., BTC, ETH, SOL)",
        ]),
        move |args, _ctx| {
            let market = Arc::clone(&binance);
            async move {
                let ticker = required_string(&args, "ticker")?;
                let quote = market.spot_price(&ticker).await?;
                tracing::info!(symbol = %quote.symbol, price = quote.price, "fetched spot price");
                Ok(json!({
                    "symbol": quote.symbol,
                    "price": quote.price,
                    "message": format!("The current price for {}: ${:.2}", quote.symbol, quote.price),
                }))
            }
        },
    )?;

    let dexscreener = Arc::clone(market);
    registry.register_fn(
        ToolSpec::new(
            "get_dexscreener_price",
            "Get the USD price of a token pair using the Dexscreener API.",
        )
        .with_params(tool_params![pair_address: String => "The token pair address."]),
        move |args, _ctx| {
            let market = Arc::clone(&dexscreener);
            async move {
                let pair_address = required_string(&args, "pair_address")?;
                let price = market.pair_price_usd(&pair_address).await?;
                tracing::info!(pair_address = %pair_address, price = %price, "fetched pair price");
                Ok(json!({ "pair_address": pair_address, "price": price }))
            }
        },
    )
}
