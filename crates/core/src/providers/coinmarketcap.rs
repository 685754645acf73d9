use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::MarketDataProvider;
use crate::errors::CoreError;
use crate::models::quote::AssetQuote;

const BASE_URL: &str = "https://pro-api.coinmarketcap.com";

/// How many top-ranked listings to quote per refresh.
const LISTING_LIMIT: usize = 50;

/// CoinMarketCap API provider for cryptocurrency quotes.
///
/// - **Requires an API key**, sent via the `X-CMC_PRO_API_KEY` header.
/// - **Endpoints**: `/v1/cryptocurrency/listings/latest` for prices,
///   `/v2/cryptocurrency/info?id=...` for logo URLs.
///
/// Prices are quoted in USD.
pub struct CoinMarketCapProvider {
    client: Client,
    api_key: String,
}

impl CoinMarketCapProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key: api_key.into(),
        }
    }

    fn api_error(message: String) -> CoreError {
        CoreError::Api {
            provider: "CoinMarketCap".into(),
            message,
        }
    }
}

// ── CoinMarketCap API response types ────────────────────────────────

#[derive(Deserialize)]
struct ListingsResponse {
    data: Vec<ListingEntry>,
}

#[derive(Deserialize)]
struct ListingEntry {
    id: i64,
    symbol: String,
    name: String,
    quote: QuoteBlock,
}

#[derive(Deserialize)]
struct QuoteBlock {
    #[serde(rename = "USD")]
    usd: UsdQuote,
}

#[derive(Deserialize)]
struct UsdQuote {
    price: f64,
}

#[derive(Deserialize)]
struct InfoResponse {
    data: HashMap<String, InfoEntry>,
}

#[derive(Deserialize)]
struct InfoEntry {
    logo: Option<String>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for CoinMarketCapProvider {
    fn name(&self) -> &str {
        "CoinMarketCap"
    }

    async fn fetch_quotes(&self) -> Result<HashMap<String, AssetQuote>, CoreError> {
        // 1. Latest listings (top assets by market cap), priced in USD
        let url = format!("{BASE_URL}/v1/cryptocurrency/listings/latest");
        let listings: ListingsResponse = self
            .client
            .get(&url)
            .header("X-CMC_PRO_API_KEY", &self.api_key)
            .header("accept", "application/json")
            .send()
            .await?
            .json()
            .await
            .map_err(|e| Self::api_error(format!("Failed to parse listings: {e}")))?;

        let top: Vec<&ListingEntry> = listings.data.iter().take(LISTING_LIMIT).collect();

        // 2. Logo URLs for those ids (separate metadata endpoint)
        let ids = top
            .iter()
            .map(|entry| entry.id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let info_url = format!("{BASE_URL}/v2/cryptocurrency/info?id={ids}");
        let info: InfoResponse = self
            .client
            .get(&info_url)
            .header("X-CMC_PRO_API_KEY", &self.api_key)
            .header("accept", "application/json")
            .send()
            .await?
            .json()
            .await
            .map_err(|e| Self::api_error(format!("Failed to parse asset info: {e}")))?;

        let mut quotes = HashMap::with_capacity(top.len());
        for entry in top {
            let logo_url = info
                .data
                .get(&entry.id.to_string())
                .and_then(|i| i.logo.clone());
            quotes.insert(
                entry.symbol.to_uppercase(),
                AssetQuote {
                    symbol: entry.symbol.to_uppercase(),
                    display_name: entry.name.clone(),
                    price: entry.quote.usd.price,
                    logo_url,
                },
            );
        }

        Ok(quotes)
    }
}
