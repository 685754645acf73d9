use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::quote::AssetQuote;
use crate::providers::traits::MarketDataProvider;

/// Fetches live quotes from the configured market data provider.
///
/// This is the only I/O-bearing service. The aggregation engine never
/// fetches anything itself — callers pass the quote map returned here
/// into `HoldingsService::aggregate` and re-fetch when they want fresher
/// prices.
pub struct MarketDataService {
    provider: Box<dyn MarketDataProvider>,
}

impl MarketDataService {
    pub fn new(provider: Box<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Name of the underlying provider (for logs/errors).
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch the latest quote map, keyed by uppercase symbol so lookups
    /// match ledger symbols.
    pub async fn fetch_quotes(&self) -> Result<HashMap<String, AssetQuote>, CoreError> {
        let quotes = self.provider.fetch_quotes().await?;
        Ok(quotes
            .into_iter()
            .map(|(symbol, quote)| (symbol.to_uppercase(), quote))
            .collect())
    }
}
