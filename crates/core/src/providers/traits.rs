use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::quote::AssetQuote;

/// Trait abstraction for market data sources.
///
/// Each API provider implements this trait. If an API stops working or
/// changes, only that one implementation is replaced — the rest of the
/// codebase (and every test using a mock) is untouched.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Latest quotes for the assets this source tracks, keyed by symbol.
    /// Quotes carry price, display name, and an optional logo URL.
    async fn fetch_quotes(&self) -> Result<HashMap<String, AssetQuote>, CoreError>;
}
