use serde::{Deserialize, Serialize};

/// A live market quote for one asset, as returned by a market data provider.
///
/// The aggregation engine only reads `price`; `display_name` and `logo_url`
/// are passed through for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetQuote {
    /// Ticker symbol, uppercased (e.g., "BTC")
    pub symbol: String,

    /// Human-readable name (e.g., "Bitcoin")
    pub display_name: String,

    /// Latest price per unit in USD
    pub price: f64,

    /// Optional logo image URL for display
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl AssetQuote {
    pub fn new(symbol: impl Into<String>, display_name: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            display_name: display_name.into(),
            price,
            logo_url: None,
        }
    }
}
