use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// User-configurable settings, stored inside the encrypted ledger file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// API keys for market data providers that require them.
    /// Keys: provider name (e.g., "coinmarketcap"). Values: the key string.
    pub api_keys: HashMap<String, String>,
}
