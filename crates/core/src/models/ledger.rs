use serde::{Deserialize, Serialize};

use super::settings::Settings;
use super::transaction::Transaction;

/// The main data container. Everything in here gets serialized,
/// encrypted, and saved to the portable .clgr file.
///
/// Transactions are kept sorted by timestamp (oldest first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    /// Full buy/sell history, all assets
    pub transactions: Vec<Transaction>,

    /// User settings (API keys)
    pub settings: Settings,

    /// Transactions that have been removed but can be restored (undo support).
    #[serde(default)]
    pub trash: Vec<Transaction>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            transactions: Vec::new(),
            settings: Settings::default(),
            trash: Vec::new(),
        }
    }
}
