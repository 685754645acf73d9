pub mod errors;
pub mod format;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use errors::CoreError;
use models::{
    holding::{GainLoss, Holding},
    ledger::Ledger,
    quote::AssetQuote,
    settings::Settings,
    transaction::{Transaction, TransactionKind, TransactionSortOrder},
};
use providers::coinmarketcap::CoinMarketCapProvider;
use providers::traits::MarketDataProvider;
use services::{
    holdings_service::HoldingsService, ledger_service::LedgerService,
    market_service::MarketDataService, performance_service::PerformanceService,
};
use storage::manager::StorageManager;

/// Settings key under which the CoinMarketCap API key is stored.
const CMC_API_KEY: &str = "coinmarketcap";

/// Main entry point for the Coinledger core library.
///
/// Owns the transaction ledger, the latest quote snapshot, and the
/// services that operate on them. The engine itself (aggregation,
/// gain/loss, formatting) is pure; this facade is the orchestration
/// layer that re-invokes it whenever the ledger or quotes change.
#[must_use]
pub struct CoinLedger {
    ledger: Ledger,
    /// Latest quote snapshot from the market provider. Not persisted —
    /// refreshed explicitly via `refresh_quotes` or injected by the caller.
    quotes: HashMap<String, AssetQuote>,
    ledger_service: LedgerService,
    holdings_service: HoldingsService,
    performance_service: PerformanceService,
    market_service: Option<MarketDataService>,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for CoinLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinLedger")
            .field("transactions", &self.ledger.transactions.len())
            .field("quotes", &self.quotes.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl CoinLedger {
    /// Create a brand new empty ledger with default settings.
    pub fn create_new() -> Self {
        Self::build(Ledger::default())
    }

    /// Load an existing ledger from encrypted bytes (password required).
    /// Use this for WASM / Tauri where the frontend handles file I/O.
    pub fn load_from_bytes(encrypted: &[u8], password: &str) -> Result<Self, CoreError> {
        let ledger = StorageManager::load_from_bytes(encrypted, password)?;
        Ok(Self::build(ledger))
    }

    /// Save the current ledger to encrypted bytes.
    /// Clears the unsaved-changes flag on success.
    pub fn save_to_bytes(&mut self, password: &str) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::save_to_bytes(&self.ledger, password)?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Load from an encrypted file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, password: &str) -> Result<Self, CoreError> {
        let ledger = StorageManager::load_from_file(path, password)?;
        Ok(Self::build(ledger))
    }

    /// Save to an encrypted file on disk (native only, not WASM).
    /// Clears the unsaved-changes flag on success.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str, password: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.ledger, path, password)?;
        self.dirty = false;
        Ok(())
    }

    // ── Transaction Management ──────────────────────────────────────

    /// Record a buy/sell transaction. The signed total is computed from
    /// quantity × unit price, negated for sells.
    pub fn add_transaction(
        &mut self,
        kind: TransactionKind,
        symbol: impl Into<String>,
        quantity: f64,
        unit_price: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Uuid, CoreError> {
        let tx = Transaction::new(kind, symbol, quantity, unit_price, timestamp);
        let id = tx.id;
        self.ledger_service.add_transaction(&mut self.ledger, tx)?;
        self.dirty = true;
        Ok(id)
    }

    /// Record a transaction with a note attached.
    pub fn add_transaction_with_note(
        &mut self,
        kind: TransactionKind,
        symbol: impl Into<String>,
        quantity: f64,
        unit_price: f64,
        timestamp: DateTime<Utc>,
        note: impl Into<String>,
    ) -> Result<Uuid, CoreError> {
        let tx = Transaction::with_note(kind, symbol, quantity, unit_price, timestamp, note);
        let id = tx.id;
        self.ledger_service.add_transaction(&mut self.ledger, tx)?;
        self.dirty = true;
        Ok(id)
    }

    /// Add multiple transactions at once. All records are validated first;
    /// if any fails validation, none are added (all-or-nothing).
    /// Returns the IDs of all added transactions.
    pub fn add_transactions(&mut self, txs: Vec<Transaction>) -> Result<Vec<Uuid>, CoreError> {
        let mut staged = self.ledger.clone();
        let mut ids = Vec::with_capacity(txs.len());

        for tx in txs {
            ids.push(tx.id);
            self.ledger_service.add_transaction(&mut staged, tx)?;
        }

        self.ledger = staged;
        self.dirty = true;
        Ok(ids)
    }

    /// Update an existing transaction by its ID.
    /// Validates the updated record before committing.
    pub fn update_transaction(
        &mut self,
        tx_id: Uuid,
        kind: TransactionKind,
        symbol: impl Into<String>,
        quantity: f64,
        unit_price: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.ledger_service.update_transaction(
            &mut self.ledger,
            tx_id,
            kind,
            symbol,
            quantity,
            unit_price,
            timestamp,
        )?;
        self.dirty = true;
        Ok(())
    }

    /// Remove a transaction permanently. Returns the removed record.
    pub fn remove_transaction(&mut self, tx_id: Uuid) -> Result<Transaction, CoreError> {
        let removed = self
            .ledger_service
            .remove_transaction(&mut self.ledger, tx_id)?;
        self.dirty = true;
        Ok(removed)
    }

    /// Remove a transaction but keep it in the trash for potential undo.
    pub fn remove_transaction_to_trash(&mut self, tx_id: Uuid) -> Result<Transaction, CoreError> {
        let removed = self
            .ledger_service
            .remove_transaction(&mut self.ledger, tx_id)?;
        self.ledger.trash.push(removed.clone());
        self.dirty = true;
        Ok(removed)
    }

    /// Restore the most recently trashed transaction back into the ledger.
    /// Returns the restored record, or `None` if the trash is empty.
    pub fn undo_last_removal(&mut self) -> Result<Option<Transaction>, CoreError> {
        let tx = match self.ledger.trash.pop() {
            Some(tx) => tx,
            None => return Ok(None),
        };

        self.ledger_service
            .add_transaction(&mut self.ledger, tx.clone())?;
        self.dirty = true;
        Ok(Some(tx))
    }

    /// Get transactions currently in the trash.
    #[must_use]
    pub fn get_trash(&self) -> &[Transaction] {
        &self.ledger.trash
    }

    /// Clear all trashed transactions permanently.
    pub fn clear_trash(&mut self) {
        if !self.ledger.trash.is_empty() {
            self.ledger.trash.clear();
            self.dirty = true;
        }
    }

    /// Set or clear the note on an existing transaction.
    pub fn set_transaction_note(
        &mut self,
        tx_id: Uuid,
        note: Option<String>,
    ) -> Result<(), CoreError> {
        self.ledger_service.set_note(&mut self.ledger, tx_id, note)?;
        self.dirty = true;
        Ok(())
    }

    // ── Ledger Queries ──────────────────────────────────────────────

    /// Get a single transaction by its ID.
    #[must_use]
    pub fn get_transaction(&self, tx_id: Uuid) -> Option<&Transaction> {
        self.ledger.transactions.iter().find(|tx| tx.id == tx_id)
    }

    /// All transactions in ledger order (oldest first).
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.ledger.transactions
    }

    /// Transactions sorted by a specific display order.
    #[must_use]
    pub fn transactions_sorted(&self, order: &TransactionSortOrder) -> Vec<&Transaction> {
        self.ledger_service.sorted(&self.ledger, order)
    }

    /// All transactions for one symbol, relative ledger order preserved.
    #[must_use]
    pub fn transactions_for_symbol(&self, symbol: &str) -> Vec<&Transaction> {
        self.ledger_service.transactions_for(&self.ledger, symbol)
    }

    /// Search transactions by matching query against symbol and note
    /// (case-insensitive).
    #[must_use]
    pub fn search_transactions(&self, query: &str) -> Vec<&Transaction> {
        let q = query.to_lowercase();
        self.ledger
            .transactions
            .iter()
            .filter(|tx| {
                tx.symbol.to_lowercase().contains(&q)
                    || tx.note.as_deref().unwrap_or("").to_lowercase().contains(&q)
            })
            .collect()
    }

    /// All distinct symbols that appear in the ledger, sorted.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut symbols: Vec<String> = self
            .ledger
            .transactions
            .iter()
            .filter_map(|tx| {
                if seen.insert(tx.symbol.as_str()) {
                    Some(tx.symbol.clone())
                } else {
                    None
                }
            })
            .collect();
        symbols.sort();
        symbols
    }

    /// Total number of transactions without materializing a sorted vector.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.ledger.transactions.len()
    }

    /// Sum of signed totals across the whole ledger.
    #[must_use]
    pub fn total_traded(&self) -> f64 {
        self.ledger_service.total_traded(&self.ledger)
    }

    // ── Holdings & Performance ──────────────────────────────────────

    /// Fold the full ledger into per-symbol holdings, priced with the
    /// latest quote snapshot. Recomputed from scratch on every call.
    pub fn holdings(&self) -> Result<HashMap<String, Holding>, CoreError> {
        self.holdings_service
            .aggregate(&self.ledger.transactions, &self.quotes)
    }

    /// Fold the full ledger into holdings priced with an explicit quote map.
    pub fn holdings_with_quotes(
        &self,
        quotes: &HashMap<String, AssetQuote>,
    ) -> Result<HashMap<String, Holding>, CoreError> {
        self.holdings_service
            .aggregate(&self.ledger.transactions, quotes)
    }

    /// Unrealized gain/loss for one symbol at the latest quoted price
    /// (price 0 when no quote is available).
    #[must_use]
    pub fn gain_loss_for(&self, symbol: &str) -> GainLoss {
        let upper = symbol.to_uppercase();
        let price = self.quotes.get(&upper).map_or(0.0, |q| q.price);
        self.gain_loss_at_price(&upper, price)
    }

    /// Unrealized gain/loss for one symbol at an explicit price.
    #[must_use]
    pub fn gain_loss_at_price(&self, symbol: &str, current_price: f64) -> GainLoss {
        let txs = self.ledger_service.transactions_for(&self.ledger, symbol);
        let owned: Vec<Transaction> = txs.into_iter().cloned().collect();
        self.performance_service.gain_loss(&owned, current_price)
    }

    /// Unrealized gain/loss for the whole portfolio at the latest quotes.
    #[must_use]
    pub fn portfolio_gain_loss(&self) -> GainLoss {
        self.performance_service
            .portfolio_gain_loss(&self.ledger.transactions, &self.quotes)
    }

    // ── Market Data ─────────────────────────────────────────────────

    /// Fetch fresh quotes from the configured market data provider and
    /// replace the snapshot. Returns the number of quoted assets.
    pub async fn refresh_quotes(&mut self) -> Result<usize, CoreError> {
        let service = self.market_service.as_ref().ok_or_else(|| {
            CoreError::NoProvider(
                "set a CoinMarketCap API key or inject a provider first".into(),
            )
        })?;
        self.quotes = service.fetch_quotes().await?;
        Ok(self.quotes.len())
    }

    /// The latest quote snapshot, keyed by uppercase symbol.
    #[must_use]
    pub fn quotes(&self) -> &HashMap<String, AssetQuote> {
        &self.quotes
    }

    /// The latest quote for one symbol, if any.
    #[must_use]
    pub fn quote_for(&self, symbol: &str) -> Option<&AssetQuote> {
        self.quotes.get(&symbol.to_uppercase())
    }

    /// Replace the quote snapshot with externally supplied quotes
    /// (offline use, or frontends that fetch market data themselves).
    pub fn set_quotes(&mut self, quotes: HashMap<String, AssetQuote>) {
        self.quotes = quotes
            .into_iter()
            .map(|(symbol, quote)| (symbol.to_uppercase(), quote))
            .collect();
    }

    /// Swap in a custom market data source.
    pub fn set_market_provider(&mut self, provider: Box<dyn MarketDataProvider>) {
        self.market_service = Some(MarketDataService::new(provider));
    }

    /// Whether a market data provider is configured.
    #[must_use]
    pub fn has_market_provider(&self) -> bool {
        self.market_service.is_some()
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Set an API key for a provider (e.g., "coinmarketcap").
    /// Rebuilds the market service so the new key takes effect immediately.
    pub fn set_api_key(&mut self, provider: String, key: String) {
        self.ledger.settings.api_keys.insert(provider, key);
        self.market_service = Self::market_service_from(&self.ledger.settings);
        self.dirty = true;
    }

    /// Remove an API key for a provider.
    /// Rebuilds the market service so the removal takes effect immediately.
    pub fn remove_api_key(&mut self, provider: &str) -> bool {
        let removed = self.ledger.settings.api_keys.remove(provider).is_some();
        if removed {
            self.market_service = Self::market_service_from(&self.ledger.settings);
            self.dirty = true;
        }
        removed
    }

    /// Get current settings.
    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.ledger.settings
    }

    // ── Password & Dirty State ──────────────────────────────────────

    /// Re-encrypt the ledger with a new password.
    /// Returns the encrypted bytes. The caller should write them to storage.
    ///
    /// `last_saved_bytes` must be the most recently saved encrypted bytes
    /// for this ledger. The current password is verified by decrypting them.
    /// If verification fails, returns `CoreError::Decryption`.
    pub fn change_password(
        &mut self,
        last_saved_bytes: &[u8],
        current_password: &str,
        new_password: &str,
    ) -> Result<Vec<u8>, CoreError> {
        StorageManager::load_from_bytes(last_saved_bytes, current_password)?;

        let new_bytes = StorageManager::save_to_bytes(&self.ledger, new_password)?;
        self.dirty = false;
        Ok(new_bytes)
    }

    /// Returns `true` if the ledger has been modified since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export all transactions as a JSON string.
    pub fn export_transactions_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.ledger.transactions).map_err(|e| {
            CoreError::Serialization(format!("Failed to serialize transactions to JSON: {e}"))
        })
    }

    /// Export all transactions as a CSV string.
    /// Columns: id, type, symbol, quantity, unit_price, signed_total, timestamp, note
    #[must_use]
    pub fn export_transactions_to_csv(&self) -> String {
        let mut csv =
            String::from("id,type,symbol,quantity,unit_price,signed_total,timestamp,note\n");
        for tx in &self.ledger.transactions {
            let note = tx.note.as_deref().unwrap_or("");
            // Escape CSV: quote fields containing commas, quotes, or newlines
            let escaped_note = if note.contains(',') || note.contains('"') || note.contains('\n') {
                format!("\"{}\"", note.replace('"', "\"\""))
            } else {
                note.to_string()
            };
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                tx.id,
                tx.kind,
                tx.symbol,
                tx.quantity,
                tx.unit_price,
                tx.signed_total,
                tx.timestamp.to_rfc3339(),
                escaped_note,
            ));
        }
        csv
    }

    /// Import transactions from a JSON string. Validates each record;
    /// all-or-nothing. Returns the number of transactions imported.
    pub fn import_transactions_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let txs: Vec<Transaction> = serde_json::from_str(json)?;
        let count = txs.len();
        self.add_transactions(txs)?;
        Ok(count)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(ledger: Ledger) -> Self {
        let market_service = Self::market_service_from(&ledger.settings);
        Self {
            ledger,
            quotes: HashMap::new(),
            ledger_service: LedgerService::new(),
            holdings_service: HoldingsService::new(),
            performance_service: PerformanceService::new(),
            market_service,
            dirty: false,
        }
    }

    fn market_service_from(settings: &Settings) -> Option<MarketDataService> {
        settings.api_keys.get(CMC_API_KEY).map(|key| {
            MarketDataService::new(Box::new(CoinMarketCapProvider::new(key.clone())))
        })
    }
}
