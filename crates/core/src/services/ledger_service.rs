use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::ledger::Ledger;
use crate::models::transaction::{Transaction, TransactionKind, TransactionSortOrder};
use crate::services::holdings_service::HoldingsService;

/// Manages the ledger of buy/sell transactions: insertion, update, removal,
/// and the thin query layer consumed by the aggregation engine.
///
/// Pure business logic — no I/O. Transactions are validated at the door
/// with the same rules the aggregator enforces, so a persisted ledger is
/// always aggregatable.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Add a new transaction, keeping the ledger sorted by timestamp.
    pub fn add_transaction(&self, ledger: &mut Ledger, tx: Transaction) -> Result<(), CoreError> {
        HoldingsService::validate(&tx)?;
        Self::binary_insert(&mut ledger.transactions, tx);
        Ok(())
    }

    /// Remove a transaction by its UUID. Returns the removed record.
    ///
    /// Note: there is no "cannot sell more than held" rule — a ledger may
    /// legitimately contain sell-only history (negative net quantity).
    pub fn remove_transaction(
        &self,
        ledger: &mut Ledger,
        tx_id: Uuid,
    ) -> Result<Transaction, CoreError> {
        let idx = ledger
            .transactions
            .iter()
            .position(|tx| tx.id == tx_id)
            .ok_or_else(|| CoreError::TransactionNotFound(tx_id.to_string()))?;
        Ok(ledger.transactions.remove(idx))
    }

    /// Update an existing transaction. The signed total is recomputed from
    /// the new quantity and unit price. Validates before committing; the
    /// old record is restored if the update is invalid.
    pub fn update_transaction(
        &self,
        ledger: &mut Ledger,
        tx_id: Uuid,
        kind: TransactionKind,
        symbol: impl Into<String>,
        quantity: f64,
        unit_price: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        let idx = ledger
            .transactions
            .iter()
            .position(|tx| tx.id == tx_id)
            .ok_or_else(|| CoreError::TransactionNotFound(tx_id.to_string()))?;

        let old_tx = ledger.transactions.remove(idx);

        let updated = Transaction {
            id: old_tx.id,
            kind,
            symbol: symbol.into().to_uppercase(),
            quantity,
            unit_price,
            signed_total: Transaction::signed_total_for(kind, quantity, unit_price),
            timestamp,
            note: old_tx.note.clone(),
        };

        if let Err(e) = HoldingsService::validate(&updated) {
            // Rollback: put the old record back at its sorted position
            Self::binary_insert(&mut ledger.transactions, old_tx);
            return Err(e);
        }

        Self::binary_insert(&mut ledger.transactions, updated);
        Ok(())
    }

    /// Set or clear the note on an existing transaction.
    pub fn set_note(
        &self,
        ledger: &mut Ledger,
        tx_id: Uuid,
        note: Option<String>,
    ) -> Result<(), CoreError> {
        let tx = ledger
            .transactions
            .iter_mut()
            .find(|tx| tx.id == tx_id)
            .ok_or_else(|| CoreError::TransactionNotFound(tx_id.to_string()))?;
        tx.note = note;
        Ok(())
    }

    /// All transactions for one symbol (exact match, case-normalized).
    /// Relative ledger order is preserved; no dedup, no aggregation.
    pub fn transactions_for<'a>(&self, ledger: &'a Ledger, symbol: &str) -> Vec<&'a Transaction> {
        let upper = symbol.to_uppercase();
        ledger
            .transactions
            .iter()
            .filter(|tx| tx.symbol == upper)
            .collect()
    }

    /// Sum of signed totals across the whole ledger — the portfolio-wide
    /// net cash contributed.
    pub fn total_traded(&self, ledger: &Ledger) -> f64 {
        ledger.transactions.iter().map(|tx| tx.signed_total).sum()
    }

    /// Get transactions sorted by a specific display order.
    pub fn sorted<'a>(
        &self,
        ledger: &'a Ledger,
        order: &TransactionSortOrder,
    ) -> Vec<&'a Transaction> {
        let mut txs: Vec<&Transaction> = ledger.transactions.iter().collect();
        match order {
            TransactionSortOrder::DateDesc => txs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            TransactionSortOrder::DateAsc => txs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
            TransactionSortOrder::QuantityDesc => txs.sort_by(|a, b| {
                b.quantity
                    .partial_cmp(&a.quantity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            TransactionSortOrder::QuantityAsc => txs.sort_by(|a, b| {
                a.quantity
                    .partial_cmp(&b.quantity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            TransactionSortOrder::SymbolAsc => txs.sort_by(|a, b| a.symbol.cmp(&b.symbol)),
            TransactionSortOrder::SymbolDesc => txs.sort_by(|a, b| b.symbol.cmp(&a.symbol)),
        }
        txs
    }

    /// Binary insert into a timestamp-sorted Vec<Transaction> in O(log n).
    fn binary_insert(txs: &mut Vec<Transaction>, tx: Transaction) {
        let pos = txs
            .binary_search_by_key(&tx.timestamp, |t| t.timestamp)
            .unwrap_or_else(|pos| pos);
        txs.insert(pos, tx);
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
