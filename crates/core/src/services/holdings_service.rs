use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::quote::AssetQuote;
use crate::models::transaction::{Transaction, TransactionKind};

/// Relative tolerance for the `|signed_total| == quantity * unit_price` invariant.
const TOTAL_TOLERANCE: f64 = 1e-6;

/// Folds the transaction ledger into one `Holding` per asset.
///
/// Pure business logic — no I/O, no retained state. Every call receives
/// the full ledger snapshot and the current quote map, and produces a
/// fresh holdings map; nothing is mutated across calls.
pub struct HoldingsService;

impl HoldingsService {
    pub fn new() -> Self {
        Self
    }

    /// Validate a transaction before it may influence quantities or cost basis.
    ///
    /// Invalid records are rejected, never silently skipped — a single bad
    /// quantity would corrupt the weighted average for the whole symbol.
    pub fn validate(tx: &Transaction) -> Result<(), CoreError> {
        if tx.symbol.trim().is_empty() {
            return Err(Self::invalid(tx, "symbol is empty".into()));
        }
        if !tx.quantity.is_finite() || tx.quantity <= 0.0 {
            return Err(Self::invalid(
                tx,
                format!("quantity must be positive, got {}", tx.quantity),
            ));
        }
        if !tx.unit_price.is_finite() || tx.unit_price <= 0.0 {
            return Err(Self::invalid(
                tx,
                format!("unit price must be positive, got {}", tx.unit_price),
            ));
        }
        if !tx.signed_total.is_finite() {
            return Err(Self::invalid(
                tx,
                format!("signed total must be finite, got {}", tx.signed_total),
            ));
        }

        // The cash flow must carry the sign of the trade side
        match tx.kind {
            TransactionKind::Buy if tx.signed_total <= 0.0 => {
                return Err(Self::invalid(
                    tx,
                    format!("buy must have a positive signed total, got {}", tx.signed_total),
                ));
            }
            TransactionKind::Sell if tx.signed_total >= 0.0 => {
                return Err(Self::invalid(
                    tx,
                    format!("sell must have a negative signed total, got {}", tx.signed_total),
                ));
            }
            _ => {}
        }

        // |signed_total| must match quantity * unit_price within rounding tolerance
        let gross = tx.quantity * tx.unit_price;
        if (tx.signed_total.abs() - gross).abs() > TOTAL_TOLERANCE * gross.max(1.0) {
            return Err(Self::invalid(
                tx,
                format!(
                    "signed total {} does not match quantity * unit price = {}",
                    tx.signed_total, gross
                ),
            ));
        }

        Ok(())
    }

    /// Fold an unordered ledger into per-symbol holdings.
    ///
    /// `net_quantity` and `net_investment` are plain sums and do not depend
    /// on ordering. `average_cost` does: buys are applied in timestamp order
    /// and move the weighted average
    /// `(avg * held + quantity * unit_price) / (held + quantity)`;
    /// sells reduce quantity and investment but never touch the average.
    ///
    /// Symbols whose position is closed or negative are retained in the
    /// output. A symbol missing from `quotes` gets `current_price = 0.0`
    /// and `price_available = false`.
    pub fn aggregate(
        &self,
        transactions: &[Transaction],
        quotes: &HashMap<String, AssetQuote>,
    ) -> Result<HashMap<String, Holding>, CoreError> {
        for tx in transactions {
            Self::validate(tx)?;
        }

        let mut ordered: Vec<&Transaction> = transactions.iter().collect();
        ordered.sort_by_key(|tx| tx.timestamp);

        let mut holdings: HashMap<String, Holding> = HashMap::new();

        for tx in ordered {
            let holding = holdings
                .entry(tx.symbol.clone())
                .or_insert_with(|| Holding::new(&tx.symbol));

            match tx.kind {
                TransactionKind::Buy => {
                    let held = holding.net_quantity;
                    holding.average_cost = if held <= 0.0 {
                        // Re-opened (or brand new) position: cost basis starts fresh
                        tx.unit_price
                    } else {
                        (holding.average_cost * held + tx.quantity * tx.unit_price)
                            / (held + tx.quantity)
                    };
                    holding.net_quantity += tx.quantity;
                    holding.net_investment += tx.signed_total;
                }
                TransactionKind::Sell => {
                    holding.net_quantity -= tx.quantity;
                    holding.net_investment += tx.signed_total;
                }
            }
        }

        for holding in holdings.values_mut() {
            match quotes.get(&holding.symbol) {
                Some(quote) => {
                    holding.current_price = quote.price;
                    holding.price_available = true;
                }
                None => {
                    holding.current_price = 0.0;
                    holding.price_available = false;
                }
            }
            holding.current_value = holding.net_quantity * holding.current_price;
        }

        Ok(holdings)
    }

    fn invalid(tx: &Transaction, reason: String) -> CoreError {
        CoreError::InvalidTransaction {
            id: tx.id.to_string(),
            reason,
        }
    }
}

impl Default for HoldingsService {
    fn default() -> Self {
        Self::new()
    }
}
