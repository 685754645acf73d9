use std::collections::HashMap;

use crate::models::holding::GainLoss;
use crate::models::quote::AssetQuote;
use crate::models::transaction::Transaction;

/// Derives unrealized performance from a sub-ledger and current prices.
///
/// Pure business logic — no I/O, no retained state. This is unrealized
/// performance only: it measures the net cash outcome of the position,
/// without separating realized gains from closed portions.
pub struct PerformanceService;

impl PerformanceService {
    pub fn new() -> Self {
        Self
    }

    /// Unrealized gain/loss for one symbol's transactions at `current_price`.
    ///
    /// A fully exited position (`net_quantity == 0`) with nonzero net
    /// investment still reports a meaningful percentage — the net cash
    /// outcome relative to what was put in.
    pub fn gain_loss(&self, transactions: &[Transaction], current_price: f64) -> GainLoss {
        let net_investment: f64 = transactions.iter().map(|tx| tx.signed_total).sum();
        let net_quantity: f64 = transactions.iter().map(|tx| tx.quantity_delta()).sum();
        let current_value = net_quantity * current_price;

        GainLoss {
            current_value,
            gain_loss_percent: Self::percent(current_value, net_investment),
        }
    }

    /// Portfolio-wide unrealized performance across all symbols.
    ///
    /// Symbols without a quote contribute zero current value, mirroring
    /// the per-holding "price unavailable → 0" degradation.
    pub fn portfolio_gain_loss(
        &self,
        transactions: &[Transaction],
        quotes: &HashMap<String, AssetQuote>,
    ) -> GainLoss {
        let net_investment: f64 = transactions.iter().map(|tx| tx.signed_total).sum();

        let mut net_quantities: HashMap<&str, f64> = HashMap::new();
        for tx in transactions {
            *net_quantities.entry(tx.symbol.as_str()).or_insert(0.0) += tx.quantity_delta();
        }

        let current_value: f64 = net_quantities
            .iter()
            .map(|(symbol, quantity)| {
                quantity * quotes.get(*symbol).map_or(0.0, |quote| quote.price)
            })
            .sum();

        GainLoss {
            current_value,
            gain_loss_percent: Self::percent(current_value, net_investment),
        }
    }

    /// Guarded percentage: zero net investment is defined as 0%, not an error.
    fn percent(current_value: f64, net_investment: f64) -> f64 {
        if net_investment == 0.0 {
            0.0
        } else {
            ((current_value - net_investment) / net_investment.abs()) * 100.0
        }
    }
}

impl Default for PerformanceService {
    fn default() -> Self {
        Self::new()
    }
}
