use serde::{Deserialize, Serialize};

/// The derived current position in one asset.
///
/// Holdings are recomputed from scratch on every aggregation call — they
/// are never mutated in place across calls. A `Holding` exists iff at
/// least one ledger transaction references its symbol; closed positions
/// (`net_quantity <= 0`) are kept so they can still be inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Asset ticker, uppercased
    pub symbol: String,

    /// Signed running sum of quantity deltas (+buy, −sell)
    pub net_quantity: f64,

    /// Weighted-average cost per unit of the quantity currently held.
    /// Moved only by buy transactions; sells never touch it.
    pub average_cost: f64,

    /// Cumulative signed cash contributed (sum of `signed_total`) —
    /// the cost-basis reference for gain/loss
    pub net_investment: f64,

    /// Latest market price, or `0.0` when no quote is available
    pub current_price: f64,

    /// `false` when no quote was found for this symbol, so a stale view
    /// is distinguishable from a genuinely worthless holding
    pub price_available: bool,

    /// `net_quantity * current_price`
    pub current_value: f64,
}

impl Holding {
    /// An empty position for a symbol, before any transaction is folded in.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            net_quantity: 0.0,
            average_cost: 0.0,
            net_investment: 0.0,
            current_price: 0.0,
            price_available: false,
            current_value: 0.0,
        }
    }
}

/// Unrealized performance of a position (or of the whole portfolio).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainLoss {
    /// Market value of the held quantity at the current price
    pub current_value: f64,

    /// `((current_value - net_investment) / |net_investment|) * 100`,
    /// defined as `0` when net investment is zero
    pub gain_loss_percent: f64,
}
