use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Side of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Acquiring units of an asset (cash outflow)
    Buy,
    /// Disposing of units of an asset (cash inflow)
    Sell,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Buy => write!(f, "buy"),
            TransactionKind::Sell => write!(f, "sell"),
        }
    }
}

/// Sort order for transaction listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionSortOrder {
    /// Newest trade first (default for display)
    DateDesc,
    /// Oldest trade first
    DateAsc,
    /// Largest quantity first
    QuantityDesc,
    /// Smallest quantity first
    QuantityAsc,
    /// Alphabetical by asset symbol
    SymbolAsc,
    /// Reverse alphabetical by asset symbol
    SymbolDesc,
}

/// A single buy/sell transaction in the ledger.
///
/// `quantity` and `unit_price` are always positive magnitudes; the trade
/// side lives in `kind`. `signed_total` is the cash flow of the trade:
/// positive for buys (money out), negative for sells (money in), with
/// `|signed_total| == quantity * unit_price` up to floating rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: Uuid,

    /// Buy or sell
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Asset ticker, uppercased (e.g., "BTC", "ETH")
    pub symbol: String,

    /// Units traded (always positive)
    pub quantity: f64,

    /// Price per unit at trade time (always positive)
    pub unit_price: f64,

    /// Monetary value of the trade, signed by side
    pub signed_total: f64,

    /// Trade time — used only for ordering and display
    pub timestamp: DateTime<Utc>,

    /// Optional free text (exchange, memo); never used in computation
    #[serde(default)]
    pub note: Option<String>,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        symbol: impl Into<String>,
        quantity: f64,
        unit_price: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            symbol: symbol.into().to_uppercase(),
            quantity,
            unit_price,
            signed_total: Self::signed_total_for(kind, quantity, unit_price),
            timestamp,
            note: None,
        }
    }

    /// Create a transaction with a note attached.
    pub fn with_note(
        kind: TransactionKind,
        symbol: impl Into<String>,
        quantity: f64,
        unit_price: f64,
        timestamp: DateTime<Utc>,
        note: impl Into<String>,
    ) -> Self {
        let mut tx = Self::new(kind, symbol, quantity, unit_price, timestamp);
        tx.note = Some(note.into());
        tx
    }

    /// Cash flow of a trade: `quantity * unit_price`, negated for sells.
    pub fn signed_total_for(kind: TransactionKind, quantity: f64, unit_price: f64) -> f64 {
        let gross = quantity * unit_price;
        match kind {
            TransactionKind::Buy => gross,
            TransactionKind::Sell => -gross,
        }
    }

    /// Signed change in held units: `+quantity` for buys, `-quantity` for sells.
    #[must_use]
    pub fn quantity_delta(&self) -> f64 {
        match self.kind {
            TransactionKind::Buy => self.quantity,
            TransactionKind::Sell => -self.quantity,
        }
    }
}
