pub mod holdings_service;
pub mod ledger_service;
pub mod market_service;
pub mod performance_service;
