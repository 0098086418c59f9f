//! Savings Projection - growth projections for ISA and pension savings
//!
//! This library provides:
//! - Monthly-compounding projections with an optional annual contribution cap
//! - ISA and retirement calculators built on the projection engine
//! - Parallel three-scenario comparisons
//! - A GBP to USD rate cache refreshed at most once a day, with persisted
//!   and fixed fallbacks when the rate service is unavailable
//! - Portfolio summaries and transaction search

pub mod error;
pub mod projection;
pub mod scenario;
pub mod currency;
pub mod portfolio;
pub mod activity;

// Re-export commonly used types
pub use error::{FetchError, ProjectionError, StoreError};
pub use projection::{
    AccountKind, ProjectionEngine, ProjectionInput, ProjectionPoint, ProjectionResult, Timeline,
};
pub use scenario::{ScenarioComparison, ScenarioRunner, ScenarioSet};
pub use currency::{CurrencyConfig, RateCache, RateSnapshot, RateSource};
pub use portfolio::{Holding, PortfolioSummary};
pub use activity::{Transaction, TransactionFilter};
