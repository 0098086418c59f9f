//! Projection engine and the account calculators built on it

mod state;
mod engine;
mod points;
mod accounts;
mod calculator;

pub use state::ProjectionState;
pub use engine::{ProjectionEngine, ProjectionInput, Timeline, project};
pub use points::{ProjectionPoint, ProjectionResult, ProjectionSummary};
pub use accounts::{AccountKind, DEFAULT_ISA_ALLOWANCE};
pub use calculator::{
    IsaCalculatorInput, IsaCalculation, RetirementCalculatorInput, RetirementCalculation,
    inflation_adjusted, roi_percent, MAX_TARGET_SEARCH_YEARS, WITHDRAWAL_RATE,
};
