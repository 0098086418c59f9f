//! Running simulation state for a single projection

use super::points::ProjectionPoint;
use super::engine::Timeline;

/// State of the account at a year boundary during projection
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Whole years simulated so far
    pub elapsed_years: u32,

    /// Current account value
    pub balance: f64,

    /// Contributions paid in since the start (excludes the initial value)
    pub cumulative_contributions: f64,

    /// Value at projection start
    pub initial_value: f64,
}

impl ProjectionState {
    /// Initialize state at projection start
    pub fn new(initial_value: f64) -> Self {
        Self {
            elapsed_years: 0,
            balance: initial_value,
            cumulative_contributions: 0.0,
            initial_value,
        }
    }

    /// Simulate one year of monthly compounding.
    ///
    /// Each month the balance grows by `monthly_rate` and then receives a
    /// twelfth of `yearly_contribution`.
    pub fn advance_year(&mut self, monthly_rate: f64, yearly_contribution: f64) {
        let monthly_contribution = yearly_contribution / 12.0;
        for _month in 0..12 {
            self.balance = self.balance * (1.0 + monthly_rate) + monthly_contribution;
        }

        // Booked once per year so the running total stays exact for capped accounts
        self.cumulative_contributions += yearly_contribution;
        self.elapsed_years += 1;
    }

    /// Growth attributable to returns rather than money paid in
    pub fn cumulative_growth(&self) -> f64 {
        self.balance - self.initial_value - self.cumulative_contributions
    }

    /// Snapshot the current state as an output point
    pub fn point(&self, timeline: &Timeline) -> ProjectionPoint {
        ProjectionPoint {
            year: timeline.start_year.saturating_add_unsigned(self.elapsed_years),
            age: timeline.start_age.saturating_add(self.elapsed_years),
            value: self.balance,
            cumulative_contributions: self.cumulative_contributions,
            cumulative_growth: self.cumulative_growth(),
        }
    }
}
