//! Core projection engine for year-by-year savings growth under monthly compounding

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use super::state::ProjectionState;
use super::points::ProjectionResult;

/// Inputs for a single projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Account value at projection start
    pub initial_value: f64,

    /// Recurring contribution paid each month
    pub monthly_contribution: f64,

    /// Annual growth rate in percent (e.g. 8.0 for 8%); negative for pessimistic runs
    pub annual_rate_percent: f64,

    /// Number of whole years to project
    pub years: u32,

    /// Maximum contribution per 12-month period (e.g. an ISA allowance)
    #[serde(default)]
    pub contribution_cap: Option<f64>,
}

impl ProjectionInput {
    /// Monthly growth rate as a fraction
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / 12.0
    }

    /// Contribution actually paid in over one year after applying the cap
    pub fn effective_yearly_contribution(&self) -> f64 {
        let yearly = self.monthly_contribution * 12.0;
        match self.contribution_cap {
            Some(cap) => yearly.min(cap),
            None => yearly,
        }
    }

    /// Reject inputs outside the engine's domain
    pub fn validate(&self) -> Result<(), ProjectionError> {
        if !self.initial_value.is_finite() || self.initial_value < 0.0 {
            return Err(ProjectionError::invalid(
                "initial_value",
                self.initial_value,
                "must be a finite, non-negative amount",
            ));
        }
        if !self.monthly_contribution.is_finite() || self.monthly_contribution < 0.0 {
            return Err(ProjectionError::invalid(
                "monthly_contribution",
                self.monthly_contribution,
                "must be a finite, non-negative amount",
            ));
        }
        if !self.annual_rate_percent.is_finite() {
            return Err(ProjectionError::invalid(
                "annual_rate_percent",
                self.annual_rate_percent,
                "must be finite",
            ));
        }
        // A monthly factor of zero or below wipes out or flips the balance
        if 1.0 + self.monthly_rate() <= 0.0 {
            return Err(ProjectionError::invalid(
                "annual_rate_percent",
                self.annual_rate_percent,
                "must be greater than -1200",
            ));
        }
        if let Some(cap) = self.contribution_cap {
            if !cap.is_finite() || cap < 0.0 {
                return Err(ProjectionError::invalid(
                    "contribution_cap",
                    cap,
                    "must be a finite, non-negative amount",
                ));
            }
        }
        Ok(())
    }
}

/// Maps elapsed years onto calendar years and ages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    /// Calendar year of point 0 (0 yields plain offsets)
    pub start_year: i32,

    /// Holder age at point 0
    pub start_age: u32,
}

impl Timeline {
    /// Reject horizons whose last point would overflow the calendar year or age
    pub fn check_horizon(&self, years: u32) -> Result<(), ProjectionError> {
        let last_year = i32::try_from(years).ok().and_then(|y| self.start_year.checked_add(y));
        if last_year.is_none() {
            return Err(ProjectionError::invalid(
                "years",
                years as f64,
                "runs past the last representable calendar year",
            ));
        }
        if self.start_age.checked_add(years).is_none() {
            return Err(ProjectionError::invalid(
                "years",
                years as f64,
                "runs past the last representable age",
            ));
        }
        Ok(())
    }
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    timeline: Timeline,
}

impl ProjectionEngine {
    /// Create a new projection engine labelling points with the given timeline
    pub fn new(timeline: Timeline) -> Self {
        Self { timeline }
    }

    pub fn timeline(&self) -> Timeline {
        self.timeline
    }

    /// Run a projection, emitting `years + 1` points starting from the untouched input
    pub fn project(&self, input: &ProjectionInput) -> Result<ProjectionResult, ProjectionError> {
        input.validate()?;
        self.timeline.check_horizon(input.years)?;

        let monthly_rate = input.monthly_rate();
        let yearly_contribution = input.effective_yearly_contribution();

        let mut result = ProjectionResult::with_capacity(input.years);
        let mut state = ProjectionState::new(input.initial_value);

        result.add_point(state.point(&self.timeline));
        for _year in 0..input.years {
            state.advance_year(monthly_rate, yearly_contribution);
            result.add_point(state.point(&self.timeline));
        }

        Ok(result)
    }
}

/// Project with offset-labelled points (year and age count from 0)
pub fn project(input: &ProjectionInput) -> Result<ProjectionResult, ProjectionError> {
    ProjectionEngine::default().project(input)
}
