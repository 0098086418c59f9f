//! Target-age calculators for ISA and pension accounts
//!
//! Both calculators run the projection engine to the target age and layer
//! inflation and income estimates on the final value.

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use super::accounts::{AccountKind, DEFAULT_ISA_ALLOWANCE};
use super::engine::{ProjectionInput, project};
use super::state::ProjectionState;

/// Safe withdrawal rate used for retirement income estimates
pub const WITHDRAWAL_RATE: f64 = 0.04;

/// Longest horizon searched when looking for the year a target is reached
pub const MAX_TARGET_SEARCH_YEARS: u32 = 50;

/// Deflate a nominal amount by `years` of inflation
pub fn inflation_adjusted(value: f64, inflation_percent: f64, years: u32) -> f64 {
    value / (1.0 + inflation_percent / 100.0).powi(years as i32)
}

/// Return on investment as a percentage of the amount invested
pub fn roi_percent(gains: f64, invested: f64) -> f64 {
    if invested > 0.0 {
        gains / invested * 100.0
    } else {
        0.0
    }
}

fn years_between(current_age: u32, target_age: u32) -> Result<u32, ProjectionError> {
    target_age.checked_sub(current_age).ok_or_else(|| {
        ProjectionError::invalid(
            "target_age",
            target_age as f64,
            "must not be earlier than the current age",
        )
    })
}

/// ISA calculator inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsaCalculatorInput {
    pub current_age: u32,
    pub target_age: u32,
    pub current_balance: f64,
    pub monthly_contribution: f64,
    pub annual_return_percent: f64,
    pub inflation_percent: f64,
    /// Balance the holder is aiming for
    pub target_amount: f64,
    pub annual_allowance: f64,
}

impl Default for IsaCalculatorInput {
    fn default() -> Self {
        Self {
            current_age: 35,
            target_age: 60,
            current_balance: 0.0,
            monthly_contribution: 0.0,
            annual_return_percent: 7.0,
            inflation_percent: 2.5,
            target_amount: 100_000.0,
            annual_allowance: DEFAULT_ISA_ALLOWANCE,
        }
    }
}

/// ISA calculator results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsaCalculation {
    pub future_value: f64,
    /// Future value in today's money
    pub inflation_adjusted_value: f64,
    /// Current balance plus every contribution paid in
    pub total_contributions: f64,
    pub investment_growth: f64,
    /// Whole years until `target_amount` is reached, if within the search horizon
    pub years_to_reach_target: Option<u32>,
}

impl IsaCalculation {
    pub fn roi_percent(&self) -> f64 {
        roi_percent(self.investment_growth, self.total_contributions)
    }
}

impl IsaCalculatorInput {
    fn projection_input(&self, years: u32) -> ProjectionInput {
        AccountKind::Isa { annual_allowance: self.annual_allowance }.projection_input(
            self.current_balance,
            self.monthly_contribution,
            self.annual_return_percent,
            years,
        )
    }

    pub fn calculate(&self) -> Result<IsaCalculation, ProjectionError> {
        let years = years_between(self.current_age, self.target_age)?;
        let input = self.projection_input(years);
        let result = project(&input)?;
        let summary = result.summary();

        let total_contributions = self.current_balance + summary.total_contributions;

        Ok(IsaCalculation {
            future_value: summary.final_value,
            inflation_adjusted_value: inflation_adjusted(summary.final_value, self.inflation_percent, years),
            total_contributions,
            investment_growth: summary.final_value - total_contributions,
            years_to_reach_target: self.years_to_reach_target(&input),
        })
    }

    fn years_to_reach_target(&self, input: &ProjectionInput) -> Option<u32> {
        let monthly_rate = input.monthly_rate();
        let yearly_contribution = input.effective_yearly_contribution();
        let mut state = ProjectionState::new(self.current_balance);

        while state.balance < self.target_amount {
            if state.elapsed_years >= MAX_TARGET_SEARCH_YEARS {
                return None;
            }
            state.advance_year(monthly_rate, yearly_contribution);
        }
        Some(state.elapsed_years)
    }
}

/// Pension calculator inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementCalculatorInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_balance: f64,
    pub monthly_personal: f64,
    pub monthly_employer: f64,
    pub annual_return_percent: f64,
    pub inflation_percent: f64,
}

impl Default for RetirementCalculatorInput {
    fn default() -> Self {
        Self {
            current_age: 35,
            retirement_age: 67,
            current_balance: 0.0,
            monthly_personal: 0.0,
            monthly_employer: 0.0,
            annual_return_percent: 7.0,
            inflation_percent: 2.5,
        }
    }
}

/// Pension calculator results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementCalculation {
    pub future_value: f64,
    pub inflation_adjusted_value: f64,
    /// Income at the safe withdrawal rate
    pub annual_income: f64,
    pub monthly_income: f64,
    pub inflation_adjusted_monthly_income: f64,
    pub total_contributions: f64,
    pub investment_growth: f64,
}

impl RetirementCalculatorInput {
    pub fn calculate(&self) -> Result<RetirementCalculation, ProjectionError> {
        let years = years_between(self.current_age, self.retirement_age)?;
        let input = AccountKind::sipp(self.monthly_employer).projection_input(
            self.current_balance,
            self.monthly_personal,
            self.annual_return_percent,
            years,
        );
        let summary = project(&input)?.summary();

        let annual_income = summary.final_value * WITHDRAWAL_RATE;
        let monthly_income = annual_income / 12.0;
        let total_contributions = self.current_balance + summary.total_contributions;

        Ok(RetirementCalculation {
            future_value: summary.final_value,
            inflation_adjusted_value: inflation_adjusted(summary.final_value, self.inflation_percent, years),
            annual_income,
            monthly_income,
            inflation_adjusted_monthly_income: inflation_adjusted(monthly_income, self.inflation_percent, years),
            total_contributions,
            investment_growth: summary.final_value - total_contributions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_isa_calculator_defaults() {
        let input = IsaCalculatorInput {
            current_balance: 18_549.28,
            monthly_contribution: 500.0,
            ..Default::default()
        };
        let calc = input.calculate().unwrap();

        assert_relative_eq!(calc.total_contributions, 18_549.28 + 500.0 * 12.0 * 25.0, epsilon = 1e-6);
        assert!(calc.future_value > calc.total_contributions);
        assert!(calc.inflation_adjusted_value < calc.future_value);
        assert_relative_eq!(
            calc.investment_growth,
            calc.future_value - calc.total_contributions,
            epsilon = 1e-9
        );
        assert!(calc.years_to_reach_target.unwrap() < 25);
        assert!(calc.roi_percent() > 0.0);
    }

    #[test]
    fn test_isa_allowance_limits_contributions() {
        let input = IsaCalculatorInput {
            current_age: 30,
            target_age: 40,
            monthly_contribution: 5_000.0,
            annual_allowance: 20_000.0,
            ..Default::default()
        };
        let calc = input.calculate().unwrap();
        assert_eq!(calc.total_contributions, 200_000.0);
    }

    #[test]
    fn test_isa_target_already_met() {
        let input = IsaCalculatorInput {
            current_balance: 150_000.0,
            ..Default::default()
        };
        assert_eq!(input.calculate().unwrap().years_to_reach_target, Some(0));
    }

    #[test]
    fn test_isa_target_unreachable() {
        let input = IsaCalculatorInput {
            current_balance: 100.0,
            monthly_contribution: 0.0,
            annual_return_percent: 0.0,
            target_amount: 1_000_000.0,
            ..Default::default()
        };
        assert_eq!(input.calculate().unwrap().years_to_reach_target, None);
    }

    #[test]
    fn test_target_before_current_age_rejected() {
        let input = IsaCalculatorInput {
            current_age: 60,
            target_age: 40,
            ..Default::default()
        };
        assert!(matches!(
            input.calculate(),
            Err(ProjectionError::InvalidInput { field: "target_age", .. })
        ));
    }

    #[test]
    fn test_retirement_income() {
        let input = RetirementCalculatorInput {
            current_balance: 45_000.0,
            monthly_personal: 400.0,
            monthly_employer: 250.0,
            ..Default::default()
        };
        let calc = input.calculate().unwrap();

        assert_relative_eq!(calc.annual_income, calc.future_value * 0.04, epsilon = 1e-9);
        assert_relative_eq!(calc.monthly_income, calc.annual_income / 12.0, epsilon = 1e-9);
        assert_relative_eq!(calc.total_contributions, 45_000.0 + 650.0 * 12.0 * 32.0, epsilon = 1e-6);
        assert!(calc.inflation_adjusted_monthly_income < calc.monthly_income);
    }

    #[test]
    fn test_inflation_adjustment() {
        assert_relative_eq!(inflation_adjusted(110.0, 10.0, 1), 100.0, epsilon = 1e-9);
        assert_eq!(inflation_adjusted(100.0, 2.5, 0), 100.0);
        assert_eq!(roi_percent(50.0, 0.0), 0.0);
        assert_relative_eq!(roi_percent(25.0, 100.0), 25.0);
    }
}
