//! Tax-wrapper account kinds and how they shape contributions

use serde::{Deserialize, Serialize};

use super::engine::ProjectionInput;

/// Annual ISA subscription allowance
pub const DEFAULT_ISA_ALLOWANCE: f64 = 20_000.0;

/// Account wrapper being projected
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AccountKind {
    /// Individual Savings Account: contributions capped per 12-month period
    Isa {
        annual_allowance: f64,
    },
    /// Self-invested personal pension: uncapped, with an employer top-up
    Sipp {
        employer_monthly: f64,
    },
}

impl AccountKind {
    pub fn isa() -> Self {
        AccountKind::Isa { annual_allowance: DEFAULT_ISA_ALLOWANCE }
    }

    pub fn sipp(employer_monthly: f64) -> Self {
        AccountKind::Sipp { employer_monthly }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Isa { .. } => "ISA",
            AccountKind::Sipp { .. } => "SIPP",
        }
    }

    /// Total paid in each month before any cap
    pub fn total_monthly_contribution(&self, personal_monthly: f64) -> f64 {
        match self {
            AccountKind::Isa { .. } => personal_monthly,
            AccountKind::Sipp { employer_monthly } => personal_monthly + employer_monthly,
        }
    }

    pub fn contribution_cap(&self) -> Option<f64> {
        match self {
            AccountKind::Isa { annual_allowance } => Some(*annual_allowance),
            AccountKind::Sipp { .. } => None,
        }
    }

    /// Build engine input for this account
    pub fn projection_input(
        &self,
        current_value: f64,
        personal_monthly: f64,
        annual_rate_percent: f64,
        years: u32,
    ) -> ProjectionInput {
        ProjectionInput {
            initial_value: current_value,
            monthly_contribution: self.total_monthly_contribution(personal_monthly),
            annual_rate_percent,
            years,
            contribution_cap: self.contribution_cap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isa_is_capped() {
        let input = AccountKind::isa().projection_input(10_000.0, 2_000.0, 7.0, 10);
        assert_eq!(input.contribution_cap, Some(20_000.0));
        assert_eq!(input.monthly_contribution, 2_000.0);
        assert_eq!(input.effective_yearly_contribution(), 20_000.0);
    }

    #[test]
    fn test_sipp_adds_employer() {
        let input = AccountKind::sipp(250.0).projection_input(45_000.0, 400.0, 7.0, 32);
        assert_eq!(input.contribution_cap, None);
        assert_eq!(input.monthly_contribution, 650.0);
        assert_eq!(input.effective_yearly_contribution(), 7_800.0);
    }
}
