//! Output structures for projections

use serde::{Deserialize, Serialize};

/// Account position at one year boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// Calendar year, or elapsed-year offset when no start year is set
    pub year: i32,

    /// Holder age at this point
    pub age: u32,

    /// Account value
    pub value: f64,

    /// Contributions paid in so far (initial value excluded)
    pub cumulative_contributions: f64,

    /// Value minus initial value minus contributions
    pub cumulative_growth: f64,
}

/// Complete projection result, one point per elapsed year including year 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub points: Vec<ProjectionPoint>,
}

impl ProjectionResult {
    pub fn with_capacity(years: u32) -> Self {
        Self {
            points: Vec::with_capacity(years as usize + 1),
        }
    }

    /// Add a point
    pub fn add_point(&mut self, point: ProjectionPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last point of the horizon
    pub fn final_point(&self) -> Option<&ProjectionPoint> {
        self.points.last()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let initial_value = self.points.first().map(|p| p.value).unwrap_or(0.0);
        let (final_value, total_contributions, total_growth) = self
            .final_point()
            .map(|p| (p.value, p.cumulative_contributions, p.cumulative_growth))
            .unwrap_or((0.0, 0.0, 0.0));

        ProjectionSummary {
            years: self.points.len().saturating_sub(1) as u32,
            initial_value,
            final_value,
            total_contributions,
            total_growth,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub initial_value: f64,
    pub final_value: f64,
    pub total_contributions: f64,
    pub total_growth: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(year: i32, value: f64, contributions: f64, initial: f64) -> ProjectionPoint {
        ProjectionPoint {
            year,
            age: 30 + year as u32,
            value,
            cumulative_contributions: contributions,
            cumulative_growth: value - initial - contributions,
        }
    }

    #[test]
    fn test_summary_reads_first_and_last() {
        let mut result = ProjectionResult::with_capacity(2);
        result.add_point(point(0, 100.0, 0.0, 100.0));
        result.add_point(point(1, 250.0, 120.0, 100.0));
        result.add_point(point(2, 400.0, 240.0, 100.0));

        let summary = result.summary();
        assert_eq!(summary.years, 2);
        assert_eq!(summary.initial_value, 100.0);
        assert_eq!(summary.final_value, 400.0);
        assert_eq!(summary.total_contributions, 240.0);
        assert_eq!(summary.total_growth, 60.0);
    }

    #[test]
    fn test_empty_summary() {
        let result = ProjectionResult::with_capacity(0);
        assert!(result.is_empty());
        assert_eq!(result.summary().final_value, 0.0);
        assert_eq!(result.summary().years, 0);
    }
}
