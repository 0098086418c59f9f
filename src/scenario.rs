//! Scenario runner for comparative growth projections
//!
//! Runs the same account over one horizon at several growth rates so the
//! trajectories can be charted side by side. The engine projects a single
//! rate; fanning out across scenarios happens here.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::projection::{ProjectionEngine, ProjectionInput, ProjectionResult, Timeline};

/// A named growth-rate assumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub annual_rate_percent: f64,
}

impl Scenario {
    pub fn new(name: impl Into<String>, annual_rate_percent: f64) -> Self {
        Self {
            name: name.into(),
            annual_rate_percent,
        }
    }
}

/// Pessimistic, average and outperform rates compared on one chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub pessimistic: Scenario,
    pub average: Scenario,
    pub outperform: Scenario,
}

impl Default for ScenarioSet {
    fn default() -> Self {
        Self {
            pessimistic: Scenario::new("Pessimistic (5%)", 5.0),
            average: Scenario::new("Average (8%)", 8.0),
            outperform: Scenario::new("Outperform (10%)", 10.0),
        }
    }
}

impl ScenarioSet {
    pub fn scenarios(&self) -> [&Scenario; 3] {
        [&self.pessimistic, &self.average, &self.outperform]
    }
}

/// One year of a three-way comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub year: i32,
    pub age: u32,
    pub pessimistic: f64,
    pub average: f64,
    pub outperform: f64,
    /// Initial value plus contributions paid in so far
    pub contributions: f64,
}

/// Parallel trajectories for every scenario in a set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub rows: Vec<ComparisonRow>,
}

impl ScenarioComparison {
    /// Highest value across all scenarios, used to scale chart axes
    pub fn max_value(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| r.outperform.max(r.average).max(r.pessimistic).max(r.contributions))
            .fold(0.0, f64::max)
    }
}

/// Runs projections for several scenarios or inputs with one timeline
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            engine: ProjectionEngine::new(timeline),
        }
    }

    /// Project `template` at each scenario's rate, keeping everything else fixed
    pub fn run(
        &self,
        template: &ProjectionInput,
        set: &ScenarioSet,
    ) -> Result<ScenarioComparison, ProjectionError> {
        let (pessimistic, (average, outperform)) = rayon::join(
            || self.project_at(template, &set.pessimistic),
            || {
                rayon::join(
                    || self.project_at(template, &set.average),
                    || self.project_at(template, &set.outperform),
                )
            },
        );
        let (pessimistic, average, outperform) = (pessimistic?, average?, outperform?);

        let rows = pessimistic
            .points
            .iter()
            .zip(&average.points)
            .zip(&outperform.points)
            .map(|((p, a), o)| ComparisonRow {
                year: p.year,
                age: p.age,
                pessimistic: p.value,
                average: a.value,
                outperform: o.value,
                contributions: template.initial_value + p.cumulative_contributions,
            })
            .collect();

        Ok(ScenarioComparison { rows })
    }

    fn project_at(
        &self,
        template: &ProjectionInput,
        scenario: &Scenario,
    ) -> Result<ProjectionResult, ProjectionError> {
        let input = ProjectionInput {
            annual_rate_percent: scenario.annual_rate_percent,
            ..template.clone()
        };
        self.engine.project(&input)
    }

    /// Run projections for many inputs
    pub fn run_batch(&self, inputs: &[ProjectionInput]) -> Result<Vec<ProjectionResult>, ProjectionError> {
        inputs.par_iter().map(|input| self.engine.project(input)).collect()
    }
}
