//! Holdings summaries: regional allocation, day change and total return

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Broad kind of holding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldingKind {
    Equity,
    Fund,
}

/// Geographic exposure of a holding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    US,
    UK,
    Europe,
    Emerging,
    Global,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::US => "US",
            Region::UK => "UK",
            Region::Europe => "Europe",
            Region::Emerging => "Emerging",
            Region::Global => "Global",
        }
    }
}

/// A single position in an ISA or SIPP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub name: String,
    pub kind: HoldingKind,

    /// Market value of the position
    pub total_value: f64,

    /// Change in value since the previous close
    pub day_change: f64,

    /// Gain over cost since purchase
    pub total_return: f64,

    /// Share of the portfolio, in percent
    pub allocation_percent: f64,

    pub region: Region,
}

/// Aggregated exposure to one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalAllocation {
    pub region: Region,
    pub percentage: f64,
    pub value: f64,
}

/// Sum allocation and value per region, largest allocation first
pub fn regional_allocation(holdings: &[Holding]) -> Vec<RegionalAllocation> {
    let mut by_region: HashMap<Region, RegionalAllocation> = HashMap::new();
    for holding in holdings {
        let entry = by_region.entry(holding.region).or_insert(RegionalAllocation {
            region: holding.region,
            percentage: 0.0,
            value: 0.0,
        });
        entry.percentage += holding.allocation_percent;
        entry.value += holding.total_value;
    }

    let mut allocations: Vec<_> = by_region.into_values().collect();
    // Ties broken by region name so the order is stable
    allocations.sort_by(|a, b| {
        b.percentage
            .total_cmp(&a.percentage)
            .then_with(|| a.region.as_str().cmp(b.region.as_str()))
    });
    allocations
}

/// Equity and fund shares of the portfolio, in percent
pub fn allocation_by_kind(holdings: &[Holding]) -> (f64, f64) {
    holdings.iter().fold((0.0, 0.0), |(equity, fund), h| match h.kind {
        HoldingKind::Equity => (equity + h.allocation_percent, fund),
        HoldingKind::Fund => (equity, fund + h.allocation_percent),
    })
}

/// Headline performance figures for a set of holdings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub total_day_change: f64,
    /// Day change as a percentage of the total value
    pub day_change_percent: f64,
    pub total_return: f64,
    /// Total return as a percentage of cost basis
    pub total_return_percent: f64,
}

impl PortfolioSummary {
    pub fn from_holdings(holdings: &[Holding], total_value: f64) -> Self {
        let total_day_change: f64 = holdings.iter().map(|h| h.day_change).sum();
        let total_return: f64 = holdings.iter().map(|h| h.total_return).sum();
        let cost_basis = total_value - total_return;

        Self {
            total_value,
            total_day_change,
            day_change_percent: percent_of(total_day_change, total_value),
            total_return,
            total_return_percent: percent_of(total_return, cost_basis),
        }
    }
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole != 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
