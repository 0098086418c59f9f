//! Savings Projection CLI
//!
//! Command-line interface for running savings projections and currency conversion

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use savings_projection::currency::{
    CurrencyConfig, CurrencyDisplay, FileStore, HttpRateFetcher, RateCache, SystemClock,
};
use savings_projection::projection::{
    IsaCalculatorInput, RetirementCalculatorInput, DEFAULT_ISA_ALLOWANCE,
};
use savings_projection::{
    AccountKind, ProjectionEngine, ProjectionInput, ProjectionResult, ScenarioRunner, ScenarioSet,
    Timeline,
};

#[derive(Parser)]
#[command(name = "savings-projection")]
#[command(about = "Savings growth projections and GBP/USD conversion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Account {
    Isa,
    Sipp,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a balance year by year
    Project {
        /// Starting balance
        #[arg(long, default_value = "0")]
        initial: f64,

        /// Amount paid in each month
        #[arg(long, default_value = "0")]
        monthly: f64,

        /// Annual growth rate in percent
        #[arg(long, default_value = "7")]
        rate: f64,

        /// Number of years to project
        #[arg(long, default_value = "10")]
        years: u32,

        /// Annual contribution cap
        #[arg(long)]
        cap: Option<f64>,

        #[arg(long, default_value = "0")]
        start_age: u32,

        #[arg(long, default_value = "0")]
        start_year: i32,

        /// Write every projection point to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Compare pessimistic, average and outperform growth
    Scenarios {
        #[arg(long, value_enum, default_value = "isa")]
        account: Account,

        #[arg(long, default_value = "0")]
        initial: f64,

        /// Personal monthly contribution
        #[arg(long, default_value = "0")]
        monthly: f64,

        /// Employer monthly contribution (SIPP only)
        #[arg(long, default_value = "0")]
        employer: f64,

        /// Annual ISA allowance
        #[arg(long, default_value_t = DEFAULT_ISA_ALLOWANCE)]
        allowance: f64,

        #[arg(long, default_value = "35")]
        current_age: u32,

        #[arg(long, default_value = "60")]
        target_age: u32,

        #[arg(long, default_value = "0")]
        start_year: i32,
    },

    /// ISA growth calculator
    Isa {
        #[arg(long, default_value = "35")]
        current_age: u32,

        #[arg(long, default_value = "60")]
        target_age: u32,

        #[arg(long, default_value = "0")]
        balance: f64,

        #[arg(long, default_value = "0")]
        monthly: f64,

        #[arg(long, default_value = "7")]
        rate: f64,

        #[arg(long, default_value = "2.5")]
        inflation: f64,

        /// Balance to reach
        #[arg(long, default_value = "100000")]
        target: f64,

        #[arg(long, default_value_t = DEFAULT_ISA_ALLOWANCE)]
        allowance: f64,
    },

    /// Pension income calculator
    Retirement {
        #[arg(long, default_value = "35")]
        current_age: u32,

        #[arg(long, default_value = "67")]
        retirement_age: u32,

        #[arg(long, default_value = "0")]
        balance: f64,

        #[arg(long, default_value = "0")]
        personal: f64,

        #[arg(long, default_value = "0")]
        employer: f64,

        #[arg(long, default_value = "7")]
        rate: f64,

        #[arg(long, default_value = "2.5")]
        inflation: f64,
    },

    /// Convert a GBP amount to USD with the cached daily rate
    Convert {
        amount: f64,

        /// Directory holding the persisted rate record
        #[arg(long, default_value = ".savings-projection")]
        store_dir: PathBuf,

        /// JSON currency settings
        #[arg(long)]
        config: Option<PathBuf>,

        /// Mask balances in the output
        #[arg(long)]
        hide: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Commands::Project { initial, monthly, rate, years, cap, start_age, start_year, csv } => {
            let input = ProjectionInput {
                initial_value: initial,
                monthly_contribution: monthly,
                annual_rate_percent: rate,
                years,
                contribution_cap: cap,
            };
            let engine = ProjectionEngine::new(Timeline { start_year, start_age });
            let result = engine.project(&input).context("projection failed")?;
            print_projection(&result);

            if let Some(path) = csv {
                write_csv(&result, &path)?;
                println!("\nFull results written to: {}", path.display());
            }
        }

        Commands::Scenarios {
            account,
            initial,
            monthly,
            employer,
            allowance,
            current_age,
            target_age,
            start_year,
        } => {
            let kind = match account {
                Account::Isa => AccountKind::Isa { annual_allowance: allowance },
                Account::Sipp => AccountKind::sipp(employer),
            };
            let years = target_age
                .checked_sub(current_age)
                .ok_or_else(|| anyhow!("target age {} is before current age {}", target_age, current_age))?;

            let template = kind.projection_input(initial, monthly, 0.0, years);
            let set = ScenarioSet::default();
            let runner = ScenarioRunner::new(Timeline { start_year, start_age: current_age });
            let comparison = runner.run(&template, &set).context("scenario comparison failed")?;

            println!("{} scenarios ({} years):", kind.label(), years);
            println!(
                "{:>6} {:>4} {:>14} {:>14} {:>14} {:>14}",
                "Year", "Age", set.pessimistic.name, set.average.name, set.outperform.name, "Paid in"
            );
            println!("{}", "-".repeat(72));
            for row in &comparison.rows {
                println!(
                    "{:>6} {:>4} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
                    row.year, row.age, row.pessimistic, row.average, row.outperform, row.contributions
                );
            }
        }

        Commands::Isa { current_age, target_age, balance, monthly, rate, inflation, target, allowance } => {
            let input = IsaCalculatorInput {
                current_age,
                target_age,
                current_balance: balance,
                monthly_contribution: monthly,
                annual_return_percent: rate,
                inflation_percent: inflation,
                target_amount: target,
                annual_allowance: allowance,
            };
            let calc = input.calculate().context("ISA calculation failed")?;

            println!("ISA at age {}:", target_age);
            println!("  Future Value: £{:.2}", calc.future_value);
            println!("  In Today's Money: £{:.2}", calc.inflation_adjusted_value);
            println!("  Total Contributions: £{:.2}", calc.total_contributions);
            println!("  Investment Growth: £{:.2}", calc.investment_growth);
            println!("  ROI: {:.1}%", calc.roi_percent());
            match calc.years_to_reach_target {
                Some(y) => println!("  £{:.0} reached in {} years", target, y),
                None => println!("  £{:.0} not reached within the search horizon", target),
            }
        }

        Commands::Retirement {
            current_age,
            retirement_age,
            balance,
            personal,
            employer,
            rate,
            inflation,
        } => {
            let input = RetirementCalculatorInput {
                current_age,
                retirement_age,
                current_balance: balance,
                monthly_personal: personal,
                monthly_employer: employer,
                annual_return_percent: rate,
                inflation_percent: inflation,
            };
            let calc = input.calculate().context("retirement calculation failed")?;

            println!("Pension at age {}:", retirement_age);
            println!("  Pot Value: £{:.2}", calc.future_value);
            println!("  In Today's Money: £{:.2}", calc.inflation_adjusted_value);
            println!("  Annual Income: £{:.2}", calc.annual_income);
            println!("  Monthly Income: £{:.2}", calc.monthly_income);
            println!("  Monthly Income (today's money): £{:.2}", calc.inflation_adjusted_monthly_income);
            println!("  Total Contributions: £{:.2}", calc.total_contributions);
            println!("  Investment Growth: £{:.2}", calc.investment_growth);
        }

        Commands::Convert { amount, store_dir, config, hide } => {
            convert(amount, store_dir, config, hide)?;
        }
    }

    Ok(())
}

fn print_projection(result: &ProjectionResult) {
    println!("Projection Results ({} years):", result.len().saturating_sub(1));
    println!("{:>6} {:>4} {:>14} {:>14} {:>14}", "Year", "Age", "Value", "Contributions", "Growth");
    println!("{}", "-".repeat(58));
    for p in &result.points {
        println!(
            "{:>6} {:>4} {:>14.2} {:>14.2} {:>14.2}",
            p.year, p.age, p.value, p.cumulative_contributions, p.cumulative_growth
        );
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Final Value: £{:.2}", summary.final_value);
    println!("  Total Contributions: £{:.2}", summary.total_contributions);
    println!("  Total Growth: £{:.2}", summary.total_growth);
}

fn write_csv(result: &ProjectionResult, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("unable to create {}", path.display()))?;
    for point in &result.points {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

#[tokio::main]
async fn convert(amount: f64, store_dir: PathBuf, config: Option<PathBuf>, hide: bool) -> Result<()> {
    let config = match config {
        Some(path) => CurrencyConfig::from_json_path(&path)
            .map_err(|e| anyhow!("unable to load {}: {}", path.display(), e))?,
        None => CurrencyConfig::default(),
    };
    tokio::fs::create_dir_all(&store_dir)
        .await
        .with_context(|| format!("unable to create {}", store_dir.display()))?;

    let fetcher = HttpRateFetcher::new(&config).context("unable to build HTTP client")?;
    let cache = Arc::new(RateCache::new(
        Arc::new(FileStore::new(store_dir)),
        Arc::new(fetcher),
        Arc::new(SystemClock),
        config,
    ));

    let snapshot = cache.init().await;
    log::info!("Using {:?} rate {} (degraded: {})", snapshot.source, snapshot.rate, snapshot.degraded);

    let lines = CurrencyDisplay::new(&cache).render(amount, !hide);
    println!("{}", lines.gbp);
    println!("{}", lines.usd);
    println!("Rate: {:.4} ({:?})", snapshot.rate, snapshot.source);
    Ok(())
}
