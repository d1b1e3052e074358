use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use payroll_core::calculations::{PayrollInput, compute_payroll};
use payroll_core::{TaxConfig, TaxRules};
use payroll_data::{BracketLoader, RuleSetLoader};
use rust_decimal::Decimal;

/// Validate a payroll rule set and print a summary of it.
///
/// Without `--rules` the built-in 2026 rule set is checked. With
/// `--brackets` the withholding bands are taken from a CSV file with the
/// columns `tax_year,upper_bound,rate` instead of the rules file.
#[derive(Parser, Debug)]
#[command(name = "payroll-rules-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML rules file
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Path to a CSV file with withholding bands
    #[arg(short, long)]
    brackets: Option<PathBuf>,

    /// Gross salaries to run through the rule set as a sanity check
    #[arg(short, long)]
    salary: Vec<Decimal>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut rules = match &args.rules {
        Some(path) => {
            println!("Reading rules from: {}", path.display());
            RuleSetLoader::read_rules(path)
                .with_context(|| format!("Failed to read rules: {}", path.display()))?
        }
        None => {
            println!("Using built-in 2026 rules");
            TaxRules::brazil_2026()
        }
    };

    if let Some(path) = &args.brackets {
        println!("Reading brackets from: {}", path.display());
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let records = BracketLoader::parse(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        println!(
            "Parsed {} records for years {:?}",
            records.len(),
            BracketLoader::years(&records)
        );
        rules = RuleSetLoader::with_bracket_records(rules, &records)
            .context("Failed to apply CSV brackets")?;
    }

    let config = TaxConfig::from_rules(rules).context("Rule set is invalid")?;
    print_summary(&config);

    for gross in &args.salary {
        let summary = compute_payroll(&config, &PayrollInput::new(*gross, 0))
            .with_context(|| format!("Failed to compute payroll for {gross}"))?;
        println!(
            "  gross {:>10}  INSS {:>8}  IRRF {:>8}  net {:>10}",
            summary.gross_salary, summary.social_security, summary.income_tax, summary.net_salary
        );
    }

    Ok(())
}

fn print_summary(config: &TaxConfig) {
    println!("Rule set for {} is valid.", config.tax_year());
    println!("  minimum wage:        {}", config.minimum_wage());
    println!("  withholding cap:     {}", config.withholding_cap());
    println!("  IRRF exemption:      {}", config.income_tax_exemption());
    println!("  IRRF rate:           {}", config.simplified_income_tax_rate());
    println!("  dependent deduction: {}", config.dependent_deduction());
    println!("  FGTS rate:           {}", config.fgts_rate());
    println!("  INSS bands:");
    for bracket in config.bracket_table().iter() {
        println!("    up to {:>10}  {}", bracket.upper_bound, bracket.rate);
    }
}
