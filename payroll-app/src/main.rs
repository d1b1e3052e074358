use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use payroll_core::{CorrectionIndex, YearlyProjection};
use payroll_core::calculations::common::round_half_up;
use payroll_core::calculations::{
    AmortizationRow, CompoundInterest, EmployerCost, EmployerCostRates, MarkupPrice,
    PayrollInput, PayrollSummary, break_even, compound_interest, compute_employer_cost,
    compute_payroll, correct_value, ebitda, internal_rate_of_return, markup_price,
    net_present_value, price_schedule, project_yearly, sac_schedule,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

use payroll_app::config::AppConfig;
use payroll_app::logging;
use payroll_app::utils::{WatchLine, format_brl, parse_money, parse_watch_line};
use payroll_app::{Dashboard, DashboardInput, DashboardSettings, DashboardView, Debouncer};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Brazilian payroll, business and investment calculator.
///
/// Amounts may be written in Brazilian (`5.000,00`) or plain (`5000.00`)
/// notation.
#[derive(Debug, Parser)]
#[command(name = "payroll-dashboard", version, about)]
struct Cli {
    /// Application config file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Payroll rules file (TOML); overrides the config.
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Default log level when RUST_LOG is unset; overrides the config.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log records to this file; overrides the config.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AmortizationSystem {
    /// Constant amortization, decreasing installments.
    Sac,
    /// Constant installments.
    Price,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Gross-to-net payroll breakdown.
    Payroll {
        #[arg(long, value_parser = parse_money)]
        gross: Decimal,
        #[arg(long, default_value_t = 0)]
        dependents: u32,
        #[arg(long, value_parser = parse_money, default_value = "0")]
        other_deductions: Decimal,
        #[arg(long, value_parser = parse_money, default_value = "0")]
        benefits: Decimal,
    },

    /// Employer cost and business indicators.
    Business {
        #[arg(long, value_parser = parse_money)]
        gross: Decimal,
        /// Fixed costs for the break-even point.
        #[arg(long, value_parser = parse_money, default_value = "25000")]
        fixed_costs: Decimal,
        /// Contribution margin in percent.
        #[arg(long, default_value = "40")]
        margin_pct: Decimal,
        /// Net revenue; with the two cost flags, reports EBITDA.
        #[arg(long, value_parser = parse_money)]
        revenue: Option<Decimal>,
        #[arg(long, value_parser = parse_money, default_value = "0")]
        variable_costs: Decimal,
        #[arg(long, value_parser = parse_money, default_value = "0")]
        fixed_expenses: Decimal,
        /// Unit cost; with the percentage flags, reports a markup price.
        #[arg(long, value_parser = parse_money)]
        unit_cost: Option<Decimal>,
        #[arg(long, default_value = "0")]
        sales_tax_pct: Decimal,
        #[arg(long, default_value = "0")]
        sales_expense_pct: Decimal,
        #[arg(long, default_value = "0")]
        profit_margin_pct: Decimal,
    },

    /// Yearly investment table for a share of the net salary.
    Invest {
        #[arg(long, value_parser = parse_money)]
        gross: Decimal,
        #[arg(long, default_value_t = 0)]
        dependents: u32,
        /// Years to project; defaults to the config.
        #[arg(long)]
        years: Option<u32>,
    },

    /// Compound interest on a lump sum plus end-of-month deposits.
    Interest {
        #[arg(long, value_parser = parse_money)]
        principal: Decimal,
        /// Monthly rate in percent.
        #[arg(long)]
        monthly_rate_pct: Decimal,
        #[arg(long)]
        months: u32,
        #[arg(long, value_parser = parse_money, default_value = "0")]
        deposit: Decimal,
    },

    /// Correct a value by an economic index.
    Correct {
        #[arg(long, value_parser = parse_money)]
        base: Decimal,
        /// minimo, inflacao or igpm.
        #[arg(long, value_parser = parse_index, default_value = "inflacao")]
        index: CorrectionIndex,
        /// Years to correct over; defaults to the config.
        #[arg(long)]
        years: Option<u32>,
    },

    /// Loan amortization schedule.
    Amortize {
        #[arg(long, value_parser = parse_money)]
        principal: Decimal,
        /// Annual effective rate in percent.
        #[arg(long)]
        annual_rate_pct: Decimal,
        #[arg(long)]
        months: u32,
        #[arg(long, value_enum, default_value_t = AmortizationSystem::Price)]
        system: AmortizationSystem,
    },

    /// Net present value and internal rate of return of a cash-flow series.
    Cashflow {
        /// Discount rate per period, in percent.
        #[arg(long, default_value = "10")]
        rate_pct: Decimal,
        /// Starting guess for the IRR solver, as a fraction.
        #[arg(long, default_value = "0.1")]
        guess: Decimal,
        /// Flows starting at period 0.
        #[arg(required = true, allow_negative_numbers = true, value_parser = parse_money)]
        flows: Vec<Decimal>,
    },

    /// Read `gross [dependents]` lines from stdin and recalculate the
    /// dashboard once typing settles.
    ///
    /// `:log <filter>` changes the log level and `:logfile <path|off>`
    /// attaches or closes a log file without leaving the prompt.
    Watch {
        /// Value corrected by the index on every recalculation.
        #[arg(long, value_parser = parse_money, default_value = "0")]
        correction_base: Decimal,
        #[arg(long, value_parser = parse_index, default_value = "inflacao")]
        index: CorrectionIndex,
    },
}

fn parse_index(s: &str) -> Result<CorrectionIndex, String> {
    CorrectionIndex::parse(s).ok_or_else(|| {
        let known: Vec<_> = CorrectionIndex::all().iter().map(|i| i.as_str()).collect();
        format!("unknown index '{s}' (expected one of: {})", known.join(", "))
    })
}

// ─── config ──────────────────────────────────────────────────────────────────

fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => AppConfig::default(),
    };

    if let Some(rules) = &cli.rules {
        config.rules_file = Some(rules.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(file) = &cli.log_file {
        config.log_file = Some(file.clone());
    }

    Ok(config)
}

// ─── output ──────────────────────────────────────────────────────────────────

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

fn print_payroll(summary: &PayrollSummary) {
    println!("Salário bruto:     {}", format_brl(summary.gross_salary));
    println!("INSS:            - {}", format_brl(summary.social_security));
    println!("Base IRRF:         {}", format_brl(summary.income_tax_base));
    println!("IRRF:            - {}", format_brl(summary.income_tax));
    if !summary.other_deductions.is_zero() {
        println!("Outros descontos:- {}", format_brl(summary.other_deductions));
    }
    if !summary.benefits.is_zero() {
        println!("Benefícios:      + {}", format_brl(summary.benefits));
    }
    println!("Salário líquido:   {}", format_brl(summary.net_salary));
    println!("FGTS (empresa):    {}", format_brl(summary.fgts));
}

fn print_employer_cost(cost: &EmployerCost) {
    println!("Encargos sociais:  {}", format_brl(cost.social_charges));
    println!("FGTS:              {}", format_brl(cost.fgts));
    println!("Provisões:         {}", format_brl(cost.provisions));
    println!("Custo total:       {}", format_brl(cost.total_monthly_cost));
    println!("Sobre o bruto:     {}%", cost.percentage_over_gross);
}

fn print_investment(rows: &[YearlyProjection]) {
    println!("{:<8} {:>18} {:>18} {:>18}", "Ano", "Investido", "Juros", "Patrimônio");
    for row in rows {
        println!(
            "{:<8} {:>18} {:>18} {:>18}",
            format!("Ano {}", row.year),
            format_brl(row.total_invested),
            format_brl(row.interest_earned),
            format_brl(row.total_value)
        );
    }
}

fn print_view(view: &DashboardView) {
    print_payroll(&view.payroll);
    println!("Custo empresa:     {}", format_brl(view.employer_cost.total_monthly_cost));
    println!("Aporte mensal:     {}", format_brl(view.monthly_contribution));
    println!(
        "Corrigido ({}): {}",
        view.index.label(),
        format_brl(view.corrected_value)
    );
    if let (Some(label), Some(value)) = (view.chart.labels().last(), view.chart.total_value().last())
    {
        println!("Patrimônio {label}: {}", format_brl(*value));
    }
    print_investment(&view.investment);
    println!();
}

// ─── commands ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct BusinessReport {
    employer_cost: EmployerCost,
    break_even: Decimal,
    margin_pct: Decimal,
    ebitda: Option<Decimal>,
    markup: Option<MarkupPrice>,
}

#[derive(Serialize)]
struct CorrectionReport {
    base: Decimal,
    index: CorrectionIndex,
    annual_rate: Decimal,
    years: u32,
    corrected_value: Decimal,
}

#[derive(Serialize)]
struct CashFlowReport {
    npv: Decimal,
    irr_pct: Option<Decimal>,
}

fn apply_log_command(line: WatchLine) -> Result<()> {
    match line {
        WatchLine::LogLevel(filter) => {
            logging::set_log_level(&filter)?;
            info!(filter = %filter, "log level changed");
        }
        WatchLine::LogFile(Some(path)) => {
            logging::enable_file_logging(&path)?;
            info!(path = %path.display(), "log file attached");
        }
        WatchLine::LogFile(None) => {
            logging::disable_file_logging();
            info!("log file closed");
        }
        WatchLine::Salary { .. } => {}
    }
    Ok(())
}

async fn watch(
    mut dashboard: Dashboard,
    quiet: Duration,
    correction_base: Decimal,
    index: CorrectionIndex,
    json: bool,
) -> Result<()> {
    let (trigger, mut debounced) = Debouncer::channel(quiet);

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
            match parse_watch_line(&line) {
                Ok(Some(WatchLine::Salary { gross, dependents })) => {
                    let input = DashboardInput {
                        gross_salary: gross,
                        dependents,
                        correction_base,
                        index,
                    };
                    if !trigger.trigger(input) {
                        break;
                    }
                }
                Ok(Some(command)) => {
                    if let Err(e) = apply_log_command(command) {
                        warn!(error = %e, "log command failed");
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(line = %line, error = %e, "ignoring input line"),
            }
        }
        debug!("stdin closed");
        Ok::<(), anyhow::Error>(())
    });

    info!(
        quiet_ms = debounced.quiet_period().as_millis() as u64,
        "watching stdin for `gross [dependents]` lines"
    );

    while let Some(input) = debounced.next().await {
        match dashboard.recalculate(&input) {
            Ok(view) if json => print_json(&view)?,
            Ok(view) => print_view(&view),
            Err(e) => error!(gross = %input.gross_salary, error = %e, "recalculation failed"),
        }
    }

    logging::log_task_error("stdin reader", reader.await.context("stdin reader panicked")?);
    Ok(())
}

async fn run(
    cli: Cli,
    config: AppConfig,
) -> Result<()> {
    let tax_config = config.tax_config().context("Failed to load payroll rules")?;
    debug!(tax_year = tax_config.tax_year(), "rules loaded");

    match cli.command {
        Command::Payroll {
            gross,
            dependents,
            other_deductions,
            benefits,
        } => {
            let input = PayrollInput {
                gross_salary: gross,
                dependents,
                other_deductions,
                benefits,
            };
            let summary = compute_payroll(&tax_config, &input).context("Payroll failed")?;
            if cli.json {
                print_json(&summary)?;
            } else {
                print_payroll(&summary);
            }
        }

        Command::Business {
            gross,
            fixed_costs,
            margin_pct,
            revenue,
            variable_costs,
            fixed_expenses,
            unit_cost,
            sales_tax_pct,
            sales_expense_pct,
            profit_margin_pct,
        } => {
            let employer_cost = compute_employer_cost(gross, &EmployerCostRates::default())
                .context("Employer cost failed")?;
            let report = BusinessReport {
                employer_cost,
                break_even: break_even(fixed_costs, margin_pct).context("Break-even failed")?,
                margin_pct,
                ebitda: revenue
                    .map(|revenue| ebitda(revenue, variable_costs, fixed_expenses))
                    .transpose()
                    .context("EBITDA failed")?,
                markup: unit_cost
                    .map(|cost| {
                        markup_price(cost, sales_tax_pct, sales_expense_pct, profit_margin_pct)
                    })
                    .transpose()
                    .context("Markup failed")?,
            };

            if cli.json {
                print_json(&report)?;
            } else {
                print_employer_cost(&report.employer_cost);
                println!(
                    "Ponto de equilíbrio ({}%): {}",
                    report.margin_pct,
                    format_brl(report.break_even)
                );
                if let Some(value) = report.ebitda {
                    println!("EBITDA:            {}", format_brl(value));
                }
                if let Some(markup) = &report.markup {
                    println!(
                        "Preço de venda:    {} (markup {}, lucro {})",
                        format_brl(markup.sale_price),
                        markup.markup_factor,
                        format_brl(markup.nominal_profit)
                    );
                }
            }
        }

        Command::Invest {
            gross,
            dependents,
            years,
        } => {
            let summary = compute_payroll(&tax_config, &PayrollInput::new(gross, dependents))
                .context("Payroll failed")?;
            let contribution = summary.net_salary * config.contribution_share;
            let rows = project_yearly(
                contribution,
                config.monthly_rate,
                years.unwrap_or(config.projection_years),
            )
            .context("Projection failed")?;

            if cli.json {
                print_json(&rows)?;
            } else {
                println!(
                    "Aporte mensal: {} a {}% a.m.",
                    format_brl(contribution),
                    config.monthly_rate.saturating_mul(Decimal::ONE_HUNDRED)
                );
                print_investment(&rows);
            }
        }

        Command::Interest {
            principal,
            monthly_rate_pct,
            months,
            deposit,
        } => {
            let result: CompoundInterest =
                compound_interest(principal, monthly_rate_pct, months, deposit)
                    .context("Compound interest failed")?;

            if cli.json {
                print_json(&result)?;
            } else {
                println!("Montante total:    {}", format_brl(result.total_value));
                println!("Total investido:   {}", format_brl(result.total_invested));
                println!("Juros ganhos:      {}", format_brl(result.interest_earned));
            }
        }

        Command::Correct { base, index, years } => {
            let years = years.unwrap_or(config.correction_years);
            let corrected =
                correct_value(base, index.annual_rate(), years).context("Correction failed")?;
            let report = CorrectionReport {
                base,
                index,
                annual_rate: index.annual_rate(),
                years,
                corrected_value: round_half_up(corrected),
            };

            if cli.json {
                print_json(&report)?;
            } else {
                println!(
                    "{} corrigido por {} em {} anos: {}",
                    format_brl(report.base),
                    index.label(),
                    report.years,
                    format_brl(report.corrected_value)
                );
            }
        }

        Command::Amortize {
            principal,
            annual_rate_pct,
            months,
            system,
        } => {
            let rows: Vec<AmortizationRow> = match system {
                AmortizationSystem::Sac => sac_schedule(principal, annual_rate_pct, months),
                AmortizationSystem::Price => price_schedule(principal, annual_rate_pct, months),
            }
            .context("Amortization failed")?;

            if cli.json {
                print_json(&rows)?;
            } else {
                println!(
                    "{:<6} {:>16} {:>16} {:>16} {:>16}",
                    "Mês", "Parcela", "Amortização", "Juros", "Saldo"
                );
                for row in &rows {
                    println!(
                        "{:<6} {:>16} {:>16} {:>16} {:>16}",
                        row.month,
                        format_brl(row.installment),
                        format_brl(row.amortization),
                        format_brl(row.interest),
                        format_brl(row.balance)
                    );
                }
            }
        }

        Command::Cashflow {
            rate_pct,
            guess,
            flows,
        } => {
            let npv = net_present_value(rate_pct, &flows).context("NPV failed")?;
            let irr_pct = match internal_rate_of_return(&flows, guess) {
                Ok(irr) => Some(irr),
                Err(e) => {
                    warn!(error = %e, "IRR not available");
                    None
                }
            };
            let report = CashFlowReport { npv, irr_pct };

            if cli.json {
                print_json(&report)?;
            } else {
                println!("VPL ({rate_pct}%): {}", format_brl(report.npv));
                match report.irr_pct {
                    Some(irr) => println!("TIR: {irr}%"),
                    None => println!("TIR: n/d"),
                }
            }
        }

        Command::Watch {
            correction_base,
            index,
        } => {
            let quiet = Duration::from_millis(config.debounce_ms);
            let dashboard = Dashboard::new(tax_config, DashboardSettings::from(&config));
            watch(dashboard, quiet, correction_base, index, cli.json).await?;
        }
    }

    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    config.validate().context("Invalid configuration")?;

    logging::init_logging(&config.log_level);
    if let Some(path) = &config.log_file {
        logging::enable_file_logging(path)?;
    }
    debug!(?config, "configuration resolved");

    run(cli, config).await
}
