use std::path::PathBuf;

use payroll_core::calculations::common::round_half_up;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a monetary amount.
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseMoneyError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes a money string to plain `1234.56` form.
///
/// The last of `,` or `.` is the decimal separator when both appear. A lone
/// separator that appears once is decimal; repeated, it groups thousands.
fn normalize_money_input(s: &str) -> String {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_prefix("R$").unwrap_or(trimmed);
    let digits: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let last_comma = digits.rfind(',');
    let last_dot = digits.rfind('.');

    let (thousands, decimal) = match (last_comma, last_dot) {
        (Some(comma), Some(dot)) if comma > dot => ('.', Some(',')),
        (Some(_), Some(_)) => (',', Some('.')),
        (Some(_), None) if digits.matches(',').count() == 1 => ('.', Some(',')),
        (Some(_), None) => (',', None),
        (None, Some(_)) if digits.matches('.').count() > 1 => ('.', None),
        _ => (',', Some('.')),
    };

    digits
        .chars()
        .filter(|c| *c != thousands)
        .map(|c| if Some(c) == decimal { '.' } else { c })
        .collect()
}

/// Parses a monetary amount in Brazilian or plain notation.
///
/// Accepts `"R$ 1.234,56"`, `"1234,56"`, `"1,234.56"` and `"1234.56"`.
/// Empty or whitespace-only input is treated as 0.
///
/// A single separator is always decimal, whichever it is: `"5.000"` is five,
/// not five thousand. Write `"5000"`, `"5.000,00"` or `"5000,00"` for five
/// thousand.
pub fn parse_money(s: &str) -> Result<Decimal, ParseMoneyError> {
    let normalized = normalize_money_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::warn!(input = %s, "invalid amount: {}", e);
        ParseMoneyError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Error returned for a malformed line typed into the watch prompt.
#[derive(Debug, Error)]
pub enum WatchLineError {
    #[error(transparent)]
    Amount(#[from] ParseMoneyError),

    #[error("invalid dependent count '{0}'")]
    Dependents(String),

    #[error("unexpected trailing input '{0}'")]
    Trailing(String),

    #[error("unknown command ':{0}' (expected :log or :logfile)")]
    UnknownCommand(String),

    #[error(":{0} needs an argument")]
    MissingArgument(&'static str),
}

/// One line of the watch prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchLine {
    /// `gross [dependents]`
    Salary { gross: Decimal, dependents: u32 },
    /// `:log <filter>`
    LogLevel(String),
    /// `:logfile <path>`, or `:logfile off` to close the file.
    LogFile(Option<PathBuf>),
}

/// Parses a line typed into the watch prompt.
///
/// Lines starting with `:` are commands; anything else is a
/// `gross [dependents]` pair with dependents defaulting to 0. Returns
/// `Ok(None)` for a blank line.
pub fn parse_watch_line(line: &str) -> Result<Option<WatchLine>, WatchLineError> {
    let line = line.trim();
    match line.strip_prefix(':') {
        Some(command) => parse_command(command).map(Some),
        None => parse_salary_line(line),
    }
}

fn parse_command(command: &str) -> Result<WatchLine, WatchLineError> {
    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (command, ""),
    };

    match name {
        "log" if argument.is_empty() => Err(WatchLineError::MissingArgument("log")),
        "log" => Ok(WatchLine::LogLevel(argument.to_string())),
        "logfile" if argument.is_empty() => Err(WatchLineError::MissingArgument("logfile")),
        "logfile" if argument == "off" => Ok(WatchLine::LogFile(None)),
        "logfile" => Ok(WatchLine::LogFile(Some(PathBuf::from(argument)))),
        other => Err(WatchLineError::UnknownCommand(other.to_string())),
    }
}

fn parse_salary_line(line: &str) -> Result<Option<WatchLine>, WatchLineError> {
    let mut fields = line.split_whitespace();
    let Some(gross) = fields.next() else {
        return Ok(None);
    };
    let gross = parse_money(gross)?;

    let dependents = match fields.next() {
        Some(field) => field
            .parse()
            .map_err(|_| WatchLineError::Dependents(field.to_string()))?,
        None => 0,
    };

    if let Some(extra) = fields.next() {
        return Err(WatchLineError::Trailing(extra.to_string()));
    }

    Ok(Some(WatchLine::Salary { gross, dependents }))
}

/// Formats `value` as Brazilian currency, e.g. `R$ 1.234,56`.
pub fn format_brl(value: Decimal) -> String {
    let rounded = round_half_up(value.abs());
    let text = format!("{rounded:.2}");
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}R$ {grouped},{cents}")
}
