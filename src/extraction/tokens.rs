//! Recognition of currency amounts and phone numbers in single text lines

use bigdecimal::BigDecimal;
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

fn currency_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?\$\d").expect("currency pattern"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("phone pattern")
    })
}

/// Classification of a single trimmed line as a possible amount
#[derive(Debug, Clone, PartialEq)]
pub enum AmountToken {
    /// The line does not look like a currency amount
    NotCurrency,
    /// The line looks like an amount but the number cannot be read
    Malformed,
    /// A readable amount
    Amount(BigDecimal),
}

/// Whether a trimmed line has the shape of a dollar amount
///
/// Accepts `$12.50`, `$1,234.00` and negative `-$5.00`.
pub fn is_currency_shaped(line: &str) -> bool {
    line.starts_with('$') || currency_pattern().is_match(line)
}

/// Read a dollar amount, dropping the `$` sign and thousands separators
pub fn parse_currency(token: &str) -> Option<BigDecimal> {
    let cleaned: String = token
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    BigDecimal::from_str(cleaned.trim()).ok()
}

/// Classify a raw text line
pub fn classify_amount(line: &str) -> AmountToken {
    let trimmed = line.trim();
    if !is_currency_shaped(trimmed) {
        return AmountToken::NotCurrency;
    }

    match parse_currency(trimmed) {
        Some(amount) => AmountToken::Amount(amount),
        None => AmountToken::Malformed,
    }
}

/// First phone-number-shaped substring of a line
pub fn find_phone_number(line: &str) -> Option<&str> {
    phone_pattern().find(line).map(|m| m.as_str())
}
