//! Per-group breakdown text, as embedded in the monthly bill message

use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Output flavour of a breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BreakdownFormat {
    #[default]
    PlainText,
    Html,
}

impl BreakdownFormat {
    fn line_break(&self) -> &'static str {
        match self {
            BreakdownFormat::PlainText => "\n",
            BreakdownFormat::Html => "<br/>",
        }
    }
}

/// Round a currency amount to cents, halves away from zero
pub fn round_to_cents(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfUp)
}

/// Format an amount as dollars and cents, e.g. `$12.50` or `$-3.00`
pub fn format_currency(amount: &BigDecimal) -> String {
    format!("${}", round_to_cents(amount))
}

/// Rendered per-group breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    /// `(group, rounded amount)` rows in group order
    pub rows: Vec<(String, BigDecimal)>,
    /// Sum of the unrounded totals, rounded to cents
    pub total: BigDecimal,
    /// Rows joined with the format's line break
    pub text: String,
}

/// Render one `group: $amount` row per group
pub fn render_breakdown(totals: &GroupTotals, format: BreakdownFormat) -> Breakdown {
    let rows: Vec<(String, BigDecimal)> = totals
        .iter()
        .map(|(group, total)| (group.to_string(), round_to_cents(total)))
        .collect();

    let text = rows
        .iter()
        .map(|(group, amount)| format!("{}: ${}{}", group, amount, format.line_break()))
        .collect::<String>();

    Breakdown {
        rows,
        total: round_to_cents(&totals.grand_total()),
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn totals() -> GroupTotals {
        let mapping = GroupMapping::new().with_group("Savti").with_group("Papa");
        let mut totals = GroupTotals::for_mapping(&mapping);
        totals.credit("Savti", &BigDecimal::from_str("33.335").unwrap());
        totals.credit("Papa", &BigDecimal::from_str("12.5").unwrap());
        totals
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(
            round_to_cents(&BigDecimal::from_str("2.345").unwrap()).to_string(),
            "2.35"
        );
        assert_eq!(round_to_cents(&BigDecimal::from(25)).to_string(), "25.00");
        assert_eq!(format_currency(&BigDecimal::from_str("-3").unwrap()), "$-3.00");
    }

    #[test]
    fn test_plain_text_breakdown() {
        let breakdown = render_breakdown(&totals(), BreakdownFormat::PlainText);
        assert_eq!(breakdown.text, "Savti: $33.34\nPapa: $12.50\n");
        assert_eq!(breakdown.total.to_string(), "45.84");
        assert_eq!(breakdown.rows.len(), 2);
    }

    #[test]
    fn test_html_breakdown() {
        let breakdown = render_breakdown(&totals(), BreakdownFormat::Html);
        assert_eq!(breakdown.text, "Savti: $33.34<br/>Papa: $12.50<br/>");
    }
}
