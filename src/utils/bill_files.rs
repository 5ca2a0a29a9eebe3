//! Picking the most recent downloaded bill by its file name

use chrono::NaiveDate;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn bill_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"MyBill_(\d{2})\.(\d{2})\.(\d{4})\.pdf").expect("bill name pattern")
    })
}

/// Statement date encoded in a `MyBill_MM.DD.YYYY.pdf` file name
///
/// Returns `None` for other names and for impossible dates.
pub fn bill_date(file_name: &str) -> Option<NaiveDate> {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_name);
    let captures = bill_name_pattern().captures(base)?;

    let month: u32 = captures[1].parse().ok()?;
    let day: u32 = captures[2].parse().ok()?;
    let year: i32 = captures[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The file with the latest statement date, ignoring names that do not parse
pub fn select_latest_bill<'a, I>(file_names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    file_names
        .into_iter()
        .filter_map(|name| bill_date(name).map(|date| (date, name)))
        .max_by_key(|(date, _)| *date)
        .map(|(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_date() {
        assert_eq!(
            bill_date("bills/MyBill_03.14.2025.pdf"),
            NaiveDate::from_ymd_opt(2025, 3, 14)
        );
        assert_eq!(bill_date("MyBill_02.30.2025.pdf"), None);
        assert_eq!(bill_date("statement.pdf"), None);
    }

    #[test]
    fn test_select_latest_bill() {
        let names = vec![
            "MyBill_12.01.2024.pdf",
            "MyBill_01.15.2025.pdf",
            "MyBill_13.01.2025.pdf",
            "notes.txt",
            "MyBill_11.20.2024.pdf",
        ];
        assert_eq!(select_latest_bill(names), Some("MyBill_01.15.2025.pdf"));
        assert_eq!(select_latest_bill(vec!["notes.txt"]), None);
    }
}
