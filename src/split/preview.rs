//! Comparison of lines found on a new bill with lines already saved

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::traits::KnownLine;
use crate::types::*;

/// Number printed for lines the bill does not identify
pub const UNKNOWN_NUMBER: &str = "Unknown";

/// One extracted line and whether it is already known
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePreview {
    /// Composite `name|device|number` key of the extracted record
    pub unique_key: String,
    pub name: String,
    pub number: String,
    pub device: String,
    pub charge: BigDecimal,
    /// A saved line has the same name and number
    pub exists: bool,
    /// Id of that saved line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Preview of every extracted line against the saved ones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinesPreview {
    pub lines: Vec<LinePreview>,
    pub existing_lines_count: usize,
    pub new_lines_count: usize,
    pub total_charge: BigDecimal,
    pub account_wide_value: BigDecimal,
}

fn name_number_key(name: &str, number: &str) -> String {
    format!("{}|{}", name, number)
}

/// Match extracted records to saved lines on name and number
pub fn preview_lines(extraction: &BillExtractionResult, known: &[KnownLine]) -> LinesPreview {
    let known_by_key: HashMap<String, &KnownLine> = known
        .iter()
        .map(|line| (name_number_key(&line.name, &line.number), line))
        .collect();

    let lines: Vec<LinePreview> = extraction
        .lines
        .iter()
        .map(|(unique_key, record)| {
            let existing = if record.number == UNKNOWN_NUMBER {
                None
            } else {
                known_by_key.get(&name_number_key(&record.name, &record.number))
            };

            LinePreview {
                unique_key: unique_key.clone(),
                name: record.name.clone(),
                number: record.number.clone(),
                device: record.device.clone(),
                charge: record.amount.clone(),
                exists: existing.is_some(),
                id: existing.map(|line| line.id.clone()),
            }
        })
        .collect();

    let existing_lines_count = lines.iter().filter(|line| line.exists).count();

    LinesPreview {
        new_lines_count: lines.len() - existing_lines_count,
        existing_lines_count,
        total_charge: extraction.total_line_charges(),
        account_wide_value: extraction.account_wide_amount.clone(),
        lines,
    }
}
