//! Core types and data structures for bill extraction and group reconciliation

use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Label that marks the account-wide charge in the bill text
pub const ACCOUNT_WIDE_LABEL: &str = "Account-wide charges & credits";

/// Identity of an extracted line: name, device and number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub name: String,
    pub device: String,
    pub number: String,
}

impl LineKey {
    /// Create a new line key
    pub fn new(name: String, device: String, number: String) -> Self {
        Self {
            name,
            device,
            number,
        }
    }
}

impl std::fmt::Display for LineKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}|{}", self.name, self.device, self.number)
    }
}

/// One billed line item recovered from the bill text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChargeRecord {
    /// Line holder name as printed above the amount
    pub name: String,
    /// Device description printed below the amount
    pub device: String,
    /// Phone number exactly as matched in the text
    pub number: String,
    /// Charge for the line
    #[serde(rename = "charge", deserialize_with = "deserialize_amount")]
    pub amount: BigDecimal,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Text(String),
    Number(serde_json::Number),
}

/// Read an amount from a decimal string or a JSON number
///
/// Numbers are parsed from their shortest decimal rendering, so `0.1`
/// becomes exactly `0.1` rather than the nearest binary float.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match AmountRepr::deserialize(deserializer)? {
        AmountRepr::Text(text) => text,
        AmountRepr::Number(number) => number.to_string(),
    };
    BigDecimal::from_str(text.trim()).map_err(serde::de::Error::custom)
}

impl LineChargeRecord {
    /// Create a new line charge record
    pub fn new(name: String, device: String, number: String, amount: BigDecimal) -> Self {
        Self {
            name,
            device,
            number,
            amount,
        }
    }

    /// Identity key of this record
    pub fn key(&self) -> LineKey {
        LineKey::new(self.name.clone(), self.device.clone(), self.number.clone())
    }

    /// Composite `name|device|number` key used to deduplicate records
    pub fn composite_key(&self) -> String {
        self.key().to_string()
    }
}

/// Everything the extractor recovers from one bill
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BillExtractionResult {
    /// Last account-wide amount seen in the document, zero if never seen
    pub account_wide_amount: BigDecimal,
    /// Line records keyed by composite key, in first-seen order
    pub lines: IndexMap<String, LineChargeRecord>,
}

impl BillExtractionResult {
    /// Create an empty extraction result
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record, replacing any earlier record with the same key
    pub fn upsert(&mut self, record: LineChargeRecord) {
        self.lines.insert(record.composite_key(), record);
    }

    /// Iterate over the extracted records
    pub fn records(&self) -> impl Iterator<Item = &LineChargeRecord> {
        self.lines.values()
    }

    /// Sum of all extracted line charges
    pub fn total_line_charges(&self) -> BigDecimal {
        self.lines.values().map(|record| &record.amount).sum()
    }

    /// Flatten into the transport shape
    pub fn to_payload(&self) -> ExtractionPayload {
        ExtractionPayload {
            account_wide_value: self.account_wide_amount.clone(),
            lines: self.lines.values().cloned().collect(),
        }
    }
}

/// Transport shape of an extraction result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionPayload {
    #[serde(deserialize_with = "deserialize_amount")]
    pub account_wide_value: BigDecimal,
    pub lines: Vec<LineChargeRecord>,
}

impl From<ExtractionPayload> for BillExtractionResult {
    fn from(payload: ExtractionPayload) -> Self {
        let mut result = BillExtractionResult {
            account_wide_amount: payload.account_wide_value,
            lines: IndexMap::new(),
        };
        for record in payload.lines {
            result.upsert(record);
        }
        result
    }
}

/// Assignment of one line to a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMappingEntry {
    /// Group (family) the line belongs to
    pub group: String,
    /// Stable id of the line, referenced by transfer adjustments
    pub line_id: String,
    /// Line holder name as it appears on the bill
    pub line_name: String,
    /// Phone number as it appears on the bill
    pub line_number: String,
    /// Device, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl GroupMappingEntry {
    /// Create a new mapping entry
    pub fn new(group: &str, line_id: &str, line_name: &str, line_number: &str) -> Self {
        Self {
            group: group.to_string(),
            line_id: line_id.to_string(),
            line_name: line_name.to_string(),
            line_number: line_number.to_string(),
            device: None,
        }
    }

    /// Attach the device description
    pub fn with_device(mut self, device: &str) -> Self {
        self.device = Some(device.to_string());
        self
    }

    /// Whether an extracted record belongs to this line (name and number only)
    pub fn matches(&self, record: &LineChargeRecord) -> bool {
        record.name == self.line_name && record.number == self.line_number
    }
}

/// Externally supplied assignment of lines to groups
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "GroupMappingRepr")]
pub struct GroupMapping {
    /// Groups declared without lines
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    groups: Vec<String>,
    /// Line assignments, in the order supplied
    #[serde(default)]
    entries: Vec<GroupMappingEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GroupMappingRepr {
    Entries(Vec<GroupMappingEntry>),
    Full {
        #[serde(default)]
        groups: Vec<String>,
        #[serde(default)]
        entries: Vec<GroupMappingEntry>,
    },
}

impl From<GroupMappingRepr> for GroupMapping {
    fn from(repr: GroupMappingRepr) -> Self {
        match repr {
            GroupMappingRepr::Entries(entries) => Self {
                groups: Vec::new(),
                entries,
            },
            GroupMappingRepr::Full { groups, entries } => Self { groups, entries },
        }
    }
}

impl GroupMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapping from line assignments
    pub fn from_entries(entries: Vec<GroupMappingEntry>) -> Self {
        Self {
            groups: Vec::new(),
            entries,
        }
    }

    /// Declare a group that may have no lines yet
    pub fn with_group(mut self, group: &str) -> Self {
        self.declare_group(group);
        self
    }

    /// Add a line assignment
    pub fn with_entry(mut self, entry: GroupMappingEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Declare a group that may have no lines yet
    pub fn declare_group(&mut self, group: &str) {
        if !self.groups.iter().any(|g| g == group) {
            self.groups.push(group.to_string());
        }
    }

    /// Add a line assignment
    pub fn add_entry(&mut self, entry: GroupMappingEntry) {
        self.entries.push(entry);
    }

    /// Line assignments in supplied order
    pub fn entries(&self) -> &[GroupMappingEntry] {
        &self.entries
    }

    /// Groups declared without lines
    pub fn declared_groups(&self) -> &[String] {
        &self.groups
    }

    /// Distinct group names in first-appearance order
    pub fn group_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let all = self
            .groups
            .iter()
            .map(String::as_str)
            .chain(self.entries.iter().map(|e| e.group.as_str()));
        for name in all {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Number of distinct group names
    pub fn group_count(&self) -> usize {
        self.group_names().len()
    }

    /// Group owning the given line id; the first assignment wins
    pub fn owning_group(&self, line_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.line_id == line_id)
            .map(|e| e.group.as_str())
    }

    /// Whether no group is configured at all
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.entries.is_empty()
    }
}

/// Manual amount moved from one line's group to another's
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferAdjustment {
    /// Store-assigned id, absent for adjustments built in memory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Amount to move, always positive
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: BigDecimal,
    /// Line whose group pays less
    #[serde(rename = "line_from")]
    pub line_id_from: String,
    /// Line whose group pays more
    #[serde(rename = "line_to")]
    pub line_id_to: String,
}

impl TransferAdjustment {
    /// Create a new transfer adjustment
    pub fn new(amount: BigDecimal, line_id_from: &str, line_id_to: &str) -> Self {
        Self {
            id: None,
            amount,
            line_id_from: line_id_from.to_string(),
            line_id_to: line_id_to.to_string(),
        }
    }
}

/// Rule for distributing the account-wide amount across groups
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReconciliationPolicy {
    /// Leave the account-wide amount undistributed
    #[default]
    None,
    /// Split the extracted account-wide amount evenly across groups
    Evenly,
    /// Split a configured amount evenly; the raw value is parsed when applied
    FixedAmount(String),
}

impl ReconciliationPolicy {
    /// Interpret a stored policy value
    ///
    /// Empty and `none` mean no distribution and `evenly` selects the
    /// extracted amount. Anything else is kept verbatim as a fixed amount.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            ReconciliationPolicy::None
        } else if trimmed.eq_ignore_ascii_case("evenly") {
            ReconciliationPolicy::Evenly
        } else {
            ReconciliationPolicy::FixedAmount(raw.to_string())
        }
    }

    /// Stored representation of the policy
    pub fn as_raw(&self) -> String {
        match self {
            ReconciliationPolicy::None => "none".to_string(),
            ReconciliationPolicy::Evenly => "evenly".to_string(),
            ReconciliationPolicy::FixedAmount(raw) => raw.clone(),
        }
    }
}

impl From<String> for ReconciliationPolicy {
    fn from(raw: String) -> Self {
        Self::from_raw(&raw)
    }
}

impl From<ReconciliationPolicy> for String {
    fn from(policy: ReconciliationPolicy) -> Self {
        policy.as_raw()
    }
}

/// Running and final totals per group, in mapping order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupTotals(IndexMap<String, BigDecimal>);

impl GroupTotals {
    /// Zero totals for every distinct group in the mapping
    pub fn for_mapping(mapping: &GroupMapping) -> Self {
        Self(
            mapping
                .group_names()
                .into_iter()
                .map(|name| (name.to_string(), BigDecimal::from(0)))
                .collect(),
        )
    }

    /// Total for a group
    pub fn get(&self, group: &str) -> Option<&BigDecimal> {
        self.0.get(group)
    }

    /// Add to a group's total; unknown groups are ignored
    pub fn credit(&mut self, group: &str, amount: &BigDecimal) {
        if let Some(total) = self.0.get_mut(group) {
            *total += amount;
        }
    }

    /// Subtract from a group's total; unknown groups are ignored
    pub fn debit(&mut self, group: &str, amount: &BigDecimal) {
        if let Some(total) = self.0.get_mut(group) {
            *total -= amount;
        }
    }

    /// Add the same amount to every group
    pub fn credit_all(&mut self, amount: &BigDecimal) {
        for total in self.0.values_mut() {
            *total += amount;
        }
    }

    /// Sum across all groups
    pub fn grand_total(&self) -> BigDecimal {
        self.0.values().sum()
    }

    /// Iterate over `(group, total)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BigDecimal)> {
        self.0.iter().map(|(group, total)| (group.as_str(), total))
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no groups
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Errors raised at the boundary around the extraction and reconciliation core
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Incomplete configuration: {0}")]
    IncompleteConfiguration(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type for boundary operations
pub type SplitResult<T> = Result<T, SplitError>;
