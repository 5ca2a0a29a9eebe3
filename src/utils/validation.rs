//! Validation utilities for externally supplied configuration

use bigdecimal::BigDecimal;

use crate::types::*;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> SplitResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(SplitError::Validation(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a group name is usable
pub fn validate_group_name(group: &str) -> SplitResult<()> {
    if group.trim().is_empty() {
        return Err(SplitError::Validation(
            "Group name cannot be empty".to_string(),
        ));
    }

    if group.len() > 100 {
        return Err(SplitError::Validation(
            "Group name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a line id is usable
pub fn validate_line_id(line_id: &str) -> SplitResult<()> {
    if line_id.trim().is_empty() {
        return Err(SplitError::Validation(
            "Line id cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validate every group and line assignment of a mapping
pub fn validate_group_mapping(mapping: &GroupMapping) -> SplitResult<()> {
    for group in mapping.declared_groups() {
        validate_group_name(group)?;
    }

    for entry in mapping.entries() {
        validate_group_name(&entry.group)?;
        validate_line_id(&entry.line_id)?;
        if entry.line_name.trim().is_empty() {
            return Err(SplitError::Validation(format!(
                "Line '{}' has no name",
                entry.line_id
            )));
        }
    }

    Ok(())
}

/// Validate a transfer adjustment before it is stored
pub fn validate_transfer_adjustment(adjustment: &TransferAdjustment) -> SplitResult<()> {
    validate_positive_amount(&adjustment.amount)?;
    validate_line_id(&adjustment.line_id_from)?;
    validate_line_id(&adjustment.line_id_to)?;
    Ok(())
}
