//! File and environment configuration for a bill split

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::*;
use crate::utils::validation::{validate_group_mapping, validate_transfer_adjustment};

/// Environment variable that overrides the stored account-wide policy
pub const POLICY_ENV_VAR: &str = "BILL_SPLIT_POLICY";

/// Mapping, adjustments and policy for one account
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SplitConfig {
    pub mapping: GroupMapping,
    #[serde(default)]
    pub adjustments: Vec<TransferAdjustment>,
    /// Raw policy value: `none`, `evenly`, or a fixed amount
    #[serde(default)]
    pub policy: String,
}

impl SplitConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> SplitResult<Self> {
        let config: SplitConfig = serde_json::from_str(json)
            .map_err(|e| SplitError::Config(format!("invalid split config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> SplitResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SplitError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Replace the policy with `BILL_SPLIT_POLICY` when it is set
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(policy) = std::env::var(POLICY_ENV_VAR) {
            self.policy = policy;
        }
        self
    }

    /// Interpreted account-wide policy
    pub fn policy(&self) -> ReconciliationPolicy {
        ReconciliationPolicy::from_raw(&self.policy)
    }

    /// Check mapping and adjustments
    pub fn validate(&self) -> SplitResult<()> {
        validate_group_mapping(&self.mapping)?;
        for adjustment in &self.adjustments {
            validate_transfer_adjustment(adjustment)?;
        }
        Ok(())
    }
}
