//! In-memory configuration store for testing

use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::traits::*;
use crate::types::*;
use crate::utils::validation::{validate_group_mapping, validate_transfer_adjustment};

/// In-memory store implementation for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    mapping: Arc<RwLock<GroupMapping>>,
    adjustments: Arc<RwLock<IndexMap<String, TransferAdjustment>>>,
    policy: Arc<RwLock<ReconciliationPolicy>>,
    lines: Arc<RwLock<IndexMap<String, KnownLine>>>,
}

fn read<T>(lock: &RwLock<T>) -> SplitResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| SplitError::Storage("memory store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> SplitResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| SplitError::Storage("memory store lock poisoned".to_string()))
}

impl MemoryConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with a mapping and policy
    pub fn with_config(mapping: GroupMapping, policy: ReconciliationPolicy) -> Self {
        Self {
            mapping: Arc::new(RwLock::new(mapping)),
            policy: Arc::new(RwLock::new(policy)),
            ..Self::default()
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> SplitResult<()> {
        *write(&self.mapping)? = GroupMapping::new();
        write(&self.adjustments)?.clear();
        *write(&self.policy)? = ReconciliationPolicy::None;
        write(&self.lines)?.clear();
        Ok(())
    }
}

#[async_trait]
impl BillConfigStore for MemoryConfigStore {
    async fn group_mapping(&self) -> SplitResult<GroupMapping> {
        Ok(read(&self.mapping)?.clone())
    }

    async fn save_group_mapping(&mut self, mapping: &GroupMapping) -> SplitResult<()> {
        validate_group_mapping(mapping)?;
        *write(&self.mapping)? = mapping.clone();
        Ok(())
    }

    async fn transfer_adjustments(&self) -> SplitResult<Vec<TransferAdjustment>> {
        Ok(read(&self.adjustments)?.values().cloned().collect())
    }

    async fn add_transfer_adjustment(
        &mut self,
        adjustment: &TransferAdjustment,
    ) -> SplitResult<String> {
        validate_transfer_adjustment(adjustment)?;
        let id = uuid::Uuid::new_v4().to_string();
        let mut stored = adjustment.clone();
        stored.id = Some(id.clone());
        write(&self.adjustments)?.insert(id.clone(), stored);
        Ok(id)
    }

    async fn delete_transfer_adjustment(&mut self, adjustment_id: &str) -> SplitResult<()> {
        if write(&self.adjustments)?.shift_remove(adjustment_id).is_some() {
            Ok(())
        } else {
            Err(SplitError::NotFound(format!(
                "transfer adjustment {}",
                adjustment_id
            )))
        }
    }

    async fn reconciliation_policy(&self) -> SplitResult<ReconciliationPolicy> {
        Ok(read(&self.policy)?.clone())
    }

    async fn save_reconciliation_policy(
        &mut self,
        policy: &ReconciliationPolicy,
    ) -> SplitResult<()> {
        *write(&self.policy)? = policy.clone();
        Ok(())
    }

    async fn known_lines(&self) -> SplitResult<Vec<KnownLine>> {
        Ok(read(&self.lines)?.values().cloned().collect())
    }

    async fn save_known_line(&mut self, line: &KnownLine) -> SplitResult<()> {
        if line.id.trim().is_empty() {
            return Err(SplitError::Validation("Line id cannot be empty".to_string()));
        }
        write(&self.lines)?.insert(line.id.clone(), line.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    #[tokio::test]
    async fn test_adjustments_keep_insertion_order() {
        let mut store = MemoryConfigStore::new();
        let first = store
            .add_transfer_adjustment(&TransferAdjustment::new(BigDecimal::from(7), "1", "2"))
            .await
            .unwrap();
        store
            .add_transfer_adjustment(&TransferAdjustment::new(BigDecimal::from(3), "2", "1"))
            .await
            .unwrap();

        let adjustments = store.transfer_adjustments().await.unwrap();
        assert_eq!(adjustments.len(), 2);
        assert_eq!(adjustments[0].id.as_deref(), Some(first.as_str()));
        assert_eq!(adjustments[1].amount, BigDecimal::from(3));

        store.delete_transfer_adjustment(&first).await.unwrap();
        assert_eq!(store.transfer_adjustments().await.unwrap().len(), 1);
        assert!(matches!(
            store.delete_transfer_adjustment(&first).await,
            Err(SplitError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_non_positive_adjustment() {
        let mut store = MemoryConfigStore::new();
        let result = store
            .add_transfer_adjustment(&TransferAdjustment::new(BigDecimal::from(0), "1", "2"))
            .await;
        assert!(matches!(result, Err(SplitError::Validation(_))));
    }

    #[tokio::test]
    async fn test_policy_defaults_to_none() {
        let mut store = MemoryConfigStore::new();
        assert_eq!(
            store.reconciliation_policy().await.unwrap(),
            ReconciliationPolicy::None
        );

        store
            .save_reconciliation_policy(&ReconciliationPolicy::Evenly)
            .await
            .unwrap();
        assert_eq!(
            store.reconciliation_policy().await.unwrap(),
            ReconciliationPolicy::Evenly
        );

        store.clear().unwrap();
        assert_eq!(
            store.reconciliation_policy().await.unwrap(),
            ReconciliationPolicy::None
        );
    }
}
