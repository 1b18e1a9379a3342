use crate::model::{CanonicalPair, CombinationRecord, InsertOutcome};
use anyhow::Result;

#[async_trait::async_trait]
pub trait CombinationStore: Send + Sync {
    /// Get the record stored for a canonical pair
    async fn get_combination(&self, key: &CanonicalPair) -> Result<Option<CombinationRecord>>;
    /// Insert the record unless its pair is already stored.
    /// Never overwrites; the outcome carries whichever record survives.
    async fn insert_if_absent(&self, record: CombinationRecord) -> Result<InsertOutcome>;
    /// List records ordered by (element_a, element_b)
    async fn list_combinations(&self, limit: Option<usize>) -> Result<Vec<CombinationRecord>>;
    async fn count_combinations(&self) -> Result<u64>;
}

pub trait Store: CombinationStore + Send + Sync {}
