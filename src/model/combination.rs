use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order-independent lookup key for one pairing.
///
/// Always constructed through `logic::canonicalize`, which guarantees
/// `low <= high` under byte-wise string ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CanonicalPair {
    pub low: String,
    pub high: String,
}

impl CanonicalPair {
    pub(crate) fn from_sorted(low: String, high: String) -> Self {
        debug_assert!(low <= high);
        Self { low, high }
    }

    pub fn as_tuple(&self) -> (&str, &str) {
        (&self.low, &self.high)
    }
}

impl std::fmt::Display for CanonicalPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} + {}", self.low, self.high)
    }
}

/// One resolved pairing as persisted in the `combinations` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationRecord {
    pub element_a: String,
    pub element_b: String,
    pub result_label: String,
    pub created_at: DateTime<Utc>,
}

impl CombinationRecord {
    pub fn new(pair: &CanonicalPair, result_label: impl Into<String>) -> Self {
        Self {
            element_a: pair.low.clone(),
            element_b: pair.high.clone(),
            result_label: result_label.into(),
            created_at: Utc::now(),
        }
    }

    pub fn key(&self) -> CanonicalPair {
        CanonicalPair {
            low: self.element_a.clone(),
            high: self.element_b.clone(),
        }
    }
}

/// Result of an insert-if-absent write.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(CombinationRecord),
    /// The pair was already stored; carries the stored record.
    AlreadyPresent(CombinationRecord),
}

impl InsertOutcome {
    pub fn was_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }

    pub fn record(&self) -> &CombinationRecord {
        match self {
            InsertOutcome::Inserted(record) | InsertOutcome::AlreadyPresent(record) => record,
        }
    }

    pub fn into_record(self) -> CombinationRecord {
        match self {
            InsertOutcome::Inserted(record) | InsertOutcome::AlreadyPresent(record) => record,
        }
    }
}

/// How a `resolve` call produced its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionSource {
    /// Served from the store without consulting the oracle.
    Cached,
    /// Oracle answered and this call's record was persisted.
    Computed,
    /// Oracle answered but a racing request had already stored the pair;
    /// the stored label was returned.
    Converged,
    /// Oracle answered but the write failed; label returned uncached.
    Uncached,
    /// Oracle or store failed transiently; the unresolvable sentinel was returned.
    Unresolvable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub label: String,
    pub source: ResolutionSource,
}

impl Resolution {
    pub fn new(label: impl Into<String>, source: ResolutionSource) -> Self {
        Self {
            label: label.into(),
            source,
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(
            self.source,
            ResolutionSource::Cached | ResolutionSource::Computed | ResolutionSource::Converged
        )
    }
}
