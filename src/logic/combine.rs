use anyhow::Result;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::{CombineError, OracleError};
use crate::logic::canonical::{canonicalize, normalize_label};
use crate::logic::validate::ResultValidator;
use crate::model::{CanonicalPair, CombinationRecord, InsertOutcome, Resolution, ResolutionSource, Sentinels};
use crate::oracle::{Oracle, PromptTemplate};
use crate::store::traits::Store;

const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolves pairings through the store, consulting the oracle only on a miss.
///
/// Concurrent misses for the same pair may each call the oracle; the store's
/// insert-if-absent keeps one record and every caller receives that record's
/// label. No lock is held across the oracle call.
pub struct CombinationCache<S: Store> {
    store: Arc<S>,
    oracle: Arc<dyn Oracle>,
    validator: ResultValidator,
    prompt: PromptTemplate,
    oracle_timeout: Duration,
}

impl<S: Store> CombinationCache<S> {
    pub fn new(store: Arc<S>, oracle: Arc<dyn Oracle>) -> Self {
        Self {
            store,
            oracle,
            validator: ResultValidator::default(),
            prompt: PromptTemplate::default(),
            oracle_timeout: DEFAULT_ORACLE_TIMEOUT,
        }
    }

    pub fn from_config(store: Arc<S>, oracle: Arc<dyn Oracle>, config: &AppConfig) -> Result<Self> {
        Ok(Self::new(store, oracle)
            .with_validator(ResultValidator::new(config.sentinels.clone()))
            .with_prompt(config.oracle.prompt()?)
            .with_oracle_timeout(config.oracle.timeout()))
    }

    pub fn with_validator(mut self, validator: ResultValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout = timeout;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sentinels(&self) -> &Sentinels {
        self.validator.sentinels()
    }

    /// Resolve a pairing to its result label.
    ///
    /// Only invalid input is an error; oracle and store failures collapse into
    /// the unresolvable sentinel.
    pub async fn resolve(&self, first: &str, second: &str) -> Result<String, CombineError> {
        Ok(self.resolve_detailed(first, second).await?.label)
    }

    pub async fn resolve_detailed(&self, first: &str, second: &str) -> Result<Resolution, CombineError> {
        let key = canonicalize(first, second)?;

        match self.store.get_combination(&key).await {
            Ok(Some(record)) => {
                debug!("Cache hit for {}: {}", key, record.result_label);
                return Ok(Resolution::new(record.result_label, ResolutionSource::Cached));
            }
            Ok(None) => {}
            Err(e) => {
                error!("Failed to read combination {} from store: {:#}", key, e);
                return Ok(self.unresolvable());
            }
        }

        let raw = match self.ask_oracle(first, second).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Oracle {} failed for {}: {}", self.oracle.name(), key, e);
                return Ok(self.unresolvable());
            }
        };

        let label = self.validator.validate(&raw);
        Ok(self.persist(&key, label).await)
    }

    async fn ask_oracle(&self, first: &str, second: &str) -> Result<String, OracleError> {
        // The oracle sees the caller's order, not the sorted key.
        let prompt = self.prompt.render(&normalize_label(first), &normalize_label(second));
        info!(
            "Calling oracle {} for: {} and {}",
            self.oracle.name(),
            normalize_label(first),
            normalize_label(second)
        );

        tokio::time::timeout(self.oracle_timeout, self.oracle.generate(&prompt))
            .await
            .map_err(|_| OracleError::Timeout(self.oracle_timeout))?
    }

    async fn persist(&self, key: &CanonicalPair, label: String) -> Resolution {
        let record = CombinationRecord::new(key, label.clone());

        match self.store.insert_if_absent(record).await {
            Ok(InsertOutcome::Inserted(record)) => {
                info!("Cached {} = {}", key, record.result_label);
                Resolution::new(record.result_label, ResolutionSource::Computed)
            }
            Ok(InsertOutcome::AlreadyPresent(existing)) => {
                if existing.result_label != label {
                    warn!(
                        "Concurrent resolution of {} stored {:?}; discarding {:?}",
                        key, existing.result_label, label
                    );
                }
                Resolution::new(existing.result_label, ResolutionSource::Converged)
            }
            Err(e) => {
                warn!("Failed to store combination {}: {:#}", key, e);
                Resolution::new(label, ResolutionSource::Uncached)
            }
        }
    }

    fn unresolvable(&self) -> Resolution {
        Resolution::new(
            self.sentinels().unresolvable.clone(),
            ResolutionSource::Unresolvable,
        )
    }
}
