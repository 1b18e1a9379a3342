use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::OracleError;
use crate::model::{CanonicalPair, CombinationRecord, InsertOutcome};
use crate::oracle::Oracle;
use crate::store::{CombinationStore, MemoryStore, Store};

/// Oracle that replays queued answers and counts calls.
/// An exhausted queue answers with `EmptyResponse`.
#[derive(Default)]
pub struct ScriptedOracle {
    answers: Mutex<VecDeque<Result<String, OracleError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(answers: &[&str]) -> Self {
        let oracle = Self::new();
        for answer in answers {
            oracle.push_ok(answer);
        }
        oracle
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_ok(&self, answer: &str) {
        self.answers.lock().push_back(Ok(answer.to_string()));
    }

    pub fn push_err(&self, err: OracleError) {
        self.answers.lock().push_back(Err(err));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());
        let answer = self
            .answers
            .lock()
            .pop_front()
            .unwrap_or(Err(OracleError::EmptyResponse));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        answer
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Memory store whose reads or writes can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CombinationStore for FlakyStore {
    async fn get_combination(&self, key: &CanonicalPair) -> anyhow::Result<Option<CombinationRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("store unavailable");
        }
        self.inner.get_combination(key).await
    }

    async fn insert_if_absent(&self, record: CombinationRecord) -> anyhow::Result<InsertOutcome> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("store rejected write");
        }
        self.inner.insert_if_absent(record).await
    }

    async fn list_combinations(&self, limit: Option<usize>) -> anyhow::Result<Vec<CombinationRecord>> {
        self.inner.list_combinations(limit).await
    }

    async fn count_combinations(&self) -> anyhow::Result<u64> {
        self.inner.count_combinations().await
    }
}

impl Store for FlakyStore {}
