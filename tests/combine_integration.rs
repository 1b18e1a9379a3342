use async_trait::async_trait;
use chemcraft::config::CorsConfig;
use chemcraft::routes::build_app;
use chemcraft::{
    canonicalize, CombinationCache, CombinationStore, MemoryStore, Oracle, OracleError,
    DEFAULT_NO_REACTION, DEFAULT_UNRESOLVABLE,
};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Answers from a fixed table keyed by the two labels in the prompt;
/// pairs listed in `failing` time out once before succeeding.
struct TableOracle {
    answers: HashMap<(String, String), String>,
    failing: Mutex<Vec<(String, String)>>,
    calls: AtomicUsize,
}

impl TableOracle {
    fn new(answers: &[(&str, &str, &str)], failing: &[(&str, &str)]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(a, b, r)| ((a.to_string(), b.to_string()), r.to_string()))
                .collect(),
            failing: Mutex::new(
                failing
                    .iter()
                    .map(|(a, b)| (a.to_string(), b.to_string()))
                    .collect(),
            ),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Oracle for TableOracle {
    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (first, second) = prompt
            .split_once('|')
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .ok_or(OracleError::EmptyResponse)?;

        {
            let mut failing = self.failing.lock().unwrap();
            if let Some(pos) = failing
                .iter()
                .position(|p| *p == (first.clone(), second.clone()) || *p == (second.clone(), first.clone()))
            {
                failing.remove(pos);
                return Err(OracleError::Timeout(std::time::Duration::from_secs(60)));
            }
        }

        self.answers
            .get(&(first.clone(), second.clone()))
            .or_else(|| self.answers.get(&(second, first)))
            .cloned()
            .ok_or(OracleError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "table"
    }
}

// Test client wrapper for making API calls
struct TestClient {
    client: Client,
    base_url: String,
}

impl TestClient {
    fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn post(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
    }

    async fn combine(&self, first: &str, second: &str) -> String {
        let response = self
            .post("/", json!({ "first": first, "second": second }))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        body["result"].as_str().unwrap().to_string()
    }
}

async fn spawn_server(
    oracle: Arc<TableOracle>,
) -> (TestClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let cache = CombinationCache::new(store.clone(), oracle)
        .with_prompt(chemcraft::PromptTemplate::new("{first}|{second}").unwrap());
    let app = build_app(Arc::new(cache), &CorsConfig::default()).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (TestClient::new(format!("http://{}", addr)), store)
}

#[tokio::test]
async fn test_combination_workflow() {
    let oracle = Arc::new(TableOracle::new(
        &[
            ("H", "O", "H2O"),
            ("He", "Ne", "No reaction"),
            ("H2O2", "MnO2", "H2O + O2"),
            ("X", "Y", "XY"),
        ],
        &[("X", "Y")],
    ));
    let (client, store) = spawn_server(oracle.clone()).await;

    // 1. fresh pairing goes to the oracle and is persisted under the sorted key
    assert_eq!(client.combine("H", "O").await, "H2O");
    let record = store
        .get_combination(&canonicalize("H", "O").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.result_label, "H2O");
    assert_eq!(oracle.calls(), 1);

    // 2. reversed, lower-cased request is served from the cache
    assert_eq!(client.combine("o", "h").await, "H2O");
    assert_eq!(oracle.calls(), 1);

    // 3. no-reaction answers are cached facts
    assert_eq!(client.combine("He", "Ne").await, DEFAULT_NO_REACTION);
    assert_eq!(client.combine("Ne", "He").await, DEFAULT_NO_REACTION);
    assert_eq!(oracle.calls(), 2);

    // 4. multi-product answers keep their separator
    assert_eq!(client.combine("H2O2", "MnO2").await, "H2O + O2");
    assert_eq!(oracle.calls(), 3);

    // 5. transient failures are not cached; the retry reaches the oracle
    assert_eq!(client.combine("X", "Y").await, DEFAULT_UNRESOLVABLE);
    assert!(store
        .get_combination(&canonicalize("X", "Y").unwrap())
        .await
        .unwrap()
        .is_none());
    assert_eq!(client.combine("X", "Y").await, "XY");
    assert_eq!(oracle.calls(), 5);
    assert_eq!(store.len(), 4);

    let response = client.get("/combinations").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["total"], 4);
}

#[tokio::test]
async fn test_invalid_requests_are_rejected() {
    let oracle = Arc::new(TableOracle::new(&[("H", "O", "H2O")], &[]));
    let (client, store) = spawn_server(oracle.clone()).await;

    for body in [
        json!({ "first": "", "second": "O" }),
        json!({ "first": " ", "second": "O" }),
        json!({ "second": "O" }),
    ] {
        let response = client.post("/", body).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("Missing"));
    }

    assert_eq!(oracle.calls(), 0);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_concurrent_requests_for_one_pair_agree() {
    let oracle = Arc::new(TableOracle::new(&[("Na", "Cl", "NaCl")], &[]));
    let (client, store) = spawn_server(oracle.clone()).await;
    let client = Arc::new(client);

    let mut handles = Vec::new();
    for i in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                client.combine("Na", "Cl").await
            } else {
                client.combine("cl", "na").await
            }
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), "NaCl");
    }
    assert_eq!(store.len(), 1);
    assert!(oracle.calls() >= 1);
}

#[tokio::test]
async fn test_health_and_elements() {
    let oracle = Arc::new(TableOracle::new(&[], &[]));
    let (client, _store) = spawn_server(oracle).await;

    let response = client.get("/health").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cached_combinations"], 0);

    let response = client.get("/elements").await.unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["total"], 31);
}
