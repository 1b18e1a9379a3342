use serde::{Deserialize, Serialize};

/// Body of `POST /`.
///
/// Both fields are optional at the serde level so a missing field surfaces as
/// our own 400 instead of the extractor's rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CombineRequest {
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub second: Option<String>,
}

impl CombineRequest {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: Some(first.into()),
            second: Some(second.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombineResponse {
    pub result: String,
}

/// Entry of the starter element catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub title: String,
}
