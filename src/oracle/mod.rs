//! The external generative collaborator consulted on cache misses.

pub mod gemini;
pub mod prompt;

pub use gemini::GeminiOracle;
pub use prompt::PromptTemplate;

use async_trait::async_trait;

use crate::error::OracleError;

/// Free-text generation capability. Implementations may fail or stall; callers
/// bound every call with a timeout.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, OracleError>;

    fn name(&self) -> &str;
}
