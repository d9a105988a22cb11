pub mod dify;

use crate::base::types::Res;
use async_trait::async_trait;
use std::ops::Deref;
use std::sync::Arc;

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// This trait defines the single operation the relay needs from a
/// conversational-AI backend. Implementing this trait allows different
/// providers to be used with the relay.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Ask the backend for a complete (non-streaming) answer.
    ///
    /// Returns the answer text, which is empty when the backend responded
    /// successfully but without an answer. Transport failures and non-success
    /// statuses are returned as errors.
    async fn get_answer(&self, query: &str, user_id: &str) -> Res<String>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }
}
