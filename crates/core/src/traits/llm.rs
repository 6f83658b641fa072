//! Upstream model traits.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatCompletionRequest, ModelDescriptor};

/// Upstream completion service.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run a chat completion and return the assistant text.
    ///
    /// Fails when the service is unreachable, answers with a non-success
    /// status or an error payload, or returns an empty completion.
    async fn create_chat_completion(&self, request: &ChatCompletionRequest) -> Result<String>;
}

/// Upstream model catalog.
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    /// Every model the catalog advertises.
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>>;

    /// Models whose prompt and completion prices are both zero.
    async fn free_models(&self) -> Result<Vec<ModelDescriptor>> {
        let models = self.list_models().await?;
        Ok(models.into_iter().filter(ModelDescriptor::is_free).collect())
    }
}

#[async_trait]
impl<T: ModelCatalog + ?Sized> ModelCatalog for std::sync::Arc<T> {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>> {
        (**self).list_models().await
    }
}
