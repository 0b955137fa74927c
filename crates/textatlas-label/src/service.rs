//! Completion service trait and implementations.
//!
//! - `CompletionService` abstracts the language-model backend that turns a
//!   prompt into a short text reply.
//! - `MockCompletion` returns a configured reply for testing without a
//!   network dependency.

use textatlas_core::error::Result;

/// Service for generating text completions.
///
/// Implementations send a prompt to a language model and return its reply.
/// The labeler issues one completion per cluster.
pub trait CompletionService: Send + Sync {
    /// Generate a completion for the given prompt.
    fn complete(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Identifier of the model answering the prompts.
    fn model(&self) -> &str;
}

/// Object-safe version of [`CompletionService`] for dynamic dispatch.
///
/// Because `CompletionService::complete` returns `impl Future` it is not
/// object-safe. This trait uses a boxed future instead, allowing
/// `Box<dyn DynCompletionService>` to be stored in structs without generics.
///
/// A blanket implementation is provided so that every `CompletionService`
/// automatically implements `DynCompletionService`.
pub trait DynCompletionService: Send + Sync {
    /// Generate a completion for the given prompt (boxed future).
    fn complete_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String>> + Send + 'a>>;

    /// Identifier of the model answering the prompts.
    fn model(&self) -> &str;
}

/// Blanket impl: any `CompletionService` automatically implements `DynCompletionService`.
impl<T: CompletionService> DynCompletionService for T {
    fn complete_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(self.complete(prompt))
    }

    fn model(&self) -> &str {
        CompletionService::model(self)
    }
}

// ---------------------------------------------------------------------------
// MockCompletion - canned replies for testing
// ---------------------------------------------------------------------------

/// Mock completion service that answers every prompt with a fixed reply.
///
/// Configure the reply to drive labeler tests: a normal string exercises the
/// happy path, an empty string exercises the empty-response failure.
#[derive(Debug, Clone)]
pub struct MockCompletion {
    reply: String,
}

impl MockCompletion {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new("Mock Label")
    }
}

impl CompletionService for MockCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.reply.clone())
    }

    fn model(&self) -> &str {
        "mock-completion"
    }
}
