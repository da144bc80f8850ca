use async_trait::async_trait;

use crate::error::Result;

// =============================================================================
// Completion Trait
// =============================================================================

/// A single-shot text completion: one system instruction, one user turn, one
/// text reply. Everything provider-specific stays behind this boundary.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Provider name, for logs.
    fn provider(&self) -> &'static str;
}
