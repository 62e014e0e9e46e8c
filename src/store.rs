use async_trait::async_trait;
use std::time::Duration;

use crate::{FileContent, ProviderResult};

/// Storage primitives the adapter is built on - implemented by the backend
/// client, mocked in tests.
///
/// Each operation performs exactly one outbound call and resolves exactly
/// once; failures surface unchanged as [`crate::ProviderError::Backend`].
/// No retries, no caching, no timeouts are applied at this seam.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create or overwrite one object under `key`
    async fn put(
        &self,
        key: &str,
        content_type: Option<&str>,
        content: FileContent,
    ) -> ProviderResult<()>;

    /// Delete the object under `key`; a missing key's outcome is whatever
    /// the backend reports
    async fn remove(&self, key: &str) -> ProviderResult<()>;

    /// Generate a time-limited GET URL for the object under `key`
    async fn presign_get(&self, key: &str, expires_in: Duration) -> ProviderResult<String>;
}
