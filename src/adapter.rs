use std::sync::Arc;
use tracing::debug;

use crate::{
    key, mime, url, FileDescriptor, ObjectStore, ProviderConfig, ProviderError, ProviderResult,
    ReadUrl, S3CompatibleStore,
};

/// The provider surface a content-management host embeds.
///
/// Wraps an [`ObjectStore`] and the immutable [`ProviderConfig`]; every
/// operation is stateless beyond those two, so uploads, deletes and sign
/// requests for different files may run concurrently without coordination.
pub struct StorageAdapter {
    store: Arc<dyn ObjectStore>,
    config: ProviderConfig,
}

impl StorageAdapter {
    /// Create an adapter backed by an S3-compatible endpoint
    pub fn new(config: ProviderConfig) -> Self {
        let store = S3CompatibleStore::new(&config);
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Create an adapter over any [`ObjectStore`] implementation
    pub fn with_store<S: ObjectStore + 'static>(store: S, config: ProviderConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Upload the descriptor's content and stamp the resulting public URL
    /// onto `file.url`.
    ///
    /// Takes the content out of the descriptor: a stream is consumed at most
    /// once and never retained past the operation.
    pub async fn upload(&self, file: &mut FileDescriptor) -> ProviderResult<()> {
        if file.hash.is_empty() || file.ext.is_empty() {
            return Err(ProviderError::invalid(
                "upload requires a non-empty hash and extension",
            ));
        }
        let content = file
            .content
            .take()
            .ok_or_else(|| ProviderError::invalid("file descriptor carries no content"))?;

        let object_key = key::upload_key(file, &self.config);
        let content_type = mime::content_type_for(&file.ext);
        debug!(key = %object_key, content_type = %content_type, "uploading object");

        self.store
            .put(&object_key, Some(&content_type), content)
            .await?;

        file.url = Some(url::public_url(&object_key, &self.config));
        Ok(())
    }

    /// Same contract as [`upload`](Self::upload), for stream-bearing
    /// descriptors
    pub async fn upload_stream(&self, file: &mut FileDescriptor) -> ProviderResult<()> {
        self.upload(file).await
    }

    /// Remove the object a previous upload created, located via `file.url`
    pub async fn delete(&self, file: &FileDescriptor) -> ProviderResult<()> {
        let object_key = key::delete_key(file, &self.config)?;
        debug!(key = %object_key, "removing object");
        self.store.remove(&object_key).await
    }

    /// Resolve a read URL for the descriptor.
    ///
    /// A URL whose bucket is not the configured one is passed through
    /// verbatim - it is a foreign or legacy reference this provider does not
    /// own, and no backend call is made for it. On a bucket match a presigned
    /// URL is always requested, whatever `private_bucket` says; hosts consult
    /// [`is_private`](Self::is_private) to decide whether to call this at all.
    pub async fn signed_url(&self, file: &FileDescriptor) -> ProviderResult<ReadUrl> {
        let stored = file
            .url
            .as_deref()
            .ok_or_else(|| ProviderError::invalid("file descriptor has no stored url"))?;

        let parsed = url::ObjectUrl::parse(stored)?;
        if parsed.bucket != self.config.bucket {
            debug!(bucket = %parsed.bucket, "url points outside the managed bucket, passing through");
            return Ok(ReadUrl::Public {
                url: stored.to_string(),
            });
        }

        let object_key = key::upload_key(file, &self.config);
        let presigned_url = self
            .store
            .presign_get(&object_key, self.config.signed_url_ttl)
            .await?;

        Ok(ReadUrl::Presigned { presigned_url })
    }

    /// Whether reads should go through [`signed_url`](Self::signed_url)
    pub fn is_private(&self) -> bool {
        self.config.private_bucket
    }

    /// The adapter's configuration
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileContent, ProviderSettings, DEFAULT_SIGNED_URL_TTL};
    use async_trait::async_trait;
    use bytes::Bytes;
    use futures_util::StreamExt;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct Recorded {
        puts: Vec<(String, Option<String>, Option<usize>)>,
        removes: Vec<String>,
        presigns: Vec<(String, Duration)>,
    }

    /// Records every call; optionally fails all of them.
    #[derive(Clone, Default)]
    struct MockStore {
        recorded: Arc<Mutex<Recorded>>,
        fail: bool,
    }

    impl MockStore {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn recorded(&self) -> Recorded {
            std::mem::take(&mut *self.recorded.lock().unwrap())
        }

        fn backend_failure<T>(&self) -> ProviderResult<T> {
            Err(ProviderError::backend(std::io::Error::new(
                std::io::ErrorKind::Other,
                "backend unavailable",
            )))
        }
    }

    #[async_trait]
    impl ObjectStore for MockStore {
        async fn put(
            &self,
            key: &str,
            content_type: Option<&str>,
            content: FileContent,
        ) -> ProviderResult<()> {
            if self.fail {
                return self.backend_failure();
            }
            let size = match content {
                FileContent::Buffer(bytes) => Some(bytes.len()),
                FileContent::Stream(mut stream) => {
                    let mut total = 0;
                    while let Some(chunk) = stream.next().await {
                        total += chunk.map_err(ProviderError::backend)?.len();
                    }
                    Some(total)
                }
            };
            self.recorded.lock().unwrap().puts.push((
                key.to_string(),
                content_type.map(str::to_string),
                size,
            ));
            Ok(())
        }

        async fn remove(&self, key: &str) -> ProviderResult<()> {
            if self.fail {
                return self.backend_failure();
            }
            self.recorded.lock().unwrap().removes.push(key.to_string());
            Ok(())
        }

        async fn presign_get(&self, key: &str, expires_in: Duration) -> ProviderResult<String> {
            if self.fail {
                return self.backend_failure();
            }
            self.recorded
                .lock()
                .unwrap()
                .presigns
                .push((key.to_string(), expires_in));
            Ok(format!(
                "http://minio.local:9000/assets/{key}?X-Amz-Signature=test"
            ))
        }
    }

    fn config() -> ProviderConfig {
        ProviderSettings::from_value(serde_json::json!({
            "endpoint": "minio.local",
            "port": "9000",
            "use_tls": "false",
            "access_key": "minio",
            "secret_key": "minio123",
            "bucket": "assets",
            "public_host": "cdn.example.com",
            "folder_prefix": "uploads",
            "private_bucket": true,
        }))
        .unwrap()
        .resolve()
        .unwrap()
    }

    fn adapter() -> (StorageAdapter, MockStore) {
        let store = MockStore::default();
        (StorageAdapter::with_store(store.clone(), config()), store)
    }

    #[tokio::test]
    async fn upload_stores_under_the_resolved_key_and_stamps_the_url() {
        let (adapter, store) = adapter();
        let mut file = FileDescriptor::new("abc123", ".png").with_buffer(vec![1u8, 2, 3]);

        adapter.upload(&mut file).await.unwrap();

        assert_eq!(
            file.url.as_deref(),
            Some("http://cdn.example.com:9000/assets/uploads/abc123.png")
        );
        let recorded = store.recorded();
        assert_eq!(
            recorded.puts,
            vec![(
                "uploads/abc123.png".to_string(),
                Some("image/png".to_string()),
                Some(3)
            )]
        );
    }

    #[tokio::test]
    async fn upload_stream_consumes_the_stream_exactly_once() {
        let (adapter, store) = adapter();
        let chunks = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"he")),
            Ok(Bytes::from_static(b"llo")),
        ]);
        let mut file = FileDescriptor::new("abc123", ".txt").with_stream(Box::pin(chunks));

        adapter.upload_stream(&mut file).await.unwrap();

        assert!(file.content.is_none());
        assert_eq!(store.recorded().puts[0].2, Some(5));
    }

    #[tokio::test]
    async fn upload_rejects_descriptors_without_content_or_identity() {
        let (adapter, _) = adapter();

        let mut no_content = FileDescriptor::new("abc123", ".png");
        assert!(matches!(
            adapter.upload(&mut no_content).await,
            Err(ProviderError::Invalid { .. })
        ));

        let mut no_hash = FileDescriptor::new("", ".png").with_buffer(vec![1u8]);
        assert!(matches!(
            adapter.upload(&mut no_hash).await,
            Err(ProviderError::Invalid { .. })
        ));
    }

    #[tokio::test]
    async fn delete_removes_what_upload_created() {
        let (adapter, store) = adapter();
        let mut file = FileDescriptor::new("abc123", ".png").with_buffer(vec![1u8]);
        adapter.upload(&mut file).await.unwrap();

        adapter.delete(&file).await.unwrap();

        assert_eq!(store.recorded().removes, vec!["uploads/abc123.png"]);
    }

    #[tokio::test]
    async fn delete_reports_a_malformed_url_instead_of_mis_slicing() {
        let (adapter, store) = adapter();
        let file = FileDescriptor::new("abc123", ".png")
            .with_url("http://cdn.example.com:9000/abc123.png");

        assert!(matches!(
            adapter.delete(&file).await,
            Err(ProviderError::MalformedUrl { .. })
        ));
        assert!(store.recorded().removes.is_empty());
    }

    #[tokio::test]
    async fn signed_url_passes_foreign_buckets_through_without_a_backend_call() {
        let (adapter, store) = adapter();
        let foreign = "http://cdn.example.com:9000/other/uploads/abc123.png";
        let file = FileDescriptor::new("abc123", ".png").with_url(foreign);

        let read_url = adapter.signed_url(&file).await.unwrap();

        assert_eq!(
            read_url,
            ReadUrl::Public {
                url: foreign.to_string()
            }
        );
        assert!(store.recorded().presigns.is_empty());
    }

    #[tokio::test]
    async fn signed_url_presigns_on_bucket_match_with_the_default_ttl() {
        let (adapter, store) = adapter();
        let file = FileDescriptor::new("abc123", ".png")
            .with_url("http://cdn.example.com:9000/assets/uploads/abc123.png");

        let read_url = adapter.signed_url(&file).await.unwrap();

        assert!(read_url.is_presigned());
        assert_eq!(
            store.recorded().presigns,
            vec![("uploads/abc123.png".to_string(), DEFAULT_SIGNED_URL_TTL)]
        );
    }

    #[tokio::test]
    async fn signed_url_surfaces_malformed_urls_instead_of_passing_through() {
        let (adapter, _) = adapter();
        let file = FileDescriptor::new("abc123", ".png").with_url("not a url");

        assert!(matches!(
            adapter.signed_url(&file).await,
            Err(ProviderError::MalformedUrl { .. })
        ));
    }

    #[tokio::test]
    async fn backend_errors_propagate_unchanged() {
        let adapter = StorageAdapter::with_store(MockStore::failing(), config());

        let mut file = FileDescriptor::new("abc123", ".png").with_buffer(vec![1u8]);
        assert!(matches!(
            adapter.upload(&mut file).await,
            Err(ProviderError::Backend { .. })
        ));

        let stored = FileDescriptor::new("abc123", ".png")
            .with_url("http://cdn.example.com:9000/assets/uploads/abc123.png");
        assert!(matches!(
            adapter.delete(&stored).await,
            Err(ProviderError::Backend { .. })
        ));
        assert!(matches!(
            adapter.signed_url(&stored).await,
            Err(ProviderError::Backend { .. })
        ));
    }

    #[tokio::test]
    async fn is_private_mirrors_the_configuration() {
        let (adapter, _) = adapter();
        assert!(adapter.is_private());

        let mut public_config = config();
        public_config.private_bucket = false;
        let adapter = StorageAdapter::with_store(MockStore::default(), public_config);
        assert!(!adapter.is_private());
    }
}
