use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream as SdkByteStream;
use aws_smithy_types::body::SdkBody;
use futures_util::StreamExt;
use http_body_util::StreamBody;
use std::time::Duration;

use crate::{
    url, ByteStream, FileContent, ObjectStore, ProviderConfig, ProviderError, ProviderResult,
    ProviderSettings,
};

// MinIO and friends ignore the region but SigV4 signing requires one.
const SIGNING_REGION: &str = "us-east-1";

/// [`ObjectStore`] backed by any S3-compatible endpoint (MinIO, S3, R2, ...).
///
/// Holds a single long-lived, thread-safe SDK client configured with static
/// credentials, a custom endpoint and path-style addressing (bucket in the
/// path, as MinIO expects).
pub struct S3CompatibleStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3CompatibleStore {
    /// Build a client for the endpoint described by `config`
    pub fn new(config: &ProviderConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "blob-provider",
        );

        let sdk_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(SIGNING_REGION))
            .endpoint_url(url::endpoint_url(config))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(sdk_config),
            bucket: config.bucket.clone(),
        }
    }

    /// Build a store from `MINIO_*` environment variables
    pub fn from_env() -> ProviderResult<Self> {
        let config = ProviderSettings::from_env()?.resolve()?;
        Ok(Self::new(&config))
    }

    /// The bucket every operation targets
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Feed a caller-supplied stream to the SDK without collecting it in memory
fn sdk_body_from_stream(stream: ByteStream) -> SdkBody {
    let frames = stream.map(|chunk| {
        chunk
            .map(http_body::Frame::data)
            .map_err(|err| Box::new(err) as Box<dyn std::error::Error + Send + Sync>)
    });
    SdkBody::from_body_1_x(StreamBody::new(frames))
}

#[async_trait]
impl ObjectStore for S3CompatibleStore {
    async fn put(
        &self,
        key: &str,
        content_type: Option<&str>,
        content: FileContent,
    ) -> ProviderResult<()> {
        let body = match content {
            FileContent::Buffer(bytes) => SdkByteStream::from(bytes),
            FileContent::Stream(stream) => SdkByteStream::new(sdk_body_from_stream(stream)),
        };

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .set_content_type(content_type.map(str::to_string))
            .body(body)
            .send()
            .await
            .map_err(ProviderError::backend)?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> ProviderResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(ProviderError::backend)?;

        Ok(())
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> ProviderResult<String> {
        let presigning = PresigningConfig::expires_in(expires_in).map_err(ProviderError::backend)?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(ProviderError::backend)?;

        Ok(request.uri().to_string())
    }
}
