use url::Url;

use crate::{ProviderConfig, ProviderError, ProviderResult};

/// Scheme selected by the TLS flag
pub fn scheme(use_tls: bool) -> &'static str {
    if use_tls {
        "https"
    } else {
        "http"
    }
}

/// `scheme://public_host:port`, the base every public URL shares
pub fn public_base(config: &ProviderConfig) -> String {
    format!(
        "{}://{}:{}",
        scheme(config.use_tls),
        config.public_host,
        config.port
    )
}

/// Public URL for an object key: `scheme://public_host:port/bucket/key`
pub fn public_url(key: &str, config: &ProviderConfig) -> String {
    format!("{}/{}/{}", public_base(config), config.bucket, key)
}

/// `scheme://endpoint:port`, the base URL handed to the storage client
pub fn endpoint_url(config: &ProviderConfig) -> String {
    format!(
        "{}://{}:{}",
        scheme(config.use_tls),
        config.endpoint,
        config.port
    )
}

/// A stored object URL decomposed into its parts.
///
/// The inverse of [`public_url`]: parsing is structural rather than
/// string-prefix slicing, so anything that does not look like
/// `scheme://host[:port]/bucket/...` is a reported [`ProviderError::MalformedUrl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUrl {
    pub scheme: String,
    pub host: String,
    /// Absent when the URL relies on the scheme's default port
    pub port: Option<u16>,
    /// First path segment; the container the object lives in
    pub bucket: String,
    /// Remaining path; may be empty for a bare bucket URL
    pub key: String,
}

impl ObjectUrl {
    pub fn parse(raw: &str) -> ProviderResult<Self> {
        let parsed = Url::parse(raw)
            .map_err(|err| ProviderError::malformed_url(raw, err.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ProviderError::malformed_url(
                    raw,
                    format!("unsupported scheme `{other}`"),
                ))
            }
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| ProviderError::malformed_url(raw, "missing host"))?
            .to_string();

        let mut segments = parsed
            .path_segments()
            .ok_or_else(|| ProviderError::malformed_url(raw, "missing path"))?;

        let bucket = segments
            .next()
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| ProviderError::malformed_url(raw, "missing bucket segment"))?
            .to_string();

        let key = segments.collect::<Vec<_>>().join("/");

        Ok(Self {
            scheme: parsed.scheme().to_string(),
            host,
            port: parsed.port(),
            bucket,
            key,
        })
    }
}
