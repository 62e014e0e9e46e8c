use serde::Deserialize;
use std::time::Duration;

use crate::{ProviderError, ProviderResult};

/// Port used when the host supplies none, or one that does not parse
pub const DEFAULT_PORT: u16 = 9000;

/// Signed URLs live for 24 hours unless the host configures otherwise
pub const DEFAULT_SIGNED_URL_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Raw provider options as the host supplies them.
///
/// Upload hosts pass these through from their own plugin configuration, so
/// the types are loose: the port may arrive as a string or a number, and
/// `use_tls` is a string-typed boolean where only the literal `"true"`
/// enables TLS. [`ProviderSettings::resolve`] turns this into a validated
/// [`ProviderConfig`].
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    pub endpoint: String,
    #[serde(default)]
    pub port: Option<Port>,
    #[serde(default)]
    pub use_tls: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub public_host: String,
    #[serde(default)]
    pub folder_prefix: Option<String>,
    #[serde(default)]
    pub private_bucket: bool,
    #[serde(default)]
    pub signed_url_ttl_secs: Option<u64>,
}

/// A port that may arrive as a number or a string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Port {
    Number(u16),
    Text(String),
}

impl Port {
    /// Zero and unparseable values fall back to [`DEFAULT_PORT`]
    fn resolve(&self) -> u16 {
        match self {
            Port::Number(0) => DEFAULT_PORT,
            Port::Number(n) => *n,
            Port::Text(text) => text
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|port| *port != 0)
                .unwrap_or(DEFAULT_PORT),
        }
    }
}

impl ProviderSettings {
    /// Deserialize settings from a host-supplied JSON options object
    pub fn from_value(value: serde_json::Value) -> ProviderResult<Self> {
        serde_json::from_value(value)
            .map_err(|err| ProviderError::invalid(format!("invalid provider settings: {err}")))
    }

    /// Read settings from `MINIO_*` environment variables
    pub fn from_env() -> ProviderResult<Self> {
        fn required(name: &str) -> ProviderResult<String> {
            std::env::var(name).map_err(|_| {
                ProviderError::invalid(format!("missing environment variable {name}"))
            })
        }
        fn optional(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|value| !value.is_empty())
        }

        Ok(Self {
            endpoint: required("MINIO_ENDPOINT")?,
            port: optional("MINIO_PORT").map(Port::Text),
            use_tls: optional("MINIO_USE_TLS"),
            access_key: required("MINIO_ACCESS_KEY")?,
            secret_key: required("MINIO_SECRET_KEY")?,
            bucket: required("MINIO_BUCKET")?,
            public_host: required("MINIO_PUBLIC_HOST")?,
            folder_prefix: optional("MINIO_FOLDER_PREFIX"),
            private_bucket: optional("MINIO_PRIVATE_BUCKET").as_deref() == Some("true"),
            signed_url_ttl_secs: optional("MINIO_SIGNED_URL_TTL_SECS")
                .and_then(|value| value.parse().ok()),
        })
    }

    /// Validate and freeze the settings into an immutable [`ProviderConfig`]
    pub fn resolve(self) -> ProviderResult<ProviderConfig> {
        for (name, value) in [
            ("endpoint", &self.endpoint),
            ("access_key", &self.access_key),
            ("secret_key", &self.secret_key),
            ("bucket", &self.bucket),
            ("public_host", &self.public_host),
        ] {
            if value.trim().is_empty() {
                return Err(ProviderError::invalid(format!(
                    "provider setting `{name}` must not be empty"
                )));
            }
        }

        let folder_prefix = self
            .folder_prefix
            .map(|prefix| prefix.trim_matches('/').to_string())
            .filter(|prefix| !prefix.is_empty());

        let ttl_secs = self
            .signed_url_ttl_secs
            .filter(|secs| *secs != 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SIGNED_URL_TTL);

        Ok(ProviderConfig {
            endpoint: self.endpoint,
            port: self.port.map(|port| port.resolve()).unwrap_or(DEFAULT_PORT),
            use_tls: self.use_tls.as_deref() == Some("true"),
            access_key: self.access_key,
            secret_key: self.secret_key,
            bucket: self.bucket,
            public_host: self.public_host,
            folder_prefix,
            private_bucket: self.private_bucket,
            signed_url_ttl: ttl_secs,
        })
    }
}

/// Validated provider configuration.
///
/// Constructed once at startup, lives for the process lifetime, never
/// mutated. Every component borrows it; there is no other shared state.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Hostname of the S3-compatible endpoint the client connects to
    pub endpoint: String,
    /// Port shared by the endpoint and the public host
    pub port: u16,
    /// Chooses between `https` and `http` for every URL this crate builds
    pub use_tls: bool,
    pub access_key: String,
    pub secret_key: String,
    /// The single bucket this provider owns
    pub bucket: String,
    /// Hostname stamped into public URLs (CDN or the endpoint itself)
    pub public_host: String,
    /// Optional key prefix shared by every object this provider writes
    pub folder_prefix: Option<String>,
    /// Whether the host should route reads through `signed_url`
    pub private_bucket: bool,
    /// Lifetime of presigned URLs
    pub signed_url_ttl: Duration,
}
