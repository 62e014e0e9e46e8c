//! # blob-provider: S3/MinIO upload provider for content-management hosts
//!
//! `blob-provider` sits between a content-management host (which owns files
//! as domain objects) and an S3-compatible object store. Given a file
//! descriptor - logical path, content hash, extension, payload or stream -
//! it computes the object key, uploads or removes the object, and produces
//! the URL a client fetches it from: a stable public URL, or a time-limited
//! presigned URL for private buckets.
//!
//! ## Key Features
//!
//! - **Reversible keys**: `delete` locates exactly what `upload` created
//! - **Streaming-friendly**: stream payloads are forwarded to the backend
//!   without buffering them in memory
//! - **Bucket-ownership guard**: URLs pointing outside the managed bucket
//!   are passed through verbatim and never presigned
//! - **Backend agnostic**: the [`ObjectStore`] seam takes any put/remove/
//!   presign implementation; [`S3CompatibleStore`] covers MinIO, S3, R2, ...
//!
//! ## Quick Start
//!
//! ```no_run
//! use blob_provider::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> ProviderResult<()> {
//! // 1. Resolve host-supplied settings into an immutable config
//! let config = ProviderSettings::from_env()?.resolve()?;
//! let provider = StorageAdapter::new(config);
//!
//! // 2. Upload a file; its public URL lands back on the descriptor
//! let mut file = FileDescriptor::new("abc123", ".png")
//!     .with_buffer(vec![0x89, 0x50, 0x4e, 0x47]);
//! provider.upload(&mut file).await?;
//!
//! // 3. Private buckets hand out presigned read URLs instead
//! if provider.is_private() {
//!     let read_url = provider.signed_url(&file).await?;
//!     println!("fetch via {}", read_url.as_str());
//! }
//!
//! // 4. Delete finds the object through the stored URL
//! provider.delete(&file).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  CMS host        │  ← owns the file lifecycle
//! ├──────────────────┤
//! │  StorageAdapter  │  ← keys, URLs, visibility guard
//! ├──────────────────┤
//! │  ObjectStore     │  ← put / remove / presign primitives
//! └──────────────────┘
//! ```
//!
//! The adapter is infrastructure, not a service: it holds no state beyond
//! the immutable configuration and a thread-safe backend handle, so
//! operations on different files run concurrently without coordination.

pub mod adapter;
mod config;
mod error;
pub mod key;
pub mod mime;
mod s3_store;
pub mod store;
mod types;
pub mod url;

// Re-export main types for clean API
pub use adapter::StorageAdapter;
pub use config::{Port, ProviderConfig, ProviderSettings, DEFAULT_PORT, DEFAULT_SIGNED_URL_TTL};
pub use error::{ProviderError, ProviderResult};
pub use key::{delete_key, upload_key};
pub use s3_store::S3CompatibleStore;
pub use store::ObjectStore;
pub use types::{ByteStream, FileContent, FileDescriptor, ReadUrl};

pub use self::url::{endpoint_url, public_url, ObjectUrl};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        FileContent, FileDescriptor, ObjectStore, ProviderConfig, ProviderError, ProviderResult,
        ProviderSettings, ReadUrl, S3CompatibleStore, StorageAdapter,
    };
}
