use bytes::Bytes;
use futures_core::Stream;
use serde::Serialize;
use std::pin::Pin;

/// Stream of bytes for object content.
///
/// `Sync` is required in addition to `Send` so the stream can be handed to
/// the storage SDK's request body without buffering it first.
pub type ByteStream =
    Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send + Sync>>;

/// Content carried by a file descriptor, either fully in memory or streamed.
pub enum FileContent {
    /// Complete payload held in memory
    Buffer(Bytes),
    /// Payload produced incrementally; consumed at most once
    Stream(ByteStream),
}

impl FileContent {
    /// Size of the content if it is known up front
    pub fn len_hint(&self) -> Option<usize> {
        match self {
            FileContent::Buffer(bytes) => Some(bytes.len()),
            FileContent::Stream(_) => None,
        }
    }
}

impl std::fmt::Debug for FileContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileContent::Buffer(bytes) => f.debug_tuple("Buffer").field(&bytes.len()).finish(),
            FileContent::Stream(_) => f.debug_tuple("Stream").finish(),
        }
    }
}

impl From<Bytes> for FileContent {
    fn from(bytes: Bytes) -> Self {
        FileContent::Buffer(bytes)
    }
}

impl From<Vec<u8>> for FileContent {
    fn from(bytes: Vec<u8>) -> Self {
        FileContent::Buffer(Bytes::from(bytes))
    }
}

/// A file as the content-management host sees it.
///
/// The host owns the descriptor; the provider reads `path`, `hash`, `ext` and
/// `content`, and writes `url` back after a successful upload. `hash` and
/// `ext` must be non-empty for an upload; `url` must be present for a delete
/// or sign request.
#[derive(Debug, Default)]
pub struct FileDescriptor {
    /// Optional logical folder within the host's media library
    pub path: Option<String>,
    /// Content hash chosen by the host, unique per file
    pub hash: String,
    /// File extension including the leading dot, e.g. `.png`
    pub ext: String,
    /// Public URL stamped onto the descriptor by a successful upload
    pub url: Option<String>,
    /// Upload payload; taken (and never retained) by the upload operation
    pub content: Option<FileContent>,
}

impl FileDescriptor {
    /// Create a descriptor for the given hash and extension
    pub fn new<H: Into<String>, E: Into<String>>(hash: H, ext: E) -> Self {
        Self {
            path: None,
            hash: hash.into(),
            ext: ext.into(),
            url: None,
            content: None,
        }
    }

    /// Set the logical folder path
    pub fn with_path<S: Into<String>>(mut self, path: S) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set a previously stored URL (for delete/sign requests)
    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Attach an in-memory payload
    pub fn with_buffer<B: Into<Bytes>>(mut self, buffer: B) -> Self {
        self.content = Some(FileContent::Buffer(buffer.into()));
        self
    }

    /// Attach a streaming payload
    pub fn with_stream(mut self, stream: ByteStream) -> Self {
        self.content = Some(FileContent::Stream(stream));
        self
    }
}

/// URL handed back to the host for read access.
///
/// Serializes to `{"url": ...}` or `{"presignedUrl": ...}`, matching the
/// shape upload hosts expect from their providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReadUrl {
    /// The stored URL passed through verbatim; the provider does not own it
    Public { url: String },
    /// A time-limited URL signed by the storage backend
    Presigned {
        #[serde(rename = "presignedUrl")]
        presigned_url: String,
    },
}

impl ReadUrl {
    /// The URL itself, regardless of kind
    pub fn as_str(&self) -> &str {
        match self {
            ReadUrl::Public { url } => url,
            ReadUrl::Presigned { presigned_url } => presigned_url,
        }
    }

    /// Whether this URL is time-limited
    pub fn is_presigned(&self) -> bool {
        matches!(self, ReadUrl::Presigned { .. })
    }
}
