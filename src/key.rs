//! Key resolution: the deterministic mapping between a file descriptor and
//! the object key it is stored under. `delete_key` must recover exactly what
//! `upload_key` produced for the same descriptor, otherwise deletes would
//! orphan objects.

use crate::{url, FileDescriptor, ProviderConfig, ProviderError, ProviderResult};

/// Object key a descriptor uploads to:
/// `<folder_prefix?>/<path?>/<hash><ext>`.
///
/// Empty optional segments are omitted entirely; the key never starts with a
/// separator and never contains a double one.
pub fn upload_key(file: &FileDescriptor, config: &ProviderConfig) -> String {
    let mut key = String::new();
    if let Some(prefix) = config.folder_prefix.as_deref() {
        key.push_str(prefix);
        key.push('/');
    }
    if let Some(path) = file.path.as_deref().filter(|path| !path.is_empty()) {
        key.push_str(path);
        key.push('/');
    }
    key.push_str(&file.hash);
    key.push_str(&file.ext);
    key
}

/// Recover the object key from a descriptor's stored URL.
///
/// The URL must start with the exact `scheme://public_host:port/bucket/`
/// prefix this configuration produces; anything else (different host,
/// different bucket, no key left over) is a [`ProviderError::MalformedUrl`]
/// rather than a silently mis-sliced key.
pub fn delete_key(file: &FileDescriptor, config: &ProviderConfig) -> ProviderResult<String> {
    let stored = file
        .url
        .as_deref()
        .ok_or_else(|| ProviderError::invalid("file descriptor has no stored url"))?;

    let prefix = format!("{}/{}/", url::public_base(config), config.bucket);
    let key = stored.strip_prefix(&prefix).ok_or_else(|| {
        ProviderError::malformed_url(stored, format!("expected a url starting with `{prefix}`"))
    })?;

    if key.is_empty() {
        return Err(ProviderError::malformed_url(stored, "empty object key"));
    }

    Ok(key.to_string())
}
