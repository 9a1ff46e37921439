//! Canonical serialization and digest of selected data elements.
//!
//! Each element is written as its code immediately followed by its value.
//! Codes are always three characters long, so no separator is needed between
//! the two. Entries are sorted in byte order (not Unicode collation) and
//! each one is followed by a newline:
//!
//! ```text
//! DAG123 EXAMPLE ST
//! DAIGOTHAM
//! DAJNY
//! ```
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use sha2::{Digest, Sha256};

/// Canonical form of the given `(code, value)` pairs.
///
/// The result does not depend on the iteration order of `fields`.
pub fn canonicalize<I, K, V>(fields: I) -> Vec<u8>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut entries: Vec<Vec<u8>> = fields
        .into_iter()
        .map(|(code, value)| {
            let (code, value) = (code.as_ref().as_bytes(), value.as_ref().as_bytes());
            let mut entry = Vec::with_capacity(code.len() + value.len());
            entry.extend_from_slice(code);
            entry.extend_from_slice(value);
            entry
        })
        .collect();

    entries.sort_unstable();

    let mut canonical = entries.join(&b'\n');
    canonical.push(b'\n');

    tracing::trace!(entries = entries.len(), bytes = canonical.len(), "canonicalized data elements");
    canonical
}

/// SHA-256 digest of the canonical form of `fields`.
pub async fn hash<I, K, V>(fields: I) -> [u8; 32]
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    Sha256::digest(canonicalize(fields)).into()
}

/// Base64url (no padding) encoding of [`hash`].
pub async fn hash_base64url<I, K, V>(fields: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    URL_SAFE_NO_PAD.encode(hash(fields).await)
}
