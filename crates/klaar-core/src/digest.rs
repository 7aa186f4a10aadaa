//! # Content Digest
//!
//! SHA-256 digests of document bodies. The signature provider receives the
//! lowercase hex digest of the UTF-8 contract text next to the base64 body,
//! so both must come from the same bytes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A SHA-256 digest of a document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Hash arbitrary bytes.
    pub fn sha256(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        Self(bytes)
    }

    /// Hash the UTF-8 encoding of `text`.
    pub fn of_text(text: &str) -> Self {
        Self::sha256(text.as_bytes())
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(
            ContentDigest::of_text("").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            ContentDigest::of_text("abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hashes_utf8_bytes() {
        let text = "Lõpp-sätted ja ülesütlemine";
        assert_eq!(
            ContentDigest::of_text(text),
            ContentDigest::sha256(text.as_bytes())
        );
        assert_ne!(
            ContentDigest::of_text(text),
            ContentDigest::of_text("Lopp-satted ja ulesutlemine")
        );
    }

    #[test]
    fn display_is_hex() {
        let d = ContentDigest::of_text("leping");
        assert_eq!(d.to_string(), d.to_hex());
        assert_eq!(d.to_hex().len(), 64);
    }
}
