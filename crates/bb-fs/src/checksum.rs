//! SHA-256 content fingerprints
//!
//! Long text fields are shown in diff reports as short fingerprints rather
//! than raw text.

use sha2::{Digest, Sha256};

/// Short fingerprint (first 8 hex digits) of string content.
///
/// Empty content has an empty fingerprint.
pub fn short_fingerprint(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    let mut digest = hex_digest(content);
    digest.truncate(8);
    digest
}

fn hex_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_known_value() {
        assert_eq!(
            hex_digest("hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn short_fingerprint_is_prefix_of_digest() {
        assert_eq!(short_fingerprint("hello world"), "b94d27b9");
    }

    #[test]
    fn empty_content_has_empty_fingerprint() {
        assert_eq!(short_fingerprint(""), "");
    }

    #[test]
    fn different_content_different_fingerprint() {
        assert_ne!(short_fingerprint("aaa"), short_fingerprint("bbb"));
    }
}
