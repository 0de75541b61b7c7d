//! Content fingerprints for detecting pages that did not change.

use sha2::{Digest, Sha256};

/// Returns the hex-encoded SHA-256 of the given page content.
#[must_use]
pub fn page_fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        let a = page_fingerprint("<html>page 1</html>");
        let b = page_fingerprint("<html>page 1</html>");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_differs_per_content() {
        assert_ne!(
            page_fingerprint("<html>page 1</html>"),
            page_fingerprint("<html>page 2</html>")
        );
    }
}
