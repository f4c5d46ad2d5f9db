use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of a string
#[must_use]
pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash a bearer token for storage. Raw tokens never touch the database.
#[must_use]
pub fn hash_token(token: &str) -> String {
    compute_hash(token.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_hash() {
        let hash = compute_hash("hello world");
        assert_eq!(
            hash,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_compute_hash_empty() {
        let hash = compute_hash("");
        // SHA-256 of empty string
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_token_ignores_surrounding_whitespace() {
        assert_eq!(hash_token("abc"), hash_token("  abc\n"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
    }
}
