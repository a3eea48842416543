//! API key generation, hashing, and verification.
//!
//! Raw API keys are random secrets returned to the caller exactly once at
//! creation time. Only their SHA-256 digest is ever persisted; authentication
//! recomputes the digest of the presented key and compares it against stored
//! hashes.

use sha2::{Digest, Sha256};

/// Generate a new raw API key.
///
/// # Format
///
/// 64 lowercase hex characters (32 bytes of OS randomness, 256 bits of
/// entropy before encoding). Hex keeps the key URL-safe and copy-paste
/// friendly.
pub fn generate_api_key() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

/// Hash a raw API key with SHA-256.
///
/// Deterministic: the same key always produces the same 64-character
/// lowercase hex digest. The digest is what gets stored; the raw key is
/// unrecoverable from it.
pub fn hash_api_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a raw API key against a stored digest.
///
/// Recomputes the hash of `key` and compares for equality. The comparison is
/// a plain string equality check; timing-safe comparison is an accepted
/// non-goal at this key-set scale.
pub fn verify_api_key(key: &str, key_hash: &str) -> bool {
    hash_api_key(key) == key_hash
}

/// Build the cosmetic preview of a raw key: first 8 characters, an ellipsis,
/// then the last 4. Never used for matching.
pub fn key_preview(key: &str) -> String {
    format!("{}...{}", &key[..8], &key[key.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_64_hex_chars() {
        let key = generate_api_key();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn generated_keys_are_unique() {
        let a = generate_api_key();
        let b = generate_api_key();
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_deterministic() {
        let key = "some-raw-key";
        assert_eq!(hash_api_key(key), hash_api_key(key));
    }

    #[test]
    fn hash_matches_known_sha256_vector() {
        // SHA-256("abc")
        assert_eq!(
            hash_api_key("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn verify_accepts_correct_key() {
        let key = generate_api_key();
        let digest = hash_api_key(&key);
        assert!(verify_api_key(&key, &digest));
    }

    #[test]
    fn verify_rejects_wrong_key() {
        let digest = hash_api_key(&generate_api_key());
        assert!(!verify_api_key(&generate_api_key(), &digest));
        assert!(!verify_api_key("", &digest));
    }

    #[test]
    fn preview_shows_first_8_and_last_4() {
        let key = "abcdefgh-middle-part-wxyz";
        assert_eq!(key_preview(key), "abcdefgh...wxyz");
    }

    #[test]
    fn preview_of_generated_key_matches_pattern() {
        let key = generate_api_key();
        let preview = key_preview(&key);
        assert_eq!(preview, format!("{}...{}", &key[..8], &key[60..]));
    }
}
