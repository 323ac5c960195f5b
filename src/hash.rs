//! Object store verification. Objects are filed under the SHA-1 of their content.

use sha1::{Digest, Sha1};

pub fn sha1_hex<B: AsRef<[u8]>>(bytes: B) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes.as_ref());
    hex::encode(hasher.finalize())
}

/// True when `bytes` hash to `expected` (hex, any case).
pub fn matches<B: AsRef<[u8]>>(bytes: B, expected: &str) -> bool {
    sha1_hex(bytes).eq_ignore_ascii_case(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            sha1_hex("abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert!(matches("abc", "A9993E364706816ABA3E25717850C26C9CD0D89D"));
        assert!(!matches("abd", "a9993e364706816aba3e25717850c26c9cd0d89d"));
    }
}
