//! Content fingerprints for uploaded files.
//!
//! MD5 is used for drift detection only, never for integrity or security.

use md5::{Digest, Md5};

/// Lowercase hex MD5 digest of `data`.
pub fn checksum(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digests() {
        assert_eq!(checksum(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(checksum(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_deterministic() {
        let data = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        assert_eq!(checksum(&data), checksum(&data.clone()));
    }

    #[test]
    fn test_single_byte_difference() {
        let a = b"achievement-image-bytes".to_vec();
        let mut b = a.clone();
        b[0] ^= 0x01;
        assert_ne!(checksum(&a), checksum(&b));
    }

    #[test]
    fn test_lowercase_hex() {
        let sum = checksum(b"Speedrunner");
        assert_eq!(sum.len(), 32);
        assert!(sum
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
