use md5::{Digest, Md5};

use crate::error::CommandError;

/// MD5 digests of the passwords allowed to run restricted commands.
pub const ALLOWED_PWD_HASHES: [&str; 4] = [
    "4f5dcabf99ab7c6f545e0dfa4c0477db",
    "d52b71110c77496d304995ec1a8a57b6",
    "ad177c7653b82ecee0c648569214b909",
    "59a8add95efb4a6974aad6f7580a13f9",
];

/// Lowercase hex of the MD5 digest read as an unsigned integer, so leading
/// zero nibbles are dropped.
pub fn pwd_hash(pwd: &str) -> String {
    let value = Md5::digest(pwd.as_bytes())
        .iter()
        .fold(0u128, |acc, byte| (acc << 8) | u128::from(*byte));
    format!("{value:x}")
}

/// Accepts `pwd` when its hash is one of `allowed`.
pub fn check_pwd(pwd: &str, allowed: &[&str]) -> Result<(), CommandError> {
    let hash = pwd_hash(pwd);
    if allowed.contains(&hash.as_str()) {
        Ok(())
    } else {
        tracing::warn!("Rejected restricted command, password hash not allowed");
        Err(CommandError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pwd_hash_known_digest() {
        assert_eq!(pwd_hash(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(pwd_hash("password"), "5f4dcc3b5aa765d61d8327deb882cf99");
    }

    #[test]
    fn test_pwd_hash_drops_leading_zeros() {
        // md5("363") = 00411460f7c92d2124a67ea0f4cb5f85
        assert_eq!(pwd_hash("363"), "411460f7c92d2124a67ea0f4cb5f85");
    }

    #[test]
    fn test_check_pwd_rejects_unknown() {
        assert_eq!(
            check_pwd("password", &ALLOWED_PWD_HASHES),
            Err(CommandError::Unauthorized)
        );
        assert_eq!(check_pwd("", &ALLOWED_PWD_HASHES), Err(CommandError::Unauthorized));
    }

    #[test]
    fn test_check_pwd_accepts_listed_hash() {
        let hash = pwd_hash("swordfish");
        assert_eq!(check_pwd("swordfish", &[hash.as_str()]), Ok(()));
        assert_eq!(
            check_pwd("Swordfish", &[hash.as_str()]),
            Err(CommandError::Unauthorized)
        );
    }
}
