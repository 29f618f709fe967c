use sha2::{Digest, Sha256};

/// Checks a submitted password against the configured shared secret.
///
/// Both sides are hashed first, so the comparison always covers 32 bytes
/// regardless of input length. With no secret configured nothing matches.
pub fn verify_shared_secret(configured: Option<&str>, submitted: &str) -> bool {
    let Some(secret) = configured else {
        return false;
    };
    if submitted.is_empty() {
        return false;
    }

    let expected = Sha256::digest(secret.as_bytes());
    let actual = Sha256::digest(submitted.as_bytes());

    expected
        .iter()
        .zip(actual.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
