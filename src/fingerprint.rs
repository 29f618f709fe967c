use crate::errors::AppError;
use axum::http::{header, HeaderMap, HeaderName};
use sha2::{Digest, Sha256};

/// Headers hashed into the device fingerprint, in hashing order.
const FINGERPRINT_HEADERS: [HeaderName; 3] = [
    header::USER_AGENT,
    header::ACCEPT_LANGUAGE,
    header::ACCEPT_ENCODING,
];

/// Derives an opaque device fingerprint from request headers.
///
/// The result is the hex SHA-256 of the `User-Agent`, `Accept-Language` and
/// `Accept-Encoding` values. A missing header contributes an empty component;
/// a header whose value is not visible ASCII fails generation.
pub fn device_fingerprint(headers: &HeaderMap) -> Result<String, AppError> {
    let mut hasher = Sha256::new();

    for name in FINGERPRINT_HEADERS.iter() {
        let value = match headers.get(name) {
            Some(raw) => raw.to_str().map_err(|e| {
                AppError::Fingerprint(format!("header '{}' is not valid text: {}", name, e))
            })?,
            None => "",
        };
        hasher.update(name.as_str().as_bytes());
        hasher.update(b"=");
        hasher.update(value.trim().as_bytes());
        hasher.update(b"\n");
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(ua: &str, lang: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::USER_AGENT, HeaderValue::from_str(ua).unwrap());
        h.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_str(lang).unwrap());
        h
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = device_fingerprint(&headers("Mozilla/5.0", "en-US")).unwrap();
        let b = device_fingerprint(&headers("Mozilla/5.0", "en-US")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_differs_per_device() {
        let a = device_fingerprint(&headers("Mozilla/5.0", "en-US")).unwrap();
        let b = device_fingerprint(&headers("curl/8.0", "en-US")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_without_headers() {
        assert!(device_fingerprint(&HeaderMap::new()).is_ok());
    }

    #[test]
    fn test_fingerprint_rejects_opaque_bytes() {
        let mut h = HeaderMap::new();
        h.insert(
            header::USER_AGENT,
            HeaderValue::from_bytes(b"agent\xff").unwrap(),
        );
        assert!(matches!(
            device_fingerprint(&h),
            Err(AppError::Fingerprint(_))
        ));
    }
}
