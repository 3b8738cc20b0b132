//! Password hashing and stateless bearer tokens.
//!
//! A token is a compact two-part credential: base64-encoded claims JSON,
//! a dot, and a base64-encoded HMAC-SHA256 signature over the encoded
//! claims. Validation is a signature check only; there is no expiry,
//! revocation or refresh. Passwords are stored as `salt$digest` with an
//! iterated, salted SHA-256 digest.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const SALT_LEN: usize = 16;
const HASH_ROUNDS: u32 = 10_000;

#[derive(Debug, Error)]
pub enum CredentialError {
    /// Malformed token, bad encoding, or signature mismatch.
    #[error("Invalid token")]
    InvalidToken,

    #[error("failed to gather salt entropy: {0}")]
    Entropy(String),

    #[error("failed to encode claims: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Identity carried inside a token.
///
/// Patient and doctor tokens carry an id claim; the admin token carries
/// the configured email+password concatenation as a bare string (a fixed
/// shared secret, not a per-admin identity).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Claims {
    Identity { id: Uuid },
    Sentinel(String),
}

pub fn issue_token(claims: &Claims, secret: &str) -> Result<String, CredentialError> {
    let body = base64_encode(&serde_json::to_vec(claims)?);
    let signature = base64_encode(&sign(secret, body.as_bytes()));
    Ok(format!("{body}.{signature}"))
}

/// Verify the signature and decode the claims. A tampered signature, a
/// missing dot, or undecodable claims all come back as `InvalidToken`.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, CredentialError> {
    let (body, signature) = token.split_once('.').ok_or(CredentialError::InvalidToken)?;
    let presented = base64_decode(signature).map_err(|_| CredentialError::InvalidToken)?;
    let expected = sign(secret, body.as_bytes());
    if !constant_time_eq(&presented, &expected) {
        return Err(CredentialError::InvalidToken);
    }
    let payload = base64_decode(body).map_err(|_| CredentialError::InvalidToken)?;
    serde_json::from_slice(&payload).map_err(|_| CredentialError::InvalidToken)
}

fn sign(secret: &str, data: &[u8]) -> Vec<u8> {
    // HMAC accepts keys of any length, so construction cannot fail.
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC-SHA256 accepts any key length"),
    };
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plaintext: &str) -> Result<String, CredentialError> {
    let mut salt = [0u8; SALT_LEN];
    getrandom::fill(&mut salt).map_err(|e| CredentialError::Entropy(e.to_string()))?;
    let digest = derive_digest(&salt, plaintext);
    Ok(format!(
        "{}${}",
        base64_encode(&salt),
        base64_encode(&digest)
    ))
}

/// Check a plaintext password against a stored `salt$digest` value.
/// Malformed stored values verify as false rather than erroring.
pub fn verify_password(plaintext: &str, stored: &str) -> bool {
    let Some((salt_b64, digest_b64)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(digest)) = (base64_decode(salt_b64), base64_decode(digest_b64)) else {
        return false;
    };
    let computed = derive_digest(&salt, plaintext);
    constant_time_eq(&computed, &digest)
}

/// Iterated salted SHA-256. Each round feeds the previous digest and the
/// salt back through the hash.
fn derive_digest(salt: &[u8], plaintext: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(plaintext.as_bytes());
    let mut digest: [u8; 32] = hasher.finalize().into();

    for _ in 0..HASH_ROUNDS {
        let mut hasher = Sha256::new();
        hasher.update(digest);
        hasher.update(salt);
        digest = hasher.finalize().into();
    }
    digest
}

/// Constant-time comparison to keep signature and digest checks free of
/// timing leaks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut acc = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        acc |= x ^ y;
    }
    acc == 0
}

pub fn base64_encode(data: &[u8]) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    let mut result = String::with_capacity(data.len().div_ceil(3) * 4);
    let mut i = 0;

    while i < data.len() {
        let b0 = data[i] as usize;
        let b1 = if i + 1 < data.len() { data[i + 1] as usize } else { 0 };
        let b2 = if i + 2 < data.len() { data[i + 2] as usize } else { 0 };

        result.push(ALPHABET[b0 >> 2] as char);
        result.push(ALPHABET[((b0 & 0x03) << 4) | (b1 >> 4)] as char);

        if i + 1 < data.len() {
            result.push(ALPHABET[((b1 & 0x0f) << 2) | (b2 >> 6)] as char);
        } else {
            result.push('=');
        }

        if i + 2 < data.len() {
            result.push(ALPHABET[b2 & 0x3f] as char);
        } else {
            result.push('=');
        }

        i += 3;
    }

    result
}

pub fn base64_decode(data: &str) -> Result<Vec<u8>, String> {
    const DECODE_TABLE: [i8; 128] = [
        -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
        -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
        -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 62, -1, -1, -1, 63,
        52, 53, 54, 55, 56, 57, 58, 59, 60, 61, -1, -1, -1, -1, -1, -1,
        -1,  0,  1,  2,  3,  4,  5,  6,  7,  8,  9, 10, 11, 12, 13, 14,
        15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, -1, -1, -1, -1, -1,
        -1, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40,
        41, 42, 43, 44, 45, 46, 47, 48, 49, 50, 51, -1, -1, -1, -1, -1,
    ];

    let data = data.trim_end_matches('=');
    let mut result = Vec::new();
    let mut buffer = 0u32;
    let mut bits = 0;

    for c in data.chars() {
        let value = if c as usize >= 128 {
            return Err("Invalid character".to_owned());
        } else {
            DECODE_TABLE[c as usize]
        };

        if value < 0 {
            return Err("Invalid character".to_owned());
        }

        buffer = (buffer << 6) | (value as u32);
        bits += 6;

        if bits >= 8 {
            bits -= 8;
            result.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip_identity() {
        let id = Uuid::new_v4();
        let token = issue_token(&Claims::Identity { id }, "secret").unwrap();
        assert_eq!(
            validate_token(&token, "secret").unwrap(),
            Claims::Identity { id }
        );
    }

    #[test]
    fn test_token_roundtrip_sentinel() {
        let claims = Claims::Sentinel("admin@x.ioadmin12345".to_owned());
        let token = issue_token(&claims, "secret").unwrap();
        assert_eq!(validate_token(&token, "secret").unwrap(), claims);
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let token = issue_token(&Claims::Identity { id: Uuid::new_v4() }, "secret").unwrap();
        let mut tampered = token.clone();
        // Flip the final signature character.
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });
        assert!(validate_token(&tampered, "secret").is_err());
    }

    #[test]
    fn test_tampered_body_rejected() {
        let token = issue_token(&Claims::Identity { id: Uuid::new_v4() }, "secret").unwrap();
        let (body, signature) = token.split_once('.').unwrap();
        let other = issue_token(&Claims::Identity { id: Uuid::new_v4() }, "secret").unwrap();
        let (other_body, _) = other.split_once('.').unwrap();
        assert_ne!(body, other_body);
        assert!(validate_token(&format!("{other_body}.{signature}"), "secret").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(&Claims::Identity { id: Uuid::new_v4() }, "secret").unwrap();
        assert!(validate_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_garbage_tokens_rejected() {
        for junk in ["", "no-dot", "a.b.c", "!!!.???"] {
            assert!(validate_token(junk, "secret").is_err(), "accepted {junk:?}");
        }
    }

    #[test]
    fn test_password_hash_verifies() {
        let stored = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &stored));
        assert!(!verify_password("hunter2", &stored));
    }

    #[test]
    fn test_password_hashes_are_salted() {
        let a = hash_password("hunter2hunter2").unwrap();
        let b = hash_password("hunter2hunter2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_stored_hash_is_false() {
        assert!(!verify_password("pw", "not-a-valid-record"));
        assert!(!verify_password("pw", "bad base64$also bad"));
    }

    #[test]
    fn test_base64_roundtrip() {
        for data in [&b""[..], b"f", b"fo", b"foo", b"foobar", &[0xff, 0x00, 0x7f]] {
            let encoded = base64_encode(data);
            assert_eq!(base64_decode(&encoded).unwrap(), data);
        }
    }
}
