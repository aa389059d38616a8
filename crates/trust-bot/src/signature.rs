//! Slack request signature verification.
//!
//! Slack signs every request with HMAC-SHA256 over `v0:{timestamp}:{body}`
//! and sends the result as `X-Slack-Signature: v0=<hex>` alongside
//! `X-Slack-Request-Timestamp`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

/// Header carrying the request timestamp (seconds).
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Signature version prefix.
const VERSION: &str = "v0";

fn request_mac(secret: &str, timestamp: &str, body: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    Some(mac)
}

/// Compute the `v0=<hex>` signature of a request.
pub fn sign(secret: &str, timestamp: &str, body: &[u8]) -> Option<String> {
    let mac = request_mac(secret, timestamp, body)?;
    Some(format!("{VERSION}={}", hex::encode(mac.finalize().into_bytes())))
}

/// Verify a Slack request signature.
#[must_use]
pub fn verify_signature(body: &[u8], timestamp: &str, signature: &str, secret: &str) -> bool {
    let Some(hex_part) = signature.strip_prefix("v0=") else {
        return false;
    };
    let Ok(signature_bytes) = hex::decode(hex_part) else {
        return false;
    };
    let Some(mac) = request_mac(secret, timestamp, body) else {
        return false;
    };
    let computed = mac.finalize().into_bytes();

    computed.as_slice().ct_eq(&signature_bytes).into()
}

/// Check a request timestamp (seconds) is no older than `max_age_secs`.
#[must_use]
pub fn validate_timestamp(timestamp: &str, max_age_secs: i64, now_secs: i64) -> bool {
    timestamp
        .trim()
        .parse::<i64>()
        .is_ok_and(|ts| (now_secs - ts).abs() <= max_age_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Example from the Slack request verification guide.
    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
    const TIMESTAMP: &str = "1531420618";
    const BODY: &str = "token=xyzz0WbapA4vBCDEFasx0q6G&team_id=T1DC2JH3J&team_domain=testteamnow&channel_id=G8PSS9T3V&channel_name=foobar&user_id=U2CERLKJA&user_name=roadrunner&command=%2Fwebhook-collect&text=&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2FT1DC2JH3J%2F397700885554%2F96rGlfmibIGlgcZRskXaIFfN&trigger_id=398738663015.47445629121.803a0bc887a14d10d2c447fce8b6703c";
    const SIGNATURE: &str =
        "v0=a2114d57b48eac39b9ad189dd8316235a7b4a8d21a10bd27519666489c69b503";

    #[test]
    fn test_verify_known_signature() {
        assert!(verify_signature(BODY.as_bytes(), TIMESTAMP, SIGNATURE, SECRET));
    }

    #[test]
    fn test_sign_matches_verify() {
        let signature = sign("secret", "1700000000", b"text=status+na1").unwrap();
        assert!(signature.starts_with("v0="));
        assert!(verify_signature(
            b"text=status+na1",
            "1700000000",
            &signature,
            "secret"
        ));
    }

    #[test]
    fn test_reject_bad_signatures() {
        let signature = sign("secret", "1700000000", b"text=status+na1").unwrap();

        assert!(!verify_signature(b"text=status+na2", "1700000000", &signature, "secret"));
        assert!(!verify_signature(b"text=status+na1", "1700000001", &signature, "secret"));
        assert!(!verify_signature(b"text=status+na1", "1700000000", &signature, "other"));
        assert!(!verify_signature(
            b"text=status+na1",
            "1700000000",
            signature.trim_start_matches("v0="),
            "secret"
        ));
        assert!(!verify_signature(b"text=status+na1", "1700000000", "v0=zz", "secret"));
    }

    #[test]
    fn test_validate_timestamp() {
        let now = 1_700_000_000;
        assert!(validate_timestamp("1700000000", 300, now));
        assert!(validate_timestamp("1699999700", 300, now));
        assert!(!validate_timestamp("1699999699", 300, now));
        assert!(!validate_timestamp("soon", 300, now));
    }
}
