use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::DEFAULT_TOLERANCE_SECS;

type HmacSha256 = Hmac<Sha256>;

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook secret is not valid base64")]
    InvalidSecret,
    #[error("invalid signature timestamp")]
    InvalidTimestamp,
    #[error("message timestamp too old")]
    TimestampTooOld,
    #[error("message timestamp too new")]
    TimestampTooNew,
    #[error("no matching signature found")]
    NoMatchingSignature,
}

/// The three signature header values, already extracted from the request.
#[derive(Debug, Clone, Copy)]
pub struct SignatureHeaders<'a> {
    pub id: &'a str,
    pub timestamp: &'a str,
    pub signature: &'a str,
}

/// A verifier keyed by one signing secret.
#[derive(Clone)]
pub struct Webhook {
    mac: HmacSha256,
    tolerance_secs: i64,
}

impl std::fmt::Debug for Webhook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Webhook")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish_non_exhaustive()
    }
}

impl Webhook {
    /// Build a verifier from a `whsec_`-prefixed (or bare) base64 secret.
    pub fn new(secret: &str) -> Result<Self, WebhookError> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = BASE64
            .decode(encoded.trim())
            .map_err(|_| WebhookError::InvalidSecret)?;
        if key.is_empty() {
            return Err(WebhookError::InvalidSecret);
        }
        let mac = HmacSha256::new_from_slice(&key).map_err(|_| WebhookError::InvalidSecret)?;

        Ok(Self {
            mac,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        })
    }

    pub fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs.max(1);
        self
    }

    pub fn tolerance_secs(&self) -> i64 {
        self.tolerance_secs
    }

    /// Verify `payload` against the headers using the current wall clock.
    pub fn verify(&self, headers: &SignatureHeaders<'_>, payload: &[u8]) -> Result<(), WebhookError> {
        self.verify_at(headers, payload, chrono::Utc::now().timestamp())
    }

    /// Verify with an explicit `now` (unix seconds).
    pub fn verify_at(
        &self,
        headers: &SignatureHeaders<'_>,
        payload: &[u8],
        now: i64,
    ) -> Result<(), WebhookError> {
        let timestamp: i64 = headers
            .timestamp
            .trim()
            .parse()
            .map_err(|_| WebhookError::InvalidTimestamp)?;

        // The header is untrusted; any i64 may arrive here.
        match now.checked_sub(timestamp) {
            Some(age) if age > self.tolerance_secs => return Err(WebhookError::TimestampTooOld),
            Some(age) if age < -self.tolerance_secs => return Err(WebhookError::TimestampTooNew),
            Some(_) => {}
            None if timestamp < now => return Err(WebhookError::TimestampTooOld),
            None => return Err(WebhookError::TimestampTooNew),
        }

        let mac = self.signed_content(headers.id, headers.timestamp.trim(), payload);

        // Several space-separated signatures may be present during secret rotation.
        let matched = headers
            .signature
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == SIGNATURE_VERSION)
            .filter_map(|(_, sig)| BASE64.decode(sig).ok())
            .any(|expected| mac.clone().verify_slice(&expected).is_ok());

        if matched {
            Ok(())
        } else {
            Err(WebhookError::NoMatchingSignature)
        }
    }

    /// Produce a `v1,<signature>` header value for `payload`.
    pub fn sign(&self, id: &str, timestamp: i64, payload: &[u8]) -> String {
        let mac = self.signed_content(id, &timestamp.to_string(), payload);
        format!(
            "{},{}",
            SIGNATURE_VERSION,
            BASE64.encode(mac.finalize().into_bytes())
        )
    }

    fn signed_content(&self, id: &str, timestamp: &str, payload: &[u8]) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac
    }
}
