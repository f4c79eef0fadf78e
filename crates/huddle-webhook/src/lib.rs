//! Huddle Webhook Signatures
//!
//! Verification for identity provider webhooks signed with the svix scheme:
//! HMAC-SHA256 over `"{id}.{timestamp}.{body}"`, keyed by the base64 secret
//! behind the `whsec_` prefix, base64-encoded and sent as `v1,<signature>`.
//!
//! Verification always runs over the raw request bytes. Re-serializing a
//! parsed body is not byte-exact and must never be fed to [`Webhook::verify`].

pub mod signature;

pub use signature::{SignatureHeaders, Webhook, WebhookError};

pub const ID_HEADER: &str = "svix-id";
pub const TIMESTAMP_HEADER: &str = "svix-timestamp";
pub const SIGNATURE_HEADER: &str = "svix-signature";

/// Accepted clock skew between the signer and this server, in seconds.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;
