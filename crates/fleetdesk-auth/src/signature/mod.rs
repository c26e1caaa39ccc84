//! HMAC request signing for the driver client surface.
//!
//! Driver clients carry no bearer token. Each request is signed with a
//! per-account derived key over the canonicalized parameter set, with a
//! timestamp window and single-use nonces guarding against replay.

pub mod canonical;
pub mod keys;
pub mod nonce;
pub mod verifier;

pub use nonce::NonceStore;
pub use verifier::{SignatureRejection, SignatureVerifier};
