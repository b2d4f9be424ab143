//! Errors shared by the serialization layer, the signature protocol and the
//! EIP-2537 codec.

use thiserror::Error;

/// Error unifying every deterministic failure a decode or codec operation can
/// produce. Verification outcomes are never reported through this type: a
/// signature that does not verify is a boolean `false`, not an error.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A serialized input had the wrong byte length. For operations taking a
    /// sequence of fixed-size items, `expected` is the per-item size and the
    /// input must be a nonzero multiple of it.
    #[error("invalid input length: expected {expected} bytes, got {got}")]
    InputLength { expected: usize, got: usize },

    /// A zero or point-at-infinity value was supplied where only proper group
    /// elements are accepted.
    #[error("degenerate value: {0}")]
    DegenerateValue(&'static str),

    /// A scalar was not strictly below the group order r.
    #[error("scalar is not below the group order")]
    Range,

    /// A decoded point lies on the curve but outside the prime-order subgroup.
    #[error("{0} point is not in the correct subgroup")]
    Subgroup(&'static str),

    /// A field-element or point encoding was malformed.
    #[error("malformed encoding: {0}")]
    Format(&'static str),

    /// Public-key and message counts differ in aggregate verification.
    #[error("count mismatch: {keys} public keys, {messages} messages")]
    Mismatch { keys: usize, messages: usize },

    /// Hashing a message onto the curve failed inside the engine.
    #[error("could not hash to curve")]
    Hashing,
}
