//! # cross-bls
//!
//! BLS12-381 signatures (key generation, signing, verification, aggregation)
//! with byte-identical behavior across independent curve-arithmetic
//! backends, plus the EIP-2537 precompile operation set and its ABI codec.
//!
//! The curve arithmetic itself lives behind the [`CurveEngine`] trait; each
//! backend is a cargo feature under [`curve`] and exactly one of them is
//! bound as [`DefaultEngine`] per build. Everything observable (canonical
//! encodings, validation outcomes, signatures, ABI bytes) is identical no
//! matter which engine does the arithmetic.
//!
//! ## Signing and verifying
//!
//! ```rust
//! use cross_bls::SecretKey;
//!
//! let sk = SecretKey::random(&mut rand::thread_rng());
//! let pk = sk.public_key();
//!
//! let signature = sk.sign(b"hello").unwrap();
//! assert!(signature.verify(&pk, b"hello"));
//! assert!(!signature.verify(&pk, b"goodbye"));
//! ```
//!
//! ## Aggregation
//!
//! All signers over one message verify through a single pairing equation:
//!
//! ```rust
//! use cross_bls::{sig, SecretKey};
//!
//! let message = b"attestation";
//! let (keys, signatures): (Vec<_>, Vec<_>) = (0..4)
//!     .map(|_| {
//!         let sk = SecretKey::random(&mut rand::thread_rng());
//!         let signature = sk.sign(message).unwrap();
//!         (sk.public_key(), signature)
//!     })
//!     .unzip();
//!
//! let aggregate = sig::aggregate_signatures(&signatures);
//! assert!(aggregate.fast_aggregate_verify(&keys, message));
//! ```
//!
//! ## EIP-2537 operations
//!
//! ```rust
//! use cross_bls::eip2537::Precompiles;
//! use cross_bls::DefaultEngine;
//!
//! let ops = Precompiles::<DefaultEngine>::new();
//! // Adding the identity to itself yields the identity.
//! let out = ops.g1_add(&[0u8; 256]).unwrap();
//! assert_eq!(out, [0u8; 128]);
//! ```
//!
//! ## Wire formats
//!
//! Secret keys are 32 big-endian bytes, public keys 48-byte compressed G1
//! points, signatures 96-byte compressed G2 points. Decoding rejects wrong
//! lengths, the all-zero string, the compressed point-at-infinity pattern
//! and anything outside the prime-order subgroups. The EIP-2537 codec pads
//! field elements to 64 bytes and presents G2 coefficients in (c0, c1)
//! order per coordinate.

/// Curve engine implementations, one per cargo feature.
pub mod curve;

/// EIP-2537 precompile operations and the ABI byte codec.
pub mod eip2537;

/// The engine contract, canonical sizes and the published DST.
pub mod engine;

/// Deterministic decode and codec errors.
pub mod error;

/// Value objects, aggregation and verification protocols.
pub mod sig;

#[cfg(test)]
mod test_vectors;

pub use engine::{CurveEngine, DST, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE, SIGNATURE_SIZE};
pub use error::Error;

/// The engine this build is bound to: `blst` when enabled, otherwise
/// arkworks.
#[cfg(feature = "blst")]
pub type DefaultEngine = curve::blst::Engine;

/// The engine this build is bound to.
#[cfg(all(feature = "arkworks", not(feature = "blst")))]
pub type DefaultEngine = curve::arkworks::Engine;

/// A secret key bound to the default engine.
#[cfg(any(feature = "blst", feature = "arkworks"))]
pub type SecretKey = sig::SecretKey<DefaultEngine>;

/// A public key bound to the default engine.
#[cfg(any(feature = "blst", feature = "arkworks"))]
pub type PublicKey = sig::PublicKey<DefaultEngine>;

/// A signature bound to the default engine.
#[cfg(any(feature = "blst", feature = "arkworks"))]
pub type Signature = sig::Signature<DefaultEngine>;

/// An aggregated public key bound to the default engine.
#[cfg(any(feature = "blst", feature = "arkworks"))]
pub type AggregatePublicKey = sig::AggregatePublicKey<DefaultEngine>;

/// An aggregated signature bound to the default engine.
#[cfg(any(feature = "blst", feature = "arkworks"))]
pub type AggregateSignature = sig::AggregateSignature<DefaultEngine>;
