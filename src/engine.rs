//! The contract a curve-arithmetic engine must fulfil.
//!
//! Every piece of group arithmetic, pairing computation and hash-to-curve
//! work is delegated to an implementation of [`CurveEngine`]. The rest of the
//! crate only moves bytes around it: the serialization rules, the degenerate
//! input screening and the EIP-2537 layout transforms are engine-independent
//! and must yield byte-identical results no matter which engine is bound.
//!
//! Engines are selected at compile time through cargo features (see the
//! [`curve`](crate::curve) module); there is no runtime switch and therefore
//! no global mutable state to coordinate.

use crate::error::Error;

/// Size of a canonical secret key encoding: a big-endian scalar mod r.
pub const SECRET_KEY_SIZE: usize = 32;

/// Size of a canonical public key encoding: a compressed G1 point.
pub const PUBLIC_KEY_SIZE: usize = 48;

/// Size of a canonical signature encoding: a compressed G2 point.
pub const SIGNATURE_SIZE: usize = 96;

/// Size of a base field element encoding.
pub const FP_SIZE: usize = 48;

/// Size of an uncompressed, flag-free G1 point (x || y).
pub const G1_RAW_SIZE: usize = 2 * FP_SIZE;

/// Size of an uncompressed, flag-free G2 point (x_c1 || x_c0 || y_c1 || y_c0).
pub const G2_RAW_SIZE: usize = 4 * FP_SIZE;

/// Size of a big-endian scalar encoding.
pub const SCALAR_SIZE: usize = 32;

/// Domain separation tag of the signature suite
/// `BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_`.
///
/// This binds signatures to the proof-of-possession ciphersuite used by
/// Ethereum. It is a crate-wide constant; the only place it can be overridden
/// is the configuration of an [`eip2537::Precompiles`](crate::eip2537)
/// instance, which owns its own hashing context.
pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Capabilities a BLS12-381 arithmetic backend has to provide.
///
/// The associated types are opaque handles: the crate never inspects them and
/// each handle is owned by exactly one value object. Operations take
/// references and return fresh values, so engines are free to pick whatever
/// internal representation they like: equality and serialization are defined
/// algebraically through the methods below, never through the handle's memory
/// layout.
///
/// Raw (`*_from_raw`/`*_to_raw`) codecs are the flag-free affine coordinate
/// encodings consumed by the EIP-2537 codec. They check field canonicity and
/// curve membership but deliberately *not* subgroup membership; an all-zero
/// encoding means the identity in both directions. Compressed codecs
/// (`*_decompress`) are the canonical wire forms and do enforce subgroup
/// membership.
pub trait CurveEngine: Clone + std::fmt::Debug + Send + Sync + 'static {
    /// Scalar of the prime-order groups.
    type Scalar: Clone + Send + Sync + 'static;
    /// Point in G1.
    type G1: Clone + Send + Sync + 'static;
    /// Point in G2.
    type G2: Clone + Send + Sync + 'static;

    /// Engine identifier, used in diagnostics.
    const NAME: &'static str;

    // --- scalars ---

    /// Derives a secret scalar from 32 bytes of key material. The result is
    /// nonzero and below r. The derivation is engine-specific; canonical
    /// byte round-trips, not seeded generation, carry the cross-engine
    /// byte-identity guarantee.
    fn keygen(ikm: &[u8; SECRET_KEY_SIZE]) -> Self::Scalar;

    /// Decodes a canonical big-endian scalar, rejecting values >= r.
    fn scalar_from_bytes(bytes: &[u8; SCALAR_SIZE]) -> Result<Self::Scalar, Error>;

    /// Decodes a big-endian scalar with reduction mod r. Used for EIP-2537
    /// multiplication operands, which are unconstrained 256-bit integers.
    fn scalar_from_bytes_reduced(bytes: &[u8; SCALAR_SIZE]) -> Self::Scalar;

    /// Canonical big-endian encoding of a scalar.
    fn scalar_to_bytes(scalar: &Self::Scalar) -> [u8; SCALAR_SIZE];

    fn scalar_eq(a: &Self::Scalar, b: &Self::Scalar) -> bool;

    // --- G1 ---

    fn g1_generator() -> Self::G1;
    fn g1_identity() -> Self::G1;
    fn g1_is_identity(p: &Self::G1) -> bool;
    fn g1_eq(a: &Self::G1, b: &Self::G1) -> bool;
    fn g1_add(a: &Self::G1, b: &Self::G1) -> Self::G1;
    fn g1_mul(p: &Self::G1, s: &Self::Scalar) -> Self::G1;

    /// Computes `sum(scalars[i] * points[i])`. Slices have equal lengths;
    /// the empty sum is the identity.
    fn g1_msm(points: &[Self::G1], scalars: &[Self::Scalar]) -> Self::G1;

    fn g1_neg(p: &Self::G1) -> Self::G1;

    /// Canonical compressed encoding.
    fn g1_compress(p: &Self::G1) -> [u8; PUBLIC_KEY_SIZE];

    /// Decompresses and validates curve and subgroup membership.
    fn g1_decompress(bytes: &[u8; PUBLIC_KEY_SIZE]) -> Result<Self::G1, Error>;

    /// Decodes flag-free affine coordinates; all-zero means identity.
    fn g1_from_raw(bytes: &[u8; G1_RAW_SIZE]) -> Result<Self::G1, Error>;

    /// Encodes flag-free affine coordinates; identity becomes all-zero.
    fn g1_to_raw(p: &Self::G1) -> [u8; G1_RAW_SIZE];

    fn g1_in_subgroup(p: &Self::G1) -> bool;

    /// Maps a base field element onto G1 (simplified SWU with isogeny,
    /// cofactor cleared). Rejects non-canonical field elements.
    fn map_fp_to_g1(fe: &[u8; FP_SIZE]) -> Result<Self::G1, Error>;

    // --- G2 ---

    fn g2_generator() -> Self::G2;
    fn g2_identity() -> Self::G2;
    fn g2_is_identity(p: &Self::G2) -> bool;
    fn g2_eq(a: &Self::G2, b: &Self::G2) -> bool;
    fn g2_add(a: &Self::G2, b: &Self::G2) -> Self::G2;
    fn g2_mul(p: &Self::G2, s: &Self::Scalar) -> Self::G2;

    /// Computes `sum(scalars[i] * points[i])` over G2.
    fn g2_msm(points: &[Self::G2], scalars: &[Self::Scalar]) -> Self::G2;

    fn g2_neg(p: &Self::G2) -> Self::G2;

    /// Canonical compressed encoding.
    fn g2_compress(p: &Self::G2) -> [u8; SIGNATURE_SIZE];

    /// Decompresses and validates curve and subgroup membership.
    fn g2_decompress(bytes: &[u8; SIGNATURE_SIZE]) -> Result<Self::G2, Error>;

    /// Decodes flag-free affine coordinates; all-zero means identity.
    fn g2_from_raw(bytes: &[u8; G2_RAW_SIZE]) -> Result<Self::G2, Error>;

    /// Encodes flag-free affine coordinates; identity becomes all-zero.
    fn g2_to_raw(p: &Self::G2) -> [u8; G2_RAW_SIZE];

    fn g2_in_subgroup(p: &Self::G2) -> bool;

    /// Hashes an arbitrary message onto G2 under the given domain
    /// separation tag (`BLS12381G2_XMD:SHA-256_SSWU_RO`).
    fn hash_to_g2(msg: &[u8], dst: &[u8]) -> Result<Self::G2, Error>;

    /// Maps a quadratic extension field element (c1 || c0) onto G2.
    fn map_fp2_to_g2(fe: &[u8; 2 * FP_SIZE]) -> Result<Self::G2, Error>;

    // --- pairing ---

    /// Returns whether `prod e(points[i].0, points[i].1)` equals the
    /// multiplicative identity of the target group. The empty product is the
    /// identity; identity operands contribute nothing to the product.
    fn pairing_check(pairs: &[(Self::G1, Self::G2)]) -> bool;
}
