//! Point-sum aggregation of public keys and signatures.
//!
//! Aggregation trusts its inputs: every constituent has already been
//! validated by `from_bytes`, key generation or signing, so no re-validation
//! happens here. The sum of an empty slice is the group identity, which is
//! not a usable standalone key or signature; callers aggregating
//! possibly-empty sets must treat that case specially.

use crate::engine::CurveEngine;
use crate::sig::keys::PublicKey;
use crate::sig::signature::Signature;

/// An aggregated public key. Same type, produced by summation.
pub type AggregatePublicKey<E> = PublicKey<E>;

/// An aggregated signature. Same type, produced by summation.
pub type AggregateSignature<E> = Signature<E>;

/// Sums the underlying G1 points. Associative and commutative; the empty
/// sum is the identity.
pub fn aggregate_public_keys<E: CurveEngine>(
    public_keys: &[PublicKey<E>],
) -> AggregatePublicKey<E> {
    let point = public_keys
        .iter()
        .fold(E::g1_identity(), |sum, pk| E::g1_add(&sum, &pk.point));
    PublicKey::from_point(point)
}

/// Sums the underlying G2 points. Associative and commutative; the empty
/// sum is the identity.
pub fn aggregate_signatures<E: CurveEngine>(
    signatures: &[Signature<E>],
) -> AggregateSignature<E> {
    let point = signatures
        .iter()
        .fold(E::g2_identity(), |sum, sig| E::g2_add(&sum, &sig.point));
    Signature::from_point(point)
}
