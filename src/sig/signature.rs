//! The signature value object and the pairing-based verification protocols.

use std::fmt;

use crate::engine::{CurveEngine, DST, SIGNATURE_SIZE};
use crate::error::Error;
use crate::sig::keys::PublicKey;
use crate::sig::{fmt_hex, is_all_zero, is_infinity_sentinel};

/// A signature: a G2 point that is neither the identity nor outside the
/// prime-order subgroup.
///
/// Canonical form is the 96-byte compressed encoding.
///
/// None of the verification protocols defend against rogue-key attacks:
/// callers aggregating signatures from untrusted signers must enforce
/// message distinctness or proofs of possession themselves.
#[derive(Clone)]
pub struct Signature<E: CurveEngine> {
    pub(crate) point: E::G2,
}

impl<E: CurveEngine> Signature<E> {
    /// Wraps a point produced by trusted arithmetic (signing or
    /// aggregation); external bytes must go through `from_bytes`.
    pub(crate) fn from_point(point: E::G2) -> Self {
        Self { point }
    }

    /// Decodes and fully validates a compressed signature: length, the
    /// all-zero pattern, the point-at-infinity sentinel, curve membership
    /// and subgroup membership, in that order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != SIGNATURE_SIZE {
            return Err(Error::InputLength {
                expected: SIGNATURE_SIZE,
                got: bytes.len(),
            });
        }
        if is_all_zero(bytes) {
            return Err(Error::DegenerateValue("zero signature"));
        }
        if is_infinity_sentinel(bytes) {
            return Err(Error::DegenerateValue("infinite signature"));
        }
        let mut buf = [0u8; SIGNATURE_SIZE];
        buf.copy_from_slice(bytes);
        Ok(Self {
            point: E::g2_decompress(&buf)?,
        })
    }

    /// Canonical 96-byte compressed encoding.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        E::g2_compress(&self.point)
    }

    /// Verifies the signature over `message` for `public_key`.
    ///
    /// Checks `e(g1, sig) == e(pk, H(m))`, evaluated as the product
    /// `e(-g1, sig) * e(pk, H(m)) == 1`. Returns `false` for any
    /// non-verifying input; errors never escape.
    pub fn verify(&self, public_key: &PublicKey<E>, message: &[u8]) -> bool {
        let hm = match E::hash_to_g2(message, DST) {
            Ok(hm) => hm,
            Err(_) => return false,
        };
        E::pairing_check(&[
            (E::g1_neg(&E::g1_generator()), self.point.clone()),
            (public_key.point.clone(), hm),
        ])
    }

    /// Verifies an aggregate signature where every signer signed the same
    /// `message`. Returns `false` when `public_keys` is empty.
    pub fn fast_aggregate_verify(&self, public_keys: &[PublicKey<E>], message: &[u8]) -> bool {
        if public_keys.is_empty() {
            return false;
        }
        let aggregate = crate::sig::aggregate_public_keys(public_keys);
        self.verify(&aggregate, message)
    }

    /// Verifies an aggregate signature over one distinct message per signer.
    /// Returns `false` for empty input, mismatched counts or a failed check.
    pub fn aggregate_verify<M: AsRef<[u8]>>(
        &self,
        public_keys: &[PublicKey<E>],
        messages: &[M],
    ) -> bool {
        self.try_aggregate_verify(public_keys, messages)
            .unwrap_or(false)
    }

    /// Strict form of [`aggregate_verify`](Self::aggregate_verify): a
    /// public-key/message count mismatch is reported as
    /// [`Error::Mismatch`] instead of being folded into `false`. Empty
    /// input verifies nothing and yields `Ok(false)`.
    pub fn try_aggregate_verify<M: AsRef<[u8]>>(
        &self,
        public_keys: &[PublicKey<E>],
        messages: &[M],
    ) -> Result<bool, Error> {
        if public_keys.len() != messages.len() {
            return Err(Error::Mismatch {
                keys: public_keys.len(),
                messages: messages.len(),
            });
        }
        if public_keys.is_empty() {
            return Ok(false);
        }
        let mut pairs = Vec::with_capacity(public_keys.len() + 1);
        pairs.push((E::g1_neg(&E::g1_generator()), self.point.clone()));
        for (public_key, message) in public_keys.iter().zip(messages.iter()) {
            let hm = E::hash_to_g2(message.as_ref(), DST)?;
            pairs.push((public_key.point.clone(), hm));
        }
        Ok(E::pairing_check(&pairs))
    }
}

impl<E: CurveEngine> PartialEq for Signature<E> {
    fn eq(&self, other: &Self) -> bool {
        E::g2_eq(&self.point, &other.point)
    }
}

impl<E: CurveEngine> Eq for Signature<E> {}

impl<E: CurveEngine> fmt::Debug for Signature<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(")?;
        fmt_hex(f, &self.to_bytes())?;
        write!(f, ")")
    }
}

impl<E: CurveEngine> fmt::Display for Signature<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_hex(f, &self.to_bytes())
    }
}

impl_point_serde!(Signature, 96, "96 bytes of a compressed G2 point");

#[cfg(test)]
#[cfg(any(feature = "blst", feature = "arkworks"))]
mod tests {
    use super::*;
    use crate::sig::{aggregate_signatures, SecretKey};
    use crate::DefaultEngine;
    use rand::prelude::*;

    type Sk = SecretKey<DefaultEngine>;
    type Sig = Signature<DefaultEngine>;

    fn rand_message() -> [u8; 32] {
        let mut message = [0u8; 32];
        thread_rng().fill_bytes(&mut message);
        message
    }

    #[test]
    fn signature_rejects_zero_and_infinity() {
        assert_eq!(
            Sig::from_bytes(&[0u8; 96]),
            Err(Error::DegenerateValue("zero signature"))
        );

        let mut infinity = [0u8; 96];
        infinity[0] = 0xc0;
        assert_eq!(
            Sig::from_bytes(&infinity),
            Err(Error::DegenerateValue("infinite signature"))
        );
    }

    #[test]
    fn signature_rejects_bad_lengths() {
        let mut short = [0u8; 95];
        short[0] = 1;
        assert_eq!(
            Sig::from_bytes(&short),
            Err(Error::InputLength {
                expected: 96,
                got: 95
            })
        );

        let mut long = [0u8; 97];
        long[0] = 1;
        assert_eq!(
            Sig::from_bytes(&long),
            Err(Error::InputLength {
                expected: 96,
                got: 97
            })
        );
    }

    #[test]
    fn signature_roundtrip() {
        for _ in 0..10 {
            let sig = Sk::random(&mut thread_rng())
                .sign(&rand_message())
                .unwrap();
            let back = Sig::from_bytes(&sig.to_bytes()).unwrap();
            assert_eq!(sig, back);
        }
    }

    #[test]
    fn verify_truth_table() {
        let message1 = b"test 1";
        let message2 = b"test 2";
        let sk1 = Sk::random(&mut thread_rng());
        let pk1 = sk1.public_key();
        let pk2 = Sk::random(&mut thread_rng()).public_key();

        let sig = sk1.sign(message1).unwrap();
        assert!(sig.verify(&pk1, message1));
        assert!(!sig.verify(&pk1, message2));
        assert!(!sig.verify(&pk2, message1));
    }

    #[test]
    fn fast_aggregate_verify_ten_signers() {
        const N: usize = 10;
        let message1 = b"test 1";
        let message2 = b"test 2";

        let mut public_keys = Vec::with_capacity(N);
        let mut signatures = Vec::with_capacity(N);
        for _ in 0..N {
            let sk = Sk::random(&mut thread_rng());
            public_keys.push(sk.public_key());
            signatures.push(sk.sign(message1).unwrap());
        }

        let aggregated = aggregate_signatures(&signatures);
        let missing_one = aggregate_signatures(&signatures[..N - 1]);

        assert!(aggregated.fast_aggregate_verify(&public_keys, message1));
        assert!(!aggregated.fast_aggregate_verify(&public_keys, message2));
        assert!(!aggregated.fast_aggregate_verify(&public_keys[..N - 1], message1));
        assert!(!missing_one.fast_aggregate_verify(&public_keys, message1));
        assert!(!aggregated.fast_aggregate_verify(&[], message1));
    }

    #[test]
    fn aggregate_verify_ten_messages() {
        const N: usize = 10;
        let mut public_keys = Vec::with_capacity(N);
        let mut signatures = Vec::with_capacity(N);
        let mut messages = Vec::with_capacity(N);
        let mut other_messages = Vec::with_capacity(N);
        for _ in 0..N {
            let message = rand_message();
            let sk = Sk::random(&mut thread_rng());
            public_keys.push(sk.public_key());
            signatures.push(sk.sign(&message).unwrap());
            messages.push(message);
            other_messages.push(rand_message());
        }

        let aggregated = aggregate_signatures(&signatures);
        let missing_one = aggregate_signatures(&signatures[..N - 1]);

        assert!(aggregated.aggregate_verify(&public_keys, &messages));
        assert!(!aggregated.aggregate_verify(&public_keys, &other_messages));
        assert!(!missing_one.aggregate_verify(&public_keys, &messages));

        // One substituted message flips the result.
        let mut tampered = messages.clone();
        tampered[3] = rand_message();
        assert!(!aggregated.aggregate_verify(&public_keys, &tampered));
    }

    #[test]
    fn aggregate_verify_shape_errors() {
        let sk = Sk::random(&mut thread_rng());
        let sig = sk.sign(b"m").unwrap();
        let keys = vec![sk.public_key()];

        assert!(!sig.aggregate_verify(&keys, &[] as &[&[u8]]));
        assert_eq!(
            sig.try_aggregate_verify(&keys, &[] as &[&[u8]]),
            Err(Error::Mismatch {
                keys: 1,
                messages: 0
            })
        );
        assert_eq!(
            sig.try_aggregate_verify(&[], &[] as &[&[u8]]),
            Ok(false)
        );
    }

    #[test]
    fn signature_serde_roundtrip() {
        let sig = Sk::random(&mut thread_rng()).sign(b"payload").unwrap();
        let encoded = bincode::serialize(&sig).unwrap();
        let decoded: Sig = bincode::deserialize(&encoded).unwrap();
        assert_eq!(sig, decoded);
    }
}
