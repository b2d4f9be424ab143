//! Secret and public key value objects.

use std::fmt;

use rand_core::{CryptoRng, RngCore};

use crate::engine::{CurveEngine, DST, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE};
use crate::error::Error;
use crate::sig::signature::Signature;
use crate::sig::{fmt_hex, is_all_zero, is_infinity_sentinel};

/// A secret key: a nonzero scalar below the group order r.
///
/// Canonical form is 32 big-endian bytes. The scalar is owned exclusively by
/// this value and never printed; `Debug` does not reveal it.
#[derive(Clone)]
pub struct SecretKey<E: CurveEngine> {
    scalar: E::Scalar,
}

impl<E: CurveEngine> SecretKey<E> {
    /// Generates a fresh secret key from 32 bytes of rng output fed through
    /// the engine's seeded key derivation.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut ikm = [0u8; SECRET_KEY_SIZE];
        rng.fill_bytes(&mut ikm);
        Self {
            scalar: E::keygen(&ikm),
        }
    }

    /// Decodes a canonical secret key. Rejects wrong lengths, the all-zero
    /// scalar and anything at or above the group order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != SECRET_KEY_SIZE {
            return Err(Error::InputLength {
                expected: SECRET_KEY_SIZE,
                got: bytes.len(),
            });
        }
        if is_all_zero(bytes) {
            return Err(Error::DegenerateValue("zero secret key"));
        }
        let mut buf = [0u8; SECRET_KEY_SIZE];
        buf.copy_from_slice(bytes);
        Ok(Self {
            scalar: E::scalar_from_bytes(&buf)?,
        })
    }

    /// Canonical 32-byte big-endian encoding.
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_SIZE] {
        E::scalar_to_bytes(&self.scalar)
    }

    /// The public key this secret key deterministically derives.
    pub fn public_key(&self) -> PublicKey<E> {
        PublicKey {
            point: E::g1_mul(&E::g1_generator(), &self.scalar),
        }
    }

    /// Signs a message: the crate-wide DST hashes it onto G2, the secret
    /// scalar multiplies the result.
    pub fn sign(&self, message: &[u8]) -> Result<Signature<E>, Error> {
        let h = E::hash_to_g2(message, DST)?;
        Ok(Signature::from_point(E::g2_mul(&h, &self.scalar)))
    }
}

impl<E: CurveEngine> PartialEq for SecretKey<E> {
    fn eq(&self, other: &Self) -> bool {
        E::scalar_eq(&self.scalar, &other.scalar)
    }
}

impl<E: CurveEngine> Eq for SecretKey<E> {}

impl<E: CurveEngine> fmt::Debug for SecretKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey")
    }
}

/// A public key: a G1 point that is neither the identity nor outside the
/// prime-order subgroup.
///
/// Canonical form is the 48-byte compressed encoding.
#[derive(Clone)]
pub struct PublicKey<E: CurveEngine> {
    pub(crate) point: E::G1,
}

impl<E: CurveEngine> PublicKey<E> {
    /// Wraps a point produced by trusted arithmetic (derivation or
    /// aggregation); external bytes must go through `from_bytes`.
    pub(crate) fn from_point(point: E::G1) -> Self {
        Self { point }
    }

    /// Decodes and fully validates a compressed public key: length, the
    /// all-zero pattern, the point-at-infinity sentinel, curve membership
    /// and subgroup membership, in that order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(Error::InputLength {
                expected: PUBLIC_KEY_SIZE,
                got: bytes.len(),
            });
        }
        if is_all_zero(bytes) {
            return Err(Error::DegenerateValue("zero public key"));
        }
        if is_infinity_sentinel(bytes) {
            return Err(Error::DegenerateValue("infinite public key"));
        }
        let mut buf = [0u8; PUBLIC_KEY_SIZE];
        buf.copy_from_slice(bytes);
        Ok(Self {
            point: E::g1_decompress(&buf)?,
        })
    }

    /// Canonical 48-byte compressed encoding.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        E::g1_compress(&self.point)
    }
}

impl<E: CurveEngine> PartialEq for PublicKey<E> {
    fn eq(&self, other: &Self) -> bool {
        E::g1_eq(&self.point, &other.point)
    }
}

impl<E: CurveEngine> Eq for PublicKey<E> {}

impl<E: CurveEngine> fmt::Debug for PublicKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey(")?;
        fmt_hex(f, &self.to_bytes())?;
        write!(f, ")")
    }
}

impl<E: CurveEngine> fmt::Display for PublicKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_hex(f, &self.to_bytes())
    }
}

impl_point_serde!(PublicKey, 48, "48 bytes of a compressed G1 point");
