//! BLS signature value objects, aggregation and the pairing-based
//! verification protocols.
//!
//! Keys and signatures only come into existence through validated
//! deserialization, key generation or aggregation, so every value held by one
//! of these types is a proper group element (aggregation may transiently
//! produce the identity; it is never accepted back as input). Equality is
//! algebraic point equality, while serialization is the canonical compressed
//! encoding, deterministic and identical across engines.

use std::fmt;

/// Flag byte of the compressed point-at-infinity encoding.
const INFINITY_FLAG: u8 = 0xc0;

pub(crate) fn is_all_zero(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| *b == 0)
}

pub(crate) fn is_infinity_sentinel(bytes: &[u8]) -> bool {
    bytes[0] == INFINITY_FLAG && is_all_zero(&bytes[1..])
}

pub(crate) fn fmt_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for byte in bytes {
        write!(f, "{:02x}", byte)?;
    }
    Ok(())
}

/// Serde support routed through the canonical compressed encoding; the full
/// validation pipeline runs again on the way back in.
macro_rules! impl_point_serde {
    ($type:ident, $size:expr, $expecting:expr) => {
        impl<E: crate::engine::CurveEngine> serde::Serialize for $type<E> {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_bytes(&self.to_bytes())
            }
        }

        impl<'de, E: crate::engine::CurveEngine> serde::Deserialize<'de> for $type<E> {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<Self, D::Error> {
                struct BytesVisitor<E>(std::marker::PhantomData<E>);

                impl<'de, E: crate::engine::CurveEngine> serde::de::Visitor<'de> for BytesVisitor<E> {
                    type Value = $type<E>;

                    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                        f.write_str($expecting)
                    }

                    fn visit_bytes<Er: serde::de::Error>(
                        self,
                        v: &[u8],
                    ) -> Result<Self::Value, Er> {
                        $type::from_bytes(v).map_err(serde::de::Error::custom)
                    }

                    fn visit_seq<A: serde::de::SeqAccess<'de>>(
                        self,
                        mut seq: A,
                    ) -> Result<Self::Value, A::Error> {
                        let mut bytes = Vec::with_capacity($size);
                        while let Some(byte) = seq.next_element::<u8>()? {
                            bytes.push(byte);
                        }
                        $type::from_bytes(&bytes).map_err(serde::de::Error::custom)
                    }
                }

                deserializer.deserialize_bytes(BytesVisitor(std::marker::PhantomData))
            }
        }
    };
}

mod aggregate;
mod keys;
mod signature;

pub use aggregate::{
    aggregate_public_keys, aggregate_signatures, AggregatePublicKey, AggregateSignature,
};
pub use keys::{PublicKey, SecretKey};
pub use signature::Signature;
