//! EIP-2537 precompile-style operations over a curve engine.
//!
//! Every operation takes the exact ABI byte string the corresponding
//! Ethereum precompile would receive and produces the ABI-encoded result:
//! decode, delegate the arithmetic to the engine, encode. Input lengths are
//! enforced strictly, with no slack and no truncation.
//!
//! Following the reference behavior, add/mul/multi-exp operands are checked
//! for field canonicity and curve membership only; the pairing operation
//! additionally enforces subgroup membership on every operand before any
//! accumulation happens.

mod codec;

pub use codec::{
    decode_field_element, decode_g1_point, decode_g2_point, encode_field_element,
    encode_g1_point, encode_g2_point, encode_pairing_result, G1_ABI_SIZE, G2_ABI_SIZE,
    PADDED_FP_SIZE, PAIRING_OUTPUT_SIZE,
};

use std::marker::PhantomData;

use crate::engine::{CurveEngine, DST, FP_SIZE, SCALAR_SIZE};
use crate::error::Error;

/// Input size of the G1 addition operation: two ABI G1 points.
pub const G1_ADD_INPUT_SIZE: usize = 2 * G1_ABI_SIZE;

/// Input size of the G1 multiplication operation: an ABI G1 point and a
/// 32-byte scalar.
pub const G1_MUL_INPUT_SIZE: usize = G1_ABI_SIZE + SCALAR_SIZE;

/// Input size of the G2 addition operation: two ABI G2 points.
pub const G2_ADD_INPUT_SIZE: usize = 2 * G2_ABI_SIZE;

/// Input size of the G2 multiplication operation: an ABI G2 point and a
/// 32-byte scalar.
pub const G2_MUL_INPUT_SIZE: usize = G2_ABI_SIZE + SCALAR_SIZE;

/// Per-pair input size of the pairing operation.
pub const PAIRING_PAIR_SIZE: usize = G1_ABI_SIZE + G2_ABI_SIZE;

/// Input size of the Fp-to-G1 mapping operation.
pub const MAP_FP_INPUT_SIZE: usize = PADDED_FP_SIZE;

/// Input size of the Fp2-to-G2 mapping operation.
pub const MAP_FP2_INPUT_SIZE: usize = 2 * PADDED_FP_SIZE;

fn check_len(input: &[u8], expected: usize) -> Result<(), Error> {
    if input.len() != expected {
        return Err(Error::InputLength {
            expected,
            got: input.len(),
        });
    }
    Ok(())
}

fn check_multiple(input: &[u8], stride: usize) -> Result<usize, Error> {
    if input.is_empty() || input.len() % stride != 0 {
        return Err(Error::InputLength {
            expected: stride,
            got: input.len(),
        });
    }
    Ok(input.len() / stride)
}

fn scalar_at<E: CurveEngine>(input: &[u8]) -> E::Scalar {
    let mut buf = [0u8; SCALAR_SIZE];
    buf.copy_from_slice(input);
    // Multiplication operands are unconstrained 256-bit integers, reduced
    // mod r rather than range-checked.
    E::scalar_from_bytes_reduced(&buf)
}

/// The EIP-2537 operation set, bound to one curve engine.
///
/// The configuration owns the codec's domain separation tag. The crate-wide
/// [`DST`](crate::engine::DST) stays untouched; building a `Precompiles`
/// value with [`with_dst`](Self::with_dst) is the only supported override,
/// and it is scoped to that value.
#[derive(Clone, Debug)]
pub struct Precompiles<E: CurveEngine> {
    dst: Vec<u8>,
    _engine: PhantomData<E>,
}

impl<E: CurveEngine> Default for Precompiles<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CurveEngine> Precompiles<E> {
    /// Operations under the published signature-suite DST.
    pub fn new() -> Self {
        Self::with_dst(DST)
    }

    /// Operations under a caller-chosen DST for any hashing performed in
    /// this codec context.
    pub fn with_dst(dst: impl Into<Vec<u8>>) -> Self {
        Self {
            dst: dst.into(),
            _engine: PhantomData,
        }
    }

    /// The domain separation tag bound to this codec context.
    pub fn dst(&self) -> &[u8] {
        &self.dst
    }

    /// G1 addition: 256 bytes in (two G1 points), 128 bytes out.
    pub fn g1_add(&self, input: &[u8]) -> Result<[u8; G1_ABI_SIZE], Error> {
        check_len(input, G1_ADD_INPUT_SIZE)?;
        let p0 = E::g1_from_raw(&decode_g1_point(&input[..G1_ABI_SIZE])?)?;
        let p1 = E::g1_from_raw(&decode_g1_point(&input[G1_ABI_SIZE..])?)?;
        Ok(encode_g1_point(&E::g1_to_raw(&E::g1_add(&p0, &p1))))
    }

    /// G1 scalar multiplication: 160 bytes in (a G1 point and a scalar),
    /// 128 bytes out.
    pub fn g1_mul(&self, input: &[u8]) -> Result<[u8; G1_ABI_SIZE], Error> {
        check_len(input, G1_MUL_INPUT_SIZE)?;
        let p = E::g1_from_raw(&decode_g1_point(&input[..G1_ABI_SIZE])?)?;
        let e = scalar_at::<E>(&input[G1_ABI_SIZE..]);
        Ok(encode_g1_point(&E::g1_to_raw(&E::g1_mul(&p, &e))))
    }

    /// G1 multi-scalar multiplication: 160·k bytes in (k ≥ 1 point/scalar
    /// pairs), 128 bytes out.
    pub fn g1_multi_exp(&self, input: &[u8]) -> Result<[u8; G1_ABI_SIZE], Error> {
        let k = check_multiple(input, G1_MUL_INPUT_SIZE)?;
        let mut points = Vec::with_capacity(k);
        let mut scalars = Vec::with_capacity(k);
        for pair in input.chunks(G1_MUL_INPUT_SIZE) {
            points.push(E::g1_from_raw(&decode_g1_point(&pair[..G1_ABI_SIZE])?)?);
            scalars.push(scalar_at::<E>(&pair[G1_ABI_SIZE..]));
        }
        Ok(encode_g1_point(&E::g1_to_raw(&E::g1_msm(
            &points, &scalars,
        ))))
    }

    /// G2 addition: 512 bytes in (two G2 points), 256 bytes out.
    pub fn g2_add(&self, input: &[u8]) -> Result<[u8; G2_ABI_SIZE], Error> {
        check_len(input, G2_ADD_INPUT_SIZE)?;
        let p0 = E::g2_from_raw(&decode_g2_point(&input[..G2_ABI_SIZE])?)?;
        let p1 = E::g2_from_raw(&decode_g2_point(&input[G2_ABI_SIZE..])?)?;
        Ok(encode_g2_point(&E::g2_to_raw(&E::g2_add(&p0, &p1))))
    }

    /// G2 scalar multiplication: 288 bytes in (a G2 point and a scalar),
    /// 256 bytes out.
    pub fn g2_mul(&self, input: &[u8]) -> Result<[u8; G2_ABI_SIZE], Error> {
        check_len(input, G2_MUL_INPUT_SIZE)?;
        let p = E::g2_from_raw(&decode_g2_point(&input[..G2_ABI_SIZE])?)?;
        let e = scalar_at::<E>(&input[G2_ABI_SIZE..]);
        Ok(encode_g2_point(&E::g2_to_raw(&E::g2_mul(&p, &e))))
    }

    /// G2 multi-scalar multiplication: 288·k bytes in (k ≥ 1 point/scalar
    /// pairs), 256 bytes out.
    pub fn g2_multi_exp(&self, input: &[u8]) -> Result<[u8; G2_ABI_SIZE], Error> {
        let k = check_multiple(input, G2_MUL_INPUT_SIZE)?;
        let mut points = Vec::with_capacity(k);
        let mut scalars = Vec::with_capacity(k);
        for pair in input.chunks(G2_MUL_INPUT_SIZE) {
            points.push(E::g2_from_raw(&decode_g2_point(&pair[..G2_ABI_SIZE])?)?);
            scalars.push(scalar_at::<E>(&pair[G2_ABI_SIZE..]));
        }
        Ok(encode_g2_point(&E::g2_to_raw(&E::g2_msm(
            &points, &scalars,
        ))))
    }

    /// Pairing check: 384·k bytes in (k ≥ 1 G1/G2 pairs), 32 bytes out.
    ///
    /// Every operand is subgroup-checked before any pair enters the
    /// accumulator; a failure aborts the whole operation. The output's
    /// final byte is 1 exactly when the accumulated product equals the
    /// multiplicative identity.
    pub fn pairing(&self, input: &[u8]) -> Result<[u8; PAIRING_OUTPUT_SIZE], Error> {
        let k = check_multiple(input, PAIRING_PAIR_SIZE)?;
        let mut pairs = Vec::with_capacity(k);
        for chunk in input.chunks(PAIRING_PAIR_SIZE) {
            let p = E::g1_from_raw(&decode_g1_point(&chunk[..G1_ABI_SIZE])?)?;
            let q = E::g2_from_raw(&decode_g2_point(&chunk[G1_ABI_SIZE..])?)?;
            if !E::g1_in_subgroup(&p) {
                return Err(Error::Subgroup("g1"));
            }
            if !E::g2_in_subgroup(&q) {
                return Err(Error::Subgroup("g2"));
            }
            pairs.push((p, q));
        }
        Ok(encode_pairing_result(E::pairing_check(&pairs)))
    }

    /// Maps a base field element onto G1: 64 bytes in, 128 bytes out.
    pub fn map_fp_to_g1(&self, input: &[u8]) -> Result<[u8; G1_ABI_SIZE], Error> {
        check_len(input, MAP_FP_INPUT_SIZE)?;
        let fe = decode_field_element(input)?;
        Ok(encode_g1_point(&E::g1_to_raw(&E::map_fp_to_g1(&fe)?)))
    }

    /// Maps a quadratic extension field element onto G2: 128 bytes in
    /// (c0 then c1), 256 bytes out.
    pub fn map_fp2_to_g2(&self, input: &[u8]) -> Result<[u8; G2_ABI_SIZE], Error> {
        check_len(input, MAP_FP2_INPUT_SIZE)?;
        let c0 = decode_field_element(&input[..PADDED_FP_SIZE])?;
        let c1 = decode_field_element(&input[PADDED_FP_SIZE..])?;
        let mut fe = [0u8; 2 * FP_SIZE];
        fe[..FP_SIZE].copy_from_slice(&c1);
        fe[FP_SIZE..].copy_from_slice(&c0);
        Ok(encode_g2_point(&E::g2_to_raw(&E::map_fp2_to_g2(&fe)?)))
    }
}
