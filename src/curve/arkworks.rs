//! Curve engine backed by the arkworks `ark-bls12-381` stack.
//!
//! The canonical compressed codec is written out against the ZCash wire
//! format directly (flag bits in the top byte, big-endian coordinates,
//! lexicographic sign choice) so the byte-identity guarantee does not hinge
//! on a serializer's defaults. Raw coordinates are decoded through `BigInt`
//! limbs so that non-canonical field elements are rejected instead of being
//! reduced.

use ark_bls12_381::{g1, g2, Bls12_381, Fq, Fq2, Fr, G1Affine, G1Projective, G2Affine,
    G2Projective};
use ark_ec::hashing::curve_maps::wb::WBMap;
use ark_ec::hashing::map_to_curve_hasher::{MapToCurve, MapToCurveBasedHasher};
use ark_ec::hashing::HashToCurve;
use ark_ec::pairing::Pairing;
use ark_ec::short_weierstrass::SWCurveConfig;
use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::field_hashers::DefaultFieldHasher;
use ark_ff::{BigInt, BigInteger, Field, PrimeField};
use ark_std::{One, Zero};
use hkdf::Hkdf;
use sha2::{Digest, Sha256};

use crate::engine::{
    CurveEngine, FP_SIZE, G1_RAW_SIZE, G2_RAW_SIZE, PUBLIC_KEY_SIZE, SCALAR_SIZE, SECRET_KEY_SIZE,
    SIGNATURE_SIZE,
};
use crate::error::Error;

/// Salt of the IETF BLS key-generation procedure.
const KEYGEN_SALT: &[u8] = b"BLS-SIG-KEYGEN-SALT-";

/// Top-byte flag marking a compressed encoding.
const COMPRESSION_FLAG: u8 = 0x80;
/// Top-byte flag marking the point at infinity.
const INFINITY_FLAG: u8 = 0x40;
/// Top-byte flag marking the lexicographically larger y coordinate.
const SORT_FLAG: u8 = 0x20;

/// The arkworks-backed curve engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Engine;

fn fq_from_bytes(bytes: &[u8; FP_SIZE]) -> Option<Fq> {
    let mut limbs = [0u64; 6];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks(8).rev()) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        *limb = u64::from_be_bytes(buf);
    }
    // from_bigint refuses values at or above the modulus.
    Fq::from_bigint(BigInt::new(limbs))
}

fn fq_to_bytes(fe: &Fq) -> [u8; FP_SIZE] {
    let mut out = [0u8; FP_SIZE];
    out.copy_from_slice(&fe.into_bigint().to_bytes_be());
    out
}

fn fq2_from_bytes(bytes: &[u8; 2 * FP_SIZE]) -> Result<Fq2, Error> {
    // Internal layout is c1 || c0.
    let mut c1 = [0u8; FP_SIZE];
    let mut c0 = [0u8; FP_SIZE];
    c1.copy_from_slice(&bytes[..FP_SIZE]);
    c0.copy_from_slice(&bytes[FP_SIZE..]);
    match (fq_from_bytes(&c0), fq_from_bytes(&c1)) {
        (Some(c0), Some(c1)) => Ok(Fq2::new(c0, c1)),
        _ => Err(Error::Format("field element exceeds the modulus")),
    }
}

/// Whether y is the larger of y and -y, the ZCash convention behind the
/// compressed sort flag.
fn fq_lexicographically_largest(y: &Fq) -> bool {
    y.into_bigint() > (-*y).into_bigint()
}

/// Fq2 ordering per the ZCash convention: compare c1 first, then c0.
fn fq2_lexicographically_largest(y: &Fq2) -> bool {
    let neg = -*y;
    if y.c1 != neg.c1 {
        return y.c1.into_bigint() > neg.c1.into_bigint();
    }
    y.c0.into_bigint() > neg.c0.into_bigint()
}

/// Validates the flag byte of a compressed encoding. Returns the sort flag,
/// or `None` for the canonical infinity pattern.
fn compression_flags(bytes: &[u8]) -> Result<Option<bool>, Error> {
    let flags = bytes[0];
    if flags & COMPRESSION_FLAG == 0 {
        return Err(Error::Format("missing compression flag"));
    }
    if flags & INFINITY_FLAG != 0 {
        if flags != COMPRESSION_FLAG | INFINITY_FLAG || bytes[1..].iter().any(|b| *b != 0) {
            return Err(Error::Format("non-canonical infinity encoding"));
        }
        return Ok(None);
    }
    Ok(Some(flags & SORT_FLAG != 0))
}

impl CurveEngine for Engine {
    type Scalar = Fr;
    type G1 = G1Affine;
    type G2 = G2Affine;

    const NAME: &'static str = "arkworks";

    fn keygen(ikm: &[u8; SECRET_KEY_SIZE]) -> Fr {
        let mut salt = Sha256::digest(KEYGEN_SALT);
        loop {
            let mut input = Vec::with_capacity(ikm.len() + 1);
            input.extend_from_slice(ikm);
            input.push(0u8);
            let hk = Hkdf::<Sha256>::new(Some(&salt[..]), &input);
            // L = ceil(3 * ceil(log2(r)) / 16) = 48 for BLS12-381,
            // fed to HKDF-Expand as I2OSP(L, 2).
            let mut okm = [0u8; 48];
            hk.expand(&[0u8, 48u8], &mut okm)
                .expect("48 bytes is a valid HKDF expansion length");
            let sk = Fr::from_be_bytes_mod_order(&okm);
            if !sk.is_zero() {
                return sk;
            }
            salt = Sha256::digest(&salt);
        }
    }

    fn scalar_from_bytes(bytes: &[u8; SCALAR_SIZE]) -> Result<Fr, Error> {
        let mut limbs = [0u64; 4];
        for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks(8).rev()) {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            *limb = u64::from_be_bytes(buf);
        }
        Fr::from_bigint(BigInt::new(limbs)).ok_or(Error::Range)
    }

    fn scalar_from_bytes_reduced(bytes: &[u8; SCALAR_SIZE]) -> Fr {
        Fr::from_be_bytes_mod_order(bytes)
    }

    fn scalar_to_bytes(scalar: &Fr) -> [u8; SCALAR_SIZE] {
        let mut out = [0u8; SCALAR_SIZE];
        out.copy_from_slice(&scalar.into_bigint().to_bytes_be());
        out
    }

    fn scalar_eq(a: &Fr, b: &Fr) -> bool {
        a == b
    }

    fn g1_generator() -> G1Affine {
        G1Affine::generator()
    }

    fn g1_identity() -> G1Affine {
        G1Affine::zero()
    }

    fn g1_is_identity(p: &G1Affine) -> bool {
        p.is_zero()
    }

    fn g1_eq(a: &G1Affine, b: &G1Affine) -> bool {
        a == b
    }

    fn g1_add(a: &G1Affine, b: &G1Affine) -> G1Affine {
        (a.into_group() + *b).into_affine()
    }

    fn g1_mul(p: &G1Affine, s: &Fr) -> G1Affine {
        p.mul_bigint(s.into_bigint()).into_affine()
    }

    fn g1_msm(points: &[G1Affine], scalars: &[Fr]) -> G1Affine {
        G1Projective::msm_unchecked(points, scalars).into_affine()
    }

    fn g1_neg(p: &G1Affine) -> G1Affine {
        -*p
    }

    fn g1_compress(p: &G1Affine) -> [u8; PUBLIC_KEY_SIZE] {
        let mut out = [0u8; PUBLIC_KEY_SIZE];
        if p.is_zero() {
            out[0] = COMPRESSION_FLAG | INFINITY_FLAG;
            return out;
        }
        out.copy_from_slice(&fq_to_bytes(&p.x));
        out[0] |= COMPRESSION_FLAG;
        if fq_lexicographically_largest(&p.y) {
            out[0] |= SORT_FLAG;
        }
        out
    }

    fn g1_decompress(bytes: &[u8; PUBLIC_KEY_SIZE]) -> Result<G1Affine, Error> {
        let sort = match compression_flags(bytes)? {
            Some(sort) => sort,
            None => return Ok(G1Affine::zero()),
        };
        let mut x_bytes = *bytes;
        x_bytes[0] &= !(COMPRESSION_FLAG | INFINITY_FLAG | SORT_FLAG);
        let x = fq_from_bytes(&x_bytes)
            .ok_or(Error::Format("field element exceeds the modulus"))?;
        let y2 = x * x * x + g1::Config::COEFF_B;
        let mut y = y2
            .sqrt()
            .ok_or(Error::Format("point is not on the curve"))?;
        if fq_lexicographically_largest(&y) != sort {
            y = -y;
        }
        let p = G1Affine::new_unchecked(x, y);
        if !p.is_in_correct_subgroup_assuming_on_curve() {
            return Err(Error::Subgroup("g1"));
        }
        Ok(p)
    }

    fn g1_from_raw(bytes: &[u8; G1_RAW_SIZE]) -> Result<G1Affine, Error> {
        if bytes.iter().all(|b| *b == 0) {
            return Ok(G1Affine::zero());
        }
        let mut x = [0u8; FP_SIZE];
        let mut y = [0u8; FP_SIZE];
        x.copy_from_slice(&bytes[..FP_SIZE]);
        y.copy_from_slice(&bytes[FP_SIZE..]);
        match (fq_from_bytes(&x), fq_from_bytes(&y)) {
            (Some(x), Some(y)) => {
                let p = G1Affine::new_unchecked(x, y);
                if !p.is_on_curve() {
                    return Err(Error::Format("point is not on the curve"));
                }
                Ok(p)
            }
            _ => Err(Error::Format("field element exceeds the modulus")),
        }
    }

    fn g1_to_raw(p: &G1Affine) -> [u8; G1_RAW_SIZE] {
        let mut out = [0u8; G1_RAW_SIZE];
        if p.is_zero() {
            return out;
        }
        out[..FP_SIZE].copy_from_slice(&fq_to_bytes(&p.x));
        out[FP_SIZE..].copy_from_slice(&fq_to_bytes(&p.y));
        out
    }

    fn g1_in_subgroup(p: &G1Affine) -> bool {
        p.is_in_correct_subgroup_assuming_on_curve()
    }

    fn map_fp_to_g1(fe: &[u8; FP_SIZE]) -> Result<G1Affine, Error> {
        let fe = fq_from_bytes(fe).ok_or(Error::Format("field element exceeds the modulus"))?;
        let mapper = WBMap::<g1::Config>::new().map_err(|_| Error::Hashing)?;
        let point = mapper.map_to_curve(fe).map_err(|_| Error::Hashing)?;
        Ok(point.clear_cofactor())
    }

    fn g2_generator() -> G2Affine {
        G2Affine::generator()
    }

    fn g2_identity() -> G2Affine {
        G2Affine::zero()
    }

    fn g2_is_identity(p: &G2Affine) -> bool {
        p.is_zero()
    }

    fn g2_eq(a: &G2Affine, b: &G2Affine) -> bool {
        a == b
    }

    fn g2_add(a: &G2Affine, b: &G2Affine) -> G2Affine {
        (a.into_group() + *b).into_affine()
    }

    fn g2_mul(p: &G2Affine, s: &Fr) -> G2Affine {
        p.mul_bigint(s.into_bigint()).into_affine()
    }

    fn g2_msm(points: &[G2Affine], scalars: &[Fr]) -> G2Affine {
        G2Projective::msm_unchecked(points, scalars).into_affine()
    }

    fn g2_neg(p: &G2Affine) -> G2Affine {
        -*p
    }

    fn g2_compress(p: &G2Affine) -> [u8; SIGNATURE_SIZE] {
        let mut out = [0u8; SIGNATURE_SIZE];
        if p.is_zero() {
            out[0] = COMPRESSION_FLAG | INFINITY_FLAG;
            return out;
        }
        out[..FP_SIZE].copy_from_slice(&fq_to_bytes(&p.x.c1));
        out[FP_SIZE..].copy_from_slice(&fq_to_bytes(&p.x.c0));
        out[0] |= COMPRESSION_FLAG;
        if fq2_lexicographically_largest(&p.y) {
            out[0] |= SORT_FLAG;
        }
        out
    }

    fn g2_decompress(bytes: &[u8; SIGNATURE_SIZE]) -> Result<G2Affine, Error> {
        let sort = match compression_flags(bytes)? {
            Some(sort) => sort,
            None => return Ok(G2Affine::zero()),
        };
        let mut c1_bytes = [0u8; FP_SIZE];
        let mut c0_bytes = [0u8; FP_SIZE];
        c1_bytes.copy_from_slice(&bytes[..FP_SIZE]);
        c0_bytes.copy_from_slice(&bytes[FP_SIZE..]);
        c1_bytes[0] &= !(COMPRESSION_FLAG | INFINITY_FLAG | SORT_FLAG);
        let x = match (fq_from_bytes(&c0_bytes), fq_from_bytes(&c1_bytes)) {
            (Some(c0), Some(c1)) => Fq2::new(c0, c1),
            _ => return Err(Error::Format("field element exceeds the modulus")),
        };
        let y2 = x * x * x + g2::Config::COEFF_B;
        let mut y = y2
            .sqrt()
            .ok_or(Error::Format("point is not on the curve"))?;
        if fq2_lexicographically_largest(&y) != sort {
            y = -y;
        }
        let p = G2Affine::new_unchecked(x, y);
        if !p.is_in_correct_subgroup_assuming_on_curve() {
            return Err(Error::Subgroup("g2"));
        }
        Ok(p)
    }

    fn g2_from_raw(bytes: &[u8; G2_RAW_SIZE]) -> Result<G2Affine, Error> {
        if bytes.iter().all(|b| *b == 0) {
            return Ok(G2Affine::zero());
        }
        let mut x = [0u8; 2 * FP_SIZE];
        let mut y = [0u8; 2 * FP_SIZE];
        x.copy_from_slice(&bytes[..2 * FP_SIZE]);
        y.copy_from_slice(&bytes[2 * FP_SIZE..]);
        let p = G2Affine::new_unchecked(fq2_from_bytes(&x)?, fq2_from_bytes(&y)?);
        if !p.is_on_curve() {
            return Err(Error::Format("point is not on the curve"));
        }
        Ok(p)
    }

    fn g2_to_raw(p: &G2Affine) -> [u8; G2_RAW_SIZE] {
        let mut out = [0u8; G2_RAW_SIZE];
        if p.is_zero() {
            return out;
        }
        out[..FP_SIZE].copy_from_slice(&fq_to_bytes(&p.x.c1));
        out[FP_SIZE..2 * FP_SIZE].copy_from_slice(&fq_to_bytes(&p.x.c0));
        out[2 * FP_SIZE..3 * FP_SIZE].copy_from_slice(&fq_to_bytes(&p.y.c1));
        out[3 * FP_SIZE..].copy_from_slice(&fq_to_bytes(&p.y.c0));
        out
    }

    fn g2_in_subgroup(p: &G2Affine) -> bool {
        p.is_in_correct_subgroup_assuming_on_curve()
    }

    fn hash_to_g2(msg: &[u8], dst: &[u8]) -> Result<G2Affine, Error> {
        let hasher = MapToCurveBasedHasher::<
            G2Projective,
            DefaultFieldHasher<Sha256, 128>,
            WBMap<g2::Config>,
        >::new(dst)
        .map_err(|_| Error::Hashing)?;
        hasher.hash(msg).map_err(|_| Error::Hashing)
    }

    fn map_fp2_to_g2(fe: &[u8; 2 * FP_SIZE]) -> Result<G2Affine, Error> {
        let fe = fq2_from_bytes(fe)?;
        let mapper = WBMap::<g2::Config>::new().map_err(|_| Error::Hashing)?;
        let point = mapper.map_to_curve(fe).map_err(|_| Error::Hashing)?;
        Ok(point.clear_cofactor())
    }

    fn pairing_check(pairs: &[(G1Affine, G2Affine)]) -> bool {
        // Identity operands contribute the identity factor; dropping them
        // keeps both engines on the same code path for degenerate pairs.
        let mut g1s = Vec::with_capacity(pairs.len());
        let mut g2s = Vec::with_capacity(pairs.len());
        for (p, q) in pairs {
            if p.is_zero() || q.is_zero() {
                continue;
            }
            g1s.push(*p);
            g2s.push(*q);
        }
        if g1s.is_empty() {
            return true;
        }
        Bls12_381::multi_pairing(g1s, g2s).0.is_one()
    }
}
