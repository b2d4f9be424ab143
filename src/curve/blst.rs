//! Curve engine backed by the `blst` bindings.
//!
//! Points are held in affine form, which is canonical: two handles describe
//! the same point exactly when their coordinates match, and the identity is
//! the all-zero affine struct. Arithmetic round-trips through the projective
//! representation blst operates on.

use std::mem::MaybeUninit;
use std::ptr;

use ::blst::{
    blst_bendian_from_scalar, blst_fp, blst_fp2, blst_fp_from_bendian, blst_fr,
    blst_fr_from_scalar, blst_hash_to_g2, blst_keygen, blst_map_to_g1, blst_map_to_g2, blst_p1,
    blst_p1_add_or_double, blst_p1_affine, blst_p1_affine_in_g1, blst_p1_affine_is_equal,
    blst_p1_affine_is_inf, blst_p1_affine_serialize, blst_p1_cneg, blst_p1_compress,
    blst_p1_deserialize, blst_p1_from_affine, blst_p1_mult, blst_p1_to_affine, blst_p1_uncompress,
    blst_p1s_mult_pippenger, blst_p1s_mult_pippenger_scratch_sizeof, blst_p2,
    blst_p2_add_or_double, blst_p2_affine, blst_p2_affine_in_g2, blst_p2_affine_is_equal,
    blst_p2_affine_is_inf, blst_p2_affine_serialize, blst_p2_cneg, blst_p2_compress,
    blst_p2_deserialize, blst_p2_from_affine, blst_p2_mult, blst_p2_to_affine, blst_p2_uncompress,
    blst_p2s_mult_pippenger, blst_p2s_mult_pippenger_scratch_sizeof, blst_scalar,
    blst_scalar_from_be_bytes, blst_scalar_from_bendian, blst_scalar_from_fr,
    blst_scalar_fr_check, Pairing, BLS12_381_G1, BLS12_381_G2, BLST_ERROR,
};

use crate::engine::{
    CurveEngine, DST, FP_SIZE, G1_RAW_SIZE, G2_RAW_SIZE, PUBLIC_KEY_SIZE, SCALAR_SIZE,
    SECRET_KEY_SIZE, SIGNATURE_SIZE,
};
use crate::error::Error;

/// Effective bit length of the group order r. Using the full width keeps the
/// multiplication constant-time over the whole scalar range.
const SCALAR_BITS: usize = 255;

/// Base field modulus p, big-endian. Raw coordinate decoding must reject
/// anything at or above it.
const MODULUS: [u8; FP_SIZE] = [
    0x1a, 0x01, 0x11, 0xea, 0x39, 0x7f, 0xe6, 0x9a, 0x4b, 0x1b, 0xa7, 0xb6, 0x43, 0x4b, 0xac,
    0xd7, 0x64, 0x77, 0x4b, 0x84, 0xf3, 0x85, 0x12, 0xbf, 0x67, 0x30, 0xd2, 0xa0, 0xf6, 0xb0,
    0xf6, 0x24, 0x1e, 0xab, 0xff, 0xfe, 0xb1, 0x53, 0xff, 0xff, 0xb9, 0xfe, 0xff, 0xff, 0xff,
    0xff, 0xaa, 0xab,
];

/// The `blst`-backed curve engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Engine;

fn fe_is_canonical(fe: &[u8]) -> bool {
    fe < &MODULUS[..]
}

fn fr_to_scalar(fr: &blst_fr) -> blst_scalar {
    let mut scalar = blst_scalar::default();
    // SAFETY: both pointers are valid and properly aligned.
    unsafe { blst_scalar_from_fr(&mut scalar, fr) };
    scalar
}

fn p1_projective(a: &blst_p1_affine) -> blst_p1 {
    let mut p = blst_p1::default();
    // SAFETY: both pointers are valid; blst_p1_from_affine handles infinity.
    unsafe { blst_p1_from_affine(&mut p, a) };
    p
}

fn p1_affine(p: &blst_p1) -> blst_p1_affine {
    let mut a = blst_p1_affine::default();
    // SAFETY: both pointers are valid and properly aligned.
    unsafe { blst_p1_to_affine(&mut a, p) };
    a
}

fn p2_projective(a: &blst_p2_affine) -> blst_p2 {
    let mut p = blst_p2::default();
    // SAFETY: both pointers are valid; blst_p2_from_affine handles infinity.
    unsafe { blst_p2_from_affine(&mut p, a) };
    p
}

fn p2_affine(p: &blst_p2) -> blst_p2_affine {
    let mut a = blst_p2_affine::default();
    // SAFETY: both pointers are valid and properly aligned.
    unsafe { blst_p2_to_affine(&mut a, p) };
    a
}

fn fp_from_bendian(fe: &[u8; FP_SIZE]) -> Result<blst_fp, Error> {
    if !fe_is_canonical(fe) {
        return Err(Error::Format("field element exceeds the modulus"));
    }
    let mut fp = blst_fp::default();
    // SAFETY: fe is a valid 48-byte buffer below the modulus.
    unsafe { blst_fp_from_bendian(&mut fp, fe.as_ptr()) };
    Ok(fp)
}

fn uncompress_error(err: BLST_ERROR, group: &'static str) -> Error {
    match err {
        BLST_ERROR::BLST_POINT_NOT_IN_GROUP => Error::Subgroup(group),
        BLST_ERROR::BLST_POINT_NOT_ON_CURVE => Error::Format("point is not on the curve"),
        _ => Error::Format("invalid point encoding"),
    }
}

impl CurveEngine for Engine {
    type Scalar = blst_fr;
    type G1 = blst_p1_affine;
    type G2 = blst_p2_affine;

    const NAME: &'static str = "blst";

    fn keygen(ikm: &[u8; SECRET_KEY_SIZE]) -> blst_fr {
        let mut fr = blst_fr::default();
        // SAFETY: ikm is a valid 32-byte buffer; blst_keygen accepts a null
        // key_info pointer and always yields a nonzero scalar below r.
        unsafe {
            let mut scalar = blst_scalar::default();
            blst_keygen(&mut scalar, ikm.as_ptr(), ikm.len(), ptr::null(), 0);
            blst_fr_from_scalar(&mut fr, &scalar);
        }
        fr
    }

    fn scalar_from_bytes(bytes: &[u8; SCALAR_SIZE]) -> Result<blst_fr, Error> {
        let mut fr = blst_fr::default();
        // SAFETY: bytes is a valid 32-byte buffer; blst_scalar_fr_check
        // verifies the value is below r before the Montgomery conversion.
        unsafe {
            let mut scalar = blst_scalar::default();
            blst_scalar_from_bendian(&mut scalar, bytes.as_ptr());
            if !blst_scalar_fr_check(&scalar) {
                return Err(Error::Range);
            }
            blst_fr_from_scalar(&mut fr, &scalar);
        }
        Ok(fr)
    }

    fn scalar_from_bytes_reduced(bytes: &[u8; SCALAR_SIZE]) -> blst_fr {
        let mut fr = blst_fr::default();
        // SAFETY: bytes is a valid 32-byte buffer; blst_scalar_from_be_bytes
        // reduces arbitrary big-endian input mod r.
        unsafe {
            let mut scalar = blst_scalar::default();
            blst_scalar_from_be_bytes(&mut scalar, bytes.as_ptr(), bytes.len());
            blst_fr_from_scalar(&mut fr, &scalar);
        }
        fr
    }

    fn scalar_to_bytes(scalar: &blst_fr) -> [u8; SCALAR_SIZE] {
        let mut out = [0u8; SCALAR_SIZE];
        // SAFETY: blst_bendian_from_scalar writes exactly 32 bytes.
        unsafe {
            let scalar = fr_to_scalar(scalar);
            blst_bendian_from_scalar(out.as_mut_ptr(), &scalar);
        }
        out
    }

    fn scalar_eq(a: &blst_fr, b: &blst_fr) -> bool {
        a.l == b.l
    }

    fn g1_generator() -> blst_p1_affine {
        // SAFETY: BLS12_381_G1 is the generator constant exported by blst.
        unsafe { BLS12_381_G1 }
    }

    fn g1_identity() -> blst_p1_affine {
        blst_p1_affine::default()
    }

    fn g1_is_identity(p: &blst_p1_affine) -> bool {
        // SAFETY: p is a valid affine point.
        unsafe { blst_p1_affine_is_inf(p) }
    }

    fn g1_eq(a: &blst_p1_affine, b: &blst_p1_affine) -> bool {
        // SAFETY: both pointers are valid affine points.
        unsafe { blst_p1_affine_is_equal(a, b) }
    }

    fn g1_add(a: &blst_p1_affine, b: &blst_p1_affine) -> blst_p1_affine {
        let mut out = blst_p1::default();
        let a = p1_projective(a);
        // SAFETY: blst_p1_add_or_double handles doubling and infinity inputs.
        unsafe { blst_p1_add_or_double(&mut out, &a, &p1_projective(b)) };
        p1_affine(&out)
    }

    fn g1_mul(p: &blst_p1_affine, s: &blst_fr) -> blst_p1_affine {
        let mut out = blst_p1::default();
        let p = p1_projective(p);
        let scalar = fr_to_scalar(s);
        // SAFETY: the scalar buffer holds SCALAR_BITS significant bits.
        unsafe { blst_p1_mult(&mut out, &p, scalar.b.as_ptr(), SCALAR_BITS) };
        p1_affine(&out)
    }

    fn g1_msm(points: &[blst_p1_affine], scalars: &[blst_fr]) -> blst_p1_affine {
        // blst's Pippenger does not tolerate infinity inputs, so identity
        // points and zero scalars are dropped up front; their terms are the
        // identity anyway.
        let zero = blst_fr::default();
        let mut points_filtered = Vec::with_capacity(points.len());
        let mut scalars_filtered = Vec::with_capacity(scalars.len());
        for (point, scalar) in points.iter().zip(scalars.iter()) {
            if Self::g1_is_identity(point) || Self::scalar_eq(scalar, &zero) {
                continue;
            }
            points_filtered.push(*point);
            scalars_filtered.push(fr_to_scalar(scalar));
        }
        if points_filtered.is_empty() {
            return Self::g1_identity();
        }

        let point_ptrs: Vec<*const blst_p1_affine> =
            points_filtered.iter().map(|p| p as *const _).collect();
        let scalar_ptrs: Vec<*const u8> = scalars_filtered.iter().map(|s| s.b.as_ptr()).collect();

        // SAFETY: the pointer arrays reference the filtered vectors, which
        // outlive the call; the scratch buffer has the size blst asks for.
        let mut out = blst_p1::default();
        unsafe {
            let scratch_size = blst_p1s_mult_pippenger_scratch_sizeof(point_ptrs.len());
            let mut scratch = vec![MaybeUninit::<u64>::uninit(); (scratch_size + 7) / 8];
            blst_p1s_mult_pippenger(
                &mut out,
                point_ptrs.as_ptr(),
                point_ptrs.len(),
                scalar_ptrs.as_ptr(),
                SCALAR_BITS,
                scratch.as_mut_ptr() as *mut _,
            );
        }
        p1_affine(&out)
    }

    fn g1_neg(p: &blst_p1_affine) -> blst_p1_affine {
        let mut out = p1_projective(p);
        // SAFETY: out is a valid projective point.
        unsafe { blst_p1_cneg(&mut out, true) };
        p1_affine(&out)
    }

    fn g1_compress(p: &blst_p1_affine) -> [u8; PUBLIC_KEY_SIZE] {
        let mut out = [0u8; PUBLIC_KEY_SIZE];
        let p = p1_projective(p);
        // SAFETY: blst_p1_compress writes exactly 48 bytes.
        unsafe { blst_p1_compress(out.as_mut_ptr(), &p) };
        out
    }

    fn g1_decompress(bytes: &[u8; PUBLIC_KEY_SIZE]) -> Result<blst_p1_affine, Error> {
        let mut affine = blst_p1_affine::default();
        // SAFETY: bytes is a valid 48-byte buffer; blst_p1_uncompress
        // validates the encoding and curve membership.
        unsafe {
            match blst_p1_uncompress(&mut affine, bytes.as_ptr()) {
                BLST_ERROR::BLST_SUCCESS => {}
                err => return Err(uncompress_error(err, "g1")),
            }
            if !blst_p1_affine_in_g1(&affine) {
                return Err(Error::Subgroup("g1"));
            }
        }
        Ok(affine)
    }

    fn g1_from_raw(bytes: &[u8; G1_RAW_SIZE]) -> Result<blst_p1_affine, Error> {
        if bytes.iter().all(|b| *b == 0) {
            return Ok(Self::g1_identity());
        }
        // Canonicity must be checked up front: a coordinate at or above the
        // modulus could set the bits blst_p1_deserialize reads as
        // compression flags and change how the buffer is parsed.
        for fe in bytes.chunks(FP_SIZE) {
            if !fe_is_canonical(fe) {
                return Err(Error::Format("field element exceeds the modulus"));
            }
        }
        let mut affine = blst_p1_affine::default();
        // SAFETY: bytes is a valid 96-byte buffer with all flag bits clear.
        unsafe {
            match blst_p1_deserialize(&mut affine, bytes.as_ptr()) {
                BLST_ERROR::BLST_SUCCESS => {}
                BLST_ERROR::BLST_POINT_NOT_ON_CURVE => {
                    return Err(Error::Format("point is not on the curve"))
                }
                _ => return Err(Error::Format("invalid point coordinates")),
            }
        }
        Ok(affine)
    }

    fn g1_to_raw(p: &blst_p1_affine) -> [u8; G1_RAW_SIZE] {
        let mut out = [0u8; G1_RAW_SIZE];
        if Self::g1_is_identity(p) {
            return out;
        }
        // SAFETY: blst_p1_affine_serialize writes exactly 96 bytes.
        unsafe { blst_p1_affine_serialize(out.as_mut_ptr(), p) };
        out
    }

    fn g1_in_subgroup(p: &blst_p1_affine) -> bool {
        // SAFETY: p is a valid affine point.
        unsafe { blst_p1_affine_in_g1(p) }
    }

    fn map_fp_to_g1(fe: &[u8; FP_SIZE]) -> Result<blst_p1_affine, Error> {
        let fp = fp_from_bendian(fe)?;
        let mut out = blst_p1::default();
        // SAFETY: blst_map_to_g1 accepts a null second coordinate and clears
        // the cofactor itself.
        unsafe { blst_map_to_g1(&mut out, &fp, ptr::null()) };
        Ok(p1_affine(&out))
    }

    fn g2_generator() -> blst_p2_affine {
        // SAFETY: BLS12_381_G2 is the generator constant exported by blst.
        unsafe { BLS12_381_G2 }
    }

    fn g2_identity() -> blst_p2_affine {
        blst_p2_affine::default()
    }

    fn g2_is_identity(p: &blst_p2_affine) -> bool {
        // SAFETY: p is a valid affine point.
        unsafe { blst_p2_affine_is_inf(p) }
    }

    fn g2_eq(a: &blst_p2_affine, b: &blst_p2_affine) -> bool {
        // SAFETY: both pointers are valid affine points.
        unsafe { blst_p2_affine_is_equal(a, b) }
    }

    fn g2_add(a: &blst_p2_affine, b: &blst_p2_affine) -> blst_p2_affine {
        let mut out = blst_p2::default();
        let a = p2_projective(a);
        // SAFETY: blst_p2_add_or_double handles doubling and infinity inputs.
        unsafe { blst_p2_add_or_double(&mut out, &a, &p2_projective(b)) };
        p2_affine(&out)
    }

    fn g2_mul(p: &blst_p2_affine, s: &blst_fr) -> blst_p2_affine {
        let mut out = blst_p2::default();
        let p = p2_projective(p);
        let scalar = fr_to_scalar(s);
        // SAFETY: the scalar buffer holds SCALAR_BITS significant bits.
        unsafe { blst_p2_mult(&mut out, &p, scalar.b.as_ptr(), SCALAR_BITS) };
        p2_affine(&out)
    }

    fn g2_msm(points: &[blst_p2_affine], scalars: &[blst_fr]) -> blst_p2_affine {
        let zero = blst_fr::default();
        let mut points_filtered = Vec::with_capacity(points.len());
        let mut scalars_filtered = Vec::with_capacity(scalars.len());
        for (point, scalar) in points.iter().zip(scalars.iter()) {
            if Self::g2_is_identity(point) || Self::scalar_eq(scalar, &zero) {
                continue;
            }
            points_filtered.push(*point);
            scalars_filtered.push(fr_to_scalar(scalar));
        }
        if points_filtered.is_empty() {
            return Self::g2_identity();
        }

        let point_ptrs: Vec<*const blst_p2_affine> =
            points_filtered.iter().map(|p| p as *const _).collect();
        let scalar_ptrs: Vec<*const u8> = scalars_filtered.iter().map(|s| s.b.as_ptr()).collect();

        // SAFETY: as in g1_msm; the filtered vectors outlive the call.
        let mut out = blst_p2::default();
        unsafe {
            let scratch_size = blst_p2s_mult_pippenger_scratch_sizeof(point_ptrs.len());
            let mut scratch = vec![MaybeUninit::<u64>::uninit(); (scratch_size + 7) / 8];
            blst_p2s_mult_pippenger(
                &mut out,
                point_ptrs.as_ptr(),
                point_ptrs.len(),
                scalar_ptrs.as_ptr(),
                SCALAR_BITS,
                scratch.as_mut_ptr() as *mut _,
            );
        }
        p2_affine(&out)
    }

    fn g2_neg(p: &blst_p2_affine) -> blst_p2_affine {
        let mut out = p2_projective(p);
        // SAFETY: out is a valid projective point.
        unsafe { blst_p2_cneg(&mut out, true) };
        p2_affine(&out)
    }

    fn g2_compress(p: &blst_p2_affine) -> [u8; SIGNATURE_SIZE] {
        let mut out = [0u8; SIGNATURE_SIZE];
        let p = p2_projective(p);
        // SAFETY: blst_p2_compress writes exactly 96 bytes.
        unsafe { blst_p2_compress(out.as_mut_ptr(), &p) };
        out
    }

    fn g2_decompress(bytes: &[u8; SIGNATURE_SIZE]) -> Result<blst_p2_affine, Error> {
        let mut affine = blst_p2_affine::default();
        // SAFETY: bytes is a valid 96-byte buffer; blst_p2_uncompress
        // validates the encoding and curve membership.
        unsafe {
            match blst_p2_uncompress(&mut affine, bytes.as_ptr()) {
                BLST_ERROR::BLST_SUCCESS => {}
                err => return Err(uncompress_error(err, "g2")),
            }
            if !blst_p2_affine_in_g2(&affine) {
                return Err(Error::Subgroup("g2"));
            }
        }
        Ok(affine)
    }

    fn g2_from_raw(bytes: &[u8; G2_RAW_SIZE]) -> Result<blst_p2_affine, Error> {
        if bytes.iter().all(|b| *b == 0) {
            return Ok(Self::g2_identity());
        }
        // As in g1_from_raw: reject non-canonical coefficients before blst
        // gets a chance to read them as serialization flags.
        for fe in bytes.chunks(FP_SIZE) {
            if !fe_is_canonical(fe) {
                return Err(Error::Format("field element exceeds the modulus"));
            }
        }
        let mut affine = blst_p2_affine::default();
        // SAFETY: bytes is a valid 192-byte buffer with all flag bits clear.
        unsafe {
            match blst_p2_deserialize(&mut affine, bytes.as_ptr()) {
                BLST_ERROR::BLST_SUCCESS => {}
                BLST_ERROR::BLST_POINT_NOT_ON_CURVE => {
                    return Err(Error::Format("point is not on the curve"))
                }
                _ => return Err(Error::Format("invalid point coordinates")),
            }
        }
        Ok(affine)
    }

    fn g2_to_raw(p: &blst_p2_affine) -> [u8; G2_RAW_SIZE] {
        let mut out = [0u8; G2_RAW_SIZE];
        if Self::g2_is_identity(p) {
            return out;
        }
        // SAFETY: blst_p2_affine_serialize writes exactly 192 bytes.
        unsafe { blst_p2_affine_serialize(out.as_mut_ptr(), p) };
        out
    }

    fn g2_in_subgroup(p: &blst_p2_affine) -> bool {
        // SAFETY: p is a valid affine point.
        unsafe { blst_p2_affine_in_g2(p) }
    }

    fn hash_to_g2(msg: &[u8], dst: &[u8]) -> Result<blst_p2_affine, Error> {
        let mut out = blst_p2::default();
        // SAFETY: all buffers are valid; blst handles empty messages, and the
        // augmentation string is unused.
        unsafe {
            blst_hash_to_g2(
                &mut out,
                msg.as_ptr(),
                msg.len(),
                dst.as_ptr(),
                dst.len(),
                ptr::null(),
                0,
            );
        }
        Ok(p2_affine(&out))
    }

    fn map_fp2_to_g2(fe: &[u8; 2 * FP_SIZE]) -> Result<blst_p2_affine, Error> {
        let mut c1 = [0u8; FP_SIZE];
        let mut c0 = [0u8; FP_SIZE];
        c1.copy_from_slice(&fe[..FP_SIZE]);
        c0.copy_from_slice(&fe[FP_SIZE..]);
        let fp2 = blst_fp2 {
            fp: [fp_from_bendian(&c0)?, fp_from_bendian(&c1)?],
        };
        let mut out = blst_p2::default();
        // SAFETY: blst_map_to_g2 accepts a null second coordinate and clears
        // the cofactor itself.
        unsafe { blst_map_to_g2(&mut out, &fp2, ptr::null()) };
        Ok(p2_affine(&out))
    }

    fn pairing_check(pairs: &[(blst_p1_affine, blst_p2_affine)]) -> bool {
        // Identity operands contribute the identity to the product and the
        // miller loop does not accept them, so they are skipped.
        let mut ctx = Pairing::new(true, DST);
        let mut accumulated = false;
        for (p, q) in pairs {
            if Self::g1_is_identity(p) || Self::g2_is_identity(q) {
                continue;
            }
            ctx.raw_aggregate(q, p);
            accumulated = true;
        }
        if !accumulated {
            return true;
        }
        ctx.commit();
        ctx.finalverify(None)
    }
}
