//! Byte-layout transforms between the EIP-2537 ABI encodings and the
//! flag-free coordinate encodings the curve engines consume.
//!
//! ABI field elements are left-padded to 64 bytes; the 16 pad bytes must be
//! zero. A G2 coordinate is presented by the ABI as (c0, c1) while the
//! internal encoding carries (c1, c0), so both x and y are reordered
//! independently on decode and symmetrically on encode. The direction of
//! that swap is pinned against the published generator encodings in
//! `test_vectors.rs`, not inferred.

use crate::engine::{FP_SIZE, G1_RAW_SIZE, G2_RAW_SIZE};
use crate::error::Error;

/// Size of an ABI field element: 16 zero bytes then the 48-byte element.
pub const PADDED_FP_SIZE: usize = 64;

/// Size of an ABI G1 point: two padded field elements (x, y).
pub const G1_ABI_SIZE: usize = 2 * PADDED_FP_SIZE;

/// Size of an ABI G2 point: four padded field elements (x0, x1, y0, y1).
pub const G2_ABI_SIZE: usize = 4 * PADDED_FP_SIZE;

/// Size of the pairing operation output.
pub const PAIRING_OUTPUT_SIZE: usize = 32;

/// Strips the 64-byte ABI padding off a field element, rejecting nonzero
/// pad bytes.
pub fn decode_field_element(input: &[u8]) -> Result<[u8; FP_SIZE], Error> {
    if input.len() != PADDED_FP_SIZE {
        return Err(Error::InputLength {
            expected: PADDED_FP_SIZE,
            got: input.len(),
        });
    }
    if !input[..PADDED_FP_SIZE - FP_SIZE].iter().all(|b| *b == 0) {
        return Err(Error::Format("field element has nonzero padding bytes"));
    }
    let mut out = [0u8; FP_SIZE];
    out.copy_from_slice(&input[PADDED_FP_SIZE - FP_SIZE..]);
    Ok(out)
}

/// Pads a field element back to its 64-byte ABI form.
pub fn encode_field_element(fe: &[u8; FP_SIZE]) -> [u8; PADDED_FP_SIZE] {
    let mut out = [0u8; PADDED_FP_SIZE];
    out[PADDED_FP_SIZE - FP_SIZE..].copy_from_slice(fe);
    out
}

/// Decodes an ABI G1 point into x || y coordinates.
pub fn decode_g1_point(input: &[u8]) -> Result<[u8; G1_RAW_SIZE], Error> {
    if input.len() != G1_ABI_SIZE {
        return Err(Error::InputLength {
            expected: G1_ABI_SIZE,
            got: input.len(),
        });
    }
    let x = decode_field_element(&input[..PADDED_FP_SIZE])?;
    let y = decode_field_element(&input[PADDED_FP_SIZE..])?;
    let mut out = [0u8; G1_RAW_SIZE];
    out[..FP_SIZE].copy_from_slice(&x);
    out[FP_SIZE..].copy_from_slice(&y);
    Ok(out)
}

/// Encodes x || y coordinates into the 128-byte ABI form.
pub fn encode_g1_point(raw: &[u8; G1_RAW_SIZE]) -> [u8; G1_ABI_SIZE] {
    let mut out = [0u8; G1_ABI_SIZE];
    out[16..PADDED_FP_SIZE].copy_from_slice(&raw[..FP_SIZE]);
    out[PADDED_FP_SIZE + 16..].copy_from_slice(&raw[FP_SIZE..]);
    out
}

/// Decodes an ABI G2 point into x_c1 || x_c0 || y_c1 || y_c0 coordinates,
/// swapping the per-coordinate coefficient order.
pub fn decode_g2_point(input: &[u8]) -> Result<[u8; G2_RAW_SIZE], Error> {
    if input.len() != G2_ABI_SIZE {
        return Err(Error::InputLength {
            expected: G2_ABI_SIZE,
            got: input.len(),
        });
    }
    let x0 = decode_field_element(&input[..64])?;
    let x1 = decode_field_element(&input[64..128])?;
    let y0 = decode_field_element(&input[128..192])?;
    let y1 = decode_field_element(&input[192..])?;
    let mut out = [0u8; G2_RAW_SIZE];
    out[..48].copy_from_slice(&x1);
    out[48..96].copy_from_slice(&x0);
    out[96..144].copy_from_slice(&y1);
    out[144..].copy_from_slice(&y0);
    Ok(out)
}

/// Encodes x_c1 || x_c0 || y_c1 || y_c0 coordinates into the 256-byte ABI
/// form, swapping the per-coordinate coefficient order back.
pub fn encode_g2_point(raw: &[u8; G2_RAW_SIZE]) -> [u8; G2_ABI_SIZE] {
    let mut out = [0u8; G2_ABI_SIZE];
    out[16..64].copy_from_slice(&raw[48..96]); // x_c0
    out[80..128].copy_from_slice(&raw[..48]); // x_c1
    out[144..192].copy_from_slice(&raw[144..]); // y_c0
    out[208..].copy_from_slice(&raw[96..144]); // y_c1
    out
}

/// Encodes the outcome of a pairing check: 32 bytes, all zero except the
/// last, which is 1 exactly when the product was the identity.
pub fn encode_pairing_result(is_identity: bool) -> [u8; PAIRING_OUTPUT_SIZE] {
    let mut out = [0u8; PAIRING_OUTPUT_SIZE];
    if is_identity {
        out[PAIRING_OUTPUT_SIZE - 1] = 1;
    }
    out
}
