//! Quantization by the quality-scaled luminance table, and the zig-zag scan.

use crate::dct::BLOCK_DIM;

/// Standard luminance quantization table. This system applies it to all
/// four channels.
pub const QUANT_TABLE: [f32; BLOCK_DIM] = [
    16.0, 11.0, 10.0, 16.0, 24.0, 40.0, 51.0, 61.0,
    12.0, 12.0, 14.0, 19.0, 26.0, 58.0, 60.0, 55.0,
    14.0, 13.0, 16.0, 24.0, 40.0, 57.0, 69.0, 56.0,
    14.0, 17.0, 22.0, 29.0, 51.0, 87.0, 80.0, 62.0,
    18.0, 22.0, 37.0, 56.0, 68.0, 109.0, 103.0, 77.0,
    24.0, 35.0, 55.0, 64.0, 81.0, 104.0, 113.0, 92.0,
    49.0, 64.0, 78.0, 87.0, 103.0, 121.0, 120.0, 101.0,
    72.0, 92.0, 95.0, 98.0, 112.0, 100.0, 103.0, 99.0,
];

/// Row-major index of the k-th coefficient in zig-zag scan order.
pub const ZIGZAG: [usize; BLOCK_DIM] = [
    0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// `q[k] = round(x[k] * quality / Q[k])`. Larger quality scales the
/// coefficients up before rounding; the decoder divides it back out.
pub fn quantize(block: &[f32; BLOCK_DIM], quality: f32) -> [i32; BLOCK_DIM] {
    let mut out = [0i32; BLOCK_DIM];
    for k in 0..BLOCK_DIM {
        out[k] = (block[k] * quality / QUANT_TABLE[k]).round() as i32;
    }
    out
}

/// `x[k] = q[k] * Q[k] / quality`.
pub fn dequantize(coeffs: &[i32; BLOCK_DIM], quality: f32) -> [f32; BLOCK_DIM] {
    let mut out = [0.0f32; BLOCK_DIM];
    for k in 0..BLOCK_DIM {
        out[k] = coeffs[k] as f32 * QUANT_TABLE[k] / quality;
    }
    out
}

/// Permutes row-major coefficients into zig-zag scan order.
pub fn zigzag(coeffs: &[i32; BLOCK_DIM]) -> [i32; BLOCK_DIM] {
    let mut out = [0i32; BLOCK_DIM];
    for k in 0..BLOCK_DIM {
        out[k] = coeffs[ZIGZAG[k]];
    }
    out
}

/// Inverse of [`zigzag`].
pub fn unzigzag(scanned: &[i32; BLOCK_DIM]) -> [i32; BLOCK_DIM] {
    let mut out = [0i32; BLOCK_DIM];
    for k in 0..BLOCK_DIM {
        out[ZIGZAG[k]] = scanned[k];
    }
    out
}
