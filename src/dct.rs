//! Forward and inverse 8x8 type-II DCT with orthonormal scaling.

use std::f32::consts::{FRAC_1_SQRT_2, PI};
use std::sync::OnceLock;

pub const BLOCK_SIZE: usize = 8;
pub const BLOCK_DIM: usize = BLOCK_SIZE * BLOCK_SIZE;

const LEVEL_SHIFT: f32 = 128.0;

/// Basis matrix `M[u][x] = C(u)/2 * cos((2x+1)u*pi/16)`, `C(0) = 1/sqrt(2)`.
/// The transform is two matrix multiplies: `X = M * B * M^T`.
fn basis() -> &'static [[f32; BLOCK_SIZE]; BLOCK_SIZE] {
    static BASIS: OnceLock<[[f32; BLOCK_SIZE]; BLOCK_SIZE]> = OnceLock::new();
    BASIS.get_or_init(|| {
        let mut m = [[0.0f32; BLOCK_SIZE]; BLOCK_SIZE];
        for (u, row) in m.iter_mut().enumerate() {
            for (x, entry) in row.iter_mut().enumerate() {
                let scale = if u == 0 { FRAC_1_SQRT_2 } else { 1.0 };
                *entry = 0.5 * scale * (((2 * x + 1) * u) as f32 * PI / 16.0).cos();
            }
        }
        m
    })
}

/// Level-shifts by -128 and transforms one channel-major block in place.
pub fn forward_dct(block: &mut [f32; BLOCK_DIM]) {
    let m = basis();
    let mut shifted = *block;
    for sample in shifted.iter_mut() {
        *sample -= LEVEL_SHIFT;
    }

    let mut temp = [0.0f32; BLOCK_DIM];
    for i in 0..BLOCK_SIZE {
        for j in 0..BLOCK_SIZE {
            let mut sum = 0.0;
            for k in 0..BLOCK_SIZE {
                sum += m[i][k] * shifted[k * BLOCK_SIZE + j];
            }
            temp[i * BLOCK_SIZE + j] = sum;
        }
    }
    for i in 0..BLOCK_SIZE {
        for j in 0..BLOCK_SIZE {
            let mut sum = 0.0;
            for k in 0..BLOCK_SIZE {
                sum += temp[i * BLOCK_SIZE + k] * m[j][k];
            }
            block[i * BLOCK_SIZE + j] = sum;
        }
    }
}

/// Inverse transform; adds the +128 level shift back.
pub fn inverse_dct(block: &mut [f32; BLOCK_DIM]) {
    let m = basis();
    let coeffs = *block;

    let mut temp = [0.0f32; BLOCK_DIM];
    for i in 0..BLOCK_SIZE {
        for j in 0..BLOCK_SIZE {
            let mut sum = 0.0;
            for k in 0..BLOCK_SIZE {
                sum += m[k][i] * coeffs[k * BLOCK_SIZE + j];
            }
            temp[i * BLOCK_SIZE + j] = sum;
        }
    }
    for i in 0..BLOCK_SIZE {
        for j in 0..BLOCK_SIZE {
            let mut sum = 0.0;
            for k in 0..BLOCK_SIZE {
                sum += temp[i * BLOCK_SIZE + k] * m[k][j];
            }
            block[i * BLOCK_SIZE + j] = sum + LEVEL_SHIFT;
        }
    }
}
