//! RGB <-> YCbCr conversion (JFIF constants) and 4:2:0 chroma averaging.

use crate::block::InterleavedBlock;
use crate::dct::{BLOCK_DIM, BLOCK_SIZE};

/// Converts channels 0..2 of an interleaved block to Y, Cb, Cr. Alpha is
/// carried through the pipeline as a fourth channel and is not touched.
pub fn rgb_to_ycbcr(block: &mut InterleavedBlock) {
    for pixel in block.0.chunks_exact_mut(4) {
        let (r, g, b) = (pixel[0], pixel[1], pixel[2]);
        pixel[0] = 0.299 * r + 0.587 * g + 0.114 * b;
        pixel[1] = 128.0 - 0.168736 * r - 0.331264 * g + 0.5 * b;
        pixel[2] = 128.0 + 0.5 * r - 0.418688 * g - 0.081312 * b;
    }
}

pub fn ycbcr_to_rgb(block: &mut InterleavedBlock) {
    for pixel in block.0.chunks_exact_mut(4) {
        let (y, cb, cr) = (pixel[0], pixel[1], pixel[2]);
        pixel[0] = y + 1.402 * (cr - 128.0);
        pixel[1] = y - 0.344136 * (cb - 128.0) - 0.714136 * (cr - 128.0);
        pixel[2] = y + 1.772 * (cb - 128.0);
    }
}

/// Averages each 2x2 cell of one channel-major plane and broadcasts the
/// average back to all four positions. Decoding needs no explicit
/// up-sample: the broadcast already is the reconstruction.
pub fn downsample_420(plane: &mut [f32; BLOCK_DIM]) {
    for i in (0..BLOCK_SIZE).step_by(2) {
        for j in (0..BLOCK_SIZE).step_by(2) {
            let row = i * BLOCK_SIZE + j;
            let next = (i + 1) * BLOCK_SIZE + j;
            let avg = (plane[row] + plane[row + 1] + plane[next] + plane[next + 1]) * 0.25;
            plane[row] = avg;
            plane[row + 1] = avg;
            plane[next] = avg;
            plane[next + 1] = avg;
        }
    }
}
