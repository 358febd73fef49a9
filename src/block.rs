//! Block tiling and the two in-pipeline sample layouts.
//!
//! Color conversion and sub-sampling read pixels, so they run on the
//! interleaved layout; the transform stages are per-channel, so they run on
//! the channel-major layout. The only places the layout changes are the
//! explicit `deinterleave`/`interleave` transitions.

use crate::dct::{BLOCK_DIM, BLOCK_SIZE};

pub const CHANNELS: usize = 4;
pub const BLOCK_SAMPLES: usize = BLOCK_DIM * CHANNELS;

/// 8x8x4 tile with (R,G,B,A) interleaved per pixel:
/// sample `(i, j, c)` lives at `(i*8 + j)*4 + c`.
#[derive(Clone)]
pub struct InterleavedBlock(pub [f32; BLOCK_SAMPLES]);

/// The same tile with each channel contiguous in row-major intra-block order.
#[derive(Clone)]
pub struct PlanarBlock(pub [[f32; BLOCK_DIM]; CHANNELS]);

impl InterleavedBlock {
    pub fn deinterleave(&self) -> PlanarBlock {
        let mut planes = [[0.0f32; BLOCK_DIM]; CHANNELS];
        for (c, plane) in planes.iter_mut().enumerate() {
            for (i, sample) in plane.iter_mut().enumerate() {
                *sample = self.0[i * CHANNELS + c];
            }
        }
        PlanarBlock(planes)
    }
}

impl PlanarBlock {
    pub fn interleave(&self) -> InterleavedBlock {
        let mut samples = [0.0f32; BLOCK_SAMPLES];
        for (c, plane) in self.0.iter().enumerate() {
            for (i, &sample) in plane.iter().enumerate() {
                samples[i * CHANNELS + c] = sample;
            }
        }
        InterleavedBlock(samples)
    }
}

/// Copies the 8x8 tile at block coordinates (bx, by) out of the pixel
/// buffer. Samples beyond the image extent replicate the last valid
/// row/column.
pub fn tile_from_pixels(
    pixels: &[u8],
    width: usize,
    height: usize,
    bx: usize,
    by: usize,
) -> InterleavedBlock {
    let mut samples = [0.0f32; BLOCK_SAMPLES];
    for i in 0..BLOCK_SIZE {
        let py = (by * BLOCK_SIZE + i).min(height - 1);
        for j in 0..BLOCK_SIZE {
            let px = (bx * BLOCK_SIZE + j).min(width - 1);
            let src = (py * width + px) * CHANNELS;
            let dst = (i * BLOCK_SIZE + j) * CHANNELS;
            for c in 0..CHANNELS {
                samples[dst + c] = f32::from(pixels[src + c]);
            }
        }
    }
    InterleavedBlock(samples)
}

/// Writes the in-image portion of a decoded tile back into the pixel
/// buffer, clamping every sample to [0, 255]. The padded region is
/// discarded.
pub fn scatter_to_pixels(
    block: &InterleavedBlock,
    pixels: &mut [u8],
    width: usize,
    height: usize,
    bx: usize,
    by: usize,
) {
    for i in 0..BLOCK_SIZE {
        let py = by * BLOCK_SIZE + i;
        if py >= height {
            break;
        }
        for j in 0..BLOCK_SIZE {
            let px = bx * BLOCK_SIZE + j;
            if px >= width {
                break;
            }
            let src = (i * BLOCK_SIZE + j) * CHANNELS;
            let dst = (py * width + px) * CHANNELS;
            for c in 0..CHANNELS {
                pixels[dst + c] = block.0[src + c].clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_transitions_invert_each_other() {
        let mut samples = [0.0f32; BLOCK_SAMPLES];
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample = i as f32;
        }
        let interleaved = InterleavedBlock(samples);
        let back = interleaved.deinterleave().interleave();
        assert_eq!(&interleaved.0[..], &back.0[..]);
    }

    #[test]
    fn deinterleave_groups_channels() {
        let mut samples = [0.0f32; BLOCK_SAMPLES];
        for pixel in 0..BLOCK_DIM {
            for c in 0..CHANNELS {
                samples[pixel * CHANNELS + c] = (c * 1000 + pixel) as f32;
            }
        }
        let planar = InterleavedBlock(samples).deinterleave();
        for (c, plane) in planar.0.iter().enumerate() {
            for (pixel, &sample) in plane.iter().enumerate() {
                assert_eq!(sample, (c * 1000 + pixel) as f32);
            }
        }
    }

    #[test]
    fn tiling_replicates_edges() {
        // 9x9 image: block (1, 1) holds a single valid pixel at its origin.
        let width = 9;
        let height = 9;
        let mut pixels = vec![0u8; width * height * CHANNELS];
        for y in 0..height {
            for x in 0..width {
                let off = (y * width + x) * CHANNELS;
                pixels[off] = (10 * y + x) as u8;
            }
        }
        let corner = tile_from_pixels(&pixels, width, height, 1, 1);
        let expected = f32::from(pixels[(8 * width + 8) * CHANNELS]);
        for i in 0..BLOCK_SIZE {
            for j in 0..BLOCK_SIZE {
                assert_eq!(corner.0[(i * BLOCK_SIZE + j) * CHANNELS], expected);
            }
        }

        // Right-edge block of the same image replicates column 8 only.
        let right = tile_from_pixels(&pixels, width, height, 1, 0);
        for i in 0..BLOCK_SIZE {
            let expected = f32::from(pixels[(i * width + 8) * CHANNELS]);
            for j in 0..BLOCK_SIZE {
                assert_eq!(right.0[(i * BLOCK_SIZE + j) * CHANNELS], expected);
            }
        }
    }

    #[test]
    fn scatter_discards_padding_and_clamps() {
        let width = 5;
        let height = 5;
        let mut pixels = vec![7u8; width * height * CHANNELS];
        let mut samples = [300.0f32; BLOCK_SAMPLES];
        samples[0] = -12.0;
        scatter_to_pixels(&InterleavedBlock(samples), &mut pixels, width, height, 0, 0);
        assert_eq!(pixels[0], 0);
        assert_eq!(pixels[1], 255);
        assert_eq!(pixels[(4 * width + 4) * CHANNELS], 255);
        assert_eq!(pixels.len(), width * height * CHANNELS);
    }
}
