//! Pipeline driver: owns the RGBA pixel surface and orchestrates the
//! per-block encode/decode stages.

use std::fs;
use std::path::Path;

use log::{debug, info};
use rayon::prelude::*;

use crate::bitstream::{BitStream, StreamBacking};
use crate::block::{self, InterleavedBlock, PlanarBlock, CHANNELS};
use crate::color;
use crate::container::{self, Header};
use crate::dct;
use crate::error::CodecError;
use crate::quantization;
use crate::scan_decoder;
use crate::scan_encoder;

/// Per-channel evaluator for [`Canvas::fill_channels`]: `(row, column,
/// params) -> sample`, clamped to [0, 255] on write.
pub type ChannelFn<'a> = &'a dyn Fn(usize, usize, &[f32]) -> f32;

/// An RGBA8 pixel surface with encode/decode entry points.
///
/// The buffer is interleaved `(R, G, B, A)` in row-major order. The canvas
/// is single-owner: a pipeline pass borrows it exclusively and the bit
/// stream it builds lives only for that pass.
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Allocates a zeroed surface. Dimensions must be positive.
    pub fn new(width: usize, height: usize) -> Result<Self, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or(CodecError::InvalidDimensions)?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| CodecError::NotEnoughMemory)?;
        pixels.resize(len, 0);
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let off = (y * self.width + x) * CHANNELS;
        [
            self.pixels[off],
            self.pixels[off + 1],
            self.pixels[off + 2],
            self.pixels[off + 3],
        ]
    }

    /// Fills the whole surface with one color.
    pub fn fill(&mut self, color: [u8; 4]) {
        for pixel in self.pixels.chunks_exact_mut(CHANNELS) {
            pixel.copy_from_slice(&color);
        }
    }

    /// Evaluates `f(row, column, params)` per pixel and writes the clamped
    /// value into R, G and B. Alpha takes the same value when
    /// `alpha_from_fn` is set, 255 otherwise.
    pub fn fill_with(
        &mut self,
        f: impl Fn(usize, usize, &[f32]) -> f32,
        params: &[f32],
        alpha_from_fn: bool,
    ) {
        for i in 0..self.height {
            for j in 0..self.width {
                let value = f(i, j, params).clamp(0.0, 255.0) as u8;
                let off = (i * self.width + j) * CHANNELS;
                self.pixels[off] = value;
                self.pixels[off + 1] = value;
                self.pixels[off + 2] = value;
                self.pixels[off + 3] = if alpha_from_fn { value } else { 255 };
            }
        }
    }

    /// Per-channel evaluators gated by a 4-bit mask: bit 3 selects channel
    /// 0 (red) down to bit 0 for channel 3 (alpha). Unselected channels
    /// keep their prior contents.
    pub fn fill_channels(
        &mut self,
        evaluators: [ChannelFn<'_>; CHANNELS],
        params: [&[f32]; CHANNELS],
        mask: u8,
    ) {
        for i in 0..self.height {
            for j in 0..self.width {
                for c in 0..CHANNELS {
                    if mask & (1 << (3 - c)) == 0 {
                        continue;
                    }
                    let value = evaluators[c](i, j, params[c]).clamp(0.0, 255.0) as u8;
                    self.pixels[(i * self.width + j) * CHANNELS + c] = value;
                }
            }
        }
    }

    /// Writes `color` to the square `[x-scale, x+scale] x [y-scale,
    /// y+scale]` clipped to the image.
    pub fn edit_pixel(&mut self, x: usize, y: usize, color: [u8; 4], scale: usize) {
        let sx = x.saturating_sub(scale);
        let ex = (x + scale).min(self.width - 1);
        let sy = y.saturating_sub(scale);
        let ey = (y + scale).min(self.height - 1);
        for i in sy..=ey {
            for j in sx..=ex {
                let off = (i * self.width + j) * CHANNELS;
                self.pixels[off..off + CHANNELS].copy_from_slice(&color);
            }
        }
    }

    /// Encodes with the compact packed backing.
    pub fn encode(&self, quality: f32) -> Result<Vec<u8>, CodecError> {
        self.encode_with_backing(quality, StreamBacking::Packed)
    }

    pub fn encode_with_backing(
        &self,
        quality: f32,
        backing: StreamBacking,
    ) -> Result<Vec<u8>, CodecError> {
        let stream = self.encode_stream(quality, backing)?;
        let header = Header {
            width: self.width as u32,
            height: self.height as u32,
            quality,
        };
        container::write(&header, &stream)
    }

    fn encode_stream(
        &self,
        quality: f32,
        backing: StreamBacking,
    ) -> Result<BitStream, CodecError> {
        if !quality.is_finite() || quality <= 0.0 {
            return Err(CodecError::InvalidQuality);
        }
        let blocks_w = (self.width + 7) / 8;
        let blocks_h = (self.height + 7) / 8;

        // Everything up to the symbolizer is pure per-block work; fan out.
        let quantized: Vec<[[i32; 64]; CHANNELS]> = (0..blocks_w * blocks_h)
            .into_par_iter()
            .map(|b| {
                let (bx, by) = (b % blocks_w, b / blocks_w);
                let mut tile =
                    block::tile_from_pixels(&self.pixels, self.width, self.height, bx, by);
                color::rgb_to_ycbcr(&mut tile);
                let mut planar = tile.deinterleave();
                color::downsample_420(&mut planar.0[1]);
                color::downsample_420(&mut planar.0[2]);
                let mut coeffs = [[0i32; 64]; CHANNELS];
                for c in 0..CHANNELS {
                    dct::forward_dct(&mut planar.0[c]);
                    let q = quantization::quantize(&planar.0[c], quality);
                    coeffs[c] = quantization::zigzag(&q);
                }
                coeffs
            })
            .collect();

        // The symbolizer runs in block-raster order so the DC predictor
        // chain and the bit append order stay deterministic.
        let mut stream = BitStream::new(backing);
        let mut prev_dc = [0i32; CHANNELS];
        for coeffs in &quantized {
            for c in 0..CHANNELS {
                scan_encoder::encode_block(&coeffs[c], c, &mut prev_dc, &mut stream)?;
            }
        }
        debug!(
            "encoded {} blocks ({} bits) at quality {}",
            blocks_w * blocks_h,
            stream.len(),
            quality
        );
        Ok(stream)
    }

    /// Decodes a container produced by [`Canvas::encode`] into a new canvas.
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let (header, mut stream) = container::read(data)?;
        let width = header.width as usize;
        let height = header.height as usize;
        let quality = header.quality;
        let blocks_w = (width + 7) / 8;
        let blocks_h = (height + 7) / 8;

        let mut prev_dc = [0i32; CHANNELS];
        let mut quantized = Vec::with_capacity(blocks_w * blocks_h);
        for _ in 0..blocks_w * blocks_h {
            let mut coeffs = [[0i32; 64]; CHANNELS];
            for (c, channel_coeffs) in coeffs.iter_mut().enumerate() {
                *channel_coeffs = scan_decoder::decode_block(&mut stream, c, &mut prev_dc)?;
            }
            quantized.push(coeffs);
        }
        if !stream.is_empty() {
            return Err(CodecError::TrailingData);
        }

        let tiles: Vec<InterleavedBlock> = quantized
            .into_par_iter()
            .map(|coeffs| {
                let mut planar = PlanarBlock([[0.0f32; 64]; CHANNELS]);
                for c in 0..CHANNELS {
                    let natural = quantization::unzigzag(&coeffs[c]);
                    planar.0[c] = quantization::dequantize(&natural, quality);
                    dct::inverse_dct(&mut planar.0[c]);
                }
                let mut tile = planar.interleave();
                color::ycbcr_to_rgb(&mut tile);
                tile
            })
            .collect();

        let mut canvas = Canvas::new(width, height)?;
        for (b, tile) in tiles.iter().enumerate() {
            block::scatter_to_pixels(
                tile,
                &mut canvas.pixels,
                width,
                height,
                b % blocks_w,
                b / blocks_w,
            );
        }
        debug!("decoded {}x{} canvas at quality {}", width, height, quality);
        Ok(canvas)
    }

    /// Encodes and writes the container to `path`, logging the compression
    /// ratio (raw pixel bits over payload bits).
    pub fn save(&self, path: impl AsRef<Path>, quality: f32) -> Result<(), CodecError> {
        self.save_with_backing(path, quality, StreamBacking::Packed)
    }

    pub fn save_with_backing(
        &self,
        path: impl AsRef<Path>,
        quality: f32,
        backing: StreamBacking,
    ) -> Result<(), CodecError> {
        let stream = self.encode_stream(quality, backing)?;
        let raw_bits = (self.width * self.height * CHANNELS * 8) as f64;
        info!(
            "saving {}x{} canvas to {} ({:.2}x compression)",
            self.width,
            self.height,
            path.as_ref().display(),
            raw_bits / stream.len() as f64
        );
        let header = Header {
            width: self.width as u32,
            height: self.height as u32,
            quality,
        };
        let bytes = container::write(&header, &stream)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Reads and decodes a container file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CodecError> {
        let data = fs::read(path.as_ref())?;
        info!("loading canvas from {}", path.as_ref().display());
        Self::decode(&data)
    }
}
