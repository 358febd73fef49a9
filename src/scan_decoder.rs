//! Rebuilds zig-zagged, quantized blocks from the Huffman symbol stream.

use crate::bitstream::BitStream;
use crate::dct::BLOCK_DIM;
use crate::error::CodecError;
use crate::huffman::{self, EOB, ZRL};

/// Decodes one block of `channel` from the stream, threading the same
/// per-channel DC predictor the encoder used.
pub fn decode_block(
    input: &mut BitStream,
    channel: usize,
    prev_dc: &mut [i32; 4],
) -> Result<[i32; BLOCK_DIM], CodecError> {
    let dc_table = huffman::dc_table();
    let ac_table = huffman::ac_table();
    let mut coeffs = [0i32; BLOCK_DIM];

    let cat = dc_table.decode_symbol(input)?;
    let diff = huffman::read_magnitude(input, cat)?;
    coeffs[0] = prev_dc[channel] + diff;
    prev_dc[channel] = coeffs[0];

    let mut k = 1usize;
    loop {
        let symbol = ac_table.decode_symbol(input)?;
        if symbol == EOB {
            break;
        }
        if symbol == ZRL {
            if k + 16 > BLOCK_DIM {
                return Err(CodecError::CoefficientOverflow);
            }
            k += 16;
            continue;
        }
        let run = usize::from(symbol >> 4);
        let cat = symbol & 0x0F;
        if k + run >= BLOCK_DIM {
            return Err(CodecError::CoefficientOverflow);
        }
        k += run;
        coeffs[k] = huffman::read_magnitude(input, cat)?;
        k += 1;
    }
    Ok(coeffs)
}
