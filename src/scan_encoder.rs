//! Converts zig-zagged, quantized blocks into DC-differential and AC
//! run-length Huffman symbols on the bit stream.

use crate::bitstream::BitStream;
use crate::dct::BLOCK_DIM;
use crate::error::CodecError;
use crate::huffman::{self, HuffmanTable, EOB, MAX_AC_CATEGORY, MAX_DC_CATEGORY, ZRL};

/// Emits the symbols for one block of `channel`. `prev_dc` is the per-channel
/// DC predictor threaded across the raster-order block scan; the decoder
/// carries the identical state.
pub fn encode_block(
    coeffs: &[i32; BLOCK_DIM],
    channel: usize,
    prev_dc: &mut [i32; 4],
    out: &mut BitStream,
) -> Result<(), CodecError> {
    let dc_table = huffman::dc_table();
    let ac_table = huffman::ac_table();

    let diff = coeffs[0] - prev_dc[channel];
    prev_dc[channel] = coeffs[0];

    let cat = huffman::category(diff);
    if cat > MAX_DC_CATEGORY {
        return Err(CodecError::CoefficientOutOfRange);
    }
    put_code(out, dc_table, cat)?;
    out.push_bits(u32::from(huffman::magnitude_bits(diff, cat)), cat);

    let mut run = 0u8;
    for &value in &coeffs[1..] {
        if value == 0 {
            run += 1;
            continue;
        }
        while run > 15 {
            put_code(out, ac_table, ZRL)?;
            run -= 16;
        }
        let cat = huffman::category(value);
        if cat > MAX_AC_CATEGORY {
            return Err(CodecError::CoefficientOutOfRange);
        }
        put_code(out, ac_table, (run << 4) | cat)?;
        out.push_bits(u32::from(huffman::magnitude_bits(value, cat)), cat);
        run = 0;
    }
    // A trailing zero run collapses into the end-of-block symbol.
    put_code(out, ac_table, EOB)
}

fn put_code(out: &mut BitStream, table: &HuffmanTable, symbol: u8) -> Result<(), CodecError> {
    let code = table.code(symbol).ok_or(CodecError::CoefficientOutOfRange)?;
    out.push_bits(u32::from(code.value), code.length);
    Ok(())
}
