//! On-disk artifact: a one-line text header followed by the bit stream
//! payload.
//!
//! The header is `"<width> <height> <quality>\n"` with whitespace-separated
//! decimal tokens. The payload starts with the backing tag byte; the rest of
//! the bytes belong to the backing (see [`crate::bitstream`]).

use std::io::Write;

use crate::bitstream::BitStream;
use crate::error::CodecError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub quality: f32,
}

impl Header {
    fn validate(&self) -> Result<(), CodecError> {
        if self.width == 0 || self.height == 0 {
            return Err(CodecError::InvalidDimensions);
        }
        if !self.quality.is_finite() || self.quality <= 0.0 {
            return Err(CodecError::InvalidQuality);
        }
        Ok(())
    }
}

/// Serializes header and payload into one byte vector.
pub fn write(header: &Header, stream: &BitStream) -> Result<Vec<u8>, CodecError> {
    header.validate()?;
    let mut out = Vec::new();
    writeln!(out, "{} {} {}", header.width, header.height, header.quality)?;
    out.push(u8::from(stream.backing()));
    stream.write_to(&mut out)?;
    Ok(out)
}

/// Splits a container into its parsed header and reconstructed bit stream.
pub fn read(data: &[u8]) -> Result<(Header, BitStream), CodecError> {
    let newline = data
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(CodecError::MalformedHeader)?;
    let line = std::str::from_utf8(&data[..newline]).map_err(|_| CodecError::MalformedHeader)?;

    let mut tokens = line.split_whitespace();
    let width = parse_token(tokens.next())?;
    let height = parse_token(tokens.next())?;
    let quality: f32 = match tokens.next() {
        Some(token) => token.parse().map_err(|_| CodecError::MalformedHeader)?,
        None => return Err(CodecError::MalformedHeader),
    };
    if tokens.next().is_some() {
        return Err(CodecError::MalformedHeader);
    }

    let header = Header { width, height, quality };
    header.validate()?;
    let stream = BitStream::from_payload(&data[newline + 1..])?;
    Ok((header, stream))
}

fn parse_token(token: Option<&str>) -> Result<u32, CodecError> {
    token
        .ok_or(CodecError::MalformedHeader)?
        .parse()
        .map_err(|_| CodecError::MalformedHeader)
}
