/*!
# jpegcanvas-rs

`jpegcanvas-rs` is a pure Rust codec for 4-channel (RGBA) raster images
built from the classical JPEG baseline toolchain: color-space conversion,
4:2:0 chroma averaging, 8x8 DCT, quantization, zig-zag scan, and Huffman
coding of run-length / magnitude-category symbols. Instead of the JFIF wire
format it writes its own container: a one-line text header followed by the
bit stream payload.

## Pipeline

Encoding tiles the canvas into 8x8 blocks (replicating edges), converts
RGB to YCbCr, splits the channels, averages chroma 2x2 cells, then per
channel applies the DCT, quality-scaled quantization, the zig-zag scan,
and finally Huffman-codes DC differences and AC runs into a bit stream.
Decoding inverts every stage. The alpha channel rides through the same
pipeline as a fourth channel without color conversion.

## Safety

The crate contains no `unsafe` code; all block arithmetic is bounds-checked
array indexing over fixed-size buffers.
*/

pub mod bitstream;
pub mod block;
pub mod canvas;
pub mod color;
pub mod container;
pub mod dct;
pub mod error;
pub mod huffman;
pub mod quantization;
pub mod scan_decoder;
pub mod scan_encoder;

pub use bitstream::{BitStream, StreamBacking};
pub use canvas::{Canvas, ChannelFn};
pub use container::Header;
pub use error::CodecError;
