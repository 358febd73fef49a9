use thiserror::Error;

/// Errors surfaced by the codec pipeline and the container parser.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Image dimensions must be positive")]
    InvalidDimensions,
    #[error("Quality must be a positive finite number")]
    InvalidQuality,
    #[error("Not enough memory for the pixel buffer")]
    NotEnoughMemory,
    #[error("Missing or malformed container header")]
    MalformedHeader,
    #[error("Unknown bit stream backing tag {0:#04x}")]
    UnknownStreamTag(u8),
    #[error("Bit stream exhausted in the middle of a code")]
    TruncatedStream,
    #[error("Bit prefix matches no Huffman base code")]
    InvalidHuffmanCode,
    #[error("AC run pushes the coefficient index past the block end")]
    CoefficientOverflow,
    #[error("Coefficient magnitude exceeds the code table range")]
    CoefficientOutOfRange,
    #[error("Trailing bits after the last block")]
    TrailingData,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
