//! CPGN codec error types

/// Errors produced while encoding or decoding a CPGN stream.
///
/// All variants are local, non-retryable structural failures. Encode and
/// decode either fully succeed or return one of these with no partial
/// output observable to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CpgnError {
    /// Integer does not fit in the requested bit width
    #[error("value {value} does not fit in {width} bits")]
    ValueTooWide { value: u32, width: u32 },
    /// File or rank outside a-h / 1-8
    #[error("square out of range: file {file}, rank {rank}")]
    SquareOutOfRange { file: u8, rank: u8 },
    /// Text value contains the NUL terminator byte
    #[error("text contains an embedded NUL byte")]
    TextContainsNull,
    /// Tag with an empty name (reserved as the end-of-list sentinel)
    #[error("tag name must not be empty")]
    EmptyTagName,
    /// Decoder ran out of bits mid-token
    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,
    /// No grammar rule matches the bits at the given offset
    #[error("malformed stream at bit {bit}")]
    MalformedStream { bit: usize },
    /// Stream ended without an end-of-game token
    #[error("stream ended without an end-of-game token")]
    MissingTerminator,
    /// Unrecognized format version byte
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u8),
    /// Disambiguation index inconsistent with the candidate count
    #[error("disambiguation index {index} out of range for {count} candidate(s)")]
    IndexOutOfRange { index: u8, count: usize },
    /// A token needs a disambiguation index but carries none
    #[error("disambiguation index required, {count} candidates can play this token")]
    MissingDisambiguation { count: usize },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CpgnError>;
