use std::fmt;

use nom::error::{ErrorKind, ParseError};

/// The error type for pcapng decoding operations
///
/// Structural inconsistencies in the input (bad lengths, disagreeing length
/// copies, ill-formed option terminators) are reported as dedicated variants
/// so a caller can recover, or at least know what was wrong. An unrecognized
/// block type is *not* an error: it decodes to [`crate::RawBlock`].
#[derive(Debug, PartialEq)]
pub enum PcapNgError<I: Sized> {
    /// A declared length exceeds the bytes remaining in the enclosing region
    TruncatedBuffer { expected: usize, actual: usize },
    /// Block total length smaller than the minimum for its block type
    InvalidBlockLength(u32),
    /// Block total length is not a multiple of 4
    MisalignedLength(u32),
    /// The leading and trailing copies of the total length disagree
    LengthMismatch { header: u32, trailer: u32 },
    /// End-of-options entry declaring a non-zero value length
    InvalidOptionTerminator(u16),
    /// Section header byte-order magic matches neither endianness
    UnrecognizedByteOrder(u32),
    /// Not enough data to read a block header
    Eof,
    /// Error raised by an inner parser
    NomError(I, ErrorKind),
}

impl<I> ParseError<I> for PcapNgError<I> {
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        PcapNgError::NomError(input, kind)
    }
    fn append(input: I, kind: ErrorKind, _other: Self) -> Self {
        PcapNgError::NomError(input, kind)
    }
}

impl<I> fmt::Display for PcapNgError<I> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PcapNgError::TruncatedBuffer { expected, actual } => write!(
                f,
                "declared length needs {} bytes but only {} remain",
                expected, actual
            ),
            PcapNgError::InvalidBlockLength(len) => {
                write!(f, "block total length {} below the block type minimum", len)
            }
            PcapNgError::MisalignedLength(len) => {
                write!(f, "block total length {} is not a multiple of 4", len)
            }
            PcapNgError::LengthMismatch { header, trailer } => write!(
                f,
                "leading ({}) and trailing ({}) total length fields disagree",
                header, trailer
            ),
            PcapNgError::InvalidOptionTerminator(len) => {
                write!(f, "end-of-options entry declares a value of {} bytes", len)
            }
            PcapNgError::UnrecognizedByteOrder(bom) => {
                write!(f, "unrecognized byte-order magic 0x{:08X}", bom)
            }
            PcapNgError::Eof => write!(f, "end of input"),
            PcapNgError::NomError(_, kind) => write!(f, "parser error: {:?}", kind),
        }
    }
}

impl<I: fmt::Debug> std::error::Error for PcapNgError<I> {}
