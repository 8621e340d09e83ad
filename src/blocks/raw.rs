use nom::IResult;

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::PcapNgError;

use super::*;

/// A block whose type tag is not recognized
///
/// The body is kept verbatim. No option parsing is attempted: for an
/// unknown layout there is no way to tell where the body ends and the
/// options begin.
#[derive(Debug, PartialEq)]
pub struct RawBlock<'a> {
    /// Block type (little-endian)
    pub block_type: u32,
    pub block_len1: u32,
    /// Opaque body bytes, everything between the two length fields
    pub data: &'a [u8],
    pub block_len2: u32,
}

impl<'a, En: PcapEndianness> NgBlockParser<'a, En, RawBlock<'a>> for RawBlock<'a> {
    const MIN_SZ: usize = 12;
    const MAGIC: u32 = 0;

    fn inner_parse(
        block_type: u32,
        block_len1: u32,
        i: &'a [u8],
        block_len2: u32,
    ) -> IResult<&'a [u8], RawBlock<'a>, PcapNgError<&'a [u8]>> {
        let block = RawBlock {
            block_type,
            block_len1,
            data: i,
            block_len2,
        };
        Ok((i, block))
    }
}

/// Parse a block of unrecognized type (little-endian)
pub fn parse_rawblock_le(i: &[u8]) -> IResult<&[u8], RawBlock, PcapNgError<&[u8]>> {
    ng_block_parser::<RawBlock, PcapLE, _>()(i)
}

/// Parse a block of unrecognized type (big-endian)
pub fn parse_rawblock_be(i: &[u8]) -> IResult<&[u8], RawBlock, PcapNgError<&[u8]>> {
    ng_block_parser::<RawBlock, PcapBE, _>()(i)
}
