use nom::bytes::streaming::take;
use nom::error::ErrorKind;
use nom::{Err, IResult};
use rusticata_macros::align32;

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::option::{parse_options, BlockOption};
use crate::PcapNgError;

use super::*;

/// A Custom Data Block carries an opaque, implementation-defined payload
/// plus two reserved words.
///
/// This is a nonstandard block type (tag `0xB16B00B5`) used by some capture
/// tooling; unlike the standard Custom Block, the payload length is stored
/// explicitly, so options following the payload can be located and parsed.
#[derive(Debug, PartialEq)]
pub struct CustomDataBlock<'a> {
    pub block_type: u32,
    pub block_len1: u32,
    /// Length of the meaningful payload bytes, without padding
    pub data_len: u32,
    pub reserved0: u32,
    pub reserved1: u32,
    /// Payload bytes, with padding
    pub data: &'a [u8],
    pub options: Vec<BlockOption<'a>>,
    pub block_len2: u32,
}

impl<'a> CustomDataBlock<'a> {
    /// Return the payload bytes without padding
    pub fn payload(&self) -> &[u8] {
        let data_len = self.data_len as usize;
        if data_len < self.data.len() {
            &self.data[..data_len]
        } else {
            self.data
        }
    }
}

impl<'a, En: PcapEndianness> NgBlockParser<'a, En, CustomDataBlock<'a>> for CustomDataBlock<'a> {
    const MIN_SZ: usize = 24;
    const MAGIC: u32 = CDB_MAGIC;

    fn inner_parse(
        block_type: u32,
        block_len1: u32,
        i: &'a [u8],
        block_len2: u32,
    ) -> IResult<&'a [u8], CustomDataBlock<'a>, PcapNgError<&'a [u8]>> {
        let (i, data_len) = En::parse_u32(i)?;
        let (i, reserved0) = En::parse_u32(i)?;
        let (i, reserved1) = En::parse_u32(i)?;
        // align32 can overflow
        if data_len >= u32::MAX - 4 {
            return Err(Err::Error(PcapNgError::NomError(i, ErrorKind::Verify)));
        }
        let padded_length = align32!(data_len) as usize;
        if i.len() < padded_length {
            return Err(Err::Error(PcapNgError::TruncatedBuffer {
                expected: padded_length,
                actual: i.len(),
            }));
        }
        let (i, data) = take(padded_length)(i)?;
        let (i, options) = parse_options::<En>(i, block_len1 as usize, 24 + padded_length)?;
        let block = CustomDataBlock {
            block_type,
            block_len1,
            data_len,
            reserved0,
            reserved1,
            data,
            options,
            block_len2,
        };
        Ok((i, block))
    }
}

/// Parse a Custom Data Block (little-endian)
pub fn parse_customdatablock_le(i: &[u8]) -> IResult<&[u8], CustomDataBlock, PcapNgError<&[u8]>> {
    ng_block_parser::<CustomDataBlock, PcapLE, _>()(i)
}

/// Parse a Custom Data Block (big-endian)
pub fn parse_customdatablock_be(i: &[u8]) -> IResult<&[u8], CustomDataBlock, PcapNgError<&[u8]>> {
    ng_block_parser::<CustomDataBlock, PcapBE, _>()(i)
}
