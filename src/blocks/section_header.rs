use nom::number::streaming::le_u32;
use nom::{Err, IResult};

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::option::{parse_options, BlockOption};
use crate::PcapNgError;

use super::*;

/// The Section Header Block (SHB) identifies the beginning of a section of
/// the capture file.
///
/// It declares the byte order of the section, the format version, and the
/// byte extent of the section it introduces (`-1` if unknown).
#[derive(Debug, PartialEq)]
pub struct SectionHeaderBlock<'a> {
    pub block_type: u32,
    pub block_len1: u32,
    /// Byte-order magic
    pub bom: u32,
    pub major_version: u16,
    pub minor_version: u16,
    /// Declared byte length of the section, -1 if unknown
    pub section_len: i64,
    pub options: Vec<BlockOption<'a>>,
    pub block_len2: u32,
}

impl SectionHeaderBlock<'_> {
    pub fn big_endian(&self) -> bool {
        self.bom != BOM_MAGIC
    }
}

impl<'a, En: PcapEndianness> NgBlockParser<'a, En, SectionHeaderBlock<'a>>
    for SectionHeaderBlock<'a>
{
    const MIN_SZ: usize = 28;
    const MAGIC: u32 = SHB_MAGIC;

    fn inner_parse(
        block_type: u32,
        block_len1: u32,
        i: &'a [u8],
        block_len2: u32,
    ) -> IResult<&'a [u8], SectionHeaderBlock<'a>, PcapNgError<&'a [u8]>> {
        // the stored bom value is always read as little-endian, so it can be
        // compared against BOM_MAGIC to detect the section byte order
        let (i, bom) = le_u32(i)?;
        let (i, major_version) = En::parse_u16(i)?;
        let (i, minor_version) = En::parse_u16(i)?;
        let (i, section_len) = En::parse_i64(i)?;
        let (i, options) = parse_options::<En>(i, block_len1 as usize, 28)?;
        let block = SectionHeaderBlock {
            block_type,
            block_len1,
            bom,
            major_version,
            minor_version,
            section_len,
            options,
            block_len2,
        };
        Ok((i, block))
    }
}

/// Parse a Section Header Block (little-endian)
pub fn parse_sectionheaderblock_le(
    i: &[u8],
) -> IResult<&[u8], SectionHeaderBlock, PcapNgError<&[u8]>> {
    ng_block_parser::<SectionHeaderBlock, PcapLE, _>()(i)
}

/// Parse a Section Header Block (big-endian)
pub fn parse_sectionheaderblock_be(
    i: &[u8],
) -> IResult<&[u8], SectionHeaderBlock, PcapNgError<&[u8]>> {
    ng_block_parser::<SectionHeaderBlock, PcapBE, _>()(i)
}

/// Parse a Section Header Block (little or big endian)
///
/// Reads the byte-order magic to select the endianness. Note that the rest
/// of this crate does not normalize byte order: chain decoding and all
/// serialization are little-endian, so this entry point is for callers that
/// need to detect a big-endian capture before deciding how to handle it.
pub fn parse_sectionheaderblock(i: &[u8]) -> IResult<&[u8], SectionHeaderBlock, PcapNgError<&[u8]>> {
    if i.len() < 12 {
        return Err(Err::Error(PcapNgError::Eof));
    }
    let bom = u32::from_le_bytes([i[8], i[9], i[10], i[11]]);
    if bom == BOM_MAGIC {
        parse_sectionheaderblock_le(i)
    } else if bom == BOM_MAGIC.swap_bytes() {
        parse_sectionheaderblock_be(i)
    } else {
        Err(Err::Error(PcapNgError::UnrecognizedByteOrder(bom)))
    }
}
