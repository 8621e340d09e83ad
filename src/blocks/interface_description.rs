use nom::IResult;

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::option::{parse_options, BlockOption};
use crate::{Linktype, PcapNgError};

use super::*;

/// An Interface Description Block (IDB) is the container for information
/// describing an interface on which packet data is captured.
#[derive(Debug, PartialEq)]
pub struct InterfaceDescriptionBlock<'a> {
    pub block_type: u32,
    pub block_len1: u32,
    pub linktype: Linktype,
    pub reserved: u16,
    /// Maximum number of bytes captured from each packet, 0 for no limit
    pub snaplen: u32,
    pub options: Vec<BlockOption<'a>>,
    pub block_len2: u32,
}

impl<'a, En: PcapEndianness> NgBlockParser<'a, En, InterfaceDescriptionBlock<'a>>
    for InterfaceDescriptionBlock<'a>
{
    const MIN_SZ: usize = 20;
    const MAGIC: u32 = IDB_MAGIC;

    fn inner_parse(
        block_type: u32,
        block_len1: u32,
        i: &'a [u8],
        block_len2: u32,
    ) -> IResult<&'a [u8], InterfaceDescriptionBlock<'a>, PcapNgError<&'a [u8]>> {
        let (i, linktype) = En::parse_u16(i)?;
        let (i, reserved) = En::parse_u16(i)?;
        let (i, snaplen) = En::parse_u32(i)?;
        let (i, options) = parse_options::<En>(i, block_len1 as usize, 20)?;
        let block = InterfaceDescriptionBlock {
            block_type,
            block_len1,
            linktype: Linktype(linktype),
            reserved,
            snaplen,
            options,
            block_len2,
        };
        Ok((i, block))
    }
}

/// Parse an Interface Description Block (little-endian)
pub fn parse_interfacedescriptionblock_le(
    i: &[u8],
) -> IResult<&[u8], InterfaceDescriptionBlock, PcapNgError<&[u8]>> {
    ng_block_parser::<InterfaceDescriptionBlock, PcapLE, _>()(i)
}

/// Parse an Interface Description Block (big-endian)
pub fn parse_interfacedescriptionblock_be(
    i: &[u8],
) -> IResult<&[u8], InterfaceDescriptionBlock, PcapNgError<&[u8]>> {
    ng_block_parser::<InterfaceDescriptionBlock, PcapBE, _>()(i)
}
