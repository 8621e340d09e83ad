use nom::bytes::streaming::take;
use nom::IResult;

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::PcapNgError;

use super::*;

/// A Simple Packet Block (SPB) is a lightweight container for a packet
/// captured from the network.
///
/// The standard defines no options for this block type, so its `data` field
/// covers everything between the fixed header and the trailing length.
#[derive(Debug, PartialEq)]
pub struct SimplePacketBlock<'a> {
    pub block_type: u32,
    pub block_len1: u32,
    /// Original packet length on the wire
    pub origlen: u32,
    /// Packet bytes, with padding
    pub data: &'a [u8],
    pub block_len2: u32,
}

impl<'a> SimplePacketBlock<'a> {
    /// Return the packet bytes without padding
    ///
    /// The captured length is not stored in this block type, so the original
    /// length is used as the limit (the capture may be shorter if the
    /// interface snaplen was smaller).
    pub fn packet_data(&self) -> &[u8] {
        let origlen = self.origlen as usize;
        if origlen < self.data.len() {
            &self.data[..origlen]
        } else {
            self.data
        }
    }
}

impl<'a, En: PcapEndianness> NgBlockParser<'a, En, SimplePacketBlock<'a>>
    for SimplePacketBlock<'a>
{
    const MIN_SZ: usize = 16;
    const MAGIC: u32 = SPB_MAGIC;

    fn inner_parse(
        block_type: u32,
        block_len1: u32,
        i: &'a [u8],
        block_len2: u32,
    ) -> IResult<&'a [u8], SimplePacketBlock<'a>, PcapNgError<&'a [u8]>> {
        let (i, origlen) = En::parse_u32(i)?;
        let (i, data) = take((block_len1 as usize) - 16)(i)?;
        let block = SimplePacketBlock {
            block_type,
            block_len1,
            origlen,
            data,
            block_len2,
        };
        Ok((i, block))
    }
}

/// Parse a Simple Packet Block (little-endian)
pub fn parse_simplepacketblock_le(i: &[u8]) -> IResult<&[u8], SimplePacketBlock, PcapNgError<&[u8]>> {
    ng_block_parser::<SimplePacketBlock, PcapLE, _>()(i)
}

/// Parse a Simple Packet Block (big-endian)
pub fn parse_simplepacketblock_be(i: &[u8]) -> IResult<&[u8], SimplePacketBlock, PcapNgError<&[u8]>> {
    ng_block_parser::<SimplePacketBlock, PcapBE, _>()(i)
}
