use nom::bytes::streaming::take;
use nom::error::ErrorKind;
use nom::{Err, IResult};
use rusticata_macros::align32;

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::option::{parse_options, BlockOption};
use crate::PcapNgError;

use super::*;

/// An Enhanced Packet Block (EPB) is the standard container for a packet
/// captured from the network.
///
/// The `data` field is stored as on the wire, padded to a 32-bit boundary;
/// only the first `caplen` bytes are meaningful. Use
/// [`packet_data`](EnhancedPacketBlock::packet_data) to get the unpadded
/// packet bytes.
#[derive(Debug, PartialEq)]
pub struct EnhancedPacketBlock<'a> {
    pub block_type: u32,
    pub block_len1: u32,
    pub if_id: u32,
    pub ts_high: u32,
    pub ts_low: u32,
    /// Captured packet length
    pub caplen: u32,
    /// Original packet length on the wire
    pub origlen: u32,
    /// Packet bytes, with padding
    pub data: &'a [u8],
    pub options: Vec<BlockOption<'a>>,
    pub block_len2: u32,
}

impl<'a> EnhancedPacketBlock<'a> {
    /// Return the packet bytes without padding
    pub fn packet_data(&self) -> &[u8] {
        let caplen = self.caplen as usize;
        if caplen < self.data.len() {
            &self.data[..caplen]
        } else {
            self.data
        }
    }

    /// Return true if the packet was truncated during capture
    #[inline]
    pub fn truncated(&self) -> bool {
        self.origlen != self.caplen
    }
}

impl<'a, En: PcapEndianness> NgBlockParser<'a, En, EnhancedPacketBlock<'a>>
    for EnhancedPacketBlock<'a>
{
    const MIN_SZ: usize = 32;
    const MAGIC: u32 = EPB_MAGIC;

    fn inner_parse(
        block_type: u32,
        block_len1: u32,
        i: &'a [u8],
        block_len2: u32,
    ) -> IResult<&'a [u8], EnhancedPacketBlock<'a>, PcapNgError<&'a [u8]>> {
        let (i, if_id) = En::parse_u32(i)?;
        let (i, ts_high) = En::parse_u32(i)?;
        let (i, ts_low) = En::parse_u32(i)?;
        let (i, caplen) = En::parse_u32(i)?;
        let (i, origlen) = En::parse_u32(i)?;
        // align32 can overflow
        if caplen >= u32::MAX - 4 {
            return Err(Err::Error(PcapNgError::NomError(i, ErrorKind::Verify)));
        }
        let padded_length = align32!(caplen) as usize;
        if i.len() < padded_length {
            return Err(Err::Error(PcapNgError::TruncatedBuffer {
                expected: padded_length,
                actual: i.len(),
            }));
        }
        let (i, data) = take(padded_length)(i)?;
        let (i, options) = parse_options::<En>(i, block_len1 as usize, 32 + padded_length)?;
        let block = EnhancedPacketBlock {
            block_type,
            block_len1,
            if_id,
            ts_high,
            ts_low,
            caplen,
            origlen,
            data,
            options,
            block_len2,
        };
        Ok((i, block))
    }
}

/// Parse an Enhanced Packet Block (little-endian)
pub fn parse_enhancedpacketblock_le(
    i: &[u8],
) -> IResult<&[u8], EnhancedPacketBlock, PcapNgError<&[u8]>> {
    ng_block_parser::<EnhancedPacketBlock, PcapLE, _>()(i)
}

/// Parse an Enhanced Packet Block (big-endian)
pub fn parse_enhancedpacketblock_be(
    i: &[u8],
) -> IResult<&[u8], EnhancedPacketBlock, PcapNgError<&[u8]>> {
    ng_block_parser::<EnhancedPacketBlock, PcapBE, _>()(i)
}
