//! PCAPNG block layouts
//!
//! Every block shares the same framing: a 32-bit type tag, a 32-bit total
//! length, a type-specific body, and a trailing copy of the total length.
//! The total length covers the whole record and is always a multiple of 4.
//!
//! Six layouts are distinguished. Blocks with an unrecognized type tag are
//! represented as [`RawBlock`]: their body is kept verbatim, and no option
//! parsing is attempted since the option boundary cannot be determined.

use std::fmt;

use nom::bytes::streaming::take;
use nom::combinator::map;
use nom::error::ErrorKind;
use nom::number::streaming::{be_u32, le_u32};
use nom::{Err, IResult};

use crate::endianness::PcapEndianness;
use crate::error::PcapNgError;
use crate::option::BlockOption;

mod custom_data;
mod enhanced_packet;
mod interface_description;
mod raw;
mod section_header;
mod simple_packet;

pub use custom_data::*;
pub use enhanced_packet::*;
pub use interface_description::*;
pub use raw::*;
pub use section_header::*;
pub use simple_packet::*;

/// Section Header Block magic
pub const SHB_MAGIC: u32 = 0x0A0D_0D0A;
/// Interface Description Block magic
pub const IDB_MAGIC: u32 = 0x0000_0001;
/// Simple Packet Block magic
pub const SPB_MAGIC: u32 = 0x0000_0003;
/// Enhanced Packet Block magic
pub const EPB_MAGIC: u32 = 0x0000_0006;
/// Custom Data Block magic (nonstandard extension block)
pub const CDB_MAGIC: u32 = 0xB16B_00B5;

/// Byte Order magic
pub const BOM_MAGIC: u32 = 0x1A2B_3C4D;

pub(crate) trait NgBlockParser<'a, En: PcapEndianness, O: 'a> {
    /// Minimum block size (framing plus fixed fields), in bytes
    const MIN_SZ: usize;
    /// Little-endian magic number for this block type, 0 if not checked
    const MAGIC: u32;

    // framing (type tag, both length copies, alignment) has already been
    // validated by the caller
    fn inner_parse(
        block_type: u32,
        block_len1: u32,
        i: &'a [u8],
        block_len2: u32,
    ) -> IResult<&'a [u8], O, PcapNgError<&'a [u8]>>;
}

/// Create a block parser function for the given block object and endianness
///
/// The returned parser owns the outer framing: it validates the total length
/// (alignment, minimum size, agreement of both copies) and bounds-checks it
/// against the input before handing the block content to `inner_parse`.
pub(crate) fn ng_block_parser<'a, P, En, O>(
) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], O, PcapNgError<&'a [u8]>>
where
    P: NgBlockParser<'a, En, O>,
    En: PcapEndianness,
    O: 'a,
{
    move |i: &[u8]| {
        if i.len() < 12 {
            return Err(Err::Error(PcapNgError::Eof));
        }
        let (rem, block_type) = le_u32(i)?;
        let (rem, block_len1) = En::parse_u32(rem)?;
        if block_len1 % 4 != 0 {
            return Err(Err::Error(PcapNgError::MisalignedLength(block_len1)));
        }
        if (block_len1 as usize) < P::MIN_SZ {
            return Err(Err::Error(PcapNgError::InvalidBlockLength(block_len1)));
        }
        if P::MAGIC != 0 && En::native_u32(block_type) != P::MAGIC {
            return Err(Err::Error(PcapNgError::NomError(i, ErrorKind::Verify)));
        }
        // 12 is block_type (4) + block_len1 (4) + block_len2 (4)
        let content_len = (block_len1 as usize) - 12;
        if rem.len() < content_len + 4 {
            return Err(Err::Error(PcapNgError::TruncatedBuffer {
                expected: content_len + 4,
                actual: rem.len(),
            }));
        }
        let (rem, content) = take(content_len)(rem)?;
        let (rem, block_len2) = En::parse_u32(rem)?;
        if block_len2 != block_len1 {
            return Err(Err::Error(PcapNgError::LengthMismatch {
                header: block_len1,
                trailer: block_len2,
            }));
        }
        let (_, block) = P::inner_parse(block_type, block_len1, content, block_len2)?;
        // return the remaining bytes of the container, not of the content
        Ok((rem, block))
    }
}

/// A decoded pcapng block
#[derive(Debug, PartialEq)]
pub enum Block<'a> {
    SectionHeader(SectionHeaderBlock<'a>),
    InterfaceDescription(InterfaceDescriptionBlock<'a>),
    EnhancedPacket(EnhancedPacketBlock<'a>),
    SimplePacket(SimplePacketBlock<'a>),
    CustomData(CustomDataBlock<'a>),
    Raw(RawBlock<'a>),
}

impl<'a> Block<'a> {
    /// Return the normalized magic number of the block
    pub fn magic(&self) -> u32 {
        match self {
            Block::SectionHeader(_) => SHB_MAGIC,
            Block::InterfaceDescription(_) => IDB_MAGIC,
            Block::EnhancedPacket(_) => EPB_MAGIC,
            Block::SimplePacket(_) => SPB_MAGIC,
            Block::CustomData(_) => CDB_MAGIC,
            Block::Raw(b) => b.block_type,
        }
    }

    /// Return the block type tag as stored on the wire
    pub fn raw_type(&self) -> u32 {
        match self {
            Block::SectionHeader(b) => b.block_type,
            Block::InterfaceDescription(b) => b.block_type,
            Block::EnhancedPacket(b) => b.block_type,
            Block::SimplePacket(b) => b.block_type,
            Block::CustomData(b) => b.block_type,
            Block::Raw(b) => b.block_type,
        }
    }

    /// Return the total block length from the leading length field
    pub fn total_len(&self) -> u32 {
        match self {
            Block::SectionHeader(b) => b.block_len1,
            Block::InterfaceDescription(b) => b.block_len1,
            Block::EnhancedPacket(b) => b.block_len1,
            Block::SimplePacket(b) => b.block_len1,
            Block::CustomData(b) => b.block_len1,
            Block::Raw(b) => b.block_len1,
        }
    }

    /// Return the options attached to the block
    ///
    /// Always empty for block types that define no options (Simple Packet,
    /// and blocks of unrecognized type).
    pub fn options(&self) -> &[BlockOption<'a>] {
        match self {
            Block::SectionHeader(b) => &b.options,
            Block::InterfaceDescription(b) => &b.options,
            Block::EnhancedPacket(b) => &b.options,
            Block::CustomData(b) => &b.options,
            Block::SimplePacket(_) | Block::Raw(_) => &[],
        }
    }

    /// Return true if the block contains a captured network packet
    pub fn is_data_block(&self) -> bool {
        matches!(self, Block::EnhancedPacket(_) | Block::SimplePacket(_))
    }
}

impl fmt::Display for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "type=0x{:08X} length={} options={}",
            self.raw_type(),
            self.total_len(),
            self.options().len()
        )
    }
}

/// Parse any block, as little-endian
pub fn parse_block_le(i: &[u8]) -> IResult<&[u8], Block, PcapNgError<&[u8]>> {
    match le_u32(i) {
        Ok((_, id)) => match id {
            SHB_MAGIC => map(parse_sectionheaderblock_le, Block::SectionHeader)(i),
            IDB_MAGIC => map(
                parse_interfacedescriptionblock_le,
                Block::InterfaceDescription,
            )(i),
            SPB_MAGIC => map(parse_simplepacketblock_le, Block::SimplePacket)(i),
            EPB_MAGIC => map(parse_enhancedpacketblock_le, Block::EnhancedPacket)(i),
            CDB_MAGIC => map(parse_customdatablock_le, Block::CustomData)(i),
            _ => map(parse_rawblock_le, Block::Raw)(i),
        },
        Err(e) => Err(e),
    }
}

/// Parse any block, as big-endian
pub fn parse_block_be(i: &[u8]) -> IResult<&[u8], Block, PcapNgError<&[u8]>> {
    match be_u32(i) {
        Ok((_, id)) => match id {
            SHB_MAGIC => map(parse_sectionheaderblock_be, Block::SectionHeader)(i),
            IDB_MAGIC => map(
                parse_interfacedescriptionblock_be,
                Block::InterfaceDescription,
            )(i),
            SPB_MAGIC => map(parse_simplepacketblock_be, Block::SimplePacket)(i),
            EPB_MAGIC => map(parse_enhancedpacketblock_be, Block::EnhancedPacket)(i),
            CDB_MAGIC => map(parse_customdatablock_be, Block::CustomData)(i),
            _ => map(parse_rawblock_be, Block::Raw)(i),
        },
        Err(e) => Err(e),
    }
}
