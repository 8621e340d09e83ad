use std::borrow::Cow;
use std::io::Write;

use cookie_factory::bytes::{le_i64, le_u16, le_u32};
use cookie_factory::combinator::slice;
use cookie_factory::multi::many_ref;
use cookie_factory::sequence::tuple;
use cookie_factory::{gen, GenError, SerializeFn};
use rusticata_macros::align32;

use crate::blocks::*;
use crate::chain::BlockChain;
use crate::option::{BlockOption, OptionCode};

/// Common trait for all serialization functions
pub trait ToVec {
    /// Serialize to bytes representation (little-endian).
    /// Check values and fix all fields before serializing.
    fn to_vec(&mut self) -> Result<Vec<u8>, GenError> {
        self.fix();
        self.to_vec_raw()
    }

    /// Check and correct all fields: set the magic, recompute length fields
    /// and terminate option lists if possible.
    fn fix(&mut self) {}

    /// Serialize to bytes representation (little-endian), writing every
    /// field exactly as stored. Do not check values.
    fn to_vec_raw(&self) -> Result<Vec<u8>, GenError>;
}

fn padding_for<'a, W: Write + 'a>(unaligned_length: u32) -> impl SerializeFn<W> + 'a {
    let length = align32!(unaligned_length) - unaligned_length;
    slice(if length > 0 {
        &[0, 0, 0, 0][..length as usize]
    } else {
        b""
    })
}

fn block_option_le<'a, 'b: 'a, W: Write + 'a>(o: &'b BlockOption) -> impl SerializeFn<W> + 'a {
    tuple((
        le_u16(o.code.0),
        le_u16(o.len),
        slice(&o.value),
        padding_for(o.value.len() as u32),
    ))
}

fn options_length(options: &[BlockOption]) -> usize {
    options.iter().map(|o| 4 + align32!(o.value.len())).sum()
}

/// Move the end-of-options entry to the end of the list, or add one if the
/// list is not empty (an empty list needs no terminator).
fn fix_options(options: &mut Vec<BlockOption>) {
    options.retain(|o| o.code != OptionCode::EndOfOpt);
    if !options.is_empty() {
        options.push(BlockOption {
            code: OptionCode::EndOfOpt,
            len: 0,
            value: Cow::Borrowed(b""),
        });
    }
}

impl<'a> ToVec for BlockOption<'a> {
    fn to_vec_raw(&self) -> Result<Vec<u8>, GenError> {
        let mut v = Vec::new();
        gen(block_option_le(self), &mut v).map(|res| res.0.to_vec())
    }
}

impl<'a> ToVec for SectionHeaderBlock<'a> {
    /// Check and correct all fields: use magic, version and fix length fields
    fn fix(&mut self) {
        self.block_type = SHB_MAGIC;
        self.bom = BOM_MAGIC;
        self.major_version = 1;
        self.minor_version = 0;
        fix_options(&mut self.options);
        let length = (28 + options_length(&self.options)) as u32;
        self.block_len1 = length;
        self.block_len2 = length;
    }

    fn to_vec_raw(&self) -> Result<Vec<u8>, GenError> {
        let mut v = Vec::with_capacity(64);
        gen(
            tuple((
                le_u32(self.block_type),
                le_u32(self.block_len1),
                le_u32(self.bom),
                le_u16(self.major_version),
                le_u16(self.minor_version),
                le_i64(self.section_len),
                many_ref(&self.options, block_option_le),
                le_u32(self.block_len2),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl<'a> ToVec for InterfaceDescriptionBlock<'a> {
    fn fix(&mut self) {
        self.block_type = IDB_MAGIC;
        self.reserved = 0;
        fix_options(&mut self.options);
        let length = (20 + options_length(&self.options)) as u32;
        self.block_len1 = length;
        self.block_len2 = length;
    }

    fn to_vec_raw(&self) -> Result<Vec<u8>, GenError> {
        let mut v = Vec::with_capacity(64);
        gen(
            tuple((
                le_u32(self.block_type),
                le_u32(self.block_len1),
                le_u16(self.linktype.0),
                le_u16(self.reserved),
                le_u32(self.snaplen),
                many_ref(&self.options, block_option_le),
                le_u32(self.block_len2),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl<'a> ToVec for EnhancedPacketBlock<'a> {
    fn fix(&mut self) {
        self.block_type = EPB_MAGIC;
        fix_options(&mut self.options);
        let length = 32 + align32!(self.data.len()) + options_length(&self.options);
        self.block_len1 = length as u32;
        self.block_len2 = self.block_len1;
    }

    fn to_vec_raw(&self) -> Result<Vec<u8>, GenError> {
        let mut v = Vec::with_capacity(64);
        gen(
            tuple((
                le_u32(self.block_type),
                le_u32(self.block_len1),
                le_u32(self.if_id),
                le_u32(self.ts_high),
                le_u32(self.ts_low),
                le_u32(self.caplen),
                le_u32(self.origlen),
                slice(self.data),
                padding_for(self.data.len() as u32),
                many_ref(&self.options, block_option_le),
                le_u32(self.block_len2),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl<'a> ToVec for SimplePacketBlock<'a> {
    fn fix(&mut self) {
        self.block_type = SPB_MAGIC;
        self.block_len1 = (16 + align32!(self.data.len())) as u32;
        self.block_len2 = self.block_len1;
    }

    fn to_vec_raw(&self) -> Result<Vec<u8>, GenError> {
        let mut v = Vec::with_capacity(64);
        gen(
            tuple((
                le_u32(self.block_type),
                le_u32(self.block_len1),
                le_u32(self.origlen),
                slice(self.data),
                padding_for(self.data.len() as u32),
                le_u32(self.block_len2),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl<'a> ToVec for CustomDataBlock<'a> {
    fn fix(&mut self) {
        self.block_type = CDB_MAGIC;
        fix_options(&mut self.options);
        let length = 24 + align32!(self.data.len()) + options_length(&self.options);
        self.block_len1 = length as u32;
        self.block_len2 = self.block_len1;
    }

    fn to_vec_raw(&self) -> Result<Vec<u8>, GenError> {
        let mut v = Vec::with_capacity(64);
        gen(
            tuple((
                le_u32(self.block_type),
                le_u32(self.block_len1),
                le_u32(self.data_len),
                le_u32(self.reserved0),
                le_u32(self.reserved1),
                slice(self.data),
                padding_for(self.data.len() as u32),
                many_ref(&self.options, block_option_le),
                le_u32(self.block_len2),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl<'a> ToVec for RawBlock<'a> {
    fn fix(&mut self) {
        // do not touch the type, it is unknown
        self.block_len1 = (12 + align32!(self.data.len())) as u32;
        self.block_len2 = self.block_len1;
    }

    fn to_vec_raw(&self) -> Result<Vec<u8>, GenError> {
        let mut v = Vec::new();
        gen(
            tuple((
                le_u32(self.block_type),
                le_u32(self.block_len1),
                slice(self.data),
                padding_for(self.data.len() as u32),
                le_u32(self.block_len2),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl<'a> ToVec for Block<'a> {
    fn fix(&mut self) {
        match self {
            Block::SectionHeader(b) => b.fix(),
            Block::InterfaceDescription(b) => b.fix(),
            Block::EnhancedPacket(b) => b.fix(),
            Block::SimplePacket(b) => b.fix(),
            Block::CustomData(b) => b.fix(),
            Block::Raw(b) => b.fix(),
        }
    }

    fn to_vec_raw(&self) -> Result<Vec<u8>, GenError> {
        match self {
            Block::SectionHeader(b) => b.to_vec_raw(),
            Block::InterfaceDescription(b) => b.to_vec_raw(),
            Block::EnhancedPacket(b) => b.to_vec_raw(),
            Block::SimplePacket(b) => b.to_vec_raw(),
            Block::CustomData(b) => b.to_vec_raw(),
            Block::Raw(b) => b.to_vec_raw(),
        }
    }
}

impl<'a> ToVec for BlockChain<'a> {
    fn fix(&mut self) {
        for block in &mut self.blocks {
            block.fix();
        }
    }

    /// Serialize each block in order and concatenate the results.
    ///
    /// A block whose stored total length does not match the bytes produced
    /// for it means the chain was built inconsistently; it is refused rather
    /// than emitted, since the length field is what a decoder would use to
    /// locate the following block.
    fn to_vec_raw(&self) -> Result<Vec<u8>, GenError> {
        let mut v = Vec::new();
        for block in &self.blocks {
            let bytes = block.to_vec_raw()?;
            if bytes.len() != block.total_len() as usize {
                return Err(GenError::InvalidOffset);
            }
            v.extend_from_slice(&bytes);
        }
        Ok(v)
    }
}
