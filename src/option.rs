use std::borrow::Cow;

use nom::bytes::streaming::take;
use nom::{Err, IResult};
use rusticata_macros::{align32, newtype_enum};

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};
use crate::error::PcapNgError;

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct OptionCode(pub u16);

newtype_enum! {
impl debug OptionCode {
    EndOfOpt = 0,
    Comment = 1,
    ShbHardware = 2,
    ShbOs = 3,
    ShbUserAppl = 4,
    IfTsresol = 9,
    IfTsoffset = 14,
}
}

/// One tagged attribute attached to a block
///
/// The value is stored exactly as on the wire, padded to a 32-bit boundary;
/// `len` is the length of the meaningful part only.
#[derive(Debug, PartialEq)]
pub struct BlockOption<'a> {
    pub code: OptionCode,
    /// Length of the meaningful value bytes, without padding
    pub len: u16,
    /// Value bytes, padded with zeroes to a multiple of 4
    pub value: Cow<'a, [u8]>,
}

impl<'a> BlockOption<'a> {
    /// Return the option value as raw bytes, including padding
    #[inline]
    pub fn value(&self) -> &[u8] {
        self.value.as_ref()
    }

    /// Return the option value limited to the declared length, or None if the
    /// declared length exceeds the stored bytes
    pub fn as_bytes(&self) -> Option<&[u8]> {
        let len = usize::from(self.len);
        if len <= self.value.len() {
            Some(&self.value[..len])
        } else {
            None
        }
    }

    /// Return true if this is the reserved end-of-options entry
    #[inline]
    pub fn is_terminator(&self) -> bool {
        self.code == OptionCode::EndOfOpt
    }
}

/// Parse a single option (little-endian)
#[inline]
pub fn parse_option_le(i: &[u8]) -> IResult<&[u8], BlockOption, PcapNgError<&[u8]>> {
    parse_option::<PcapLE>(i)
}

/// Parse a single option (big-endian)
#[inline]
pub fn parse_option_be(i: &[u8]) -> IResult<&[u8], BlockOption, PcapNgError<&[u8]>> {
    parse_option::<PcapBE>(i)
}

pub(crate) fn parse_option<'i, En: PcapEndianness>(
    i: &'i [u8],
) -> IResult<&'i [u8], BlockOption<'i>, PcapNgError<&'i [u8]>> {
    let (i, code) = En::parse_u16(i)?;
    let (i, len) = En::parse_u16(i)?;
    let padded = align32!(usize::from(len));
    if i.len() < padded {
        return Err(Err::Error(PcapNgError::TruncatedBuffer {
            expected: padded,
            actual: i.len(),
        }));
    }
    let (i, value) = take(padded)(i)?;
    let option = BlockOption {
        code: OptionCode(code),
        len,
        value: Cow::Borrowed(value),
    };
    Ok((i, option))
}

/// Parse the option region of a block
///
/// `len` is the block total length and `opt_offset` the bytes of the block
/// accounted for outside the option region (framing plus fixed fields), so
/// the region spans `len - opt_offset` bytes.
///
/// The end-of-options entry is kept in the returned list. Any bytes left in
/// the region after it are trailing padding: they are consumed without being
/// parsed as options. A terminator declaring a non-zero value length is
/// rejected as [`PcapNgError::InvalidOptionTerminator`].
pub(crate) fn parse_options<'i, En: PcapEndianness>(
    i: &'i [u8],
    len: usize,
    opt_offset: usize,
) -> IResult<&'i [u8], Vec<BlockOption<'i>>, PcapNgError<&'i [u8]>> {
    if len <= opt_offset {
        return Ok((i, Vec::new()));
    }
    let region_len = len - opt_offset;
    if i.len() < region_len {
        return Err(Err::Error(PcapNgError::TruncatedBuffer {
            expected: region_len,
            actual: i.len(),
        }));
    }
    let (mut region, rem) = i.split_at(region_len);
    let mut options = Vec::new();
    while !region.is_empty() {
        let (after, option) = parse_option::<En>(region)?;
        let terminator = option.is_terminator();
        if terminator && option.len != 0 {
            return Err(Err::Error(PcapNgError::InvalidOptionTerminator(option.len)));
        }
        options.push(option);
        // bytes after the terminator are padding, not options
        region = if terminator { &[] } else { after };
    }
    Ok((rem, options))
}
