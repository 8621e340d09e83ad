use std::fmt;
use std::slice;

use nom::Err;

use crate::blocks::{parse_block_le, Block};
use crate::error::PcapNgError;

/// A decoded sequence of pcapng blocks
///
/// Blocks own their bodies and options; dropping the chain releases
/// everything transitively. Insertion order is wire order and is preserved
/// on re-encode.
#[derive(Debug, Default, PartialEq)]
pub struct BlockChain<'a> {
    pub blocks: Vec<Block<'a>>,
}

impl<'a> BlockChain<'a> {
    /// Return the number of blocks in the chain
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Return an iterator over the blocks, in wire order
    pub fn iter(&self) -> slice::Iter<'_, Block<'a>> {
        self.blocks.iter()
    }
}

impl<'a> From<Vec<Block<'a>>> for BlockChain<'a> {
    fn from(blocks: Vec<Block<'a>>) -> Self {
        BlockChain { blocks }
    }
}

impl fmt::Display for BlockChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, block) in self.blocks.iter().enumerate() {
            writeln!(f, "block {}: {}", index, block)?;
        }
        Ok(())
    }
}

/// Decode a chain of blocks from a memory buffer (little-endian)
///
/// Each block's total length field is the only framing information: it is
/// used to locate the start of the next block, in a single left-to-right
/// pass. The walk is iterative, so chain length is not limited by stack
/// depth.
///
/// Decoding stops successfully when fewer than 12 bytes (the minimal block
/// framing) remain; a buffer shorter than that yields an empty chain. A
/// structurally inconsistent block aborts the decode with an error
/// describing the inconsistency.
pub fn parse_block_chain(input: &[u8]) -> Result<BlockChain, PcapNgError<&[u8]>> {
    let mut blocks = Vec::new();
    let mut rem = input;
    while rem.len() >= 12 {
        match parse_block_le(rem) {
            Ok((r, block)) => {
                blocks.push(block);
                rem = r;
            }
            Err(Err::Error(e)) | Err(Err::Failure(e)) => return Err(e),
            Err(Err::Incomplete(_)) => return Err(PcapNgError::Eof),
        }
    }
    Ok(BlockChain { blocks })
}
