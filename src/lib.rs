//! # PCAPNG block codec
//!
//! This crate decodes a memory buffer in the pcapng capture container
//! format into a chain of typed blocks, re-encodes a chain back into bytes,
//! and validates that a decoded chain round-trips byte-identically against
//! a reference buffer.
//!
//! It deliberately covers only the container layer: acquiring the buffer
//! (reading a file, capturing traffic) and interpreting packet contents are
//! left to the caller. Byte order is not normalized; chain decoding and all
//! serialization are little-endian, and per-block `_be` parsers are
//! provided for callers that handle big-endian captures themselves.
//!
//! # Example
//!
//! ```rust
//! use pcapng_codec::{parse_block_chain, validate_chain, Block, ToVec};
//!
//! // minimal little-endian Section Header Block
//! let data: &[u8] = &[
//!     0x0A, 0x0D, 0x0D, 0x0A, 28, 0, 0, 0, 0x4D, 0x3C, 0x2B, 0x1A,
//!     1, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
//!     28, 0, 0, 0,
//! ];
//! let chain = parse_block_chain(data).expect("invalid chain");
//! assert_eq!(chain.len(), 1);
//! assert!(matches!(chain.blocks[0], Block::SectionHeader(_)));
//! assert!(validate_chain(&chain, data).is_ok());
//! assert_eq!(chain.to_vec_raw().unwrap(), data);
//! ```

mod endianness;

mod error;
mod linktype;
mod option;
pub use error::*;
pub use linktype::*;
pub use option::*;

pub mod blocks;
pub use blocks::*;

mod chain;
pub use chain::*;

mod serialize;
pub use serialize::*;

mod validate;
pub use validate::*;
