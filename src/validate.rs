//! Round-trip validation of a decoded chain against its source buffer

use std::fmt;

use cookie_factory::GenError;

use crate::chain::BlockChain;
use crate::serialize::ToVec;

/// Reason a chain failed validation
#[derive(Debug)]
pub enum ValidationFailure {
    /// Block type or total length differ from the reference framing words
    HeaderMismatch {
        expected_type: u32,
        found_type: u32,
        expected_len: u32,
        found_len: u32,
    },
    /// Re-encoded block bytes differ from the reference span
    ContentMismatch,
    /// The chain has more blocks than the reference buffer
    ReferenceExhausted,
    /// The reference buffer has at least one more block than the chain
    TrailingReferenceData,
    /// The block could not be re-encoded
    Serialize(GenError),
}

/// The first point of disagreement between a chain and a reference buffer
#[derive(Debug)]
pub struct ValidationError {
    /// Index of the first mismatching block
    pub block_index: usize,
    pub failure: ValidationFailure,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "validation failed at block {}: ", self.block_index)?;
        match &self.failure {
            ValidationFailure::HeaderMismatch {
                expected_type,
                found_type,
                expected_len,
                found_len,
            } => write!(
                f,
                "block type or length mismatch (expected type 0x{:08X}, found 0x{:08X}; \
                 expected length {}, found {})",
                expected_type, found_type, expected_len, found_len
            ),
            ValidationFailure::ContentMismatch => write!(f, "block contents mismatch"),
            ValidationFailure::ReferenceExhausted => {
                write!(f, "reference buffer ends before the chain")
            }
            ValidationFailure::TrailingReferenceData => {
                write!(f, "reference buffer continues past the chain")
            }
            ValidationFailure::Serialize(e) => write!(f, "block could not be re-encoded: {:?}", e),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check that `chain` re-serializes byte-identically to `reference`
///
/// Blocks are compared one at a time, in lock-step with a cursor into the
/// reference buffer: first the framing words (type tag and total length),
/// then the complete re-encoded block bytes against the corresponding
/// reference span. The walk stops at the first disagreement and reports the
/// offending block index.
///
/// Each block is encoded in isolation from the owned sequence, so
/// validation never mutates the chain and may run concurrently with other
/// readers.
///
/// Both sides must end together: chain blocks past the end of the reference,
/// or a reference with one or more whole blocks past the end of the chain,
/// fail validation. Fewer than 12 trailing reference bytes are tolerated,
/// mirroring the decoder's stop rule.
pub fn validate_chain(chain: &BlockChain, reference: &[u8]) -> Result<(), ValidationError> {
    let mut offset = 0usize;
    for (block_index, block) in chain.iter().enumerate() {
        let rem = &reference[offset..];
        if rem.len() < 12 {
            return Err(ValidationError {
                block_index,
                failure: ValidationFailure::ReferenceExhausted,
            });
        }
        let ref_type = u32::from_le_bytes([rem[0], rem[1], rem[2], rem[3]]);
        let ref_len = u32::from_le_bytes([rem[4], rem[5], rem[6], rem[7]]);
        if ref_type != block.raw_type() || ref_len != block.total_len() {
            return Err(ValidationError {
                block_index,
                failure: ValidationFailure::HeaderMismatch {
                    expected_type: block.raw_type(),
                    found_type: ref_type,
                    expected_len: block.total_len(),
                    found_len: ref_len,
                },
            });
        }
        let span_len = ref_len as usize;
        if rem.len() < span_len {
            return Err(ValidationError {
                block_index,
                failure: ValidationFailure::ReferenceExhausted,
            });
        }
        let encoded = block.to_vec_raw().map_err(|e| ValidationError {
            block_index,
            failure: ValidationFailure::Serialize(e),
        })?;
        if encoded.len() != span_len || encoded[..] != rem[..span_len] {
            return Err(ValidationError {
                block_index,
                failure: ValidationFailure::ContentMismatch,
            });
        }
        offset += span_len;
    }
    if reference.len() - offset >= 12 {
        return Err(ValidationError {
            block_index: chain.len(),
            failure: ValidationFailure::TrailingReferenceData,
        });
    }
    Ok(())
}
