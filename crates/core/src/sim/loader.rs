//! Program-image loading.
//!
//! Program images are raw little-endian 32-bit words, one instruction per
//! word, loaded at address zero. The loader validates shape only; decoding
//! happens in the pipeline, so an image full of garbage is a legal input
//! that terminates on its first illegal instruction.

use crate::common::error::LoadError;

/// Parses a raw little-endian byte image into instruction words.
///
/// The byte length must be a multiple of the word size and the image must
/// fit the given program-memory capacity.
pub fn parse_image(bytes: &[u8], capacity: usize) -> Result<Vec<u32>, LoadError> {
    if bytes.len() % 4 != 0 {
        return Err(LoadError::RaggedImage(bytes.len()));
    }
    let words: Vec<u32> = bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    if words.len() > capacity {
        return Err(LoadError::ImageTooLarge {
            words: words.len(),
            capacity,
        });
    }
    Ok(words)
}
