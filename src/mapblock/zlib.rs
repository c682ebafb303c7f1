//! Inflates zlib streams that sit back-to-back inside one map block record.
//!
//! The record does not store compressed lengths, so the only way to find where the second
//! stream starts is to inflate the first one and see how much input it consumed.

use flate2::{Decompress, FlushDecompress, Status};

use crate::error::{DecodeError, DecodeResult};

/// Size of the scratch buffer output is inflated into before being appended.
pub const CHUNK_SIZE: usize = 128 * 1024;

/// Inflates the zlib stream starting at `start` inside `buffer`.
///
/// Returns the decompressed bytes and the offset just past the end of the compressed stream,
/// which is where the next stream in the record begins.
pub fn decompress(buffer: &[u8], start: usize) -> DecodeResult<(Vec<u8>, usize)> {
    let input = buffer.get(start..).ok_or(DecodeError::TruncatedData {
        context: "compressed stream",
        offset: buffer.len(),
        needed: start - buffer.len(),
        available: 0,
    })?;

    let mut inflater = Decompress::new(true);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut output = Vec::new();

    loop {
        let consumed = inflater.total_in() as usize;
        let written = inflater.total_out();

        let status = inflater
            .decompress(&input[consumed..], &mut chunk, FlushDecompress::None)
            .map_err(|e| DecodeError::Decompression {
                offset: start + consumed,
                reason: e.to_string(),
            })?;

        let produced = (inflater.total_out() - written) as usize;
        output.extend_from_slice(&chunk[..produced]);

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                // No input left and nothing more to flush: the terminator never came.
                if produced == 0 && inflater.total_in() as usize == consumed {
                    return Err(DecodeError::Decompression {
                        offset: start + consumed,
                        reason: "stream ended before its terminator".to_string(),
                    });
                }
            }
        }
    }

    Ok((output, start + inflater.total_in() as usize))
}
