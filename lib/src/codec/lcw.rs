//! LCW ("Format80") decompression.
//!
//! The byte stream is a sequence of commands: literal runs, back-references
//! into the already-written output, and run-length fills. Short
//! back-references are always distances from the write position; long
//! back-references index from the start of the output window in *absolute*
//! mode or count back from the write position in *relative* mode, selected
//! by the container.
//!
//! Command layout, by the first byte `c`:
//!
//! | `c`            | command                                               |
//! |----------------|-------------------------------------------------------|
//! | `0x00..=0x7F`  | copy `(c >> 4) + 3` from back-distance `((c & 0x0F) << 8) \| next` |
//! | `0x80`         | end of stream                                         |
//! | `0x81..=0xBF`  | copy `c & 0x3F` literal bytes from the input          |
//! | `0xC0..=0xFD`  | copy `(c & 0x3F) + 3` from 16-bit position            |
//! | `0xFE`         | fill: 16-bit count, then the fill byte                |
//! | `0xFF`         | copy: 16-bit count, then 16-bit position              |

use crate::error::{Result, WestwoodError};

/// Copy `count` bytes inside `out` from `src_start` to `dst_start`.
///
/// Ranges may overlap forward; copying byte-by-byte is what lets a
/// reference shorter than its count produce a repeating run.
fn copy_overlap(out: &mut [u8], src_start: usize, dst_start: usize, count: usize) {
    for i in 0..count {
        out[dst_start + i] = out[src_start + i];
    }
}

/// Validate a long back-reference and return the copy source position.
fn resolve_offset(raw_offset: usize, dst: usize, relative: bool) -> Result<usize> {
    if relative {
        if raw_offset == 0 || raw_offset > dst {
            return Err(WestwoodError::CorruptData("LCW bad relative offset".into()));
        }
        Ok(dst - raw_offset)
    } else {
        if raw_offset >= dst {
            return Err(WestwoodError::CorruptData("LCW bad absolute offset".into()));
        }
        Ok(raw_offset)
    }
}

/// Decompress an LCW stream into `output`, returning the number of bytes
/// written. `relative` selects the addressing mode for long back-references.
pub fn lcw_decompress(input: &[u8], output: &mut [u8], relative: bool) -> Result<usize> {
    if input.is_empty() {
        return Err(WestwoodError::Decompress("empty LCW input".into()));
    }

    let mut src = 0usize;
    let mut dst = 0usize;

    while src < input.len() {
        let cmd = input[src];
        src += 1;

        match cmd {
            // Short back-reference, always relative to the write position.
            0x00..=0x7F => {
                let count = (cmd >> 4) as usize + 3;
                if src >= input.len() {
                    return Err(WestwoodError::UnexpectedEof("LCW short ref".into()));
                }
                let offset = (((cmd & 0x0F) as usize) << 8) | input[src] as usize;
                src += 1;
                if offset == 0 || offset > dst {
                    return Err(WestwoodError::CorruptData("LCW bad short offset".into()));
                }
                if dst + count > output.len() {
                    return Err(WestwoodError::OutputOverflow("LCW short ref".into()));
                }
                copy_overlap(output, dst - offset, dst, count);
                dst += count;
            }
            // Literal copy; a zero count (0x80) ends the stream.
            0x80 => break,
            0x81..=0xBF => {
                let count = (cmd & 0x3F) as usize;
                if src + count > input.len() {
                    return Err(WestwoodError::UnexpectedEof("LCW literal".into()));
                }
                if dst + count > output.len() {
                    return Err(WestwoodError::OutputOverflow("LCW literal".into()));
                }
                output[dst..dst + count].copy_from_slice(&input[src..src + count]);
                src += count;
                dst += count;
            }
            // Medium back-reference with 16-bit position.
            0xC0..=0xFD => {
                let count = (cmd & 0x3F) as usize + 3;
                if src + 2 > input.len() {
                    return Err(WestwoodError::UnexpectedEof("LCW medium ref".into()));
                }
                let raw_offset = u16::from_le_bytes([input[src], input[src + 1]]) as usize;
                src += 2;
                let copy_src = resolve_offset(raw_offset, dst, relative)?;
                if dst + count > output.len() {
                    return Err(WestwoodError::OutputOverflow("LCW medium ref".into()));
                }
                copy_overlap(output, copy_src, dst, count);
                dst += count;
            }
            // Long run-length fill.
            0xFE => {
                if src + 3 > input.len() {
                    return Err(WestwoodError::UnexpectedEof("LCW long fill".into()));
                }
                let count = u16::from_le_bytes([input[src], input[src + 1]]) as usize;
                let value = input[src + 2];
                src += 3;
                if dst + count > output.len() {
                    return Err(WestwoodError::OutputOverflow("LCW long fill".into()));
                }
                output[dst..dst + count].fill(value);
                dst += count;
            }
            // Long copy with explicit 16-bit count and position.
            0xFF => {
                if src + 4 > input.len() {
                    return Err(WestwoodError::UnexpectedEof("LCW long copy".into()));
                }
                let count = u16::from_le_bytes([input[src], input[src + 1]]) as usize;
                let raw_offset = u16::from_le_bytes([input[src + 2], input[src + 3]]) as usize;
                src += 4;
                let copy_src = resolve_offset(raw_offset, dst, relative)?;
                if dst + count > output.len() {
                    return Err(WestwoodError::OutputOverflow("LCW long copy".into()));
                }
                copy_overlap(output, copy_src, dst, count);
                dst += count;
            }
        }
    }

    Ok(dst)
}

/// Decompress into a freshly allocated buffer of at most `output_size`
/// bytes, truncated to the actual decoded length.
pub fn lcw_decompress_to_vec(input: &[u8], output_size: usize, relative: bool) -> Result<Vec<u8>> {
    let mut output = vec![0u8; output_size];
    let written = lcw_decompress(input, &mut output, relative)?;
    output.truncate(written);
    Ok(output)
}
