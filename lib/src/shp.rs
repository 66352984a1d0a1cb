//! SHP sprite containers (TD/RA layout).
//!
//! Frames are stored raw, LCW-compressed, or as Format40 XOR deltas against
//! either an explicitly referenced frame or the previous one. Decoding
//! therefore threads a persistent delta buffer owned by the caller; the
//! buffer holds the last rendered frame after every step.
//!
//! The TS/RA2 layout (leading zero word) is detected but not decoded.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use binrw::{binread, BinReaderExt};
use bitvec::prelude::*;

use crate::codec::{format40_apply, lcw_decompress};
use crate::error::{Result, WestwoodError};

const HEADER_SIZE: usize = 14;
const OFFSET_ENTRY_SIZE: usize = 8;

/// Frame stored as an LCW base image.
pub const FORMAT_LCW: u8 = 0x80;
/// Frame is an XOR delta against the frame named by `ref_offset`.
pub const FORMAT_XOR_REF: u8 = 0x40;
/// Frame is an XOR delta against the previous frame.
pub const FORMAT_XOR_PREV: u8 = 0x20;

#[binread]
#[derive(Debug)]
#[br(little)]
pub struct ShpHeader {
    pub frame_count: u16,
    #[br(temp)]
    _offset_x: u16,
    #[br(temp)]
    _offset_y: u16,
    pub max_width: u16,
    pub max_height: u16,
    pub delta_buffer_size: u16,
    #[br(temp)]
    _flags: u16,
}

/// One 8-byte offset-table entry: a 24-bit file offset plus 8-bit format,
/// twice (data and reference).
#[binread]
#[derive(Debug)]
#[br(little)]
struct ShpOffsetEntry {
    #[br(temp, map = BitArray::new)]
    packed_data: BitArray<u32, Lsb0>,
    #[br(calc = packed_data[..24].load_le::<u32>())]
    data_offset: u32,
    #[br(calc = packed_data[24..].load_le::<u32>() as u8)]
    format: u8,
    #[br(temp, map = BitArray::new)]
    packed_ref: BitArray<u32, Lsb0>,
    #[br(calc = packed_ref[..24].load_le::<u32>())]
    ref_offset: u32,
    #[br(calc = packed_ref[24..].load_le::<u32>() as u8)]
    ref_format: u8,
}

#[derive(Debug, Clone)]
pub struct ShpFrame {
    pub data_offset: u32,
    pub data_size: u32,
    pub format: u8,
    pub ref_offset: u32,
    pub ref_format: u8,
}

pub struct ShpSprite {
    data: Vec<u8>,
    header: ShpHeader,
    frames: Vec<ShpFrame>,
    offset_to_frame: HashMap<u32, usize>,
}

impl ShpSprite {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(WestwoodError::FileNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)
            .map_err(|e| WestwoodError::Io(format!("Couldn't read {}", path.display()), e))?;
        Self::parse(data)
    }

    pub fn parse(data: Vec<u8>) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(WestwoodError::CorruptHeader("SHP file too small".into()));
        }
        if data[0] == 0 && data[1] == 0 {
            return Err(WestwoodError::UnsupportedFormat(
                "TS/RA2 SHP is not supported".into(),
            ));
        }

        let mut cursor = Cursor::new(data.as_slice());
        let header: ShpHeader = cursor
            .read_le()
            .map_err(|e| WestwoodError::BinRw("Couldn't read SHP header".into(), e))?;

        if header.frame_count == 0 {
            return Err(WestwoodError::CorruptHeader("SHP has no frames".into()));
        }

        let table_len = (header.frame_count as usize + 2) * OFFSET_ENTRY_SIZE;
        if data.len() < HEADER_SIZE + table_len {
            return Err(WestwoodError::CorruptIndex(
                "SHP offset table truncated".into(),
            ));
        }

        let mut entries = Vec::with_capacity(header.frame_count as usize + 2);
        for _ in 0..header.frame_count as usize + 2 {
            let entry: ShpOffsetEntry = cursor
                .read_le()
                .map_err(|e| WestwoodError::BinRw("Couldn't read SHP offset entry".into(), e))?;
            entries.push(entry);
        }

        let mut frames = Vec::with_capacity(header.frame_count as usize);
        let mut offset_to_frame = HashMap::new();
        for i in 0..header.frame_count as usize {
            let next_offset = entries[i + 1].data_offset;
            if next_offset < entries[i].data_offset {
                return Err(WestwoodError::CorruptIndex(
                    "SHP frame offsets are not monotonic".into(),
                ));
            }
            let frame = ShpFrame {
                data_offset: entries[i].data_offset,
                data_size: next_offset - entries[i].data_offset,
                format: entries[i].format,
                ref_offset: entries[i].ref_offset,
                ref_format: entries[i].ref_format,
            };
            offset_to_frame.insert(frame.data_offset, i);
            frames.push(frame);
        }

        Ok(Self {
            data,
            header,
            frames,
            offset_to_frame,
        })
    }

    pub fn header(&self) -> &ShpHeader {
        &self.header
    }

    pub fn frames(&self) -> &[ShpFrame] {
        &self.frames
    }

    pub fn frame_size(&self) -> usize {
        self.header.max_width as usize * self.header.max_height as usize
    }

    fn frame_data(&self, frame: &ShpFrame) -> Result<&[u8]> {
        let start = frame.data_offset as usize;
        let end = start
            .checked_add(frame.data_size as usize)
            .filter(|&e| e <= self.data.len());
        match end {
            Some(end) => Ok(&self.data[start..end]),
            None => Err(WestwoodError::UnexpectedEof(
                "SHP frame data out of bounds".into(),
            )),
        }
    }

    /// Decode one frame. `delta_buffer` carries the previously rendered
    /// frame between calls; afterwards it holds this frame. Frames must be
    /// decoded in order for previous-frame deltas to see the right state.
    pub fn decode_frame(&self, index: usize, delta_buffer: &mut Vec<u8>) -> Result<Vec<u8>> {
        let frame = self
            .frames
            .get(index)
            .ok_or_else(|| WestwoodError::Read(format!("frame index {} out of range", index)))?;

        let frame_size = self.frame_size();
        if delta_buffer.len() != frame_size {
            delta_buffer.resize(frame_size, 0);
        }

        let data = self.frame_data(frame)?;
        let mut output;

        if frame.format == 0 {
            // Raw pixels.
            output = vec![0u8; frame_size];
            let n = data.len().min(frame_size);
            output[..n].copy_from_slice(&data[..n]);
        } else if frame.format & FORMAT_LCW != 0 {
            output = vec![0u8; frame_size];
            lcw_decompress(data, &mut output, false)?;
        } else if frame.format & FORMAT_XOR_REF != 0 {
            // Render the referenced frame first, then patch over it.
            let ref_index = self
                .offset_to_frame
                .get(&frame.ref_offset)
                .copied()
                .filter(|&r| r < index)
                .ok_or_else(|| {
                    WestwoodError::CorruptData(format!(
                        "frame {} references unknown offset {:#X}",
                        index, frame.ref_offset
                    ))
                })?;
            self.decode_frame(ref_index, delta_buffer)?;
            output = delta_buffer.clone();
            format40_apply(data, &mut output)?;
        } else if frame.format & FORMAT_XOR_PREV != 0 {
            output = delta_buffer.clone();
            format40_apply(data, &mut output)?;
        } else {
            return Err(WestwoodError::UnsupportedFormat(format!(
                "SHP frame format {:#04X}",
                frame.format
            )));
        }

        delta_buffer.clear();
        delta_buffer.extend_from_slice(&output);
        Ok(output)
    }

    /// Decode every frame in order.
    pub fn decode_all_frames(&self) -> Result<Vec<Vec<u8>>> {
        let mut result = Vec::with_capacity(self.frames.len());
        let mut delta_buffer = Vec::new();
        for i in 0..self.frames.len() {
            result.push(self.decode_frame(i, &mut delta_buffer)?);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod shp_tests {
    use super::{ShpSprite, FORMAT_LCW, FORMAT_XOR_PREV, FORMAT_XOR_REF};
    use crate::error::WestwoodError;

    fn entry(offset: u32, format: u8, ref_offset: u32, ref_format: u8) -> [u8; 8] {
        let mut e = [0u8; 8];
        e[0..3].copy_from_slice(&offset.to_le_bytes()[0..3]);
        e[3] = format;
        e[4..7].copy_from_slice(&ref_offset.to_le_bytes()[0..3]);
        e[7] = ref_format;
        e
    }

    /// A 4x1 sprite: an LCW base frame "ABCD" and one delta frame.
    fn fixture(second_format: u8, second_ref: u32) -> Vec<u8> {
        let base = [0x84, 0x41, 0x42, 0x43, 0x44, 0x80];
        let delta = [0x02, 0x01, 0x02, 0x80, 0x00, 0x00];
        let data_start = 14 + 4 * 8;
        let f0 = data_start as u32;
        let f1 = f0 + base.len() as u32;
        let end = f1 + delta.len() as u32;

        let mut data = Vec::new();
        data.extend_from_slice(&2u16.to_le_bytes());
        data.extend_from_slice(&[0u8; 4]);
        data.extend_from_slice(&4u16.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&16u16.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&entry(f0, FORMAT_LCW, 0, 0));
        data.extend_from_slice(&entry(f1, second_format, second_ref, 0));
        data.extend_from_slice(&entry(end, 0, 0, 0));
        data.extend_from_slice(&entry(end, 0, 0, 0));
        data.extend_from_slice(&base);
        data.extend_from_slice(&delta);
        data
    }

    #[test]
    fn parse_and_sizes() {
        let sprite = ShpSprite::parse(fixture(FORMAT_XOR_PREV, 0)).unwrap();
        assert_eq!(sprite.header().frame_count, 2);
        assert_eq!(sprite.frame_size(), 4);
        assert_eq!(sprite.frames()[0].data_size, 6);
        assert_eq!(sprite.frames()[1].data_size, 6);
    }

    #[test]
    fn lcw_base_then_xor_prev() {
        let sprite = ShpSprite::parse(fixture(FORMAT_XOR_PREV, 0)).unwrap();
        let frames = sprite.decode_all_frames().unwrap();
        assert_eq!(frames[0], [0x41, 0x42, 0x43, 0x44]);
        assert_eq!(frames[1], [0x40, 0x40, 0x43, 0x44]);
    }

    #[test]
    fn xor_against_reference() {
        let sprite = ShpSprite::parse(fixture(FORMAT_XOR_REF, 46)).unwrap();
        let mut delta = Vec::new();
        // Decoding the delta frame directly re-renders its reference.
        let frame = sprite.decode_frame(1, &mut delta).unwrap();
        assert_eq!(frame, [0x40, 0x40, 0x43, 0x44]);
        // The delta buffer tracks the decoded frame.
        assert_eq!(delta, frame);
    }

    #[test]
    fn bad_reference_offset() {
        let sprite = ShpSprite::parse(fixture(FORMAT_XOR_REF, 999)).unwrap();
        let mut delta = Vec::new();
        assert!(matches!(
            sprite.decode_frame(1, &mut delta),
            Err(WestwoodError::CorruptData(_))
        ));
    }

    #[test]
    fn ts_layout_is_unsupported() {
        let mut data = fixture(FORMAT_XOR_PREV, 0);
        data[0] = 0;
        data[1] = 0;
        assert!(matches!(
            ShpSprite::parse(data),
            Err(WestwoodError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn truncated_table() {
        let mut data = fixture(FORMAT_XOR_PREV, 0);
        data.truncate(20);
        assert!(matches!(
            ShpSprite::parse(data),
            Err(WestwoodError::CorruptIndex(_))
        ));
    }
}
