//! WSA animations.
//!
//! Every stored frame is LCW-compressed Format40 data: the frame bytes are
//! first decompressed into a scratch buffer, then applied as an XOR delta
//! to the persistent frame buffer. A non-zero first offset marks a looping
//! animation whose first frame is a base image; a non-zero slot after the
//! final sentinel points at an embedded 6-bit palette.

use std::io::Cursor;
use std::path::Path;

use binrw::{binread, BinReaderExt};

use crate::codec::{format40_apply, lcw_decompress};
use crate::error::{Result, WestwoodError};
use crate::palette::{Palette, PALETTE_BYTES};

const HEADER_SIZE: usize = 14;

#[binread]
#[derive(Debug)]
#[br(little)]
pub struct WsaHeader {
    pub frame_count: u16,
    #[br(temp)]
    _offset_x: u16,
    #[br(temp)]
    _offset_y: u16,
    pub width: u16,
    pub height: u16,
    pub delta_size: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct WsaFrame {
    pub offset: u32,
    pub size: u32,
}

pub struct WsaAnimation {
    data: Vec<u8>,
    header: WsaHeader,
    frames: Vec<WsaFrame>,
    looping: bool,
    palette: Option<Palette>,
}

impl WsaAnimation {
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
            return Err(WestwoodError::CorruptHeader("WSA file too small".into()));
        }

        let mut cursor = Cursor::new(data.as_slice());
        let header: WsaHeader = cursor
            .read_le()
            .map_err(|e| WestwoodError::BinRw("Couldn't read WSA header".into(), e))?;

        if header.frame_count == 0 {
            return Err(WestwoodError::CorruptHeader("WSA has no frames".into()));
        }

        let table_entries = header.frame_count as usize + 2;
        if data.len() < HEADER_SIZE + table_entries * 4 {
            return Err(WestwoodError::CorruptIndex(
                "WSA offset table truncated".into(),
            ));
        }

        let mut offsets = Vec::with_capacity(table_entries);
        for _ in 0..table_entries {
            let off: u32 = cursor
                .read_le()
                .map_err(|e| WestwoodError::BinRw("Couldn't read WSA frame offset".into(), e))?;
            offsets.push(off);
        }

        let looping = offsets[0] != 0;

        let mut frames = Vec::with_capacity(header.frame_count as usize);
        for i in 0..header.frame_count as usize {
            let offset = offsets[i];
            let next = offsets[i + 1];
            frames.push(WsaFrame {
                offset,
                size: next.saturating_sub(offset),
            });
        }

        // The slot past the end sentinel doubles as the palette offset.
        let palette_offset = offsets[header.frame_count as usize + 1] as usize;
        let palette = if palette_offset != 0 && palette_offset + PALETTE_BYTES <= data.len() {
            let bytes: &[u8; PALETTE_BYTES] = data[palette_offset..palette_offset + PALETTE_BYTES]
                .try_into()
                .expect("palette slice");
            Some(Palette::from_6bit(bytes))
        } else {
            None
        };

        Ok(Self {
            data,
            header,
            frames,
            looping,
            palette,
        })
    }

    pub fn header(&self) -> &WsaHeader {
        &self.header
    }

    pub fn frames(&self) -> &[WsaFrame] {
        &self.frames
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    pub fn frame_size(&self) -> usize {
        self.header.width as usize * self.header.height as usize
    }

    /// Decode one frame onto the caller's delta buffer and return a copy.
    /// A zero-size frame leaves the buffer untouched.
    pub fn decode_frame(&self, index: usize, delta_buffer: &mut Vec<u8>) -> Result<Vec<u8>> {
        let frame = self
            .frames
            .get(index)
            .copied()
            .ok_or_else(|| WestwoodError::Read(format!("frame index {} out of range", index)))?;

        let frame_size = self.frame_size();
        if delta_buffer.len() != frame_size {
            delta_buffer.resize(frame_size, 0);
        }

        if frame.size == 0 || frame.offset == 0 {
            return Ok(delta_buffer.clone());
        }

        let start = frame.offset as usize;
        let end = start
            .checked_add(frame.size as usize)
            .filter(|&e| e <= self.data.len())
            .ok_or_else(|| WestwoodError::UnexpectedEof("WSA frame data out of bounds".into()))?;

        let mut delta_stream = vec![0u8; self.header.delta_size as usize];
        let written = lcw_decompress(&self.data[start..end], &mut delta_stream, false)?;
        delta_stream.truncate(written);

        format40_apply(&delta_stream, delta_buffer)?;
        Ok(delta_buffer.clone())
    }

    /// Decode every frame in order, sharing one delta buffer.
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
mod wsa_tests {
    use super::WsaAnimation;
    use crate::error::WestwoodError;

    /// 4x1 animation with two delta frames and an embedded palette.
    fn fixture(with_palette: bool) -> Vec<u8> {
        // Each frame is Format40 wrapped in an LCW literal block.
        // Frame 0: XOR 0x41 0x42 0x43 0x44 onto zeroed buffer.
        let f0_delta = [0x04, 0x41, 0x42, 0x43, 0x44, 0x80, 0x00, 0x00];
        // Frame 1: XOR first two bytes with 01 02.
        let f1_delta = [0x02, 0x01, 0x02, 0x80, 0x00, 0x00];

        let lcw = |payload: &[u8]| {
            let mut v = vec![0x80 | payload.len() as u8];
            v.extend_from_slice(payload);
            v.push(0x80);
            v
        };
        let f0 = lcw(&f0_delta);
        let f1 = lcw(&f1_delta);

        let table_start = 14;
        let data_start = (table_start + 4 * 4) as u32;
        let o0 = data_start;
        let o1 = o0 + f0.len() as u32;
        let end = o1 + f1.len() as u32;
        let palette_offset = if with_palette { end } else { 0 };

        let mut data = Vec::new();
        data.extend_from_slice(&2u16.to_le_bytes());
        data.extend_from_slice(&[0u8; 4]);
        data.extend_from_slice(&4u16.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&64u32.to_le_bytes());
        data.extend_from_slice(&o0.to_le_bytes());
        data.extend_from_slice(&o1.to_le_bytes());
        data.extend_from_slice(&end.to_le_bytes());
        data.extend_from_slice(&palette_offset.to_le_bytes());
        data.extend_from_slice(&f0);
        data.extend_from_slice(&f1);
        if with_palette {
            data.extend(std::iter::repeat(0x3F).take(768));
        }
        data
    }

    #[test]
    fn delta_chain() {
        let anim = WsaAnimation::parse(fixture(false)).unwrap();
        assert_eq!(anim.header().frame_count, 2);
        assert!(anim.looping());

        let frames = anim.decode_all_frames().unwrap();
        assert_eq!(frames[0], [0x41, 0x42, 0x43, 0x44]);
        assert_eq!(frames[1], [0x40, 0x40, 0x43, 0x44]);
    }

    #[test]
    fn embedded_palette() {
        let anim = WsaAnimation::parse(fixture(true)).unwrap();
        let pal = anim.palette().unwrap();
        assert_eq!(pal.color(0).r, 255);
    }

    #[test]
    fn no_palette_slot() {
        let anim = WsaAnimation::parse(fixture(false)).unwrap();
        assert!(anim.palette().is_none());
    }

    #[test]
    fn zero_size_frame_passthrough() {
        let mut data = fixture(false);
        // Make frame 1's offset equal frame 2's sentinel: size zero.
        let o1_pos = 14 + 4;
        let sentinel = u32::from_le_bytes(data[14 + 8..14 + 12].try_into().unwrap());
        data[o1_pos..o1_pos + 4].copy_from_slice(&sentinel.to_le_bytes());

        let anim = WsaAnimation::parse(data).unwrap();
        let frames = anim.decode_all_frames().unwrap();
        // Frame 1 repeats frame 0 unchanged.
        assert_eq!(frames[0], frames[1]);
    }

    #[test]
    fn empty_animation_is_corrupt() {
        let mut data = fixture(false);
        data[0] = 0;
        data[1] = 0;
        assert!(matches!(
            WsaAnimation::parse(data),
            Err(WestwoodError::CorruptHeader(_))
        ));
    }
}
