//! VQA full-motion video.
//!
//! An IFF-style stream: 4-byte ASCII tags with big-endian sizes, data
//! padded to even length. Video state is a palette, a codebook of small
//! pixel blocks, and the current frame buffer; each vector-pointer-table
//! chunk assembles one frame from codebook blocks and emits it. Audio
//! fragments ride alongside as raw PCM or ADPCM.

use std::io::Cursor;
use std::path::Path;

use binrw::{binread, BinReaderExt};

use crate::codec::adpcm::{decode_ima_adpcm, decode_ws_adpcm, pcm8_to_i16, ImaState};
use crate::codec::lcw_decompress_to_vec;
use crate::cursor::ByteCursor;
use crate::error::{Result, WestwoodError};
use crate::palette::{Palette, PALETTE_BYTES};

/// Offset of the first chunk inside the FORM envelope.
const CHUNKS_START: usize = 12;

/// `VQFR`/`VQFL` are containers in most assets and leaf chunks in a few;
/// the payload opening with another chunk tag is what tells them apart.
fn chunk_tag_follows(data: &[u8], pos: usize) -> bool {
    data.get(pos..pos + 4)
        .is_some_and(|tag| tag.iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()))
}

#[binread]
#[derive(Debug, Clone)]
#[br(little)]
pub struct VqaHeader {
    pub version: u16,
    pub flags: u16,
    pub frame_count: u16,
    pub width: u16,
    pub height: u16,
    pub block_w: u8,
    pub block_h: u8,
    pub frame_rate: u8,
    pub cb_parts: u8,
    /// Zero means hicolor (RGB555 codebook samples).
    pub colors: u16,
    pub max_blocks: u16,
    pub offset_x: u16,
    pub offset_y: u16,
    pub max_vpt_size: u16,
    pub sample_rate: u16,
    pub channels: u8,
    pub bits: u8,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AudioCodec {
    /// `SND0`, raw PCM.
    Pcm,
    /// `SND1`, Westwood ADPCM.
    WsAdpcm,
    /// `SND2`, IMA ADPCM.
    ImaAdpcm,
}

#[derive(Debug, Clone)]
pub struct AudioInfo {
    pub sample_rate: u16,
    pub channels: u8,
    pub bits: u8,
    pub codec: Option<AudioCodec>,
}

#[derive(Clone)]
pub struct VqaFrame {
    /// RGB triples, row-major, `width * height * 3` bytes.
    pub rgb: Vec<u8>,
    pub width: u16,
    pub height: u16,
}

pub struct VqaVideo {
    data: Vec<u8>,
    header: VqaHeader,
    audio: AudioInfo,
}

impl VqaVideo {
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
        let mut cursor = ByteCursor::new(&data);

        if &cursor.read_tag("FORM tag")? != b"FORM" {
            return Err(WestwoodError::InvalidFormat("not a VQA file (no FORM)".into()));
        }
        cursor.skip(4)?;
        if &cursor.read_tag("WVQA tag")? != b"WVQA" {
            return Err(WestwoodError::InvalidFormat("not a VQA file (no WVQA)".into()));
        }

        if &cursor.read_tag("VQHD tag")? != b"VQHD" {
            return Err(WestwoodError::InvalidFormat("missing VQHD chunk".into()));
        }
        let header_size = cursor.read_u32_be("VQHD size")? as usize;
        let header_bytes = cursor.read_bytes(header_size, "VQHD data")?;

        let mut header_cursor = Cursor::new(header_bytes);
        let header: VqaHeader = header_cursor
            .read_le()
            .map_err(|e| WestwoodError::BinRw("Couldn't read VQA header".into(), e))?;

        if header.block_w == 0 || header.block_h == 0 {
            return Err(WestwoodError::CorruptHeader("VQA block size is zero".into()));
        }

        let mut audio = AudioInfo {
            sample_rate: header.sample_rate,
            channels: header.channels,
            bits: header.bits,
            codec: None,
        };
        if header.version == 1 {
            if audio.sample_rate == 0 {
                audio.sample_rate = 22050;
            }
            if audio.channels == 0 {
                audio.channels = 1;
            }
            if audio.bits == 0 {
                audio.bits = 8;
            }
        }

        let mut video = Self {
            data,
            header,
            audio,
        };
        video.audio.codec = video.scan_audio_codec();
        Ok(video)
    }

    pub fn header(&self) -> &VqaHeader {
        &self.header
    }

    pub fn audio_info(&self) -> &AudioInfo {
        &self.audio
    }

    pub fn has_audio(&self) -> bool {
        self.audio.codec.is_some()
    }

    pub fn duration_seconds(&self) -> f32 {
        if self.header.frame_rate == 0 {
            return 0.0;
        }
        self.header.frame_count as f32 / self.header.frame_rate as f32
    }

    pub fn is_hicolor(&self) -> bool {
        self.header.flags & 0x10 != 0 || self.header.colors == 0
    }

    fn blocks_x(&self) -> usize {
        self.header.width as usize / self.header.block_w as usize
    }

    fn blocks_y(&self) -> usize {
        self.header.height as usize / self.header.block_h as usize
    }

    /// Bytes per codebook block.
    fn block_size(&self) -> usize {
        let samples = self.header.block_w as usize * self.header.block_h as usize;
        if self.is_hicolor() {
            samples * 2
        } else {
            samples
        }
    }

    /// Bytes per vector-pointer-table entry.
    fn index_bytes(&self) -> usize {
        if self.header.version == 1 || self.is_hicolor() {
            2
        } else {
            1
        }
    }

    fn scan_audio_codec(&self) -> Option<AudioCodec> {
        let mut cursor = ByteCursor::new(&self.data);
        cursor.seek(CHUNKS_START).ok()?;
        while cursor.remaining() >= 8 {
            let tag = cursor.read_tag("chunk tag").ok()?;
            let size = cursor.read_u32_be("chunk size").ok()? as usize;
            match &tag {
                b"SND0" => return Some(AudioCodec::Pcm),
                b"SND1" => return Some(AudioCodec::WsAdpcm),
                b"SND2" => return Some(AudioCodec::ImaAdpcm),
                b"VQFR" | b"VQFL" => {
                    if chunk_tag_follows(&self.data, cursor.pos()) {
                        continue;
                    }
                    cursor.skip(size + (size & 1)).ok()?;
                }
                _ => cursor.skip(size + (size & 1)).ok()?,
            }
        }
        None
    }

    /// Decode the video stream. Exactly `frame_count` frames come back;
    /// a stream that ends early is padded with the last frame buffer.
    pub fn decode_video(&self) -> Result<Vec<VqaFrame>> {
        let header = &self.header;
        let block_size = self.block_size();
        let vpt_size = self.blocks_x() * self.blocks_y() * self.index_bytes();

        let mut codebook = vec![0u8; header.max_blocks as usize * block_size];
        let mut palette = Palette::default();
        let mut frame_buffer = vec![0u8; header.width as usize * header.height as usize * 3];
        let mut frames: Vec<VqaFrame> = Vec::with_capacity(header.frame_count as usize);

        let mut cursor = ByteCursor::new(&self.data);
        cursor.seek(CHUNKS_START.min(self.data.len()))?;

        while cursor.remaining() >= 8 && frames.len() < header.frame_count as usize {
            let tag = cursor.read_tag("chunk tag")?;
            let size = cursor.read_u32_be("chunk size")? as usize;

            match &tag {
                // Walk into frame containers; skip the leaf-chunk form.
                b"VQFR" | b"VQFL" => {
                    if chunk_tag_follows(&self.data, cursor.pos()) {
                        continue;
                    }
                    cursor.skip(size)?;
                }
                b"CBF0" => {
                    let chunk = cursor.read_bytes(size, "CBF0 data")?;
                    let n = chunk.len().min(codebook.len());
                    codebook[..n].copy_from_slice(&chunk[..n]);
                }
                b"CBFZ" => {
                    let chunk = cursor.read_bytes(size, "CBFZ data")?;
                    let decoded = lcw_decompress_to_vec(chunk, codebook.len(), false)?;
                    codebook[..decoded.len()].copy_from_slice(&decoded);
                }
                b"CBP0" => {
                    let chunk = cursor.read_bytes(size, "CBP0 data")?;
                    if chunk.len() >= 4 {
                        let offset = u32::from_le_bytes(chunk[0..4].try_into().expect("4 bytes"))
                            as usize;
                        if offset < codebook.len() {
                            let n = (chunk.len() - 4).min(codebook.len() - offset);
                            codebook[offset..offset + n].copy_from_slice(&chunk[4..4 + n]);
                        }
                    }
                }
                b"CBPZ" => {
                    let chunk = cursor.read_bytes(size, "CBPZ data")?;
                    if chunk.len() >= 4 {
                        let offset = u32::from_le_bytes(chunk[0..4].try_into().expect("4 bytes"))
                            as usize;
                        if offset < codebook.len() {
                            let decoded = lcw_decompress_to_vec(
                                &chunk[4..],
                                codebook.len() - offset,
                                false,
                            )?;
                            codebook[offset..offset + decoded.len()].copy_from_slice(&decoded);
                        }
                    }
                }
                b"CPL0" => {
                    let chunk = cursor.read_bytes(size, "CPL0 data")?;
                    if chunk.len() >= PALETTE_BYTES {
                        let bytes: &[u8; PALETTE_BYTES] =
                            chunk[..PALETTE_BYTES].try_into().expect("palette slice");
                        palette = Palette::from_6bit(bytes);
                    }
                }
                b"CPLZ" => {
                    let chunk = cursor.read_bytes(size, "CPLZ data")?;
                    let decoded = lcw_decompress_to_vec(chunk, PALETTE_BYTES, false)?;
                    if decoded.len() >= PALETTE_BYTES {
                        let bytes: &[u8; PALETTE_BYTES] =
                            decoded[..PALETTE_BYTES].try_into().expect("palette slice");
                        palette = Palette::from_6bit(bytes);
                    }
                }
                b"VPT0" | b"VPTR" => {
                    let chunk = cursor.read_bytes(size, "VPT data")?;
                    self.assemble_frame(chunk, &codebook, &palette, &mut frame_buffer);
                    frames.push(VqaFrame {
                        rgb: frame_buffer.clone(),
                        width: header.width,
                        height: header.height,
                    });
                }
                b"VPTZ" | b"VPRZ" => {
                    let chunk = cursor.read_bytes(size, "VPT data")?;
                    let decoded = lcw_decompress_to_vec(chunk, vpt_size, false)?;
                    self.assemble_frame(&decoded, &codebook, &palette, &mut frame_buffer);
                    frames.push(VqaFrame {
                        rgb: frame_buffer.clone(),
                        width: header.width,
                        height: header.height,
                    });
                }
                b"VQHD" | b"FINF" => {
                    cursor.skip(size)?;
                }
                _ => {
                    log::debug!(
                        "skipping unknown VQA chunk {:?} ({} bytes)",
                        String::from_utf8_lossy(&tag),
                        size
                    );
                    cursor.skip(size)?;
                }
            }

            // Chunk data is padded to even length.
            if size & 1 != 0 && !cursor.at_end() {
                cursor.skip(1)?;
            }
        }

        // A short stream still yields frame_count frames.
        while frames.len() < header.frame_count as usize {
            frames.push(VqaFrame {
                rgb: frame_buffer.clone(),
                width: header.width,
                height: header.height,
            });
        }

        Ok(frames)
    }

    /// Paint one frame from a vector-pointer table.
    fn assemble_frame(
        &self,
        vpt: &[u8],
        codebook: &[u8],
        palette: &Palette,
        frame_buffer: &mut [u8],
    ) {
        let header = &self.header;
        let hicolor = self.is_hicolor();
        let is_v1 = header.version == 1;
        let block_size = self.block_size();
        let (bw, bh) = (header.block_w as usize, header.block_h as usize);
        let (width, height) = (header.width as usize, header.height as usize);

        let mut vpt_pos = 0usize;
        'rows: for by in 0..self.blocks_y() {
            for bx in 0..self.blocks_x() {
                let mut uniform_color = None;
                let cb_index;

                if is_v1 {
                    if vpt_pos + 2 > vpt.len() {
                        break 'rows;
                    }
                    let lo = vpt[vpt_pos] as usize;
                    let hi = vpt[vpt_pos + 1] as usize;
                    vpt_pos += 2;
                    if hi == 0xFF {
                        uniform_color = Some(lo as u8);
                        cb_index = 0;
                    } else {
                        cb_index = (hi * 256 + lo) / 8;
                    }
                } else if hicolor {
                    if vpt_pos + 2 > vpt.len() {
                        break 'rows;
                    }
                    cb_index = vpt[vpt_pos] as usize | (vpt[vpt_pos + 1] as usize) << 8;
                    vpt_pos += 2;
                } else {
                    if vpt_pos >= vpt.len() {
                        break 'rows;
                    }
                    cb_index = vpt[vpt_pos] as usize;
                    vpt_pos += 1;
                }

                if uniform_color.is_none() && cb_index >= header.max_blocks as usize {
                    continue;
                }
                let block = match uniform_color {
                    Some(_) => &[][..],
                    None => &codebook[cb_index * block_size..][..block_size],
                };

                for py in 0..bh {
                    for px in 0..bw {
                        let fx = bx * bw + px;
                        let fy = by * bh + py;
                        if fx >= width || fy >= height {
                            continue;
                        }
                        let dst = (fy * width + fx) * 3;

                        if let Some(color_index) = uniform_color {
                            let c = palette.color(color_index);
                            frame_buffer[dst] = c.r;
                            frame_buffer[dst + 1] = c.g;
                            frame_buffer[dst + 2] = c.b;
                        } else if hicolor {
                            let src = (py * bw + px) * 2;
                            let pixel =
                                block[src] as u16 | (block[src + 1] as u16) << 8;
                            frame_buffer[dst] = (((pixel >> 10) & 0x1F) << 3) as u8;
                            frame_buffer[dst + 1] = (((pixel >> 5) & 0x1F) << 3) as u8;
                            frame_buffer[dst + 2] = ((pixel & 0x1F) << 3) as u8;
                        } else {
                            let c = palette.color(block[py * bw + px]);
                            frame_buffer[dst] = c.r;
                            frame_buffer[dst + 1] = c.g;
                            frame_buffer[dst + 2] = c.b;
                        }
                    }
                }
            }
        }
    }

    /// Decode every audio fragment into interleaved signed 16-bit PCM.
    pub fn decode_audio(&self) -> Result<Vec<i16>> {
        let mut samples = Vec::new();
        let mut left = ImaState::default();
        let mut right = ImaState::default();

        let mut cursor = ByteCursor::new(&self.data);
        cursor.seek(CHUNKS_START.min(self.data.len()))?;

        while cursor.remaining() >= 8 {
            let tag = cursor.read_tag("chunk tag")?;
            let size = cursor.read_u32_be("chunk size")? as usize;

            match &tag {
                b"VQFR" | b"VQFL" => {
                    if chunk_tag_follows(&self.data, cursor.pos()) {
                        continue;
                    }
                    cursor.skip(size)?;
                }
                b"SND0" => {
                    let chunk = cursor.read_bytes(size, "SND0 data")?;
                    if self.audio.bits == 16 {
                        for pair in chunk.chunks_exact(2) {
                            samples.push(i16::from_le_bytes([pair[0], pair[1]]));
                        }
                    } else {
                        samples.extend(chunk.iter().map(|&b| pcm8_to_i16(b)));
                    }
                }
                b"SND1" => {
                    let chunk = cursor.read_bytes(size, "SND1 data")?;
                    decode_ws_adpcm(chunk, &mut samples);
                }
                b"SND2" => {
                    let chunk = cursor.read_bytes(size, "SND2 data")?;
                    if chunk.len() >= 4 {
                        decode_ima_adpcm(
                            chunk,
                            self.audio.channels,
                            &mut left,
                            &mut right,
                            true,
                            &mut samples,
                        )?;
                    }
                }
                _ => {
                    cursor.skip(size)?;
                }
            }

            if size & 1 != 0 && !cursor.at_end() {
                cursor.skip(1)?;
            }
        }

        Ok(samples)
    }
}
