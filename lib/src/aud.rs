//! AUD audio files.
//!
//! A 12-byte header followed by a chunk stream; every chunk carries a
//! `0x0000DEAF` marker. Compression is either the Westwood ADPCM variant
//! (8-bit sources) or IMA ADPCM (16-bit sources), decoded with the same
//! kernels the VQA sound sub-streams use. IMA state persists across
//! chunks; there is no per-chunk state prefix here.

use std::io::Cursor;
use std::path::Path;

use binrw::{binread, BinReaderExt};

use crate::codec::adpcm::{decode_ima_adpcm, decode_ws_adpcm, ImaState};
use crate::cursor::ByteCursor;
use crate::error::{Result, WestwoodError};

const HEADER_SIZE: usize = 12;
const CHUNK_MAGIC: u32 = 0x0000_DEAF;

const FLAG_STEREO: u8 = 0x01;
const FLAG_16BIT: u8 = 0x02;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AudCodec {
    WsAdpcm,
    ImaAdpcm,
    Unknown(u8),
}

#[binread]
#[derive(Debug)]
#[br(little)]
pub struct AudHeader {
    pub sample_rate: u16,
    pub uncompressed_size: u32,
    pub compressed_size: u32,
    pub flags: u8,
    pub compression: u8,
}

pub struct AudFile {
    data: Vec<u8>,
    header: AudHeader,
}

impl AudFile {
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
            return Err(WestwoodError::CorruptHeader("AUD file too small".into()));
        }

        let mut cursor = Cursor::new(data.as_slice());
        let header: AudHeader = cursor
            .read_le()
            .map_err(|e| WestwoodError::BinRw("Couldn't read AUD header".into(), e))?;

        Ok(Self { data, header })
    }

    pub fn header(&self) -> &AudHeader {
        &self.header
    }

    pub fn codec(&self) -> AudCodec {
        match self.header.compression {
            1 => AudCodec::WsAdpcm,
            99 => AudCodec::ImaAdpcm,
            other => AudCodec::Unknown(other),
        }
    }

    pub fn channels(&self) -> u8 {
        if self.header.flags & FLAG_STEREO != 0 {
            2
        } else {
            1
        }
    }

    pub fn bits(&self) -> u8 {
        if self.header.flags & FLAG_16BIT != 0 {
            16
        } else {
            8
        }
    }

    pub fn sample_count(&self) -> u32 {
        let bytes_per_sample = (self.bits() as u32 / 8) * self.channels() as u32;
        if bytes_per_sample == 0 {
            return 0;
        }
        self.header.uncompressed_size / bytes_per_sample
    }

    pub fn duration_seconds(&self) -> f32 {
        if self.header.sample_rate == 0 {
            return 0.0;
        }
        self.sample_count() as f32 / self.header.sample_rate as f32
    }

    /// Decode the whole stream to interleaved signed 16-bit PCM.
    pub fn decode(&self) -> Result<Vec<i16>> {
        let codec = self.codec();
        if let AudCodec::Unknown(id) = codec {
            return Err(WestwoodError::UnsupportedFormat(format!(
                "AUD compression type {}",
                id
            )));
        }

        let mut samples = Vec::new();
        let mut left = ImaState::default();
        let mut right = ImaState::default();

        let mut cursor = ByteCursor::new(&self.data);
        cursor.seek(HEADER_SIZE)?;

        while cursor.remaining() >= 8 {
            let size = cursor.read_u16("AUD chunk size")? as usize;
            let _out_size = cursor.read_u16("AUD chunk output size")?;
            let magic = cursor.read_u32("AUD chunk magic")?;
            if magic != CHUNK_MAGIC {
                return Err(WestwoodError::CorruptData(format!(
                    "AUD chunk marker {:#010X}",
                    magic
                )));
            }

            let chunk = cursor.read_bytes(size, "AUD chunk data")?;
            match codec {
                AudCodec::WsAdpcm => decode_ws_adpcm(chunk, &mut samples),
                AudCodec::ImaAdpcm => {
                    decode_ima_adpcm(
                        chunk,
                        self.channels(),
                        &mut left,
                        &mut right,
                        false,
                        &mut samples,
                    )?;
                }
                AudCodec::Unknown(_) => unreachable!("rejected above"),
            }
        }

        Ok(samples)
    }
}
