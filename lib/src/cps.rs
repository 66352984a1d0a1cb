//! CPS still images: a fixed 320x200 indexed picture, optionally LCW
//! compressed, with an optional embedded 6-bit palette.

use std::io::Cursor;
use std::path::Path;

use binrw::{binread, BinReaderExt};

use crate::codec::lcw_decompress;
use crate::error::{Result, WestwoodError};
use crate::palette::{Palette, PALETTE_BYTES};

pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 200;
const PIXELS: usize = WIDTH * HEIGHT;

const HEADER_SIZE: usize = 10;

#[binread]
#[derive(Debug)]
#[br(little)]
pub struct CpsHeader {
    /// File size excluding this field.
    pub file_size: u16,
    pub compression: u16,
    pub uncompressed_size: u32,
    pub palette_size: u16,
}

pub struct CpsImage {
    header: CpsHeader,
    palette: Option<Palette>,
    pixels: Vec<u8>,
}

impl CpsImage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(WestwoodError::FileNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)
            .map_err(|e| WestwoodError::Io(format!("Couldn't read {}", path.display()), e))?;
        Self::parse(&data)
    }

    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(WestwoodError::CorruptHeader("CPS file too small".into()));
        }

        let mut cursor = Cursor::new(data);
        let header: CpsHeader = cursor
            .read_le()
            .map_err(|e| WestwoodError::BinRw("Couldn't read CPS header".into(), e))?;

        if header.file_size as usize + 2 > data.len() {
            return Err(WestwoodError::CorruptHeader(
                "CPS declared size exceeds the file".into(),
            ));
        }
        if header.compression != 0 && header.compression != 4 {
            return Err(WestwoodError::UnsupportedFormat(format!(
                "CPS compression method {}",
                header.compression
            )));
        }
        if header.palette_size != 0 && header.palette_size as usize != PALETTE_BYTES {
            return Err(WestwoodError::CorruptHeader(format!(
                "CPS palette size {}",
                header.palette_size
            )));
        }

        let mut offset = HEADER_SIZE;
        let palette = if header.palette_size as usize == PALETTE_BYTES {
            if data.len() < offset + PALETTE_BYTES {
                return Err(WestwoodError::UnexpectedEof("CPS palette".into()));
            }
            let bytes: &[u8; PALETTE_BYTES] = data[offset..offset + PALETTE_BYTES]
                .try_into()
                .expect("palette slice");
            offset += PALETTE_BYTES;
            Some(Palette::from_6bit(bytes))
        } else {
            None
        };

        let image_data = &data[offset..];
        let pixels = if header.compression == 4 {
            let mut out = vec![0u8; header.uncompressed_size as usize];
            let written = lcw_decompress(image_data, &mut out, false)?;
            out.truncate(written);
            out
        } else {
            image_data.to_vec()
        };

        if pixels.len() != PIXELS {
            return Err(WestwoodError::CorruptData(format!(
                "CPS decoded to {} pixels, expected {}",
                pixels.len(),
                PIXELS
            )));
        }

        Ok(Self {
            header,
            palette,
            pixels,
        })
    }

    pub fn header(&self) -> &CpsHeader {
        &self.header
    }

    pub fn width(&self) -> usize {
        WIDTH
    }

    pub fn height(&self) -> usize {
        HEIGHT
    }

    /// 64 000 palette indices, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }
}

#[cfg(test)]
mod cps_tests {
    use super::{CpsImage, PIXELS};
    use crate::error::WestwoodError;

    fn uncompressed_fixture(with_palette: bool) -> Vec<u8> {
        let palette_size: u16 = if with_palette { 768 } else { 0 };
        let body_len = PIXELS + palette_size as usize;
        let mut data = Vec::new();
        data.extend_from_slice(&((8 + body_len) as u16).to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&(PIXELS as u32).to_le_bytes());
        data.extend_from_slice(&palette_size.to_le_bytes());
        if with_palette {
            data.extend(std::iter::repeat(0x20).take(768));
        }
        data.extend(std::iter::repeat(0x07).take(PIXELS));
        data
    }

    #[test]
    fn uncompressed_image() {
        let image = CpsImage::parse(&uncompressed_fixture(false)).unwrap();
        assert_eq!(image.pixels().len(), PIXELS);
        assert!(image.palette().is_none());
        assert!(image.pixels().iter().all(|&p| p == 0x07));
    }

    #[test]
    fn embedded_palette() {
        let image = CpsImage::parse(&uncompressed_fixture(true)).unwrap();
        let pal = image.palette().unwrap();
        // 0x20 expands from 6 to 8 bits.
        assert_eq!(pal.color(0).r, 0x82);
    }

    #[test]
    fn compressed_image() {
        // LCW: fill 64000 bytes of 0x2A.
        let mut data = Vec::new();
        let body = [0xFE, 0x00, 0xFA, 0x2A, 0x80];
        data.extend_from_slice(&((8 + body.len()) as u16).to_le_bytes());
        data.extend_from_slice(&4u16.to_le_bytes());
        data.extend_from_slice(&(PIXELS as u32).to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&body);

        let image = CpsImage::parse(&data).unwrap();
        assert_eq!(image.pixels().len(), PIXELS);
        assert!(image.pixels().iter().all(|&p| p == 0x2A));
    }

    #[test]
    fn wrong_pixel_count_is_corrupt() {
        let mut data = Vec::new();
        data.extend_from_slice(&(8u16 + 4).to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&[1, 2, 3, 4]);
        assert!(matches!(
            CpsImage::parse(&data),
            Err(WestwoodError::CorruptData(_))
        ));
    }

    #[test]
    fn unknown_compression_is_unsupported() {
        let mut data = uncompressed_fixture(false);
        data[2] = 9;
        assert!(matches!(
            CpsImage::parse(&data),
            Err(WestwoodError::UnsupportedFormat(_))
        ));
    }
}
