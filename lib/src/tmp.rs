//! TMP tilesets (TD/RA terrain templates).
//!
//! A 40-byte header, a u32 tile index (zero offset = empty slot), and raw
//! tile pixels. The TD and RA sub-formats are told apart by magic words in
//! the reserved header fields.

use std::io::Cursor;
use std::path::Path;

use binrw::{binread, BinReaderExt};

use crate::error::{Result, WestwoodError};

const HEADER_SIZE: usize = 40;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TmpFormat {
    Td,
    Ra,
}

#[binread]
#[derive(Debug)]
#[br(little)]
pub struct TmpHeader {
    pub tile_width: u16,
    pub tile_height: u16,
    pub tile_count: u32,
    #[br(temp)]
    _reserved1: u32,
    #[br(temp)]
    _tile_size: u32,
    #[br(temp)]
    _reserved2: u32,
    #[br(temp)]
    _magic: u32,
    #[br(temp)]
    _reserved3: u32,
    pub index_start: u32,
    pub index_end: u32,
    pub image_start: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct TmpTile {
    pub offset: u32,
    /// Empty slots have a zero offset in the index.
    pub valid: bool,
}

pub struct TmpTileset {
    data: Vec<u8>,
    format: TmpFormat,
    header: TmpHeader,
    tiles: Vec<TmpTile>,
}

impl TmpTileset {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(WestwoodError::FileNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)
            .map_err(|e| WestwoodError::Io(format!("Couldn't read {}", path.display()), e))?;
        Self::parse(data)
    }

    fn detect_format(data: &[u8]) -> TmpFormat {
        if data.len() >= 28 {
            let val20 = u32::from_le_bytes(data[20..24].try_into().expect("4 bytes"));
            let val26 = u16::from_le_bytes(data[26..28].try_into().expect("2 bytes"));
            if val20 == 0 && val26 == 0x2C73 {
                return TmpFormat::Ra;
            }
        }
        if data.len() >= 24 {
            let val16 = u32::from_le_bytes(data[16..20].try_into().expect("4 bytes"));
            let val20 = u32::from_le_bytes(data[20..24].try_into().expect("4 bytes"));
            if val16 == 0 && val20 == 0x0D1A_FFFF {
                return TmpFormat::Td;
            }
        }
        TmpFormat::Ra
    }

    pub fn parse(data: Vec<u8>) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(WestwoodError::CorruptHeader("TMP file too small".into()));
        }

        let format = Self::detect_format(&data);

        let mut cursor = Cursor::new(data.as_slice());
        let header: TmpHeader = cursor
            .read_le()
            .map_err(|e| WestwoodError::BinRw("Couldn't read TMP header".into(), e))?;

        if header.tile_width == 0 || header.tile_height == 0 {
            return Err(WestwoodError::CorruptHeader("TMP tile size is zero".into()));
        }
        if header.tile_count == 0 {
            return Err(WestwoodError::CorruptHeader("TMP has no tiles".into()));
        }

        let index_start = header.index_start as usize;
        // The index holds tile_count slots; index_end is ignored, it does
        // not always agree with the count in shipped files.
        let index_size = header.tile_count as usize * 4;
        if index_start + index_size > data.len() {
            return Err(WestwoodError::CorruptIndex("TMP index truncated".into()));
        }

        let mut tiles = Vec::with_capacity(header.tile_count as usize);
        for i in 0..header.tile_count as usize {
            let at = index_start + i * 4;
            let offset = u32::from_le_bytes(data[at..at + 4].try_into().expect("4 bytes"));
            tiles.push(TmpTile {
                offset,
                valid: offset != 0,
            });
        }

        Ok(Self {
            data,
            format,
            header,
            tiles,
        })
    }

    pub fn format(&self) -> TmpFormat {
        self.format
    }

    pub fn header(&self) -> &TmpHeader {
        &self.header
    }

    pub fn tiles(&self) -> &[TmpTile] {
        &self.tiles
    }

    pub fn tile_size(&self) -> usize {
        self.header.tile_width as usize * self.header.tile_height as usize
    }

    pub fn valid_tile_count(&self) -> u32 {
        self.tiles.iter().filter(|t| t.valid).count() as u32
    }

    /// Raw palette indices of one tile; `None` for empty slots.
    pub fn decode_tile(&self, index: usize) -> Result<Option<&[u8]>> {
        let tile = self
            .tiles
            .get(index)
            .copied()
            .ok_or_else(|| WestwoodError::Read(format!("tile index {} out of range", index)))?;
        if !tile.valid {
            return Ok(None);
        }

        let start = tile.offset as usize;
        let end = start
            .checked_add(self.tile_size())
            .filter(|&e| e <= self.data.len())
            .ok_or_else(|| WestwoodError::UnexpectedEof("TMP tile out of bounds".into()))?;
        Ok(Some(&self.data[start..end]))
    }
}

#[cfg(test)]
mod tmp_tests {
    use super::{TmpFormat, TmpTileset};
    use crate::error::WestwoodError;

    /// Two 2x2 tiles, the second slot empty.
    fn fixture() -> Vec<u8> {
        let index_start = 40u32;
        let image_start = index_start + 8;

        let mut data = Vec::new();
        data.extend_from_slice(&2u16.to_le_bytes());
        data.extend_from_slice(&2u16.to_le_bytes());
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0x0D1A_FFFFu32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&index_start.to_le_bytes());
        data.extend_from_slice(&(index_start + 8).to_le_bytes());
        data.extend_from_slice(&image_start.to_le_bytes());
        data.extend_from_slice(&image_start.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&[9, 8, 7, 6]);
        data
    }

    #[test]
    fn parse_and_decode() {
        let tileset = TmpTileset::parse(fixture()).unwrap();
        assert_eq!(tileset.format(), TmpFormat::Td);
        assert_eq!(tileset.header().tile_count, 2);
        assert_eq!(tileset.valid_tile_count(), 1);
        assert_eq!(tileset.decode_tile(0).unwrap(), Some(&[9u8, 8, 7, 6][..]));
        assert_eq!(tileset.decode_tile(1).unwrap(), None);
    }

    #[test]
    fn empty_tileset_is_corrupt() {
        let mut data = fixture();
        data[4..8].copy_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            TmpTileset::parse(data),
            Err(WestwoodError::CorruptHeader(_))
        ));
    }

    #[test]
    fn tile_index_out_of_range() {
        let tileset = TmpTileset::parse(fixture()).unwrap();
        assert!(tileset.decode_tile(5).is_err());
    }
}
