//! On-disk header and index-entry layouts for the MIX archive variants.

use binrw::binread;

/// Flags word of RA-style archives: these two bits are the only ones that
/// may be set; anything else means the file is a TD archive whose first
/// bytes merely resemble a flags word.
pub const FLAG_CHECKSUM: u32 = 0x0001_0000;
pub const FLAG_ENCRYPTED: u32 = 0x0002_0000;

/// Hard cap on the index size, shared by every variant.
pub const MAX_FILE_COUNT: u32 = 4095;

pub const INDEX_ENTRY_SIZE: usize = 12;

/// An index entry whose hash has this value marks a Tiberian Sun archive
/// (the hash of its name database file).
pub const TS_MARKER_ID: u32 = 0x763C_81DD;

/// TD header: file count and body size, immediately followed by the index.
#[binread]
#[derive(Debug)]
#[br(little)]
pub struct TdHeader {
    pub file_count: u16,
    pub body_size: u32,
}

/// One 12-byte index entry, TD/RA/Renegade layout. The offset is relative
/// to a variant-specific base.
#[binread]
#[derive(Debug)]
#[br(little)]
pub struct RawIndexEntry {
    pub hash: u32,
    pub offset: u32,
    pub size: u32,
}

/// Renegade ("MIX1") header: locations of the index and name tables.
#[binread]
#[derive(Debug)]
#[br(little, magic = b"MIX1")]
pub struct RgHeader {
    pub index_offset: u32,
    pub names_offset: u32,
}

/// Generals ("BIGF"/"BIG4") header, after the magic. The archive size is
/// little-endian while the counts are big-endian.
#[binread]
#[derive(Debug)]
pub struct BigHeader {
    #[br(little)]
    pub archive_size: u32,
    #[br(big)]
    pub file_count: u32,
    #[br(big)]
    pub index_size: u32,
}
