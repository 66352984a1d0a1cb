//! Recovery of the encrypted RA index.
//!
//! Layout: 4-byte flags, 80-byte key source, one encrypted 8-byte block
//! holding the header (file count + body size + the first two index
//! bytes), then the rest of the index encrypted in ECB. The plaintext
//! index is misaligned by that 2-byte carry from the header block.

use crate::crypto::{derive_blowfish_key, Blowfish};
use crate::error::{Result, WestwoodError};
use crate::mix::header::{INDEX_ENTRY_SIZE, MAX_FILE_COUNT};

pub const KEY_SOURCE_OFFSET: usize = 4;
pub const ENCRYPTED_HEADER_OFFSET: usize = 84;
pub const ENCRYPTED_INDEX_OFFSET: usize = 92;

/// The decrypted index stream, ready to parse as TD-style entries.
pub struct RecoveredIndex {
    pub file_count: u16,
    pub body_size: u32,
    /// `file_count * 12` bytes of plaintext index entries.
    pub index: Vec<u8>,
    /// Absolute offset of the archive body.
    pub body_offset: u32,
}

pub fn recover_index(data: &[u8]) -> Result<RecoveredIndex> {
    if data.len() < ENCRYPTED_INDEX_OFFSET {
        return Err(WestwoodError::CorruptHeader(
            "encrypted archive too small for key source and header block".into(),
        ));
    }

    let mut key_source = [0u8; 80];
    key_source.copy_from_slice(&data[KEY_SOURCE_OFFSET..KEY_SOURCE_OFFSET + 80]);
    let key = derive_blowfish_key(&key_source)?;
    let bf = Blowfish::new(&key);

    let mut header = [0u8; 8];
    header.copy_from_slice(&data[ENCRYPTED_HEADER_OFFSET..ENCRYPTED_HEADER_OFFSET + 8]);
    bf.decrypt_block(&mut header);

    let file_count = u16::from_le_bytes([header[0], header[1]]);
    let body_size = u32::from_le_bytes([header[2], header[3], header[4], header[5]]);

    if file_count == 0 {
        return Err(WestwoodError::DecryptionFailed(
            "decrypted file count is zero".into(),
        ));
    }
    if u32::from(file_count) > MAX_FILE_COUNT {
        return Err(WestwoodError::CorruptHeader(format!(
            "decrypted file count {} exceeds {}",
            file_count, MAX_FILE_COUNT
        )));
    }

    // The first two index bytes ride in the header block, so the encrypted
    // index is the raw size rounded up to a block multiple, minus those two.
    let raw_index_size = file_count as usize * INDEX_ENTRY_SIZE;
    let encrypted_size = (raw_index_size + 5) & !7;

    if data.len() < ENCRYPTED_INDEX_OFFSET + encrypted_size {
        return Err(WestwoodError::CorruptIndex(
            "encrypted index extends past end of file".into(),
        ));
    }

    let mut index_stream =
        data[ENCRYPTED_INDEX_OFFSET..ENCRYPTED_INDEX_OFFSET + encrypted_size].to_vec();
    bf.decrypt(&mut index_stream)?;

    let mut index = Vec::with_capacity(raw_index_size);
    index.push(header[6]);
    index.push(header[7]);
    index.extend_from_slice(&index_stream[..raw_index_size - 2]);

    log::debug!(
        "recovered encrypted index: {} entries, declared body size {}",
        file_count,
        body_size
    );

    Ok(RecoveredIndex {
        file_count,
        body_size,
        index,
        body_offset: (ENCRYPTED_INDEX_OFFSET + encrypted_size) as u32,
    })
}
