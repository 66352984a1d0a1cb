//! MIX archive reading: variant detection, index parsing, hash and name
//! lookup, and raw entry extraction.
//!
//! Five layouts share the name "MIX": the original TD header, the RA
//! flags-prefixed header with an optional Blowfish-encrypted index, the
//! Renegade `MIX1` layout with separate index and name tables, and the
//! Generals `BIGF`/`BIG4` layout with mixed endianness and inline names.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use binrw::BinReaderExt;
use strum::Display;
use unicase::UniCase;

use crate::error::{Result, WestwoodError};
use crate::hash::{hash_for_game, ts_hash, Game};
use crate::mix::header::{
    BigHeader, RawIndexEntry, RgHeader, TdHeader, FLAG_CHECKSUM, FLAG_ENCRYPTED, INDEX_ENTRY_SIZE,
    MAX_FILE_COUNT, TS_MARKER_ID,
};

pub mod encrypted;
pub mod header;
pub mod vault;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum MixFormat {
    #[strum(serialize = "TD")]
    Td,
    #[strum(serialize = "RA")]
    Ra,
    #[strum(serialize = "Renegade")]
    Rg,
    #[strum(serialize = "BIG")]
    Big,
}

#[derive(Debug)]
pub struct MixInfo {
    pub format: MixFormat,
    pub game: Game,
    pub encrypted: bool,
    pub has_checksum: bool,
    pub file_count: u32,
    pub file_size: u64,
    pub body_offset: u32,
}

#[derive(Debug, Clone)]
pub struct MixEntry {
    pub hash: u32,
    /// Absolute offset into the archive bytes.
    pub offset: u32,
    pub size: u32,
    /// Resolved name, if any candidate matched this entry's hash.
    pub name: Option<String>,
}

/// A fully parsed archive. Owns the backing bytes; entry reads hand out
/// borrowed ranges of them.
pub struct MixArchive {
    data: Vec<u8>,
    info: MixInfo,
    entries: Vec<MixEntry>,
    hash_to_index: HashMap<u32, usize>,
    name_to_index: HashMap<UniCase<String>, usize>,
}

impl MixArchive {
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
        let mut archive = Self {
            data,
            info: MixInfo {
                format: MixFormat::Td,
                game: Game::Unknown,
                encrypted: false,
                has_checksum: false,
                file_count: 0,
                file_size: 0,
                body_offset: 0,
            },
            entries: Vec::new(),
            hash_to_index: HashMap::new(),
            name_to_index: HashMap::new(),
        };
        archive.info.file_size = archive.data.len() as u64;

        if archive.data.len() < 6 {
            return Err(WestwoodError::InvalidFormat(
                "file too small for any MIX variant".into(),
            ));
        }

        let magic = u32::from_le_bytes(archive.data[0..4].try_into().expect("4 bytes"));
        match magic {
            m if m == u32::from_le_bytes(*b"MIX1") => archive.parse_rg()?,
            m if m == u32::from_le_bytes(*b"BIGF") || m == u32::from_le_bytes(*b"BIG4") => {
                archive.parse_big()?
            }
            flags
                if archive.data[0] == 0
                    && archive.data[1] == 0
                    && flags & !(FLAG_CHECKSUM | FLAG_ENCRYPTED) == 0 =>
            {
                archive.parse_ra(flags)?
            }
            _ => archive.parse_td()?,
        }

        archive.check_entry_bounds()?;
        Ok(archive)
    }

    pub fn info(&self) -> &MixInfo {
        &self.info
    }

    pub fn entries(&self) -> &[MixEntry] {
        &self.entries
    }

    pub fn find_hash(&self, hash: u32) -> Option<&MixEntry> {
        self.hash_to_index.get(&hash).map(|&i| &self.entries[i])
    }

    /// Find by resolved name (case-insensitive), falling back to hashing
    /// the name with the archive's own hash function.
    pub fn find_name(&self, name: &str) -> Option<&MixEntry> {
        if let Some(&i) = self.name_to_index.get(&UniCase::new(name.to_string())) {
            return Some(&self.entries[i]);
        }
        self.find_hash(hash_for_game(self.info.game, name))
    }

    /// The raw bytes of an entry.
    pub fn read(&self, entry: &MixEntry) -> Result<&[u8]> {
        let start = entry.offset as usize;
        let end = start
            .checked_add(entry.size as usize)
            .filter(|&e| e <= self.data.len());
        match end {
            Some(end) => Ok(&self.data[start..end]),
            None => Err(WestwoodError::Read(format!(
                "entry at {:#X}+{} is beyond end of archive",
                entry.offset, entry.size
            ))),
        }
    }

    /// Assign names to entries by hashing each candidate. The first
    /// candidate matching an unnamed entry wins; on a hash collision the
    /// second entry stays unnamed.
    pub fn resolve_names<S: AsRef<str>>(&mut self, names: &[S]) {
        self.resolve_names_as(self.info.game, names);
    }

    /// [Self::resolve_names] with an explicit hash family, for archives
    /// whose game was detected wrong.
    pub fn resolve_names_as<S: AsRef<str>>(&mut self, game: Game, names: &[S]) {
        for name in names {
            let name = name.as_ref();
            let hash = hash_for_game(game, name);
            let Some(&index) = self.hash_to_index.get(&hash) else {
                continue;
            };
            if self.entries[index].name.is_none() {
                self.entries[index].name = Some(name.to_string());
                self.name_to_index
                    .insert(UniCase::new(name.to_string()), index);
            }
        }
    }

    fn push_entry(&mut self, entry: MixEntry) {
        // First hash occurrence wins; a colliding later entry is still
        // listed but unreachable by hash.
        self.hash_to_index
            .entry(entry.hash)
            .or_insert(self.entries.len());
        if let Some(name) = &entry.name {
            self.name_to_index
                .entry(UniCase::new(name.clone()))
                .or_insert(self.entries.len());
        }
        self.entries.push(entry);
    }

    fn check_entry_bounds(&self) -> Result<()> {
        for entry in &self.entries {
            let end = entry.offset as u64 + entry.size as u64;
            if end > self.info.file_size {
                return Err(WestwoodError::CorruptIndex(format!(
                    "entry {:#010X} extends to {:#X}, past end of file",
                    entry.hash, end
                )));
            }
        }
        Ok(())
    }

    /// Detect the game by format plus the Tiberian Sun marker entry.
    fn detect_game(&self, format_default: Game) -> Game {
        if self.entries.iter().any(|e| e.hash == TS_MARKER_ID) {
            return Game::TiberianSun;
        }
        format_default
    }

    /// Parse `count` 12-byte entries from `index`, offsetting each by
    /// `base_offset` to make offsets absolute.
    fn parse_index(&mut self, index: &[u8], count: u32, base_offset: u32) -> Result<()> {
        let mut cursor = Cursor::new(index);
        for _ in 0..count {
            let raw: RawIndexEntry = cursor
                .read_le()
                .map_err(|e| WestwoodError::BinRw("Couldn't read index entry".into(), e))?;
            self.push_entry(MixEntry {
                hash: raw.hash,
                offset: raw.offset.wrapping_add(base_offset),
                size: raw.size,
                name: None,
            });
        }
        Ok(())
    }

    fn parse_td_index_at(&mut self, header_offset: usize) -> Result<(u16, u32)> {
        let mut cursor = Cursor::new(&self.data[header_offset..]);
        let header: TdHeader = cursor
            .read_le()
            .map_err(|e| WestwoodError::BinRw("Couldn't read MIX header".into(), e))?;

        if u32::from(header.file_count) > MAX_FILE_COUNT {
            return Err(WestwoodError::CorruptHeader(format!(
                "file count {} exceeds {}",
                header.file_count, MAX_FILE_COUNT
            )));
        }

        let index_start = header_offset + 6;
        let index_size = header.file_count as usize * INDEX_ENTRY_SIZE;
        let body_offset = index_start + index_size;
        if self.data.len() < body_offset {
            return Err(WestwoodError::CorruptIndex("index extends past end of file".into()));
        }

        let index = self.data[index_start..body_offset].to_vec();
        self.parse_index(&index, header.file_count.into(), body_offset as u32)?;

        Ok((header.file_count, body_offset as u32))
    }

    fn parse_td(&mut self) -> Result<()> {
        self.info.format = MixFormat::Td;
        let (count, body_offset) = self.parse_td_index_at(0)?;
        self.info.file_count = count.into();
        self.info.body_offset = body_offset;
        self.info.game = self.detect_game(Game::TiberianDawn);
        Ok(())
    }

    fn parse_ra(&mut self, flags: u32) -> Result<()> {
        self.info.format = MixFormat::Ra;
        self.info.encrypted = flags & FLAG_ENCRYPTED != 0;
        self.info.has_checksum = flags & FLAG_CHECKSUM != 0;

        if self.info.encrypted {
            let recovered = encrypted::recover_index(&self.data)?;
            self.parse_index(
                &recovered.index,
                recovered.file_count.into(),
                recovered.body_offset,
            )?;
            self.info.file_count = recovered.file_count.into();
            self.info.body_offset = recovered.body_offset;
        } else {
            // Plain RA parallels TD, shifted past the flags word.
            let (count, body_offset) = self.parse_td_index_at(4)?;
            self.info.file_count = count.into();
            self.info.body_offset = body_offset;
        }

        self.info.game = self.detect_game(Game::RedAlert);
        Ok(())
    }

    fn parse_rg(&mut self) -> Result<()> {
        const DATA_START: u32 = 12;

        self.info.format = MixFormat::Rg;
        self.info.game = Game::Renegade;
        self.info.body_offset = DATA_START;

        let mut cursor = Cursor::new(self.data.as_slice());
        let header: RgHeader = cursor
            .read_le()
            .map_err(|e| WestwoodError::BinRw("Couldn't read MIX1 header".into(), e))?;

        let index_offset = header.index_offset as usize;
        if index_offset + 4 > self.data.len() {
            return Err(WestwoodError::CorruptIndex(
                "MIX1 index table offset beyond end of file".into(),
            ));
        }
        let file_count = u32::from_le_bytes(
            self.data[index_offset..index_offset + 4]
                .try_into()
                .expect("4 bytes"),
        );
        if file_count > MAX_FILE_COUNT {
            return Err(WestwoodError::CorruptHeader(format!(
                "file count {} exceeds {}",
                file_count, MAX_FILE_COUNT
            )));
        }
        self.info.file_count = file_count;

        let index_start = index_offset + 4;
        let index_size = file_count as usize * INDEX_ENTRY_SIZE;
        if index_start + index_size > self.data.len() {
            return Err(WestwoodError::CorruptIndex("MIX1 index truncated".into()));
        }

        let index = self.data[index_start..index_start + index_size].to_vec();
        self.parse_index(&index, file_count, DATA_START)?;

        let names_offset = header.names_offset as usize;
        if names_offset > 0 && names_offset < self.data.len() {
            let names = self.read_rg_names(names_offset);
            self.resolve_names(&names);
        }

        Ok(())
    }

    /// The MIX1 name table: length-prefixed strings, matched to entries by
    /// recomputing their CRC.
    fn read_rg_names(&self, names_offset: usize) -> Vec<String> {
        let mut names = Vec::new();
        let mut pos = names_offset;
        while names.len() < self.entries.len() && pos < self.data.len() {
            let len = self.data[pos] as usize;
            pos += 1;
            if pos + len > self.data.len() {
                break;
            }
            names.push(String::from_utf8_lossy(&self.data[pos..pos + len]).into_owned());
            pos += len;
        }
        names
    }

    fn parse_big(&mut self) -> Result<()> {
        self.info.format = MixFormat::Big;
        self.info.game = if &self.data[0..4] == b"BIG4" {
            Game::ZeroHour
        } else {
            Game::Generals
        };
        // Entry offsets are absolute in this layout.
        self.info.body_offset = 0;

        if self.data.len() < 16 {
            return Err(WestwoodError::CorruptHeader("BIG header too small".into()));
        }
        let mut cursor = Cursor::new(&self.data[4..]);
        let header: BigHeader = cursor
            .read_le()
            .map_err(|e| WestwoodError::BinRw("Couldn't read BIG header".into(), e))?;

        if header.file_count > MAX_FILE_COUNT {
            return Err(WestwoodError::CorruptHeader(format!(
                "file count {} exceeds {}",
                header.file_count, MAX_FILE_COUNT
            )));
        }
        self.info.file_count = header.file_count;

        let index_end = 16usize
            .checked_add(header.index_size as usize)
            .filter(|&e| e <= self.data.len())
            .ok_or_else(|| {
                WestwoodError::CorruptIndex("BIG index extends past end of file".into())
            })?;

        let mut pos = 16usize;
        for _ in 0..header.file_count {
            if pos + 8 > index_end {
                return Err(WestwoodError::CorruptIndex("BIG entry truncated".into()));
            }
            let offset =
                u32::from_be_bytes(self.data[pos..pos + 4].try_into().expect("4 bytes"));
            let size =
                u32::from_be_bytes(self.data[pos + 4..pos + 8].try_into().expect("4 bytes"));
            pos += 8;

            let name_start = pos;
            while pos < index_end && self.data[pos] != 0 {
                pos += 1;
            }
            if pos >= index_end {
                return Err(WestwoodError::CorruptIndex(
                    "BIG filename missing terminator".into(),
                ));
            }
            let name = String::from_utf8_lossy(&self.data[name_start..pos]).into_owned();
            pos += 1;

            self.push_entry(MixEntry {
                hash: ts_hash(&name),
                offset,
                size,
                name: Some(name),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod mix_tests {
    use super::{MixArchive, MixFormat};
    use crate::error::WestwoodError;
    use crate::hash::{td_hash, ts_hash, Game};

    /// A TD archive with three one-byte files named A, B, C.
    fn td_fixture() -> Vec<u8> {
        let names = ["A", "B", "C"];
        let mut index = Vec::new();
        for (i, name) in names.iter().enumerate() {
            index.extend_from_slice(&td_hash(name).to_le_bytes());
            index.extend_from_slice(&(i as u32).to_le_bytes());
            index.extend_from_slice(&1u32.to_le_bytes());
        }

        let mut data = Vec::new();
        data.extend_from_slice(&3u16.to_le_bytes());
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(&index);
        data.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
        data
    }

    #[test]
    fn td_parse() {
        let archive = MixArchive::parse(td_fixture()).unwrap();
        let info = archive.info();
        assert_eq!(info.format, MixFormat::Td);
        assert_eq!(info.game, Game::TiberianDawn);
        assert_eq!(info.file_count, 3);
        assert_eq!(info.body_offset, 42);
        assert!(!info.encrypted);

        for entry in archive.entries() {
            assert!(entry.offset >= 42 && entry.offset + entry.size <= 45);
        }
    }

    #[test]
    fn td_read_entries() {
        let archive = MixArchive::parse(td_fixture()).unwrap();
        let a = archive.find_hash(td_hash("A")).unwrap();
        assert_eq!(archive.read(a).unwrap(), &[0xAA]);
        // Reading twice yields identical bytes.
        assert_eq!(archive.read(a).unwrap(), archive.read(a).unwrap());
    }

    #[test]
    fn td_resolve_names() {
        let mut archive = MixArchive::parse(td_fixture()).unwrap();
        archive.resolve_names(&["B", "MISSING"]);
        let b = archive.find_name("b").unwrap();
        assert_eq!(b.name.as_deref(), Some("B"));
        assert_eq!(archive.read(b).unwrap(), &[0xBB]);
        assert!(archive.find_name("MISSING").is_none());
    }

    #[test]
    fn reopening_is_structurally_identical() {
        let a = MixArchive::parse(td_fixture()).unwrap();
        let b = MixArchive::parse(td_fixture()).unwrap();
        assert_eq!(a.entries().len(), b.entries().len());
        for (x, y) in a.entries().iter().zip(b.entries()) {
            assert_eq!((x.hash, x.offset, x.size), (y.hash, y.offset, y.size));
        }
    }

    #[test]
    fn td_header_vector() {
        // Spec fixture: 3 entries, 48-byte body.
        let mut data = Vec::new();
        data.extend_from_slice(&[0x03, 0x00, 0x30, 0x00, 0x00, 0x00]);
        for i in 0u32..3 {
            data.extend_from_slice(&(0x1000 + i).to_le_bytes());
            data.extend_from_slice(&(i * 16).to_le_bytes());
            data.extend_from_slice(&16u32.to_le_bytes());
        }
        data.extend_from_slice(&[0u8; 48]);

        let archive = MixArchive::parse(data).unwrap();
        assert_eq!(archive.info().file_count, 3);
        assert_eq!(archive.info().body_offset, 42);
        for e in archive.entries() {
            assert!(e.offset >= 42);
            assert!(e.offset + e.size <= 42 + 48);
        }
    }

    #[test]
    fn truncated_index_fails() {
        let mut data = td_fixture();
        data.truncate(20);
        assert!(matches!(
            MixArchive::parse(data),
            Err(WestwoodError::CorruptIndex(_))
        ));
    }

    #[test]
    fn entry_past_eof_fails() {
        let mut data = td_fixture();
        // Grow the size of the last entry beyond the body.
        let size_pos = 6 + 2 * 12 + 8;
        data[size_pos..size_pos + 4].copy_from_slice(&100u32.to_le_bytes());
        assert!(matches!(
            MixArchive::parse(data),
            Err(WestwoodError::CorruptIndex(_))
        ));
    }

    #[test]
    fn file_count_cap() {
        // An (empty-bodied) archive claiming 4096 files must be rejected
        // before any index reads happen.
        let mut data = Vec::new();
        data.extend_from_slice(&4096u16.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            MixArchive::parse(data),
            Err(WestwoodError::CorruptHeader(_))
        ));
    }

    #[test]
    fn file_count_at_cap_parses() {
        let count = 4095u16;
        let mut data = Vec::new();
        data.extend_from_slice(&count.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        for i in 0..count as u32 {
            data.extend_from_slice(&i.to_le_bytes());
            data.extend_from_slice(&0u32.to_le_bytes());
            data.extend_from_slice(&0u32.to_le_bytes());
        }
        let archive = MixArchive::parse(data).unwrap();
        assert_eq!(archive.info().file_count, 4095);
    }

    #[test]
    fn ra_plain_parse() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(&td_hash("X").to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(&[1, 2, 3, 4]);

        let archive = MixArchive::parse(data).unwrap();
        assert_eq!(archive.info().format, MixFormat::Ra);
        assert_eq!(archive.info().game, Game::RedAlert);
        assert!(!archive.info().encrypted);
        let x = archive.find_name("X").unwrap();
        assert_eq!(archive.read(x).unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn ra_flags_with_stray_bits_is_td() {
        // First word zero but an unknown flag bit set: not an RA archive.
        // As TD this has file_count 0 and an empty body, which parses.
        let mut data = Vec::new();
        data.extend_from_slice(&0x0004_0000u32.to_le_bytes());
        data.extend_from_slice(&[0, 0]);
        let archive = MixArchive::parse(data).unwrap();
        assert_eq!(archive.info().format, MixFormat::Td);
    }

    #[test]
    fn rg_parse_with_names() {
        let name = "readme.txt";
        let body = b"hello";

        let mut data = Vec::new();
        data.extend_from_slice(b"MIX1");
        // Index table right after the 5-byte body; names after the index.
        let index_offset = 12 + body.len() as u32;
        let names_offset = index_offset + 4 + 12;
        data.extend_from_slice(&index_offset.to_le_bytes());
        data.extend_from_slice(&names_offset.to_le_bytes());
        data.extend_from_slice(body);
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&ts_hash(name).to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&(body.len() as u32).to_le_bytes());
        data.push(name.len() as u8);
        data.extend_from_slice(name.as_bytes());

        let archive = MixArchive::parse(data).unwrap();
        assert_eq!(archive.info().format, MixFormat::Rg);
        assert_eq!(archive.info().game, Game::Renegade);
        let entry = archive.find_name(name).unwrap();
        assert_eq!(entry.name.as_deref(), Some(name));
        assert_eq!(archive.read(entry).unwrap(), body);
    }

    #[test]
    fn big_parse() {
        let name = b"art\\unit.dds";
        let body = b"DATA";

        let mut data = Vec::new();
        data.extend_from_slice(b"BIGF");
        let index_size = (8 + name.len() + 1) as u32;
        let body_offset = 16 + index_size;
        data.extend_from_slice(&(body_offset + body.len() as u32).to_le_bytes());
        data.extend_from_slice(&1u32.to_be_bytes());
        data.extend_from_slice(&index_size.to_be_bytes());
        data.extend_from_slice(&body_offset.to_be_bytes());
        data.extend_from_slice(&(body.len() as u32).to_be_bytes());
        data.extend_from_slice(name);
        data.push(0);
        data.extend_from_slice(body);

        let archive = MixArchive::parse(data).unwrap();
        assert_eq!(archive.info().format, MixFormat::Big);
        assert_eq!(archive.info().game, Game::Generals);
        let entry = archive.find_name("ART\\UNIT.DDS").unwrap();
        assert_eq!(archive.read(entry).unwrap(), body);
    }

    #[test]
    fn encrypted_round_trip() {
        use crate::crypto::{derive_blowfish_key, Blowfish};

        let mut key_source = [0u8; 80];
        for (i, b) in key_source.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(31).wrapping_add(7);
        }
        // Keep both halves below the public-key modulus.
        key_source[0] = 0x02;
        key_source[40] = 0x02;
        let key = derive_blowfish_key(&key_source).unwrap();
        let bf = Blowfish::new(&key);

        let body = b"ABCDE";
        let mut index = Vec::new();
        for (hash, offset, size) in [(0x1111u32, 0u32, 3u32), (0x2222, 3, 2)] {
            index.extend_from_slice(&hash.to_le_bytes());
            index.extend_from_slice(&offset.to_le_bytes());
            index.extend_from_slice(&size.to_le_bytes());
        }

        // Header block carries the first two index bytes.
        let mut header = [0u8; 8];
        header[0..2].copy_from_slice(&2u16.to_le_bytes());
        header[2..6].copy_from_slice(&(body.len() as u32).to_le_bytes());
        header[6] = index[0];
        header[7] = index[1];
        bf.encrypt_block(&mut header);

        // Encrypted stream: the rest of the index, block-padded.
        let encrypted_size = (index.len() + 5) & !7;
        let mut stream = index[2..].to_vec();
        stream.resize(encrypted_size, 0);
        bf.encrypt(&mut stream).unwrap();

        let mut data = Vec::new();
        data.extend_from_slice(&0x0002_0000u32.to_le_bytes());
        data.extend_from_slice(&key_source);
        data.extend_from_slice(&header);
        data.extend_from_slice(&stream);
        data.extend_from_slice(body);

        let archive = MixArchive::parse(data).unwrap();
        assert_eq!(archive.info().format, MixFormat::Ra);
        assert!(archive.info().encrypted);
        assert_eq!(archive.info().file_count, 2);
        assert_eq!(archive.info().body_offset, 92 + encrypted_size as u32);

        // Reading every entry in index order reconstructs the body.
        let mut all = Vec::new();
        for entry in archive.entries() {
            all.extend_from_slice(archive.read(entry).unwrap());
        }
        assert_eq!(all, body);
    }

    #[test]
    fn too_small_is_invalid_format() {
        assert!(matches!(
            MixArchive::parse(vec![0u8; 3]),
            Err(WestwoodError::InvalidFormat(_))
        ));
    }
}
