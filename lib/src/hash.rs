//! Filename hashing for MIX archive indices.
//!
//! Two families: the rotate-add hash of the first-generation games, and a
//! CRC-32 variant (reflected polynomial, zero init, no final complement)
//! used from Tiberian Sun onward, including Renegade and Generals.

use crc::{Algorithm, Crc};
use strum::{Display, EnumString};

/// CRC-32 as the later games compute it over lowercased names: same
/// reflected table as the ubiquitous variant, but starting from zero and
/// without the final complement.
const CRC_32_WESTWOOD: Algorithm<u32> = Algorithm {
    poly: 0x04C1_1DB7,
    init: 0x0000_0000,
    refin: true,
    refout: true,
    xorout: 0x0000_0000,
    check: 0x2DFD_2D88,
    residue: 0x0000_0000,
};

const TS_CALCULATOR: Crc<u32> = Crc::<u32>::new(&CRC_32_WESTWOOD);

/// Which game an archive belongs to; selects the hash function and is
/// reported in archive metadata.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Game {
    Unknown,
    TiberianDawn,
    RedAlert,
    TiberianSun,
    RedAlert2,
    YurisRevenge,
    Renegade,
    Generals,
    ZeroHour,
}

impl Game {
    /// Human-readable name for console output.
    pub fn display_name(&self) -> &'static str {
        match self {
            Game::Unknown => "Unknown",
            Game::TiberianDawn => "Tiberian Dawn",
            Game::RedAlert => "Red Alert",
            Game::TiberianSun => "Tiberian Sun",
            Game::RedAlert2 => "Red Alert 2",
            Game::YurisRevenge => "Yuri's Revenge",
            Game::Renegade => "Renegade",
            Game::Generals => "Generals",
            Game::ZeroHour => "Zero Hour",
        }
    }
}

/// Rotate-add hash used by Tiberian Dawn and Red Alert.
///
/// The name is uppercased with `/` normalized to `\`, packed four bytes at
/// a time into little-endian words (zero-padded), and folded with
/// `hash = rotate_left(hash, 1) + word`.
pub fn td_hash(filename: &str) -> u32 {
    let mut name = Vec::with_capacity(filename.len());
    for mut c in filename.bytes() {
        if c.is_ascii_lowercase() {
            c -= 0x20;
        }
        if c == b'/' {
            c = b'\\';
        }
        name.push(c);
    }

    let mut id = 0u32;
    let mut i = 0;
    while i < name.len() {
        let mut word = 0u32;
        for _ in 0..4 {
            word >>= 8;
            if i < name.len() {
                word |= (name[i] as u32) << 24;
                i += 1;
            }
        }
        id = id.rotate_left(1).wrapping_add(word);
    }
    id
}

/// CRC-based hash used by Tiberian Sun, Red Alert 2, Renegade and Generals,
/// computed over the lowercased name.
pub fn ts_hash(filename: &str) -> u32 {
    TS_CALCULATOR.checksum(filename.to_ascii_lowercase().as_bytes())
}

/// Hash a filename with whichever function `game` uses.
pub fn hash_for_game(game: Game, filename: &str) -> u32 {
    match game {
        Game::TiberianDawn | Game::RedAlert | Game::Unknown => td_hash(filename),
        Game::TiberianSun
        | Game::RedAlert2
        | Game::YurisRevenge
        | Game::Renegade
        | Game::Generals
        | Game::ZeroHour => ts_hash(filename),
    }
}

#[cfg(test)]
mod hash_tests {
    use super::{hash_for_game, td_hash, ts_hash, Game};

    #[test]
    fn td_hash_normalizes_case_and_slashes() {
        assert_eq!(td_hash("conquer.mix"), td_hash("CONQUER.MIX"));
        assert_eq!(td_hash("a/b"), td_hash("A\\B"));
    }

    #[test]
    fn td_hash_known_values() {
        assert_eq!(td_hash("CONQUER.MIX"), 0xA236_1104);
        // A name already a multiple of 4 folds without padding.
        assert_eq!(td_hash("AAAA"), 0x4141_4141);
        assert_eq!(td_hash(""), 0);
    }

    #[test]
    fn td_hash_distinguishes_names() {
        assert_ne!(td_hash("RULES.INI"), td_hash("ART.INI"));
    }

    #[test]
    fn ts_hash_is_lowercase_crc() {
        assert_eq!(ts_hash("CONQUER.MIX"), ts_hash("conquer.mix"));
        assert_eq!(ts_hash("conquer.mix"), 0x92F9_1FA8);
        // Zero init: the empty string hashes to zero.
        assert_eq!(ts_hash(""), 0);
    }

    #[test]
    fn game_dispatch() {
        assert_eq!(hash_for_game(Game::TiberianDawn, "X.SHP"), td_hash("X.SHP"));
        assert_eq!(hash_for_game(Game::RedAlert, "X.SHP"), td_hash("X.SHP"));
        assert_eq!(hash_for_game(Game::Renegade, "X.SHP"), ts_hash("X.SHP"));
        assert_eq!(hash_for_game(Game::Generals, "X.SHP"), ts_hash("X.SHP"));
    }

    #[test]
    fn game_names_parse() {
        use std::str::FromStr;
        assert_eq!(Game::from_str("tiberian_dawn").unwrap(), Game::TiberianDawn);
        assert_eq!(Game::from_str("red_alert2").unwrap(), Game::RedAlert2);
    }
}
