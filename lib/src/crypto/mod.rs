//! The MIX index cipher: Blowfish-ECB with the Westwood word order, plus
//! the public-key derivation that recovers the 56-byte key from an
//! archive's 80-byte key source.

pub mod blowfish;
pub mod pubkey;

mod tables;

pub use blowfish::Blowfish;
pub use pubkey::derive_blowfish_key;
