//! Read-only decoders for the Westwood Studios asset formats: MIX archives
//! (including the Blowfish-encrypted index variant), CPS still images, SHP
//! sprites, WSA animations, VQA video, AUD audio, and TMP tilesets, built
//! on the shared LCW, Format40 and ADPCM kernels.
//!
//! Decoding is deterministic and pure: identical input bytes yield
//! identical output, and every failure is a value, never a panic.

pub mod aud;
pub mod codec;
pub mod console;
pub mod cps;
pub mod crypto;
pub mod cursor;
pub mod error;
pub mod hash;
pub mod mix;
pub mod palette;
pub mod shp;
pub mod tmp;
pub mod vqa;
pub mod wsa;
