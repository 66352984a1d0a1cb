use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WestwoodError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Corrupt header: {0}")]
    CorruptHeader(String),
    #[error("Corrupt index: {0}")]
    CorruptIndex(String),
    #[error("Corrupt data: {0}")]
    CorruptData(String),
    #[error("Unexpected end of data: {0}")]
    UnexpectedEof(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Decompression failed: {0}")]
    Decompress(String),
    #[error("Output overflow: {0}")]
    OutputOverflow(String),
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Read error: {0}")]
    Read(String),
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("I/O error: {0}, {1}")]
    Io(String, #[source] std::io::Error),
    #[error("binrw error: {0}, {1}")]
    BinRw(String, #[source] binrw::Error),
}

pub type Result<T> = std::result::Result<T, WestwoodError>;

impl WestwoodError {
    /// Exit code for the CLI tools: 2 for format problems, 3 for I/O.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(..) | Self::FileNotFound(..) | Self::Read(..) => 3,
            _ => 2,
        }
    }
}
