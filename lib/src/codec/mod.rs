//! Shared compression and audio kernels: every container format in this
//! crate composes these over its own framing.

pub mod adpcm;
pub mod format40;
pub mod lcw;

pub use format40::format40_apply;
pub use lcw::{lcw_decompress, lcw_decompress_to_vec};
