//! CLI command implementations.

pub mod bench;
pub mod compress;
pub mod decompress;
pub mod inspect;
