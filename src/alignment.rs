//! Alignment blocks within an alignment info file.

pub mod block;

pub use block::Block;
