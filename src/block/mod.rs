//! Ordered content blocks of drops and streams.
//!
//! A drop or stream owns a dense list of typed blocks. The payload of each
//! block is a [`BlockContent`] stored as JSON next to its `kind`.

mod crud;
mod storage;
mod types;

pub use crud::{
    delete_block, insert_block, list_blocks, reorder_blocks, update_block, InsertBlockOptions,
};
pub use storage::{delete_blocks_of, find_block, BLOCKS};
pub use types::{Block, BlockContent, BlockError, BlockKind, BlockParent};
