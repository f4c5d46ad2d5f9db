//! Drops: user posts whose body is an ordered list of blocks.

mod crud;
mod storage;
mod types;

pub use crud::{
    create_drop, delete_drop, get_drop, list_drops, update_drop, CreateDropOptions,
    DeleteDropResult, ListDropsOptions,
};
pub use storage::load_drop;
pub use types::{validate_title, Drop, DropError, MAX_TITLE_LENGTH};
