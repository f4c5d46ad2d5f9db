//! Streams: named collections with members, tagged assets, bookmarks and
//! their own block list.
//!
//! Asset and member counts are never stored; they are counted on read.

mod assets;
mod bookmarks;
mod crud;
mod members;
mod merge;
mod storage;
mod types;

pub use assets::{add_asset_to_stream, list_stream_assets, remove_asset_from_stream};
pub use bookmarks::{
    create_bookmark, delete_bookmark, list_bookmarks, update_bookmark, CreateBookmarkOptions,
    UpdateBookmarkOptions,
};
pub use crud::{
    create_stream, delete_stream, get_stream, get_stream_by_slug, get_stream_summary,
    list_streams, rename_stream, CreateStreamOptions,
};
pub use members::{follow_stream, list_members, unfollow_stream};
pub use merge::merge_streams;
pub use storage::load_stream;
pub use types::{
    validate_bookmark_url, Bookmark, MergeResult, RenameOutcome, Stream, StreamAsset,
    StreamError, StreamMember, StreamSummary,
};
