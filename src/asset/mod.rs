//! Uploaded asset metadata.
//!
//! The binary itself lives in external storage; this module tracks what was
//! uploaded, by whom, and where it is served from.

mod crud;
mod storage;
mod types;

pub use crud::{delete_asset, get_asset, list_assets, register_asset, DeleteAssetResult, RegisterAssetOptions};
pub use storage::{asset_exists, row_to_asset, ASSET_COLUMNS};
pub use types::{validate_media_type, Asset, AssetError};
