//! Asset CRUD operations.

use super::storage::{insert_asset, load_asset, row_to_asset, ASSET_COLUMNS};
use super::types::{validate_media_type, Asset, AssetError};
use crate::db::{immediate, Database};
use crate::gallery::GALLERY_IMAGES;
use crate::ordering::remove_item;
use crate::utils::{new_id, now_iso};
use rusqlite::params;
use serde::Serialize;
use tracing::info;

/// Options for registering an uploaded asset
#[derive(Debug, Clone)]
pub struct RegisterAssetOptions {
    pub owner_id: String,
    pub title: String,
    pub media_type: String,
    pub url: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// Result of deleting an asset
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAssetResult {
    pub asset: Asset,
    /// Gallery images removed (each gallery was compacted)
    pub gallery_images_removed: usize,
    /// Streams the asset was untagged from
    pub streams_untagged: usize,
}

/// Register an uploaded asset
pub async fn register_asset(
    db: &Database,
    options: RegisterAssetOptions,
) -> Result<Asset, AssetError> {
    let title = options.title.trim().to_string();
    if title.is_empty() {
        return Err(AssetError::InvalidAsset("title cannot be empty".to_string()));
    }
    validate_media_type(&options.media_type)?;
    url::Url::parse(&options.url)
        .map_err(|e| AssetError::InvalidAsset(format!("url '{}': {e}", options.url)))?;
    if options.width.is_some_and(|w| w <= 0) || options.height.is_some_and(|h| h <= 0) {
        return Err(AssetError::InvalidAsset(
            "dimensions must be positive".to_string(),
        ));
    }

    let asset = Asset {
        id: new_id(),
        owner_id: options.owner_id,
        title,
        media_type: options.media_type,
        url: options.url,
        width: options.width,
        height: options.height,
        created_at: now_iso(),
    };
    let row = asset.clone();
    db.call(move |conn| insert_asset(conn, &row).map_err(AssetError::from))
        .await?;

    info!("Registered asset: {} ({})", asset.id, asset.media_type);
    Ok(asset)
}

/// Get an asset by id
pub async fn get_asset(db: &Database, asset_id: &str) -> Result<Asset, AssetError> {
    let asset_id = asset_id.to_string();
    db.call(move |conn| load_asset(conn, &asset_id)).await
}

/// List assets, newest first, optionally restricted to one owner
pub async fn list_assets(
    db: &Database,
    owner_id: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Asset>, AssetError> {
    let owner_id = owner_id.map(ToString::to_string);
    db.call(move |conn| {
        let sql = format!(
            "SELECT {ASSET_COLUMNS} FROM assets WHERE (?1 IS NULL OR owner_id = ?1) \
             ORDER BY created_at DESC, id LIMIT ?2 OFFSET ?3"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![owner_id, limit, offset], row_to_asset)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    })
    .await
}

/// Delete an asset.
///
/// Rejected while a post block points at it. Gallery images showing it are
/// removed and their galleries compacted; stream tags go with the row.
pub async fn delete_asset(db: &Database, asset_id: &str) -> Result<DeleteAssetResult, AssetError> {
    let asset_id = asset_id.to_string();
    let result = db
        .call(move |conn| {
            let tx = immediate(conn)?;
            let asset = load_asset(&tx, &asset_id)?;

            let referencing: i64 = tx.query_row(
                "SELECT COUNT(*) FROM blocks WHERE kind IN ('post', 'featured_post') \
                 AND json_extract(payload, '$.assetId') = ?1",
                params![asset_id],
                |row| row.get(0),
            )?;
            if referencing > 0 {
                return Err(AssetError::AssetInUse {
                    asset_id,
                    blocks: referencing,
                });
            }

            let images: Vec<(String, String)> = {
                let mut stmt =
                    tx.prepare("SELECT id, block_id FROM gallery_images WHERE asset_id = ?1")?;
                let rows = stmt.query_map(params![asset_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
                rows.collect::<Result<Vec<_>, _>>()?
            };
            for (image_id, block_id) in &images {
                remove_item(&tx, GALLERY_IMAGES, block_id, image_id)?;
            }

            let streams_untagged = tx.execute(
                "DELETE FROM stream_assets WHERE asset_id = ?1",
                params![asset_id],
            )?;
            tx.execute("DELETE FROM assets WHERE id = ?1", params![asset_id])?;
            tx.commit()?;

            Ok(DeleteAssetResult {
                asset,
                gallery_images_removed: images.len(),
                streams_untagged,
            })
        })
        .await?;

    info!(
        "Deleted asset: {} ({} gallery images, {} streams)",
        result.asset.id, result.gallery_images_removed, result.streams_untagged
    );
    Ok(result)
}

#[cfg(test)]
#[path = "crud_tests.rs"]
mod crud_tests;
