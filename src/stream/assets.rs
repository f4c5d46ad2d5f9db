//! Asset tags on streams.

use super::storage::load_stream;
use super::types::{StreamAsset, StreamError};
use crate::asset::asset_exists;
use crate::db::Database;
use crate::utils::now_iso;
use rusqlite::params;
use tracing::{debug, info};

const COLUMNS: &str = "stream_id, asset_id, added_by, added_at";

fn row_to_stream_asset(row: &rusqlite::Row<'_>) -> rusqlite::Result<StreamAsset> {
    Ok(StreamAsset {
        stream_id: row.get(0)?,
        asset_id: row.get(1)?,
        added_by: row.get(2)?,
        added_at: row.get(3)?,
    })
}

/// Tag an asset to a stream. Tagging twice keeps the first tag.
pub async fn add_asset_to_stream(
    db: &Database,
    stream_id: &str,
    asset_id: &str,
    added_by: &str,
) -> Result<StreamAsset, StreamError> {
    let stream_id = stream_id.to_string();
    let asset_id = asset_id.to_string();
    let added_by = added_by.to_string();
    db.call(move |conn| {
        load_stream(conn, &stream_id)?;
        if !asset_exists(conn, &asset_id)? {
            return Err(StreamError::AssetNotFound(asset_id));
        }
        let added = conn.execute(
            "INSERT OR IGNORE INTO stream_assets (stream_id, asset_id, added_by, added_at) \
             VALUES (?1, ?2, ?3, ?4)",
            params![stream_id, asset_id, added_by, now_iso()],
        )?;
        if added == 0 {
            debug!("Asset {} already tagged to stream {}", asset_id, stream_id);
        } else {
            info!("Tagged asset {} to stream {}", asset_id, stream_id);
        }
        let sql = format!("SELECT {COLUMNS} FROM stream_assets WHERE stream_id = ?1 AND asset_id = ?2");
        Ok(conn.query_row(&sql, params![stream_id, asset_id], row_to_stream_asset)?)
    })
    .await
}

/// Remove an asset tag. Returns false when the asset was not tagged.
pub async fn remove_asset_from_stream(
    db: &Database,
    stream_id: &str,
    asset_id: &str,
) -> Result<bool, StreamError> {
    let stream_id = stream_id.to_string();
    let asset_id = asset_id.to_string();
    db.call(move |conn| {
        load_stream(conn, &stream_id)?;
        let removed = conn.execute(
            "DELETE FROM stream_assets WHERE stream_id = ?1 AND asset_id = ?2",
            params![stream_id, asset_id],
        )?;
        Ok(removed > 0)
    })
    .await
}

/// Assets of a stream, oldest tag first.
pub async fn list_stream_assets(
    db: &Database,
    stream_id: &str,
) -> Result<Vec<StreamAsset>, StreamError> {
    let stream_id = stream_id.to_string();
    db.call(move |conn| {
        load_stream(conn, &stream_id)?;
        let sql = format!(
            "SELECT {COLUMNS} FROM stream_assets WHERE stream_id = ?1 ORDER BY added_at, asset_id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![stream_id], row_to_stream_asset)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    })
    .await
}
