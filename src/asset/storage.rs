use super::types::{Asset, AssetError};
use crate::db::optional;
use rusqlite::{params, Connection, Row};

pub const ASSET_COLUMNS: &str = "id, owner_id, title, media_type, url, width, height, created_at";

pub fn row_to_asset(row: &Row<'_>) -> rusqlite::Result<Asset> {
    Ok(Asset {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        media_type: row.get(3)?,
        url: row.get(4)?,
        width: row.get(5)?,
        height: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub fn asset_exists(conn: &Connection, asset_id: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM assets WHERE id = ?1)",
        params![asset_id],
        |row| row.get(0),
    )
}

pub(super) fn load_asset(conn: &Connection, asset_id: &str) -> Result<Asset, AssetError> {
    let sql = format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = ?1");
    optional(conn.query_row(&sql, params![asset_id], row_to_asset))?
        .ok_or_else(|| AssetError::AssetNotFound(asset_id.to_string()))
}

pub(super) fn insert_asset(conn: &Connection, asset: &Asset) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO assets (id, owner_id, title, media_type, url, width, height, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            asset.id,
            asset.owner_id,
            asset.title,
            asset.media_type,
            asset.url,
            asset.width,
            asset.height,
            asset.created_at,
        ],
    )?;
    Ok(())
}
