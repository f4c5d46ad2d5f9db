use super::types::{GalleryError, GalleryImage};
use crate::asset::asset_exists;
use crate::block::{find_block, BlockKind, BlockParent};
use crate::ordering::PositionedTable;
use rusqlite::{params, Connection, Row};

/// Gallery images are ordered per block.
pub const GALLERY_IMAGES: PositionedTable = PositionedTable::new("gallery_images", "block_id");

const COLUMNS: &str = "id, block_id, asset_id, position, caption, created_at";

fn row_to_image(row: &Row<'_>) -> rusqlite::Result<GalleryImage> {
    Ok(GalleryImage {
        id: row.get(0)?,
        block_id: row.get(1)?,
        asset_id: row.get(2)?,
        position: row.get(3)?,
        caption: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Fail unless `block_id` is an `image_gallery` block of `parent`.
pub(super) fn ensure_gallery_block(
    conn: &Connection,
    parent: &BlockParent,
    block_id: &str,
) -> Result<(), GalleryError> {
    let block = find_block(conn, block_id)?
        .filter(|b| b.parent_kind == parent.kind() && b.parent_id == parent.id())
        .ok_or_else(|| GalleryError::BlockNotFound(block_id.to_string()))?;
    if block.content.kind() == BlockKind::ImageGallery {
        Ok(())
    } else {
        Err(GalleryError::NotAGallery(block_id.to_string()))
    }
}

pub(super) fn ensure_assets(conn: &Connection, asset_ids: &[String]) -> Result<(), GalleryError> {
    for asset_id in asset_ids {
        if !asset_exists(conn, asset_id)? {
            return Err(GalleryError::AssetNotFound(asset_id.clone()));
        }
    }
    Ok(())
}

pub(super) fn select_images(conn: &Connection, block_id: &str) -> rusqlite::Result<Vec<GalleryImage>> {
    let sql = format!("SELECT {COLUMNS} FROM gallery_images WHERE block_id = ?1 ORDER BY position");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![block_id], row_to_image)?;
    rows.collect()
}

pub(super) fn insert_image(conn: &Connection, image: &GalleryImage) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO gallery_images (id, block_id, asset_id, position, caption, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            image.id,
            image.block_id,
            image.asset_id,
            image.position,
            image.caption,
            image.created_at,
        ],
    )?;
    Ok(())
}
