//! Block list operations. Every mutation runs in one immediate transaction
//! and leaves positions dense.

use super::storage::{
    ensure_parent, insert_block_row, load_block, select_blocks, BLOCKS,
};
use super::types::{Block, BlockContent, BlockError, BlockParent};
use crate::asset::asset_exists;
use crate::db::{immediate, Database};
use crate::ordering::{apply_order, count, remove_item, resolve_insert_position};
use crate::utils::{new_id, now_iso};
use rusqlite::{params, Connection};
use tracing::{debug, info};

/// Options for inserting a block
#[derive(Debug, Clone)]
pub struct InsertBlockOptions {
    pub content: BlockContent,
    /// Target slot; `None` appends
    pub position: Option<i64>,
    /// Upper bound on blocks per parent; `None` is unbounded
    pub max_blocks: Option<i64>,
}

fn ensure_asset(conn: &Connection, content: &BlockContent) -> Result<(), BlockError> {
    if let Some(asset_id) = content.asset_id() {
        if !asset_exists(conn, asset_id)? {
            return Err(BlockError::AssetNotFound(asset_id.to_string()));
        }
    }
    Ok(())
}

/// List blocks of `parent` in position order.
pub async fn list_blocks(db: &Database, parent: &BlockParent) -> Result<Vec<Block>, BlockError> {
    let parent = parent.clone();
    db.call(move |conn| {
        ensure_parent(conn, &parent)?;
        Ok(select_blocks(conn, &parent)?)
    })
    .await
}

/// Insert a block, shifting later siblings up when a position is given.
pub async fn insert_block(
    db: &Database,
    parent: &BlockParent,
    options: InsertBlockOptions,
) -> Result<Block, BlockError> {
    options.content.validate()?;
    let owned = parent.clone();
    let block = db
        .call(move |conn| {
            let tx = immediate(conn)?;
            ensure_parent(&tx, &owned)?;
            ensure_asset(&tx, &options.content)?;

            let existing = count(&tx, BLOCKS, &owned.key())?;
            if let Some(max) = options.max_blocks {
                if existing >= max {
                    return Err(BlockError::TooManyBlocks {
                        parent: owned.to_string(),
                        max,
                    });
                }
            }

            let position = resolve_insert_position(&tx, BLOCKS, &owned.key(), options.position)?;
            let now = now_iso();
            let block = Block {
                id: new_id(),
                parent_kind: owned.kind().to_string(),
                parent_id: owned.id().to_string(),
                position,
                content: options.content,
                created_at: now.clone(),
                updated_at: now,
            };
            insert_block_row(&tx, &owned, &block)?;

            if let BlockParent::Drop(drop_id) = &owned {
                // One-way flag: set on the first block, never cleared.
                tx.execute(
                    "UPDATE drops SET uses_blocks = 1 WHERE id = ?1 AND uses_blocks = 0",
                    params![drop_id],
                )?;
            }
            tx.commit()?;
            Ok(block)
        })
        .await?;

    info!(
        "Inserted {} block {} at {} of {}",
        block.content.kind().as_str(),
        block.id,
        block.position,
        parent
    );
    Ok(block)
}

/// Replace a block's payload. The block keeps its kind.
pub async fn update_block(
    db: &Database,
    parent: &BlockParent,
    block_id: &str,
    content: BlockContent,
) -> Result<Block, BlockError> {
    content.validate()?;
    let parent = parent.clone();
    let block_id = block_id.to_string();
    db.call(move |conn| {
        let tx = immediate(conn)?;
        let mut block = load_block(&tx, &parent, &block_id)?;
        let (from, to) = (block.content.kind(), content.kind());
        if from != to {
            return Err(BlockError::KindChange {
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        ensure_asset(&tx, &content)?;

        block.content = content;
        block.updated_at = now_iso();
        tx.execute(
            "UPDATE blocks SET payload = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                serde_json::to_string(&block.content)?,
                block.updated_at,
                block.id
            ],
        )?;
        tx.commit()?;
        debug!("Updated block {}", block.id);
        Ok(block)
    })
    .await
}

/// Delete a block and compact the siblings behind it.
///
/// Returns the removed block. Gallery images of an `image_gallery` block
/// are deleted with it.
pub async fn delete_block(
    db: &Database,
    parent: &BlockParent,
    block_id: &str,
) -> Result<Block, BlockError> {
    let parent = parent.clone();
    let block_id = block_id.to_string();
    let block = db
        .call(move |conn| {
            let tx = immediate(conn)?;
            let block = load_block(&tx, &parent, &block_id)?;
            remove_item(&tx, BLOCKS, &parent.key(), &block_id)?;
            tx.commit()?;
            Ok::<_, BlockError>(block)
        })
        .await?;

    info!(
        "Deleted {} block {} from position {}",
        block.content.kind().as_str(),
        block.id,
        block.position
    );
    Ok(block)
}

/// Reorder blocks so `ordered_ids[i]` lands at position `i`.
///
/// `ordered_ids` must list every block of the parent exactly once.
pub async fn reorder_blocks(
    db: &Database,
    parent: &BlockParent,
    ordered_ids: Vec<String>,
) -> Result<Vec<Block>, BlockError> {
    let parent = parent.clone();
    db.call(move |conn| {
        let tx = immediate(conn)?;
        ensure_parent(&tx, &parent)?;
        apply_order(&tx, BLOCKS, &parent.key(), &ordered_ids)?;
        let blocks = select_blocks(&tx, &parent)?;
        tx.commit()?;
        debug!("Reordered {} blocks of {}", blocks.len(), parent);
        Ok(blocks)
    })
    .await
}

#[cfg(test)]
#[path = "crud_tests.rs"]
mod crud_tests;
