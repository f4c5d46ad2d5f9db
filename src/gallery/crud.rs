//! Gallery image operations.

use super::storage::{
    ensure_assets, ensure_gallery_block, insert_image, select_images, GALLERY_IMAGES,
};
use super::types::{GalleryError, GalleryImage, ReplaceOutcome};
use crate::block::BlockParent;
use crate::db::{immediate, Database};
use crate::ordering::{next_position, remove_item, OrderingError};
use crate::utils::{new_id, now_iso};
use rusqlite::params;
use std::collections::{HashMap, HashSet};
use tracing::{error, info, warn};

/// List the images of a gallery block in position order.
pub async fn list_gallery_images(
    db: &Database,
    parent: &BlockParent,
    block_id: &str,
) -> Result<Vec<GalleryImage>, GalleryError> {
    let parent = parent.clone();
    let block_id = block_id.to_string();
    db.call(move |conn| {
        ensure_gallery_block(conn, &parent, &block_id)?;
        Ok(select_images(conn, &block_id)?)
    })
    .await
}

/// Add assets to a gallery.
///
/// Assets already in the gallery keep their slot; new ones are appended in
/// request order. Returns the full gallery.
pub async fn add_gallery_images(
    db: &Database,
    parent: &BlockParent,
    block_id: &str,
    asset_ids: Vec<String>,
    max_images: Option<i64>,
) -> Result<Vec<GalleryImage>, GalleryError> {
    let parent = parent.clone();
    let block_id = block_id.to_string();
    let (images, added) = db
        .call(move |conn| {
            let tx = immediate(conn)?;
            ensure_gallery_block(&tx, &parent, &block_id)?;
            ensure_assets(&tx, &asset_ids)?;

            let mut present: HashSet<String> = select_images(&tx, &block_id)?
                .into_iter()
                .map(|image| image.asset_id)
                .collect();
            let mut added = 0_i64;
            for asset_id in asset_ids {
                if !present.insert(asset_id.clone()) {
                    continue;
                }
                let position = next_position(&tx, GALLERY_IMAGES, &block_id)?;
                if let Some(max) = max_images.filter(|max| position >= *max) {
                    return Err(GalleryError::TooManyImages { max });
                }
                insert_image(
                    &tx,
                    &GalleryImage {
                        id: new_id(),
                        block_id: block_id.clone(),
                        asset_id,
                        position,
                        caption: None,
                        created_at: now_iso(),
                    },
                )?;
                added += 1;
            }
            let images = select_images(&tx, &block_id)?;
            tx.commit()?;
            Ok((images, added))
        })
        .await?;

    info!("Added {added} images to gallery ({} total)", images.len());
    Ok(images)
}

/// Replace a gallery's images with `asset_ids`, in that order.
///
/// The swap runs in one transaction. Validation problems are returned as
/// errors before anything is written; a failure while writing the new set
/// is reported through [`ReplaceOutcome`].
pub async fn replace_gallery(
    db: &Database,
    parent: &BlockParent,
    block_id: &str,
    asset_ids: Vec<String>,
    max_images: Option<i64>,
) -> Result<ReplaceOutcome, GalleryError> {
    let mut seen = HashSet::with_capacity(asset_ids.len());
    if let Some(duplicate) = asset_ids.iter().find(|id| !seen.insert(id.as_str())) {
        return Err(GalleryError::DuplicateAsset(duplicate.clone()));
    }
    if let Some(max) = max_images {
        if i64::try_from(asset_ids.len()).unwrap_or(i64::MAX) > max {
            return Err(GalleryError::TooManyImages { max });
        }
    }

    let parent = parent.clone();
    let block_id = block_id.to_string();
    db.call(move |conn| {
        let tx = immediate(conn)?;
        ensure_gallery_block(&tx, &parent, &block_id)?;
        ensure_assets(&tx, &asset_ids)?;

        let snapshot = select_images(&tx, &block_id)?;
        let captions: HashMap<String, Option<String>> = snapshot
            .into_iter()
            .map(|image| (image.asset_id, image.caption))
            .collect();
        tx.execute(
            "DELETE FROM gallery_images WHERE block_id = ?1",
            params![block_id],
        )?;

        let now = now_iso();
        for (asset_id, position) in asset_ids.into_iter().zip(0_i64..) {
            let image = GalleryImage {
                id: new_id(),
                block_id: block_id.clone(),
                caption: captions.get(&asset_id).cloned().flatten(),
                asset_id,
                position,
                created_at: now.clone(),
            };
            if let Err(e) = insert_image(&tx, &image) {
                return Ok(settle_failed_replace(&block_id, &e.to_string(), tx.rollback()));
            }
        }

        let images = select_images(&tx, &block_id)?;
        tx.commit()?;
        info!("Replaced gallery {} with {} images", block_id, images.len());
        Ok(ReplaceOutcome::Replaced(images))
    })
    .await
}

/// Classify a failed replace by whether the rollback went through.
pub(super) fn settle_failed_replace(
    block_id: &str,
    reason: &str,
    rollback: rusqlite::Result<()>,
) -> ReplaceOutcome {
    match rollback {
        Ok(()) => {
            warn!("Gallery replace for {block_id} failed and was rolled back: {reason}");
            ReplaceOutcome::FailedRestored {
                reason: reason.to_string(),
            }
        }
        Err(rollback_err) => {
            error!(
                block_id = %block_id,
                "Gallery replace failed and the previous images could not be restored: {reason}; rollback: {rollback_err}"
            );
            ReplaceOutcome::FailedUnrestored {
                reason: format!("{reason}; rollback failed: {rollback_err}"),
            }
        }
    }
}

/// Remove one image and compact the gallery. Returns the removed image.
pub async fn remove_gallery_image(
    db: &Database,
    parent: &BlockParent,
    block_id: &str,
    image_id: &str,
) -> Result<GalleryImage, GalleryError> {
    let parent = parent.clone();
    let block_id = block_id.to_string();
    let image_id = image_id.to_string();
    db.call(move |conn| {
        let tx = immediate(conn)?;
        ensure_gallery_block(&tx, &parent, &block_id)?;
        let image = select_images(&tx, &block_id)?
            .into_iter()
            .find(|image| image.id == image_id)
            .ok_or_else(|| GalleryError::ImageNotFound(image_id.clone()))?;
        remove_item(&tx, GALLERY_IMAGES, &block_id, &image_id).map_err(|e| match e {
            OrderingError::NotFound(id) => GalleryError::ImageNotFound(id),
            other => GalleryError::Ordering(other),
        })?;
        tx.commit()?;
        info!("Removed image {} from gallery {}", image.id, block_id);
        Ok(image)
    })
    .await
}

#[cfg(test)]
#[path = "crud_tests.rs"]
mod crud_tests;
