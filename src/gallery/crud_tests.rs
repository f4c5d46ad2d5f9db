use super::*;
use crate::asset::{register_asset, RegisterAssetOptions};
use crate::block::{delete_block, insert_block, BlockContent, InsertBlockOptions};
use crate::drop::{create_drop, CreateDropOptions};
use crate::user::test_support::seed_user;

struct Fixture {
    db: Database,
    parent: BlockParent,
    block_id: String,
    assets: Vec<String>,
}

async fn setup() -> Fixture {
    let db = Database::open_in_memory().unwrap();
    let owner = seed_user(&db, "alice").await;
    let drop = create_drop(
        &db,
        CreateDropOptions {
            author_id: owner.id.clone(),
            title: "Contact sheet".to_string(),
            stream_id: None,
        },
    )
    .await
    .unwrap();
    let parent = BlockParent::Drop(drop.id);
    let block = insert_block(
        &db,
        &parent,
        InsertBlockOptions {
            content: BlockContent::ImageGallery { caption: None },
            position: None,
            max_blocks: None,
        },
    )
    .await
    .unwrap();

    let mut assets = Vec::new();
    for title in ["one", "two", "three", "four"] {
        let asset = register_asset(
            &db,
            RegisterAssetOptions {
                owner_id: owner.id.clone(),
                title: title.to_string(),
                media_type: "image/jpeg".to_string(),
                url: format!("https://cdn.example.com/{title}.jpg"),
                width: None,
                height: None,
            },
        )
        .await
        .unwrap();
        assets.push(asset.id);
    }

    Fixture {
        db,
        parent,
        block_id: block.id,
        assets,
    }
}

fn asset_order(images: &[GalleryImage]) -> Vec<String> {
    images.iter().map(|i| i.asset_id.clone()).collect()
}

fn positions(images: &[GalleryImage]) -> Vec<i64> {
    images.iter().map(|i| i.position).collect()
}

#[tokio::test]
async fn test_add_is_idempotent() {
    let f = setup().await;
    let (a, b, c) = (f.assets[0].clone(), f.assets[1].clone(), f.assets[2].clone());

    add_gallery_images(&f.db, &f.parent, &f.block_id, vec![a.clone(), b.clone()], None)
        .await
        .unwrap();
    let images = add_gallery_images(
        &f.db,
        &f.parent,
        &f.block_id,
        vec![b.clone(), c.clone(), c.clone()],
        None,
    )
    .await
    .unwrap();

    assert_eq!(asset_order(&images), vec![a, b, c]);
    assert_eq!(positions(&images), vec![0, 1, 2]);
}

#[tokio::test]
async fn test_add_respects_limit() {
    let f = setup().await;
    let result = add_gallery_images(&f.db, &f.parent, &f.block_id, f.assets.clone(), Some(3)).await;
    assert!(matches!(result, Err(GalleryError::TooManyImages { max: 3 })));
    let images = list_gallery_images(&f.db, &f.parent, &f.block_id).await.unwrap();
    assert!(images.is_empty());
}

#[tokio::test]
async fn test_add_to_non_gallery_block() {
    let f = setup().await;
    let text = insert_block(
        &f.db,
        &f.parent,
        InsertBlockOptions {
            content: BlockContent::Text {
                content: "words".to_string(),
            },
            position: None,
            max_blocks: None,
        },
    )
    .await
    .unwrap();
    let result = add_gallery_images(&f.db, &f.parent, &text.id, f.assets.clone(), None).await;
    assert!(matches!(result, Err(GalleryError::NotAGallery(_))));
}

#[tokio::test]
async fn test_block_under_other_parent_is_not_found() {
    let f = setup().await;
    let other = BlockParent::Stream("elsewhere".to_string());
    let result = list_gallery_images(&f.db, &other, &f.block_id).await;
    assert!(matches!(result, Err(GalleryError::BlockNotFound(_))));
}

#[tokio::test]
async fn test_replace_sets_exact_order() {
    let f = setup().await;
    add_gallery_images(&f.db, &f.parent, &f.block_id, f.assets[..3].to_vec(), None)
        .await
        .unwrap();

    let wanted = vec![f.assets[3].clone(), f.assets[0].clone()];
    let outcome = replace_gallery(&f.db, &f.parent, &f.block_id, wanted.clone(), None)
        .await
        .unwrap();
    let ReplaceOutcome::Replaced(images) = outcome else {
        panic!("expected replace to succeed");
    };
    assert_eq!(asset_order(&images), wanted);
    assert_eq!(positions(&images), vec![0, 1]);
}

#[tokio::test]
async fn test_replace_rejects_duplicates_and_unknown_assets() {
    let f = setup().await;
    let dup = vec![f.assets[0].clone(), f.assets[0].clone()];
    assert!(matches!(
        replace_gallery(&f.db, &f.parent, &f.block_id, dup, None).await,
        Err(GalleryError::DuplicateAsset(_))
    ));
    assert!(matches!(
        replace_gallery(&f.db, &f.parent, &f.block_id, vec!["ghost".to_string()], None).await,
        Err(GalleryError::AssetNotFound(_))
    ));
}

#[tokio::test]
async fn test_replace_failure_restores_previous_images() {
    let f = setup().await;
    let original = f.assets[..2].to_vec();
    add_gallery_images(&f.db, &f.parent, &f.block_id, original.clone(), None)
        .await
        .unwrap();

    let poisoned = f.assets[3].clone();
    f.db.execute_batch(&format!(
        "CREATE TRIGGER fail_gallery_insert BEFORE INSERT ON gallery_images \
         WHEN NEW.asset_id = '{poisoned}' \
         BEGIN SELECT RAISE(ABORT, 'injected failure'); END;"
    ))
    .await
    .unwrap();

    let outcome = replace_gallery(
        &f.db,
        &f.parent,
        &f.block_id,
        vec![f.assets[2].clone(), poisoned],
        None,
    )
    .await
    .unwrap();
    assert!(
        matches!(&outcome, ReplaceOutcome::FailedRestored { reason } if reason.contains("injected failure"))
    );

    let images = list_gallery_images(&f.db, &f.parent, &f.block_id).await.unwrap();
    assert_eq!(asset_order(&images), original);
    assert_eq!(positions(&images), vec![0, 1]);
}

#[test]
fn test_settle_failed_replace() {
    assert_eq!(
        settle_failed_replace("b1", "boom", Ok(())),
        ReplaceOutcome::FailedRestored {
            reason: "boom".to_string()
        }
    );
    let unrestored = settle_failed_replace("b1", "boom", Err(rusqlite::Error::InvalidQuery));
    assert!(
        matches!(unrestored, ReplaceOutcome::FailedUnrestored { ref reason } if reason.starts_with("boom; rollback failed"))
    );
    assert!(!unrestored.is_replaced());
}

#[tokio::test]
async fn test_remove_compacts() {
    let f = setup().await;
    let images = add_gallery_images(&f.db, &f.parent, &f.block_id, f.assets[..3].to_vec(), None)
        .await
        .unwrap();
    let middle = images[1].id.clone();

    let removed = remove_gallery_image(&f.db, &f.parent, &f.block_id, &middle)
        .await
        .unwrap();
    assert_eq!(removed.position, 1);

    let images = list_gallery_images(&f.db, &f.parent, &f.block_id).await.unwrap();
    assert_eq!(
        asset_order(&images),
        vec![f.assets[0].clone(), f.assets[2].clone()]
    );
    assert_eq!(positions(&images), vec![0, 1]);

    let again = remove_gallery_image(&f.db, &f.parent, &f.block_id, &middle).await;
    assert!(matches!(again, Err(GalleryError::ImageNotFound(_))));
}

#[tokio::test]
async fn test_deleting_block_removes_images() {
    let f = setup().await;
    add_gallery_images(&f.db, &f.parent, &f.block_id, f.assets.clone(), None)
        .await
        .unwrap();
    delete_block(&f.db, &f.parent, &f.block_id).await.unwrap();

    let remaining: i64 = f
        .db
        .call(|conn| {
            conn.query_row("SELECT COUNT(*) FROM gallery_images", [], |row| row.get(0))
                .map_err(crate::db::DbError::from)
        })
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}
