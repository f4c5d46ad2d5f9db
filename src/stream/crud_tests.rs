use super::*;
use crate::asset::{register_asset, RegisterAssetOptions};
use crate::block::{insert_block, BlockContent, InsertBlockOptions};
use crate::drop::{create_drop, get_drop, CreateDropOptions};
use crate::notification::{list_notifications, ListNotificationsOptions, NotificationKind};
use crate::stream::{
    add_asset_to_stream, create_bookmark, delete_bookmark, follow_stream, list_bookmarks,
    list_members, list_stream_assets, remove_asset_from_stream, unfollow_stream, update_bookmark,
    CreateBookmarkOptions, UpdateBookmarkOptions,
};
use crate::user::test_support::seed_user;

fn named(creator_id: &str, name: &str) -> CreateStreamOptions {
    CreateStreamOptions {
        creator_id: creator_id.to_string(),
        name: name.to_string(),
        description: Some("  ".to_string()),
    }
}

async fn asset(db: &Database, owner_id: &str, title: &str) -> String {
    register_asset(
        db,
        RegisterAssetOptions {
            owner_id: owner_id.to_string(),
            title: title.to_string(),
            media_type: "image/png".to_string(),
            url: format!("https://cdn.example.com/{title}.png"),
            width: None,
            height: None,
        },
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn test_create_derives_slug_and_membership() {
    let db = Database::open_in_memory().unwrap();
    let owner = seed_user(&db, "alice").await;
    let stream = create_stream(&db, named(&owner.id, "Street Photography"))
        .await
        .unwrap();
    assert_eq!(stream.slug, "street-photography");
    assert_eq!(stream.description, None);

    let by_slug = get_stream_by_slug(&db, "street-photography").await.unwrap();
    assert_eq!(by_slug.id, stream.id);

    let summary = get_stream_summary(&db, &stream.id).await.unwrap();
    assert_eq!(summary.member_count, 1);
    assert_eq!(summary.asset_count, 0);
}

#[tokio::test]
async fn test_duplicate_slug_conflicts() {
    let db = Database::open_in_memory().unwrap();
    let owner = seed_user(&db, "alice").await;
    create_stream(&db, named(&owner.id, "Film Grain")).await.unwrap();
    let result = create_stream(&db, named(&owner.id, "film  grain!")).await;
    assert!(matches!(result, Err(StreamError::SlugTaken(slug)) if slug == "film-grain"));
}

#[tokio::test]
async fn test_list_streams_with_counts() {
    let db = Database::open_in_memory().unwrap();
    let owner = seed_user(&db, "alice").await;
    let bob = seed_user(&db, "bob").await;
    let b = create_stream(&db, named(&owner.id, "Beta")).await.unwrap();
    create_stream(&db, named(&owner.id, "alpha")).await.unwrap();
    follow_stream(&db, &b.id, &bob.id).await.unwrap();
    let a1 = asset(&db, &owner.id, "a1").await;
    add_asset_to_stream(&db, &b.id, &a1, &owner.id).await.unwrap();

    let streams = list_streams(&db, 50, 0).await.unwrap();
    let names: Vec<&str> = streams.iter().map(|s| s.stream.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "Beta"]);
    assert_eq!(streams[1].member_count, 2);
    assert_eq!(streams[1].asset_count, 1);
}

#[tokio::test]
async fn test_rename_and_name_conflict() {
    let db = Database::open_in_memory().unwrap();
    let owner = seed_user(&db, "alice").await;
    let street = create_stream(&db, named(&owner.id, "Street")).await.unwrap();
    let portraits = create_stream(&db, named(&owner.id, "Portraits")).await.unwrap();

    let outcome = rename_stream(&db, &street.id, "Street Life").await.unwrap();
    let RenameOutcome::Renamed(renamed) = outcome else {
        panic!("expected rename to succeed");
    };
    assert_eq!(renamed.slug, "street-life");

    let outcome = rename_stream(&db, &street.id, "portraits").await.unwrap();
    assert_eq!(outcome, RenameOutcome::NameConflict(portraits));
    assert_eq!(get_stream(&db, &street.id).await.unwrap().name, "Street Life");

    // Renaming to the stream's own slug is not a conflict.
    let outcome = rename_stream(&db, &street.id, "STREET LIFE").await.unwrap();
    assert!(matches!(outcome, RenameOutcome::Renamed(s) if s.name == "STREET LIFE"));
}

#[tokio::test]
async fn test_delete_cascades() {
    let db = Database::open_in_memory().unwrap();
    let owner = seed_user(&db, "alice").await;
    let stream = create_stream(&db, named(&owner.id, "Temporary")).await.unwrap();
    let parent = BlockParent::Stream(stream.id.clone());
    insert_block(
        &db,
        &parent,
        InsertBlockOptions {
            content: BlockContent::Divider,
            position: None,
            max_blocks: None,
        },
    )
    .await
    .unwrap();
    create_bookmark(
        &db,
        &stream.id,
        CreateBookmarkOptions {
            url: "https://example.com".to_string(),
            title: None,
            created_by: owner.id.clone(),
        },
    )
    .await
    .unwrap();
    let drop = create_drop(
        &db,
        CreateDropOptions {
            author_id: owner.id.clone(),
            title: "Filed".to_string(),
            stream_id: Some(stream.id.clone()),
        },
    )
    .await
    .unwrap();

    delete_stream(&db, &stream.id).await.unwrap();

    assert!(matches!(
        get_stream(&db, &stream.id).await,
        Err(StreamError::StreamNotFound(_))
    ));
    let leftovers: i64 = db
        .call(|conn| {
            conn.query_row(
                "SELECT (SELECT COUNT(*) FROM blocks) + (SELECT COUNT(*) FROM bookmarks) \
                 + (SELECT COUNT(*) FROM stream_members)",
                [],
                |row| row.get(0),
            )
            .map_err(crate::db::DbError::from)
        })
        .await
        .unwrap();
    assert_eq!(leftovers, 0);
    assert_eq!(get_drop(&db, &drop.id).await.unwrap().stream_id, None);
}

#[tokio::test]
async fn test_follow_notifies_creator_once() {
    let db = Database::open_in_memory().unwrap();
    let owner = seed_user(&db, "alice").await;
    let bob = seed_user(&db, "bob").await;
    let stream = create_stream(&db, named(&owner.id, "Night")).await.unwrap();

    follow_stream(&db, &stream.id, &bob.id).await.unwrap();
    follow_stream(&db, &stream.id, &bob.id).await.unwrap();

    let members = list_members(&db, &stream.id).await.unwrap();
    assert_eq!(members.len(), 2);

    let notes = list_notifications(&db, &owner.id, ListNotificationsOptions::default())
        .await
        .unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::StreamFollowed);
    assert_eq!(notes[0].subject_id.as_deref(), Some(stream.id.as_str()));

    unfollow_stream(&db, &stream.id, &bob.id).await.unwrap();
    assert!(matches!(
        unfollow_stream(&db, &stream.id, &bob.id).await,
        Err(StreamError::NotMember(_))
    ));
}

#[tokio::test]
async fn test_asset_tags_are_duplicate_safe() {
    let db = Database::open_in_memory().unwrap();
    let owner = seed_user(&db, "alice").await;
    let stream = create_stream(&db, named(&owner.id, "Tags")).await.unwrap();
    let a1 = asset(&db, &owner.id, "a1").await;
    let a2 = asset(&db, &owner.id, "a2").await;

    let first = add_asset_to_stream(&db, &stream.id, &a1, &owner.id).await.unwrap();
    let again = add_asset_to_stream(&db, &stream.id, &a1, &owner.id).await.unwrap();
    assert_eq!(first, again);
    add_asset_to_stream(&db, &stream.id, &a2, &owner.id).await.unwrap();

    let tagged: Vec<String> = list_stream_assets(&db, &stream.id)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.asset_id)
        .collect();
    assert_eq!(tagged.len(), 2);
    assert!(tagged.contains(&a1) && tagged.contains(&a2));

    assert!(remove_asset_from_stream(&db, &stream.id, &a1).await.unwrap());
    assert!(!remove_asset_from_stream(&db, &stream.id, &a1).await.unwrap());
    assert!(matches!(
        add_asset_to_stream(&db, &stream.id, "ghost", &owner.id).await,
        Err(StreamError::AssetNotFound(_))
    ));
}

#[tokio::test]
async fn test_bookmark_lifecycle() {
    let db = Database::open_in_memory().unwrap();
    let owner = seed_user(&db, "alice").await;
    let stream = create_stream(&db, named(&owner.id, "Links")).await.unwrap();

    let bookmark = create_bookmark(
        &db,
        &stream.id,
        CreateBookmarkOptions {
            url: "https://example.com/gear".to_string(),
            title: Some(" Gear ".to_string()),
            created_by: owner.id.clone(),
        },
    )
    .await
    .unwrap();
    assert_eq!(bookmark.title.as_deref(), Some("Gear"));

    assert!(matches!(
        create_bookmark(
            &db,
            &stream.id,
            CreateBookmarkOptions {
                url: "mailto:someone@example.com".to_string(),
                title: None,
                created_by: owner.id.clone(),
            },
        )
        .await,
        Err(StreamError::InvalidBookmark(_))
    ));

    let updated = update_bookmark(
        &db,
        &stream.id,
        &bookmark.id,
        UpdateBookmarkOptions {
            url: Some("http://example.org/".to_string()),
            title: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.url, "http://example.org/");
    assert_eq!(updated.title.as_deref(), Some("Gear"));

    assert_eq!(list_bookmarks(&db, &stream.id).await.unwrap().len(), 1);
    delete_bookmark(&db, &stream.id, &bookmark.id).await.unwrap();
    assert!(list_bookmarks(&db, &stream.id).await.unwrap().is_empty());
    assert!(matches!(
        delete_bookmark(&db, &stream.id, &bookmark.id).await,
        Err(StreamError::BookmarkNotFound(_))
    ));
}
