use super::*;
use crate::asset::{register_asset, RegisterAssetOptions};
use crate::drop::{create_drop, CreateDropOptions};
use crate::stream::{create_stream, CreateStreamOptions};
use crate::user::test_support::seed_user;

async fn seeded() -> Database {
    let db = Database::open_in_memory().unwrap();
    let owner = seed_user(&db, "alice").await;
    create_stream(
        &db,
        CreateStreamOptions {
            creator_id: owner.id.clone(),
            name: "Harbour Lights".to_string(),
            description: Some("Boats at night".to_string()),
        },
    )
    .await
    .unwrap();
    create_stream(
        &db,
        CreateStreamOptions {
            creator_id: owner.id.clone(),
            name: "Forests".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    create_drop(
        &db,
        CreateDropOptions {
            author_id: owner.id.clone(),
            title: "Night walk by the harbour".to_string(),
            stream_id: None,
        },
    )
    .await
    .unwrap();
    register_asset(
        &db,
        RegisterAssetOptions {
            owner_id: owner.id.clone(),
            title: "harbour_100%".to_string(),
            media_type: "image/jpeg".to_string(),
            url: "https://cdn.example.com/h.jpg".to_string(),
            width: None,
            height: None,
        },
    )
    .await
    .unwrap();
    db
}

fn kinds(results: &[SearchResult]) -> Vec<SearchKind> {
    results.iter().map(|r| r.kind).collect()
}

#[tokio::test]
async fn test_search_all_kinds_case_insensitive() {
    let db = seeded().await;
    let results = search(&db, "HARBOUR", 20).await.unwrap();
    assert_eq!(
        kinds(&results),
        vec![SearchKind::Stream, SearchKind::Drop, SearchKind::Asset]
    );
    assert_eq!(results[0].title, "Harbour Lights");
}

#[tokio::test]
async fn test_non_ascii_terms_fold_case() {
    let db = seeded().await;
    let owner = seed_user(&db, "bruno").await;
    create_stream(
        &db,
        CreateStreamOptions {
            creator_id: owner.id,
            name: "Über Berlin".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();

    for query in ["Über", "über", "ÜBER berlin"] {
        let results = search(&db, query, 10).await.unwrap();
        assert_eq!(results.len(), 1, "query {query:?}");
        assert_eq!(results[0].title, "Über Berlin");
    }
}

#[tokio::test]
async fn test_all_terms_must_match() {
    let db = seeded().await;
    let results = search(&db, "harbour night", 20).await.unwrap();
    // The stream matches through its description.
    assert_eq!(kinds(&results), vec![SearchKind::Stream, SearchKind::Drop]);
}

#[tokio::test]
async fn test_kind_filter_and_limit() {
    let db = seeded().await;
    let results = search(&db, "kind:asset harbour", 20).await.unwrap();
    assert_eq!(kinds(&results), vec![SearchKind::Asset]);

    let capped = search(&db, "harbour", 2).await.unwrap();
    assert_eq!(capped.len(), 2);
}

#[tokio::test]
async fn test_wildcards_match_literally() {
    let db = seeded().await;
    assert_eq!(search(&db, "100%", 20).await.unwrap().len(), 1);
    assert!(search(&db, "harbou_", 20).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_query_is_rejected() {
    let db = seeded().await;
    assert!(matches!(
        search(&db, "  ", 20).await,
        Err(SearchError::ParseError(_))
    ));
}
