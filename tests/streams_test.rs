mod common;

use common::{create_asset, create_stream, register, send, test_app};
use http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn test_stream_names_are_unique_by_slug() {
    let app = test_app();
    let (_, token) = register(&app, "founder").await;
    create_stream(&app, &token, "Night Walks").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/streams",
        Some(&token),
        Some(json!({ "name": "night   walks" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "SLUG_TAKEN");
    assert!(body["messages"][0]["tip"].is_string());
}

#[tokio::test]
async fn test_follow_unfollow_and_counts() {
    let app = test_app();
    let (_, owner_token) = register(&app, "founder").await;
    let (alice_id, alice_token) = register(&app, "alice").await;
    let stream = create_stream(&app, &owner_token, "Birds").await;
    let members_uri = format!("/streams/{stream}/members");

    let (status, member) = send(&app, Method::POST, &members_uri, Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(member["userId"], alice_id.as_str());

    // Following twice does not add a second membership or notification.
    send(&app, Method::POST, &members_uri, Some(&alice_token), None).await;
    let (_, summary) = send(&app, Method::GET, &format!("/streams/{stream}"), Some(&alice_token), None).await;
    assert_eq!(summary["memberCount"], 2);

    let (_, notifications) = send(&app, Method::GET, "/notifications", Some(&owner_token), None).await;
    assert_eq!(notifications.as_array().unwrap().len(), 1);
    assert_eq!(notifications[0]["kind"], "stream_followed");

    let (status, _) = send(&app, Method::DELETE, &members_uri, Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::DELETE, &members_uri, Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
    assert_eq!(body["code"], "NOT_MEMBER");

    let (status, body) = send(&app, Method::POST, "/notifications/read-all", Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);
}

#[tokio::test]
async fn test_members_tag_assets_and_manage_bookmarks() {
    let app = test_app();
    let (_, owner_token) = register(&app, "founder").await;
    let (_, bob_token) = register(&app, "bob").await;
    let stream = create_stream(&app, &owner_token, "Reading").await;
    let asset = create_asset(&app, &bob_token, "cover").await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/streams/{stream}/assets"),
        Some(&bob_token),
        Some(json!({ "assetId": asset })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    send(&app, Method::POST, &format!("/streams/{stream}/members"), Some(&bob_token), None).await;
    let (status, tagged) = send(
        &app,
        Method::POST,
        &format!("/streams/{stream}/assets"),
        Some(&bob_token),
        Some(json!({ "assetId": asset })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tagged["assetId"], asset.as_str());

    let bookmarks_uri = format!("/streams/{stream}/bookmarks");
    let (status, body) = send(
        &app,
        Method::POST,
        &bookmarks_uri,
        Some(&bob_token),
        Some(json!({ "url": "ftp://example.com/book" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, bookmark) = send(
        &app,
        Method::POST,
        &bookmarks_uri,
        Some(&bob_token),
        Some(json!({ "url": "https://example.com/book", "title": "Book" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let bookmark_uri = format!("{bookmarks_uri}/{}", bookmark["id"].as_str().unwrap());

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &bookmark_uri,
        Some(&bob_token),
        Some(json!({ "title": "The Book" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "The Book");
    assert_eq!(updated["url"], "https://example.com/book");

    let (status, _) = send(&app, Method::DELETE, &bookmark_uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = send(&app, Method::GET, &bookmarks_uri, Some(&bob_token), None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_asset_in_use_cannot_be_deleted() {
    let app = test_app();
    let (_, token) = register(&app, "founder").await;
    let asset = create_asset(&app, &token, "hero").await;
    let (_, drop) = send(&app, Method::POST, "/drops", Some(&token), Some(json!({ "title": "Hero" }))).await;
    let drop_id = drop["id"].as_str().unwrap();
    let (_, block) = send(
        &app,
        Method::POST,
        &format!("/drops/{drop_id}/blocks"),
        Some(&token),
        Some(json!({ "type": "post", "assetId": asset })),
    )
    .await;

    let (status, body) = send(&app, Method::DELETE, &format!("/assets/{asset}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ASSET_IN_USE");

    send(
        &app,
        Method::DELETE,
        &format!("/drops/{drop_id}/blocks/{}", block["id"].as_str().unwrap()),
        Some(&token),
        None,
    )
    .await;
    let (status, body) = send(&app, Method::DELETE, &format!("/assets/{asset}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["asset"]["id"], asset.as_str());
}

#[tokio::test]
async fn test_search_spans_streams_drops_and_assets() {
    let app = test_app();
    let (_, token) = register(&app, "founder").await;
    create_stream(&app, &token, "Lighthouse Keepers").await;
    create_asset(&app, &token, "lighthouse").await;
    send(&app, Method::POST, "/drops", Some(&token), Some(json!({ "title": "A lighthouse at dusk" }))).await;
    send(&app, Method::POST, "/drops", Some(&token), Some(json!({ "title": "Unrelated" }))).await;

    let (status, results) = send(&app, Method::GET, "/search?q=LIGHTHOUSE", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<&str> = results
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["kind"].as_str())
        .collect();
    assert_eq!(kinds.len(), 3, "{results}");
    assert!(kinds.contains(&"stream"));
    assert!(kinds.contains(&"drop"));
    assert!(kinds.contains(&"asset"));

    let (status, _) = send(&app, Method::GET, "/search?q=", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_logout_cycle() {
    let app = test_app();
    let (_, first_token) = register(&app, "founder").await;

    let (status, body) = send(&app, Method::POST, "/auth/login", None, Some(json!({ "username": "nobody" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, body) = send(&app, Method::POST, "/auth/login", None, Some(json!({ "username": "founder" }))).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["session"]["token"].as_str().unwrap().to_string();
    assert_ne!(token, first_token);

    let (status, _) = send(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, me) = send(&app, Method::GET, "/me", Some(&first_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "founder");
}

#[tokio::test]
async fn test_reads_require_a_session() {
    let app = test_app();
    let (_, token) = register(&app, "alice").await;
    let stream_id = create_stream(&app, &token, "Harbour").await;

    for uri in [
        "/streams".to_string(),
        format!("/streams/{stream_id}"),
        format!("/streams/{stream_id}/members"),
        format!("/streams/{stream_id}/assets"),
        "/drops".to_string(),
        "/assets".to_string(),
        "/search?q=harbour".to_string(),
    ] {
        let (status, body) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}
