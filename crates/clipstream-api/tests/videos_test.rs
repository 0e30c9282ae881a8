//! Upload, update, listing, and lifecycle tests.

mod helpers;

use axum_test::multipart::MultipartForm;
use helpers::{
    admin, api_path, creator, post_video, setup_test_app, upload_video, video_form, video_part,
    viewer, TestApp, TestUser, TEST_MAX_VIDEO_BYTES,
};
use serde_json::Value;
use uuid::Uuid;

async fn get_video(app: &TestApp, id: Uuid) -> axum_test::TestResponse {
    app.server.get(&api_path(&format!("/videos/{}", id))).await
}

fn authed(
    request: axum_test::TestRequest,
    user: &TestUser,
) -> axum_test::TestRequest {
    request
        .add_header("X-Caller-Id", user.id.to_string())
        .add_header("X-Caller-Role", user.role)
}

#[tokio::test]
async fn test_upload_round_trip() {
    let app = setup_test_app().await;
    let user = creator();

    let form = video_form("My first clip", b"0123456789")
        .add_text("description", "A short test clip")
        .add_text("visibility", "public")
        .add_text("commentsEnabled", "false")
        .add_text("tags", "Rust")
        .add_text("tags", "rust")
        .add_text("tags", "axum")
        .add_part(
            "thumbnailFile",
            video_part(b"thumb", "thumb.jpg", "image/jpeg"),
        );

    let response = post_video(&app, &user, form).await;
    assert_eq!(response.status_code(), 201);

    let body: Value = response.json();
    assert_eq!(body["title"], "My first clip");
    assert_eq!(body["description"], "A short test clip");
    assert_eq!(body["owner_id"], user.id.to_string());
    assert_eq!(body["processing_status"], "ready");
    assert_eq!(body["comments_enabled"], false);
    assert_eq!(body["video_byte_size"], 10);
    assert_eq!(body["views"], 0);

    // Case-insensitive dedup: "rust" collapsed into "Rust".
    let tags: Vec<&str> = body["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_str().unwrap())
        .collect();
    assert_eq!(tags, vec!["Rust", "axum"]);

    let id = Uuid::parse_str(body["id"].as_str().unwrap()).unwrap();
    assert!(body["stream_url"]
        .as_str()
        .unwrap()
        .ends_with(&format!("/api/videos/{}/stream", id)));
    assert!(body["thumbnail_url"].as_str().is_some());

    let response = get_video(&app, id).await;
    assert_eq!(response.status_code(), 200);
    let fetched: Value = response.json();
    assert_eq!(fetched["title"], "My first clip");

    // One video blob, one thumbnail blob.
    assert_eq!(app.blob_count(), 2);
}

#[tokio::test]
async fn test_upload_requires_identity() {
    let app = setup_test_app().await;

    let response = app
        .server
        .post(&api_path("/videos"))
        .multipart(video_form("Anonymous", b"data"))
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_upload_requires_creator_role() {
    let app = setup_test_app().await;

    let response = post_video(&app, &viewer(), video_form("Not allowed", b"data")).await;

    assert_eq!(response.status_code(), 403);
    assert_eq!(app.catalog.len(), 0);
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_upload_rejects_non_video_content_type() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_text("title", "A PDF")
        .add_part("videoFile", video_part(b"%PDF-", "doc.pdf", "application/pdf"));
    let response = post_video(&app, &creator(), form).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(app.catalog.len(), 0);
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_upload_rejects_oversize_video() {
    let app = setup_test_app().await;

    let oversize = vec![0u8; TEST_MAX_VIDEO_BYTES + 1];
    let response = post_video(&app, &creator(), video_form("Too big", &oversize)).await;

    assert_eq!(response.status_code(), 413);
    assert_eq!(app.catalog.len(), 0);
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_upload_requires_title() {
    let app = setup_test_app().await;

    let form =
        MultipartForm::new().add_part("videoFile", video_part(b"data", "a.mp4", "video/mp4"));
    let response = post_video(&app, &creator(), form).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_catalog_failure_leaves_no_residue() {
    let app = setup_test_app().await;
    app.catalog.fail_next_create();

    let response = post_video(&app, &creator(), video_form("Doomed", b"data")).await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(app.catalog.len(), 0);
    assert_eq!(app.blob_count(), 0, "aborted ingest must clean up its blobs");
}

#[tokio::test]
async fn test_update_metadata_and_tags() {
    let app = setup_test_app().await;
    let user = creator();
    let id = upload_video(&app, &user, "Original title", b"data").await;

    let form = MultipartForm::new()
        .add_text("title", "Updated title")
        .add_text("visibility", "unlisted")
        .add_text("tags", "tokio")
        .add_text("tags", "sqlx");
    let response = authed(
        app.server.put(&api_path(&format!("/videos/{}", id))),
        &user,
    )
    .multipart(form)
    .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["title"], "Updated title");
    assert_eq!(body["visibility"], "unlisted");
    let tags: Vec<&str> = body["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_str().unwrap())
        .collect();
    assert_eq!(tags, vec!["sqlx", "tokio"]);
}

#[tokio::test]
async fn test_tag_replacement_is_idempotent() {
    let app = setup_test_app().await;
    let user = creator();
    let id = upload_video(&app, &user, "Tagged", b"data").await;

    for _ in 0..2 {
        let form = MultipartForm::new()
            .add_text("tags", "one")
            .add_text("tags", "two");
        let response = authed(
            app.server.put(&api_path(&format!("/videos/{}", id))),
            &user,
        )
        .multipart(form)
        .await;
        assert_eq!(response.status_code(), 200);

        let body: Value = response.json();
        assert_eq!(body["tags"].as_array().unwrap().len(), 2);
    }

    // Re-applying the same set created no extra tag rows.
    assert_eq!(app.tags.tag_count(), 2);
}

#[tokio::test]
async fn test_update_by_non_owner_forbidden() {
    let app = setup_test_app().await;
    let owner = creator();
    let other = creator();
    let root = admin();
    let id = upload_video(&app, &owner, "Mine", b"data").await;

    let form = MultipartForm::new().add_text("title", "Hijacked");
    let response = authed(
        app.server.put(&api_path(&format!("/videos/{}", id))),
        &other,
    )
    .multipart(form)
    .await;
    assert_eq!(response.status_code(), 403);

    let form = MultipartForm::new().add_text("title", "Moderated");
    let response = authed(app.server.put(&api_path(&format!("/videos/{}", id))), &root)
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_update_deleted_video_rejected() {
    let app = setup_test_app().await;
    let user = creator();
    let id = upload_video(&app, &user, "Doomed", b"data").await;

    let response = authed(
        app.server.delete(&api_path(&format!("/videos/{}", id))),
        &user,
    )
    .await;
    assert_eq!(response.status_code(), 204);

    let form = MultipartForm::new().add_text("title", "Too late");
    let response = authed(
        app.server.put(&api_path(&format!("/videos/{}", id))),
        &user,
    )
    .multipart(form)
    .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_soft_delete_hides_from_reads_but_not_admin_listing() {
    let app = setup_test_app().await;
    let user = creator();
    let root = admin();
    let id = upload_video(&app, &user, "Hidden", b"data").await;

    let response = authed(
        app.server.delete(&api_path(&format!("/videos/{}", id))),
        &user,
    )
    .await;
    assert_eq!(response.status_code(), 204);

    assert_eq!(get_video(&app, id).await.status_code(), 404);

    let response = app.server.get(&api_path("/videos")).await;
    let body: Value = response.json();
    assert_eq!(body["total_elements"], 0);

    let response = authed(app.server.get(&api_path("/videos/admin/all")), &root).await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total_elements"], 1);
    assert_eq!(body["items"][0]["id"], id.to_string());
}

#[tokio::test]
async fn test_soft_delete_requires_owner_or_admin() {
    let app = setup_test_app().await;
    let owner = creator();
    let other = creator();
    let id = upload_video(&app, &owner, "Protected", b"data").await;

    let response = authed(
        app.server.delete(&api_path(&format!("/videos/{}", id))),
        &other,
    )
    .await;
    assert_eq!(response.status_code(), 403);
    assert_eq!(get_video(&app, id).await.status_code(), 200);
}

#[tokio::test]
async fn test_restore_requires_admin() {
    let app = setup_test_app().await;
    let user = creator();
    let id = upload_video(&app, &user, "Buried", b"data").await;

    authed(
        app.server.delete(&api_path(&format!("/videos/{}", id))),
        &user,
    )
    .await;

    let response = authed(
        app.server
            .put(&api_path(&format!("/videos/admin/{}/restore", id))),
        &user,
    )
    .await;
    assert_eq!(response.status_code(), 403);

    let response = authed(
        app.server
            .put(&api_path(&format!("/videos/admin/{}/restore", id))),
        &admin(),
    )
    .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(get_video(&app, id).await.status_code(), 200);
}

#[tokio::test]
async fn test_permanent_delete_frees_storage() {
    let app = setup_test_app().await;
    let user = creator();
    let root = admin();

    let form = video_form("Purge me", b"data").add_part(
        "thumbnailFile",
        video_part(b"thumb", "t.jpg", "image/jpeg"),
    );
    let response = post_video(&app, &user, form).await;
    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    let id = Uuid::parse_str(body["id"].as_str().unwrap()).unwrap();
    assert_eq!(app.blob_count(), 2);

    // Owners cannot purge.
    let response = authed(
        app.server
            .delete(&api_path(&format!("/videos/admin/{}/permanent", id))),
        &user,
    )
    .await;
    assert_eq!(response.status_code(), 403);

    let response = authed(
        app.server
            .delete(&api_path(&format!("/videos/admin/{}/permanent", id))),
        &root,
    )
    .await;
    assert_eq!(response.status_code(), 204);

    assert_eq!(app.blob_count(), 0);
    assert_eq!(app.catalog.len(), 0);
    assert_eq!(get_video(&app, id).await.status_code(), 404);
}

#[tokio::test]
async fn test_listings_respect_visibility() {
    let app = setup_test_app().await;
    let owner = creator();
    let other = viewer();

    upload_video(&app, &owner, "Public clip", b"data").await;
    let form = video_form("Private clip", b"data").add_text("visibility", "private");
    let response = post_video(&app, &owner, form).await;
    assert_eq!(response.status_code(), 201);

    // Anonymous public listing sees only the public clip.
    let body: Value = app.server.get(&api_path("/videos")).await.json();
    assert_eq!(body["total_elements"], 1);
    assert_eq!(body["items"][0]["title"], "Public clip");

    // Another user browsing the owner's page sees the same.
    let body: Value = authed(
        app.server
            .get(&api_path(&format!("/videos/user/{}", owner.id))),
        &other,
    )
    .await
    .json();
    assert_eq!(body["total_elements"], 1);

    // The owner sees both on their own page and via /my.
    let body: Value = authed(
        app.server
            .get(&api_path(&format!("/videos/user/{}", owner.id))),
        &owner,
    )
    .await
    .json();
    assert_eq!(body["total_elements"], 2);

    let body: Value = authed(app.server.get(&api_path("/videos/my")), &owner)
        .await
        .json();
    assert_eq!(body["total_elements"], 2);
}

#[tokio::test]
async fn test_admin_listing_requires_admin() {
    let app = setup_test_app().await;

    let response = authed(app.server.get(&api_path("/videos/admin/all")), &creator()).await;
    assert_eq!(response.status_code(), 403);

    let response = app.server.get(&api_path("/videos/admin/all")).await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_public_listing_pagination() {
    let app = setup_test_app().await;
    let user = creator();

    for i in 0..3 {
        upload_video(&app, &user, &format!("Clip {}", i), b"data").await;
    }

    let body: Value = app
        .server
        .get(&api_path("/videos"))
        .add_query_param("page", "0")
        .add_query_param("size", "2")
        .await
        .json();

    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["total_elements"], 3);
    assert_eq!(body["total_pages"], 2);

    let body: Value = app
        .server
        .get(&api_path("/videos"))
        .add_query_param("page", "1")
        .add_query_param("size", "2")
        .await
        .json();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_test_app().await;

    let response = app.server.get(&api_path("/health")).await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = setup_test_app().await;

    let response = app.server.get(&api_path("/openapi.json")).await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert!(body["paths"]["/api/videos/{id}/stream"].is_object());
}

#[tokio::test]
async fn test_owner_count_and_existence_track_soft_delete() {
    let app = setup_test_app().await;
    let user = creator();
    let first = upload_video(&app, &user, "First", b"data").await;
    let second = upload_video(&app, &user, "Second", b"data").await;

    // The service hooks sibling modules use to probe the catalog.
    let lifecycle = clipstream_api::services::lifecycle::VideoLifecycle::new(
        app.catalog.clone() as std::sync::Arc<dyn clipstream_core::VideoCatalog>,
        app.tags.clone() as std::sync::Arc<dyn clipstream_core::TagIndex>,
        app.blobs.clone(),
    );

    assert!(lifecycle.exists(first).await.unwrap());
    assert_eq!(lifecycle.count_for_owner(user.id).await.unwrap(), 2);
    assert_eq!(lifecycle.count_for_owner(Uuid::new_v4()).await.unwrap(), 0);

    let response = authed(
        app.server.delete(&api_path(&format!("/videos/{}", first))),
        &user,
    )
    .await;
    assert_eq!(response.status_code(), 204);

    assert!(!lifecycle.exists(first).await.unwrap());
    assert!(lifecycle.exists(second).await.unwrap());
    assert_eq!(lifecycle.count_for_owner(user.id).await.unwrap(), 1);
}
