//! Upload API integration tests.
//!
//! Run with: `cargo test -p tubely-api --test upload_test`
//! No external services needed: the bucket, database and probe are in-memory.

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::auth::TestUser;
use helpers::fixtures::{mp4_bytes, png_bytes, NoStreamProbe};
use helpers::{
    setup_test_app, setup_test_app_with, setup_test_app_with_probe, TEST_BASE_URL, TEST_BUCKET,
    TEST_REGION,
};
use futures::StreamExt;
use object_store::ObjectStoreExt;
use std::sync::Arc;
use tubely_core::Video;
use uuid::Uuid;

fn thumbnail_form(data: Vec<u8>, mime: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "thumbnail",
        Part::bytes(data).file_name("thumb.png").mime_type(mime),
    )
}

fn video_form(data: Vec<u8>, mime: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "video",
        Part::bytes(data).file_name("clip.mp4").mime_type(mime),
    )
}

fn bucket_url_prefix() -> String {
    format!("https://{}.s3.{}.amazonaws.com/", TEST_BUCKET, TEST_REGION)
}

#[tokio::test]
async fn test_healthz() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/healthz").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_thumbnail_upload_is_stored_and_served() {
    let app = setup_test_app().await;
    let user = TestUser::new();
    let video = app.repository.insert_video(user.user_id);
    let data = png_bytes();

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", user.bearer())
        .multipart(thumbnail_form(data.clone(), "image/png"))
        .await;

    assert_eq!(response.status_code(), 200);
    let updated: Video = response.json();
    assert_eq!(updated.id, video.id);
    assert!(updated.video_url.is_none());

    let url = updated.thumbnail_url.expect("thumbnail_url should be set");
    let prefix = format!("{}/assets/", TEST_BASE_URL);
    let file_name = url.strip_prefix(&prefix).expect("local asset URL");
    assert!(file_name.ends_with(".png"));
    assert_eq!(file_name.len(), 43 + ".png".len());

    // Stored under the asset root and reachable through the static route.
    assert_eq!(std::fs::read(app.assets_root().join(file_name)).unwrap(), data);
    let served = app.client().get(&format!("/assets/{}", file_name)).await;
    assert_eq!(served.status_code(), 200);
    assert_eq!(served.as_bytes().to_vec(), data);

    let persisted = app.repository.video(video.id).unwrap();
    assert_eq!(persisted.thumbnail_url.as_deref(), Some(url.as_str()));
}

#[tokio::test]
async fn test_thumbnail_content_type_parameters_are_ignored() {
    let app = setup_test_app().await;
    let user = TestUser::new();
    let video = app.repository.insert_video(user.user_id);

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", user.bearer())
        .multipart(thumbnail_form(png_bytes(), "IMAGE/JPEG"))
        .await;

    assert_eq!(response.status_code(), 200);
    let updated: Video = response.json();
    assert!(updated.thumbnail_url.unwrap().ends_with(".jpeg"));
}

#[tokio::test]
async fn test_landscape_video_goes_to_bucket_partition() {
    let app = setup_test_app_with(1920, 1080, |_| {}).await;
    let user = TestUser::new();
    let video = app.repository.insert_video(user.user_id);
    let data = mp4_bytes(200_000);

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", video.id))
        .add_header("Authorization", user.bearer())
        .multipart(video_form(data.clone(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 200);
    let updated: Video = response.json();
    assert!(updated.thumbnail_url.is_none());

    let url = updated.video_url.expect("video_url should be set");
    let key = url.strip_prefix(&bucket_url_prefix()).expect("bucket URL");
    assert!(key.starts_with("landscape/"));
    assert!(key.ends_with(".mp4"));

    let stored = app
        .bucket
        .get(&object_store::path::Path::from(key))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    assert_eq!(stored.as_ref(), data.as_slice());

    assert!(app.staged_files().is_empty());
}

#[tokio::test]
async fn test_portrait_and_other_videos_are_partitioned() {
    for ((width, height), partition) in [((1080, 1920), "portrait/"), ((1000, 1000), "other/")] {
        let app = setup_test_app_with(width, height, |_| {}).await;
        let user = TestUser::new();
        let video = app.repository.insert_video(user.user_id);

        let response = app
            .client()
            .post(&format!("/api/video_upload/{}", video.id))
            .add_header("Authorization", user.bearer())
            .multipart(video_form(mp4_bytes(4096), "video/mp4"))
            .await;

        assert_eq!(response.status_code(), 200);
        let url = response.json::<Video>().video_url.unwrap();
        let key = url.strip_prefix(&bucket_url_prefix()).unwrap();
        assert!(key.starts_with(partition), "{} should start with {}", key, partition);
        assert!(app.staged_files().is_empty());
    }
}

#[tokio::test]
async fn test_upload_by_non_owner_is_unauthorized() {
    let app = setup_test_app().await;
    let owner = TestUser::new();
    let intruder = TestUser::new();
    let video = app.repository.insert_video(owner.user_id);

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", intruder.bearer())
        .multipart(thumbnail_form(png_bytes(), "image/png"))
        .await;

    assert_eq!(response.status_code(), 401);
    assert!(!app.assets_root().exists());
    assert_eq!(app.repository.video(video.id).unwrap(), video);
}

#[tokio::test]
async fn test_missing_or_invalid_token_is_unauthorized() {
    let app = setup_test_app().await;
    let user = TestUser::new();
    let video = app.repository.insert_video(user.user_id);
    let path = format!("/api/video_upload/{}", video.id);

    let missing = app
        .client()
        .post(&path)
        .multipart(video_form(mp4_bytes(1024), "video/mp4"))
        .await;
    assert_eq!(missing.status_code(), 401);

    let invalid = app
        .client()
        .post(&path)
        .add_header("Authorization", "Bearer not-a-token")
        .multipart(video_form(mp4_bytes(1024), "video/mp4"))
        .await;
    assert_eq!(invalid.status_code(), 401);
    let body: serde_json::Value = invalid.json();
    assert_eq!(body["code"], "UNAUTHORIZED");

    assert!(app.repository.video(video.id).unwrap().video_url.is_none());
}

#[tokio::test]
async fn test_unsupported_content_types_are_rejected_before_storage() {
    let app = setup_test_app().await;
    let user = TestUser::new();
    let video = app.repository.insert_video(user.user_id);

    let thumbnail = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", user.bearer())
        .multipart(thumbnail_form(png_bytes(), "image/gif"))
        .await;
    assert_eq!(thumbnail.status_code(), 400);

    let clip = app
        .client()
        .post(&format!("/api/video_upload/{}", video.id))
        .add_header("Authorization", user.bearer())
        .multipart(video_form(mp4_bytes(1024), "video/quicktime"))
        .await;
    assert_eq!(clip.status_code(), 400);

    assert!(!app.assets_root().exists());
    assert!(app.staged_files().is_empty());
    let persisted = app.repository.video(video.id).unwrap();
    assert!(persisted.thumbnail_url.is_none());
    assert!(persisted.video_url.is_none());
}

#[tokio::test]
async fn test_unknown_video_is_not_found() {
    let app = setup_test_app().await;
    let user = TestUser::new();

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", Uuid::new_v4()))
        .add_header("Authorization", user.bearer())
        .multipart(thumbnail_form(png_bytes(), "image/png"))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_malformed_requests_are_bad_requests() {
    let app = setup_test_app().await;
    let user = TestUser::new();
    let video = app.repository.insert_video(user.user_id);

    let bad_id = app
        .client()
        .post("/api/thumbnail_upload/not-a-uuid")
        .add_header("Authorization", user.bearer())
        .multipart(thumbnail_form(png_bytes(), "image/png"))
        .await;
    assert_eq!(bad_id.status_code(), 400);

    // Thumbnail sent under the video route's field name.
    let wrong_field = app
        .client()
        .post(&format!("/api/video_upload/{}", video.id))
        .add_header("Authorization", user.bearer())
        .multipart(thumbnail_form(png_bytes(), "image/png"))
        .await;
    assert_eq!(wrong_field.status_code(), 400);
}

#[tokio::test]
async fn test_oversized_thumbnail_is_payload_too_large() {
    let app = setup_test_app_with(1920, 1080, |config| {
        config.max_thumbnail_size_bytes = 1024;
    })
    .await;
    let user = TestUser::new();
    let video = app.repository.insert_video(user.user_id);

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", user.bearer())
        .multipart(thumbnail_form(mp4_bytes(16 * 1024), "image/png"))
        .await;

    assert_eq!(response.status_code(), 413);
    assert!(app.repository.video(video.id).unwrap().thumbnail_url.is_none());
    let leftover = std::fs::read_dir(app.assets_root())
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftover, 0);
}

#[tokio::test]
async fn test_video_without_streams_is_upstream_failure() {
    let app = setup_test_app_with_probe(Arc::new(NoStreamProbe), |_| {}).await;
    let user = TestUser::new();
    let video = app.repository.insert_video(user.user_id);

    let response = app
        .client()
        .post(&format!("/api/video_upload/{}", video.id))
        .add_header("Authorization", user.bearer())
        .multipart(video_form(mp4_bytes(32 * 1024), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 502);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "MEDIA_PROBE_ERROR");

    assert!(app.staged_files().is_empty());
    let objects: Vec<_> = object_store::ObjectStore::list(app.bucket.as_ref(), None)
        .collect()
        .await;
    assert!(objects.is_empty());
    assert_eq!(app.repository.video(video.id).unwrap(), video);
}

#[tokio::test]
async fn test_non_multipart_body_gets_json_error() {
    let app = setup_test_app().await;
    let user = TestUser::new();
    let video = app.repository.insert_video(user.user_id);

    let response = app
        .client()
        .post(&format!("/api/thumbnail_upload/{}", video.id))
        .add_header("Authorization", user.bearer())
        .text("just some text")
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Expected a multipart/form-data body"));
    assert!(app.repository.video(video.id).unwrap().thumbnail_url.is_none());
}

#[tokio::test]
async fn test_malformed_id_is_rejected_before_auth() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/video_upload/not-a-uuid")
        .multipart(video_form(mp4_bytes(1024), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "BAD_REQUEST");
}
