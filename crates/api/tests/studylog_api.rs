//! HTTP-level integration tests for studylogs, likes, tags and popularity.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_member, delete_auth, get, get_auth, post_auth, post_json, post_json_auth,
    put_json_auth, token_for,
};
use serde_json::json;
use sqlx::PgPool;
use studylog_api::services::PostTagService;

async fn create_studylog(pool: &PgPool, token: &str, title: &str, tags: &[&str]) -> i64 {
    let tags: Vec<_> = tags.iter().map(|name| json!({ "name": name })).collect();
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/studylogs",
        json!({ "title": title, "content": "today I learned", "tags": tags }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_studylog_with_tags(pool: PgPool) {
    let verus = create_member(&pool, "verus", "crew").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/studylogs",
        json!({
            "title": "Rust ownership",
            "content": "moves and borrows",
            "tags": [{ "name": "rust" }, { "name": " rust " }, { "name": "memory" }]
        }),
        &token_for(&verus),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["author"]["username"], "verus");
    let tags: Vec<_> = json["data"]["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(tags, vec!["rust", "memory"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_studylog_validates_title(pool: PgPool) {
    let verus = create_member(&pool, "verus", "crew").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/studylogs",
        json!({ "title": "x".repeat(51), "content": "body" }),
        &token_for(&verus),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_blank_title_is_rejected_on_create_and_update(pool: PgPool) {
    let verus = create_member(&pool, "verus", "crew").await;
    let token = token_for(&verus);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/studylogs",
        json!({ "title": "   ", "content": "body" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let id = create_studylog(&pool, &token, "kept", &[]).await;
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/studylogs/{id}"),
        json!({ "title": " \t ", "content": "body" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, &format!("/api/v1/studylogs/{id}"), &token).await).await;
    assert_eq!(json["data"]["title"], "kept");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_numeric_tag_filter_is_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/studylogs?tags=1,abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_studylog_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/studylogs",
        json!({ "title": "t", "content": "c" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_view_count_skips_author(pool: PgPool) {
    let verus = create_member(&pool, "verus", "crew").await;
    let sudal = create_member(&pool, "sudal", "crew").await;
    let id = create_studylog(&pool, &token_for(&verus), "t", &[]).await;
    let uri = format!("/api/v1/studylogs/{id}");

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, &uri, &token_for(&verus)).await).await;
    assert_eq!(json["data"]["view_count"], 0);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, &uri, &token_for(&sudal)).await).await;
    assert_eq!(json["data"]["view_count"], 1);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &uri).await).await;
    assert_eq!(json["data"]["view_count"], 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_missing_or_non_numeric_studylog_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    assert_eq!(
        get(app, "/api/v1/studylogs/999999").await.status(),
        StatusCode::NOT_FOUND
    );

    let app = common::build_test_app(pool);
    assert_eq!(
        get(app, "/api/v1/studylogs/abc").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_search_by_keyword_tag_and_username(pool: PgPool) {
    let verus = create_member(&pool, "verus", "crew").await;
    let sudal = create_member(&pool, "sudal", "crew").await;
    let rust = create_studylog(&pool, &token_for(&verus), "Rust traits", &["rust"]).await;
    let sql = create_studylog(&pool, &token_for(&sudal), "SQL joins", &["db"]).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/studylogs?keyword=traits").await).await;
    assert_eq!(json["total_size"], 1);
    assert_eq!(json["data"][0]["id"], rust);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/studylogs?usernames=sudal").await).await;
    assert_eq!(json["data"][0]["id"], sql);

    let app = common::build_test_app(pool.clone());
    let tags = body_json(get(app, "/api/v1/tags").await).await;
    let db_tag = tags["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "db")
        .unwrap()["id"]
        .as_i64()
        .unwrap();

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/v1/studylogs?tags={db_tag}")).await).await;
    assert_eq!(json["total_size"], 1);
    assert_eq!(json["data"][0]["id"], sql);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/studylogs?size=1").await).await;
    assert_eq!(json["total_size"], 2);
    assert_eq!(json["total_page"], 2);
    assert_eq!(json["data"][0]["id"], sql, "newest first");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_member_posts_listing(pool: PgPool) {
    let verus = create_member(&pool, "verus", "crew").await;
    create_studylog(&pool, &token_for(&verus), "first", &[]).await;
    let latest = create_studylog(&pool, &token_for(&verus), "second", &[]).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/members/verus/posts").await).await;
    assert_eq!(json["total_size"], 2);
    assert_eq!(json["current_page"], 1);
    assert_eq!(json["data"][0]["id"], latest);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/members/verus/profile").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["nickname"], "verus-nick");
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_replaces_tags(pool: PgPool) {
    let verus = create_member(&pool, "verus", "crew").await;
    let id = create_studylog(&pool, &token_for(&verus), "t", &["old"]).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/studylogs/{id}"),
        json!({ "title": "renamed", "content": "c", "tags": [{ "name": "new" }] }),
        &token_for(&verus),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "renamed");
    assert_eq!(json["data"]["tags"][0]["name"], "new");

    let app = common::build_test_app(pool);
    let tags = body_json(get(app, "/api/v1/tags").await).await;
    let names: Vec<_> = tags["data"].as_array().unwrap().iter().map(|t| t["name"].clone()).collect();
    assert_eq!(names, vec![json!("new")], "unused tags are not listed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_only_author_may_modify(pool: PgPool) {
    let verus = create_member(&pool, "verus", "crew").await;
    let sudal = create_member(&pool, "sudal", "crew").await;
    let id = create_studylog(&pool, &token_for(&verus), "t", &[]).await;
    let uri = format!("/api/v1/studylogs/{id}");

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &uri,
        json!({ "title": "mine now", "content": "c" }),
        &token_for(&sudal),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &token_for(&sudal)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &token_for(&verus)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    assert_eq!(get(app, &uri).await.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Likes and popularity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_like_is_idempotent(pool: PgPool) {
    let verus = create_member(&pool, "verus", "crew").await;
    let sudal = create_member(&pool, "sudal", "crew").await;
    let id = create_studylog(&pool, &token_for(&verus), "t", &[]).await;
    let uri = format!("/api/v1/studylogs/{id}/likes");

    for _ in 0..2 {
        let app = common::build_test_app(pool.clone());
        let response = post_auth(app, &uri, &token_for(&sudal)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["like_count"], 1);
        assert_eq!(json["data"]["liked"], true);
    }

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &token_for(&sudal)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["like_count"], 0);
    assert_eq!(json["data"]["liked"], false);

    let app = common::build_test_app(pool);
    let response = post_auth(app, "/api/v1/studylogs/999999/likes", &token_for(&sudal)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_popular_sync_ranks_by_score(pool: PgPool) {
    let verus = create_member(&pool, "verus", "crew").await;
    let sudal = create_member(&pool, "sudal", "crew").await;
    let admin = create_member(&pool, "admin", "admin").await;

    let viewed = create_studylog(&pool, &token_for(&verus), "viewed", &[]).await;
    let liked = create_studylog(&pool, &token_for(&verus), "liked", &[]).await;
    create_studylog(&pool, &token_for(&verus), "ignored", &[]).await;

    // viewed: 2 views -> 2; liked: 1 like -> 3
    for _ in 0..2 {
        let app = common::build_test_app(pool.clone());
        get(app, &format!("/api/v1/studylogs/{viewed}")).await;
    }
    let app = common::build_test_app(pool.clone());
    post_auth(app, &format!("/api/v1/studylogs/{liked}/likes"), &token_for(&sudal)).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/studylogs/popular/sync?size=2", &token_for(&sudal)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/studylogs/popular/sync?size=2", &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["synced"], 2);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/studylogs/popular").await).await;
    assert_eq!(json["total_size"], 2);
    assert_eq!(json["data"][0]["id"], liked);
    assert_eq!(json["data"][1]["id"], viewed);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_post_tags_found_by_tag(pool: PgPool) {
    let verus = create_member(&pool, "verus", "crew").await;
    let token = token_for(&verus);
    let first = create_studylog(&pool, &token, "first", &["rust", "db"]).await;
    let second = create_studylog(&pool, &token, "second", &["rust"]).await;

    let tags = PostTagService::new(&pool).find_tags_included_in_post().await.unwrap();
    let rust = tags.iter().find(|t| t.name == "rust").unwrap().id;

    let post_tags = PostTagService::new(&pool).find_by_tags(&[rust]).await.unwrap();
    let mut studylog_ids: Vec<i64> = post_tags.iter().map(|pt| pt.studylog_id).collect();
    studylog_ids.sort();
    assert_eq!(studylog_ids, vec![first, second]);
    assert!(post_tags.iter().all(|pt| pt.tag_id == rust));
}
