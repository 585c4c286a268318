use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use nebula_core::BlogService;
use nebula_core::domain::Author;
use nebula_infra::{InMemoryAuthorDirectory, InMemoryEngagement, InMemoryPostStore};

use super::configure_routes;
use crate::observability::{REQUEST_ID_HEADER, RequestIdMiddleware};
use crate::state::{AppState, StorageBackend};

async fn state_with_author() -> (AppState, Uuid) {
    let author = Author {
        id: Uuid::new_v4(),
        name: Some("Grace".to_string()),
        email: "grace@example.com".to_string(),
        avatar: None,
    };
    let authors = Arc::new(InMemoryAuthorDirectory::new());
    authors.register(author.clone()).await;

    let blog = BlogService::new(
        Arc::new(InMemoryPostStore::new()),
        authors,
        Arc::new(InMemoryEngagement::new()),
    );

    (
        AppState {
            blog,
            storage: StorageBackend::InMemory,
        },
        author.id,
    )
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn post_body(author_id: Uuid, title: &str, published: bool) -> Value {
    json!({
        "title": title,
        "content": format!("{} body", title),
        "category": "Engineering",
        "tags": ["rust"],
        "published": published,
        "authorId": author_id,
    })
}

#[actix_rt::test]
async fn test_health_reports_storage() {
    let state = AppState::in_memory(100);
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[actix_rt::test]
async fn test_request_id_is_echoed() {
    let state = AppState::in_memory(100);
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header((REQUEST_ID_HEADER, "req-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "req-123");
}

#[actix_rt::test]
async fn test_create_then_read_by_slug() {
    let (state, author_id) = state_with_author().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/admin/posts")
        .set_json(post_body(author_id, "Hello World", true))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["slug"], "hello-world");
    assert_eq!(created["data"]["stats"]["likes"], 0);
    assert_eq!(created["data"]["author"]["name"], "Grace");

    let req = test::TestRequest::get()
        .uri("/api/posts/hello-world")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let detail: Value = test::read_body_json(resp).await;
    assert_eq!(detail["title"], "Hello World");
    assert_eq!(detail["tags"], json!(["rust"]));
    assert!(detail["relatedPosts"].as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_draft_is_hidden_from_public() {
    let (state, author_id) = state_with_author().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/admin/posts")
        .set_json(post_body(author_id, "Secret Draft", false))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/posts/secret-draft")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/admin/posts/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list["pagination"]["total"], 0);
}

#[actix_rt::test]
async fn test_create_rejects_missing_title() {
    let (state, author_id) = state_with_author().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/admin/posts")
        .set_json(json!({ "content": "x", "category": "y", "authorId": author_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["status"], 400);
    assert_eq!(problem["title"], "Bad Request");
}

#[actix_rt::test]
async fn test_duplicate_slug_is_conflict() {
    let (state, author_id) = state_with_author().await;
    let app = app!(state);

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let req = test::TestRequest::post()
            .uri("/api/admin/posts")
            .set_json(post_body(author_id, "Same Title", true))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
    }
}

#[actix_rt::test]
async fn test_update_null_clears_excerpt() {
    let (state, author_id) = state_with_author().await;
    let app = app!(state);

    let mut body = post_body(author_id, "With Excerpt", true);
    body["excerpt"] = json!("short");
    let req = test::TestRequest::post()
        .uri("/api/admin/posts")
        .set_json(body)
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/posts/{}", id))
        .set_json(json!({ "excerpt": null, "featured": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["data"]["excerpt"], Value::Null);
    assert_eq!(updated["data"]["featured"], true);
    assert_eq!(updated["data"]["title"], "With Excerpt");
}

#[actix_rt::test]
async fn test_update_and_delete_unknown_post() {
    let state = AppState::in_memory(100);
    let app = app!(state);
    let uri = format!("/api/admin/posts/{}", Uuid::new_v4());

    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "featured": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_bulk_publish_and_delete() {
    let (state, author_id) = state_with_author().await;
    let app = app!(state);

    let mut ids = Vec::new();
    for title in ["Alpha", "Beta"] {
        let req = test::TestRequest::post()
            .uri("/api/admin/posts")
            .set_json(post_body(author_id, title, false))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(created["data"]["id"].clone());
    }
    ids.push(json!(Uuid::new_v4()));

    let req = test::TestRequest::post()
        .uri("/api/admin/posts/bulk")
        .set_json(json!({ "postIds": ids, "action": "publish" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["affectedCount"], 2);
    assert_eq!(body["message"], "Published 2 posts successfully");

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list["pagination"]["total"], 2);

    let req = test::TestRequest::post()
        .uri("/api/admin/posts/bulk")
        .set_json(json!({ "postIds": ids, "action": "delete" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["affectedCount"], 2);
}

#[actix_rt::test]
async fn test_bulk_rejects_bad_input() {
    let state = AppState::in_memory(100);
    let app = app!(state);

    let cases = [
        json!({ "postIds": [], "action": "publish" }),
        json!({ "postIds": [Uuid::new_v4()], "action": "archive" }),
    ];
    for body in cases {
        let req = test::TestRequest::post()
            .uri("/api/admin/posts/bulk")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

#[actix_rt::test]
async fn test_listing_rejects_bad_parameters() {
    let state = AppState::in_memory(100);
    let app = app!(state);

    for uri in [
        "/api/posts?page=0",
        "/api/posts?limit=abc",
        "/api/posts?sortBy=random",
        "/api/admin/posts?status=archived",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[actix_rt::test]
async fn test_malformed_path_id_is_bad_request() {
    let state = AppState::in_memory(100);
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/admin/posts/not-a-uuid")
        .insert_header((REQUEST_ID_HEADER, "abc"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["requestId"], "abc");
}

#[actix_rt::test]
async fn test_limit_is_clamped() {
    let (state, author_id) = state_with_author().await;
    let state = AppState {
        blog: state.blog.with_max_page_size(2),
        ..state
    };
    let app = app!(state);

    for title in ["One", "Two", "Three"] {
        let req = test::TestRequest::post()
            .uri("/api/admin/posts")
            .set_json(post_body(author_id, title, true))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/admin/posts?limit=50")
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list["posts"].as_array().unwrap().len(), 2);
    assert_eq!(list["pagination"]["limit"], 2);
    assert_eq!(list["pagination"]["pages"], 2);
}

#[actix_rt::test]
async fn test_dashboard_stats() {
    let (state, author_id) = state_with_author().await;
    let app = app!(state);

    for (title, published) in [("Live", true), ("Pending", false)] {
        let req = test::TestRequest::post()
            .uri("/api/admin/posts")
            .set_json(post_body(author_id, title, published))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/api/admin/stats").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let overview = &body["data"]["overview"];
    assert_eq!(overview["totalPosts"], 2);
    assert_eq!(overview["publishedPosts"], 1);
    assert_eq!(overview["draftPosts"], 1);
    assert_eq!(overview["totalUsers"], 1);
    assert_eq!(body["data"]["postsByCategory"][0]["count"], 2);
    assert_eq!(body["data"]["recentActivity"]["recentPosts"], 2);
}

#[actix_rt::test]
async fn test_create_rejects_unknown_author() {
    let (state, _) = state_with_author().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/admin/posts")
        .set_json(post_body(Uuid::new_v4(), "Ghost Writer", true))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/api/admin/posts").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list["pagination"]["total"], 0);
}

#[actix_rt::test]
async fn test_bulk_skips_malformed_ids() {
    let (state, author_id) = state_with_author().await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/admin/posts")
        .set_json(post_body(author_id, "Gamma", false))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["data"]["id"].clone();

    let req = test::TestRequest::post()
        .uri("/api/admin/posts/bulk")
        .set_json(json!({ "postIds": [id, "not-a-uuid"], "action": "feature" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["affectedCount"], 1);

    let req = test::TestRequest::post()
        .uri("/api/admin/posts/bulk")
        .set_json(json!({ "postIds": ["nope"], "action": "publish" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["affectedCount"], 0);

    let req = test::TestRequest::post()
        .uri("/api/admin/posts/bulk")
        .set_json(json!({ "postIds": ["nope"], "action": "archive" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
