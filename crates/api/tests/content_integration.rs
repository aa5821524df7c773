//! Integration tests for the document library and news.
//!
//! Run with: cargo test --test content_integration

mod common;

use axum::{
    http::{Method, StatusCode},
    Router,
};
use common::{admin_token, approved_user, authed_json_request, request, send, test_app};
use serde_json::{json, Value};

fn document_body(title: &str, category: &str, is_public: bool) -> Value {
    json!({
        "title": title,
        "description": "Approved at the national council",
        "fileName": "statute-2024.pdf",
        "fileType": "pdf",
        "fileSize": 245760,
        "category": category,
        "isPublic": is_public
    })
}

fn article_body(title: &str, status: &str, is_featured: bool) -> Value {
    json!({
        "title": title,
        "excerpt": "Summary of the session",
        "content": "Full minutes of the session.",
        "category": "announcements",
        "status": status,
        "isFeatured": is_featured
    })
}

async fn create_document(app: &Router, token: &str, body: Value) -> Value {
    let (status, document) = send(
        app,
        authed_json_request(Method::POST, "/api/v1/admin/documents", token, body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", document);
    document
}

async fn create_article(app: &Router, token: &str, body: Value) -> Value {
    let (status, article) = send(
        app,
        authed_json_request(Method::POST, "/api/v1/admin/news", token, body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", article);
    article
}

// ============================================================================
// Document Tests
// ============================================================================

#[tokio::test]
async fn test_private_documents_hidden_from_anonymous() {
    let app = test_app().await;
    let admin = admin_token(&app).await;
    create_document(&app, &admin, document_body("Union statute", "statutes", true)).await;
    let private =
        create_document(&app, &admin, document_body("Council minutes", "minutes", false)).await;
    let private_id = private["id"].as_str().unwrap();

    let (status, body) = send(&app, request(Method::GET, "/api/v1/documents", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Union statute");

    let (status, _) = send(
        &app,
        request(Method::GET, &format!("/api/v1/documents/{}", private_id), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let member = approved_user(&app, "member").await;
    let (_, body) = send(&app, request(Method::GET, "/api/v1/documents", Some(&member))).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(
        &app,
        request(Method::GET, "/api/v1/documents?publicOnly=true", Some(&member)),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        request(
            Method::GET,
            &format!("/api/v1/documents/{}", private_id),
            Some(&member),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isPublic"], false);
}

#[tokio::test]
async fn test_invalid_token_is_treated_as_anonymous_for_content() {
    let app = test_app().await;
    let admin = admin_token(&app).await;
    create_document(&app, &admin, document_body("Council minutes", "minutes", false)).await;

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/v1/documents", Some("expired-or-garbage")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_download_counts() {
    let app = test_app().await;
    let admin = admin_token(&app).await;
    let document =
        create_document(&app, &admin, document_body("Union statute", "statutes", true)).await;
    let uri = format!("/api/v1/documents/{}/download", document["id"].as_str().unwrap());

    send(&app, request(Method::POST, &uri, None)).await;
    let (status, body) = send(&app, request(Method::POST, &uri, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["downloadCount"], 2);

    let (_, managed) = send(
        &app,
        request(Method::GET, "/api/v1/admin/documents", Some(&admin)),
    )
    .await;
    assert_eq!(managed["stats"]["totalDownloads"], 2);
}

#[tokio::test]
async fn test_document_filters_and_sorting() {
    let app = test_app().await;
    let admin = admin_token(&app).await;
    create_document(&app, &admin, document_body("Bylaws", "statutes", true)).await;
    create_document(&app, &admin, document_body("Annual report", "reports", true)).await;

    let (_, body) = send(
        &app,
        request(Method::GET, "/api/v1/documents?category=reports", None),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Annual report");

    let (_, body) = send(
        &app,
        request(Method::GET, "/api/v1/documents?sort=title&order=asc", None),
    )
    .await;
    assert_eq!(body[0]["title"], "Annual report");
    assert_eq!(body[1]["title"], "Bylaws");
}

#[tokio::test]
async fn test_document_management_crud() {
    let app = test_app().await;
    let editor = approved_user(&app, "editor").await;

    let document =
        create_document(&app, &editor, document_body("Draft charter", "statutes", false)).await;
    let id = document["id"].as_str().unwrap();
    assert_eq!(document["uploadedBy"], "Karim Bennani");
    assert_eq!(document["downloadCount"], 0);

    let (status, updated) = send(
        &app,
        authed_json_request(
            Method::PUT,
            &format!("/api/v1/admin/documents/{}", id),
            &editor,
            document_body("Final charter", "statutes", true),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Final charter");
    assert_eq!(updated["isPublic"], true);

    let (status, managed) = send(
        &app,
        request(Method::GET, "/api/v1/admin/documents", Some(&editor)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(managed["stats"]["total"], 1);
    assert_eq!(managed["stats"]["public"], 1);

    let (status, _) = send(
        &app,
        request(
            Method::DELETE,
            &format!("/api/v1/admin/documents/{}", id),
            Some(&editor),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        request(
            Method::DELETE,
            &format!("/api/v1/admin/documents/{}", id),
            Some(&editor),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_document_validation() {
    let app = test_app().await;
    let admin = admin_token(&app).await;

    let (status, body) = send(
        &app,
        authed_json_request(
            Method::POST,
            "/api/v1/admin/documents",
            &admin,
            document_body("  ", "statutes", true),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_member_cannot_create_documents() {
    let app = test_app().await;
    let member = approved_user(&app, "member").await;

    let (status, _) = send(
        &app,
        authed_json_request(
            Method::POST,
            "/api/v1/admin/documents",
            &member,
            document_body("Leaflet", "flyers", true),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ============================================================================
// News Tests
// ============================================================================

#[tokio::test]
async fn test_drafts_are_not_public() {
    let app = test_app().await;
    let admin = admin_token(&app).await;
    create_article(&app, &admin, article_body("Strike notice", "published", false)).await;
    let draft = create_article(&app, &admin, article_body("Upcoming vote", "draft", false)).await;

    let (status, body) = send(&app, request(Method::GET, "/api/v1/news", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Strike notice");

    let (status, _) = send(
        &app,
        request(
            Method::GET,
            &format!("/api/v1/news/{}", draft["id"].as_str().unwrap()),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, managed) = send(
        &app,
        request(Method::GET, "/api/v1/admin/news?status=draft", Some(&admin)),
    )
    .await;
    assert_eq!(managed["articles"].as_array().unwrap().len(), 1);
    assert_eq!(managed["stats"]["drafts"], 1);
    assert_eq!(managed["stats"]["published"], 1);
}

#[tokio::test]
async fn test_featured_first_and_views_counted() {
    let app = test_app().await;
    let admin = admin_token(&app).await;
    create_article(&app, &admin, article_body("Regular update", "published", false)).await;
    let featured =
        create_article(&app, &admin, article_body("Salary agreement", "published", true)).await;

    let (_, body) = send(&app, request(Method::GET, "/api/v1/news", None)).await;
    assert_eq!(body[0]["title"], "Salary agreement");

    let uri = format!("/api/v1/news/{}", featured["id"].as_str().unwrap());
    send(&app, request(Method::GET, &uri, None)).await;
    let (status, article) = send(&app, request(Method::GET, &uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(article["viewCount"], 2);
}

#[tokio::test]
async fn test_news_management_crud() {
    let app = test_app().await;
    let editor = approved_user(&app, "editor").await;

    let article = create_article(&app, &editor, article_body("Draft", "draft", false)).await;
    let id = article["id"].as_str().unwrap();
    assert_eq!(article["author"], "Karim Bennani");

    let (status, updated) = send(
        &app,
        authed_json_request(
            Method::PUT,
            &format!("/api/v1/admin/news/{}", id),
            &editor,
            article_body("General assembly", "published", false),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "published");

    let (_, public) = send(&app, request(Method::GET, "/api/v1/news", None)).await;
    assert_eq!(public.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        request(
            Method::DELETE,
            &format!("/api/v1/admin/news/{}", id),
            Some(&editor),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, public) = send(&app, request(Method::GET, "/api/v1/news", None)).await;
    assert!(public.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_manage_news_rejects_unknown_status() {
    let app = test_app().await;
    let admin = admin_token(&app).await;

    let (status, _) = send(
        &app,
        request(Method::GET, "/api/v1/admin/news?status=pending", Some(&admin)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
