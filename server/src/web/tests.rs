use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use tower::ServiceExt;

use crate::{
    db::{clients::sqlite::SqliteClient, interface::DatabaseClient},
    models::{NewUser, User},
    web::router,
};

struct Tools {
    router: Router,
    db: SqliteClient,
}

/// Create a router over a fresh in-memory database, keeping a handle to the
/// database for direct setup and inspection.
async fn tools() -> Tools {
    let db = SqliteClient::new_memory()
        .await
        .expect("expected client creation to succeed");
    Tools {
        router: router(db.clone()),
        db,
    }
}

async fn seed_user(db: &SqliteClient, name: &str, color: &str) -> User {
    db.create_user(&NewUser {
        name: name.to_string(),
        color: color.to_string(),
    })
    .await
    .expect("expected user creation to succeed")
}

fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn form_post(path: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("expected a Location header")
        .to_str()
        .unwrap()
}

fn set_cookie(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("expected a Set-Cookie header")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_home_reports_distinct_visited_count() {
    let Tools { router, db } = tools().await;
    let user = seed_user(&db, "Ada", "teal").await;
    db.record_visit("FR", user.id).await.unwrap();
    db.record_visit("FR", user.id).await.unwrap();
    db.record_visit("JP", user.id).await.unwrap();

    let cookie = format!("traveler={}", user.id);
    let response = router.oneshot(get("/", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Countries visited: 2"));
    assert!(body.contains("<li>FR</li>"));
    assert!(body.contains("<li>JP</li>"));
    assert!(body.contains("background-color: teal"));
}

#[tokio::test]
async fn test_home_with_stale_cookie_falls_back_to_white() {
    let Tools { router, .. } = tools().await;
    let response = router
        .oneshot(get("/", Some("traveler=42")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("background-color: white"));
    assert!(body.contains("Countries visited: 0"));
}

#[tokio::test]
async fn test_home_is_idempotent() {
    let Tools { router, db } = tools().await;
    let user = seed_user(&db, "Ada", "teal").await;
    db.record_visit("FR", user.id).await.unwrap();

    let cookie = format!("traveler={}", user.id);
    let first = body_text(
        router
            .clone()
            .oneshot(get("/", Some(&cookie)))
            .await
            .unwrap(),
    )
    .await;
    let second = body_text(router.oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_add_known_country_records_one_visit() {
    let Tools { router, db } = tools().await;
    let user = seed_user(&db, "Ada", "teal").await;

    let cookie = format!("traveler={}", user.id);
    let response = router
        .oneshot(form_post("/add", "country=France", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert_eq!(
        db.list_visited_codes(user.id).await.unwrap(),
        vec!["FR".to_string()]
    );
}

#[tokio::test]
async fn test_add_unknown_country_records_nothing() {
    let Tools { router, db } = tools().await;
    let user = seed_user(&db, "Ada", "teal").await;

    let cookie = format!("traveler={}", user.id);
    let response = router
        .oneshot(form_post("/add", "country=Atlantis", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/?error=unknown-country");
    assert!(db.list_visited_codes(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_blank_country_redirects_with_notice() {
    let Tools { router, db } = tools().await;
    let user = seed_user(&db, "Ada", "teal").await;

    let cookie = format!("traveler={}", user.id);
    let response = router
        .oneshot(form_post("/add", "country=", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/?error=empty-country");
}

#[tokio::test]
async fn test_add_with_stale_cookie_is_rejected() {
    let Tools { router, .. } = tools().await;
    let response = router
        .oneshot(form_post("/add", "country=France", Some("traveler=42")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_traveler_switches_cookie() {
    let Tools { router, db } = tools().await;
    let response = router
        .clone()
        .oneshot(form_post("/new", "name=Alice&color=blue", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let users = db.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Alice");
    let cookie = set_cookie(&response).to_string();
    assert!(cookie.starts_with(&format!("traveler={}", users[0].id)));

    // The next home render reflects the new traveler's color.
    let traveler_cookie = format!("traveler={}", users[0].id);
    let home = router.oneshot(get("/", Some(&traveler_cookie))).await.unwrap();
    assert!(body_text(home).await.contains("background-color: blue"));
}

#[tokio::test]
async fn test_create_traveler_requires_name_and_color() {
    let Tools { router, db } = tools().await;
    let response = router
        .clone()
        .oneshot(form_post("/new", "name=&color=blue", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(form_post("/new", "name=Alice&color=", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(db.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_switch_to_existing_traveler_sets_cookie() {
    let Tools { router, db } = tools().await;
    let _ada = seed_user(&db, "Ada", "teal").await;
    let brian = seed_user(&db, "Brian", "plum").await;

    let body = format!("user={}", brian.id);
    let response = router.oneshot(form_post("/user", &body, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(set_cookie(&response).starts_with(&format!("traveler={}", brian.id)));
}

#[tokio::test]
async fn test_switch_to_unknown_traveler_is_rejected() {
    let Tools { router, .. } = tools().await;
    let response = router
        .oneshot(form_post("/user", "user=999", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_switch_dispatch_new_renders_creation_form() {
    let Tools { router, .. } = tools().await;
    let response = router
        .oneshot(form_post("/user", "add=new", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("action=\"/new\""));
}

#[tokio::test]
async fn test_switch_with_no_fields_is_bad_request() {
    let Tools { router, .. } = tools().await;
    let response = router.oneshot(form_post("/user", "", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
