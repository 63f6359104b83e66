mod common;

use axum::http::StatusCode;

use common::{TestSite, ADMIN, ADMIN_PASSWORD};

#[tokio::test]
async fn test_signin_form() {
    let mut site = TestSite::new();

    let response = site.get("/users/signin").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<input"));
    assert!(response.body.contains("username"));
}

#[tokio::test]
async fn test_signin() {
    let mut site = TestSite::new();

    let response = site
        .post(
            "/users/signin",
            &[("username", ADMIN), ("password", ADMIN_PASSWORD)],
        )
        .await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/"));

    let response = site.get("/").await;
    assert!(response.body.contains("Welcome admin!"));
    assert!(response.body.contains("Signed in as admin"));
}

#[tokio::test]
async fn test_signin_with_bad_credentials() {
    let mut site = TestSite::new();

    let response = site
        .post("/users/signin", &[("username", "test"), ("password", "shh")])
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Invalid Signin"));

    let response = site
        .post("/users/signin", &[("username", ADMIN), ("password", "shh")])
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);

    let response = site.get("/").await;
    assert!(!response.body.contains("Signed in as"));
    assert!(response.body.contains("Signin"));
}

#[tokio::test]
async fn test_signout() {
    let mut site = TestSite::new();
    site.sign_in_as_admin().await;

    let response = site.get("/").await;
    assert!(response.body.contains("Signed in as admin"));

    let response = site.post("/users/signout", &[]).await;
    assert_eq!(response.status, StatusCode::FOUND);

    let response = site.get(response.location().unwrap()).await;
    assert!(response.body.contains("admin has signed out."));
    assert!(response.body.contains("Signin"));
    assert!(!response.body.contains("Signed in as"));

    let response = site.get("/file/new").await;
    assert_eq!(response.status, StatusCode::FOUND);
}

#[tokio::test]
async fn test_signout_without_user() {
    let mut site = TestSite::new();

    let response = site.post("/users/signout", &[]).await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/"));

    let response = site.get("/").await;
    assert!(response.body.contains("You must be signed in to do that!"));
}

#[tokio::test]
async fn test_signin_with_malformed_credentials_file() {
    let mut site = TestSite::new();
    std::fs::write(&site.credentials_path, "admin = [1, 2").unwrap();

    let response = site
        .post(
            "/users/signin",
            &[("username", ADMIN), ("password", ADMIN_PASSWORD)],
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_signin_issues_new_session_cookie() {
    let mut site = TestSite::new();

    // a rejected request starts a session to carry the error flash
    site.get("/file/new").await;
    let before = site.cookie();
    assert!(before.is_some());

    site.sign_in_as_admin().await;
    let after = site.cookie();
    assert_ne!(after, before);

    site.set_cookie(before);
    let response = site.get("/file/new").await;
    assert_eq!(response.status, StatusCode::FOUND);

    site.set_cookie(after);
    let response = site.get("/file/new").await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_sessions_are_per_client() {
    let mut site = TestSite::new();
    site.sign_in_as_admin().await;

    site.clear_cookies();
    let response = site.get("/file/new").await;
    assert_eq!(response.status, StatusCode::FOUND);
}

#[tokio::test]
async fn test_health_routes() {
    let mut site = TestSite::new();

    let response = site.get("/_status/livez").await;
    assert_eq!(response.status, StatusCode::OK);

    let response = site.get("/_status/readyz").await;
    assert_eq!(response.status, StatusCode::OK);

    let response = site.get("/_status/version").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("version"));
}
