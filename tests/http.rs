use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use realty::server::{router, AppState};
use realty::{setup, EntityKind, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn app(seed: bool) -> (TempDir, PathBuf, Router) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("realty.db");
    drop(setup::initialize(&path, seed).unwrap());

    let app = router(Arc::new(AppState {
        database_path: path.clone(),
    }));
    (dir, path, app)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn root_redirects_to_about_page() {
    let (_dir, _path, app) = app(false);

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "/about-us");

    let response = app.oneshot(get("/about-us")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn listing_page_shows_seeded_rows() {
    let (_dir, _path, app) = app(true);

    let response = app.oneshot(get("/show_person")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("<th>address_line</th>"));
    assert!(html.contains("<td>Hermione</td>"));
    assert!(html.contains("<td>Wonderland</td>"));
}

#[tokio::test]
async fn create_form_lists_reference_choices() {
    let (_dir, _path, app) = app(true);

    let response = app.oneshot(get("/create_contract")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("<select name=\"agent_id\" id=\"agent_id\" required>"));
    assert!(html.contains("<option value=\"1\">Wendy Darling</option>"));
}

#[tokio::test]
async fn posting_a_form_redirects_to_the_listing() {
    let (_dir, path, app) = app(false);

    let response = app
        .oneshot(post_form(
            "/create_address",
            "street_number=221&address_line=Baker+St&country=UK&postal_code=NW1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/show_address");

    let store = SqliteStore::open(&path).unwrap();
    let listing = store.list_with_relations(EntityKind::Address).unwrap();
    assert_eq!(listing.records[0].text("address_line"), Some("Baker St"));
}

#[tokio::test]
async fn person_form_with_role_creates_both_rows() {
    let (_dir, path, app) = app(false);

    let response = app
        .oneshot(post_form(
            "/create_person",
            "first_name=Bilbo&last_name=Baggins&date_of_birth=1890-09-22&role=agent&employment_date=2001-12-19",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/show_person");

    let store = SqliteStore::open(&path).unwrap();
    let agents = store.list_with_relations(EntityKind::Agent).unwrap();
    assert_eq!(agents.len(), 1);
    assert_eq!(agents.records[0].text("first_name"), Some("Bilbo"));
}

#[tokio::test]
async fn missing_required_field_is_a_bad_request() {
    let (_dir, path, app) = app(false);

    let response = app
        .oneshot(post_form("/create_location", "latitude=12.5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("longitude"));

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.count(EntityKind::Location).unwrap(), 0);
}

#[tokio::test]
async fn dangling_reference_is_a_conflict() {
    let (_dir, _path, app) = app(false);

    let response = app
        .oneshot(post_form(
            "/create_payment",
            "amount=100&date=2024-01-01&contract_id=77",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn failed_role_insert_leaves_no_person_behind() {
    let (_dir, path, app) = app(false);

    // agent without employment_date
    let response = app
        .oneshot(post_form(
            "/create_person",
            "first_name=Frodo&last_name=Baggins&date_of_birth=1968-09-22&role=agent",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.count(EntityKind::Person).unwrap(), 0);
}

#[tokio::test]
async fn unparseable_number_is_a_bad_request() {
    let (_dir, path, app) = app(false);

    let response = app
        .oneshot(post_form("/create_location", "latitude=north&longitude=2.35"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("latitude"));

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.count(EntityKind::Location).unwrap(), 0);
}

#[tokio::test]
async fn unreachable_database_is_service_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let app = router(Arc::new(AppState {
        database_path: dir.path().join("missing").join("realty.db"),
    }));

    let response = app.oneshot(get("/show_address")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
