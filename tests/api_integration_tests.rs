//! Integration Tests for API Endpoints
//!
//! Drives the full router, including the cache behaviour visible through
//! `/cache/stats`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use course_reviewer::{
    api::create_router, cache::BoundedCache, repository::Repository, AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_app_with_capacity(100)
}

fn create_app_with_capacity(capacity: usize) -> Router {
    let cache = Arc::new(BoundedCache::new(capacity).unwrap());
    create_router(AppState::new(cache, Arc::new(Repository::new())))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

async fn cache_stats(app: &Router) -> Value {
    get(app, "/cache/stats").await.1
}

/// Creates user 1, subject 1 and teacher 1 teaching subject 1.
async fn seed(app: &Router) {
    let (status, _) = send(app, "POST", "/users", Some(json!({"username": "alice"}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(app, "POST", "/subjects", Some(json!({"name": "Math"}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        app,
        "POST",
        "/teachers",
        Some(json!({"surname": "Ivanov", "name": "Ivan", "patronym": "Ivanovich"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(app, "POST", "/teachers/1/subjects/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

async fn create_review(app: &Router, grade: i32) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/reviews",
        Some(json!({
            "userId": 1,
            "teacherId": 1,
            "subjectId": 1,
            "grade": grade,
            "date": "2024-03-10",
            "comment": "Solid course"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

// == Health ==

#[test]
fn test_health_endpoint() {
    let app = create_test_app();
    let (status, body) = tokio_test::block_on(get(&app, "/health"));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

// == Resource Endpoints ==

#[tokio::test]
async fn test_review_workflow() {
    let app = create_test_app();
    seed(&app).await;

    let review = create_review(&app, 8).await;
    assert_eq!(review["author"], "alice");
    assert_eq!(review["subjectName"], "Math");
    assert_eq!(review["teacher"]["subjects"][0], "Math");
    assert_eq!(review["date"], "2024-03-10");

    let (status, reviews) = get(&app, "/reviews/teacher/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews.as_array().unwrap().len(), 1);

    let (status, reviews) = get(&app, "/reviews/username/ALICE").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews.as_array().unwrap().len(), 1);

    let (status, user) = get(&app, "/users/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["reviews"].as_array().unwrap().len(), 1);

    let (status, counts) = get(&app, "/reviews/stats/teacher-counts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(counts[0]["surname"], "Ivanov");
    assert_eq!(counts[0]["reviewCount"], 1);
}

#[tokio::test]
async fn test_subject_lists_teacher_full_names() {
    let app = create_test_app();
    seed(&app).await;

    let (status, subject) = get(&app, "/subjects/name/Math").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subject["teacherNames"][0], "Ivanov Ivan Ivanovich");

    let (status, teachers) = get(&app, "/teachers/search/by-subject?subjectName=math").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(teachers[0]["surname"], "Ivanov");

    let (status, teacher) = get(&app, "/teachers/search/by-fullname?surname=Ivanov&name=Ivan").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(teacher["id"], 1);
}

#[tokio::test]
async fn test_review_for_untaught_subject_rejected() {
    let app = create_test_app();
    seed(&app).await;
    send(&app, "POST", "/subjects", Some(json!({"name": "History"}))).await;

    let (status, body) = send(
        &app,
        "POST",
        "/reviews",
        Some(json!({"userId": 1, "teacherId": 1, "subjectId": 2, "grade": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("does not teach"));
}

#[tokio::test]
async fn test_review_update_and_delete() {
    let app = create_test_app();
    seed(&app).await;
    let review = create_review(&app, 4).await;
    let uri = format!("/reviews/{}", review["id"]);

    let (status, updated) = send(&app, "PUT", &uri, Some(json!({"grade": 10}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["grade"], 10);
    assert_eq!(updated["comment"], "Solid course");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_search() {
    let app = create_test_app();
    seed(&app).await;
    create_review(&app, 3).await;
    create_review(&app, 9).await;

    let (status, found) = get(&app, "/reviews/search?teacherSurname=ivanov&minGrade=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);

    let (status, found) =
        get(&app, "/reviews/search?startDate=2024-03-01&endDate=2024-03-31").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 2);

    let (status, _) = get(&app, "/reviews/search?subjectName=History").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, "/reviews/search?minGrade=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == Error Cases ==

#[tokio::test]
async fn test_duplicate_username_conflict() {
    let app = create_test_app();
    send(&app, "POST", "/users", Some(json!({"username": "bob"}))).await;

    let (status, body) = send(&app, "POST", "/users", Some(json!({"username": "bob"}))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_invalid_ids_rejected() {
    let app = create_test_app();

    let (status, _) = get(&app, "/teachers/0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "DELETE", "/subjects/-4", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Subject ID must be a positive number");
}

#[tokio::test]
async fn test_missing_resources_not_found() {
    let app = create_test_app();

    let (status, body) = get(&app, "/users/username/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found with username: ghost");

    let (status, _) = get(&app, "/reviews/user/3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/teachers/1/subjects/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Cache Behaviour ==

#[tokio::test]
async fn test_repeated_reads_hit_cache() {
    let app = create_test_app();
    seed(&app).await;

    get(&app, "/teachers").await;
    get(&app, "/teachers").await;
    get(&app, "/teachers").await;

    let stats = cache_stats(&app).await;
    assert_eq!(stats["hits"], 2);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["totalEntries"], 1);
    assert!(stats["hitRate"].as_f64().unwrap() > 0.6);
}

#[tokio::test]
async fn test_teacher_update_clears_cache() {
    let app = create_test_app();
    seed(&app).await;
    get(&app, "/subjects").await;
    get(&app, "/teachers/1").await;
    assert_eq!(cache_stats(&app).await["totalEntries"], 2);

    let (status, _) = send(
        &app,
        "PUT",
        "/teachers/1",
        Some(json!({"surname": "Petrov", "name": "Ivan"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache_stats(&app).await["totalEntries"], 0);

    let (_, subject) = get(&app, "/subjects/1").await;
    assert_eq!(subject["teacherNames"][0], "Petrov Ivan");
}

#[tokio::test]
async fn test_review_create_keeps_unrelated_entries() {
    let app = create_test_app();
    seed(&app).await;
    get(&app, "/subjects/1").await;
    get(&app, "/reviews").await;
    assert_eq!(cache_stats(&app).await["totalEntries"], 2);

    let review = create_review(&app, 7).await;

    // allReviews dropped, subjectById kept, reviewById added
    assert_eq!(cache_stats(&app).await["totalEntries"], 2);

    let hits_before = cache_stats(&app).await["hits"].as_u64().unwrap();
    get(&app, "/subjects/1").await;
    get(&app, &format!("/reviews/{}", review["id"])).await;
    let (_, all) = get(&app, "/reviews").await;
    let hits_after = cache_stats(&app).await["hits"].as_u64().unwrap();

    assert_eq!(hits_after - hits_before, 2);
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_review_create_refreshes_cached_user() {
    let app = create_test_app();
    seed(&app).await;
    let (_, before) = get(&app, "/users/username/alice").await;
    assert!(before["reviews"].as_array().unwrap().is_empty());

    create_review(&app, 6).await;

    let (_, after) = get(&app, "/users/username/alice").await;
    assert_eq!(after["reviews"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cache_evicts_least_recently_used() {
    let app = create_app_with_capacity(2);

    get(&app, "/teachers").await;
    get(&app, "/subjects").await;
    get(&app, "/teachers").await;
    get(&app, "/users").await;

    let stats = cache_stats(&app).await;
    assert_eq!(stats["totalEntries"], 2);
    assert_eq!(stats["evictions"], 1);
    assert_eq!(stats["capacity"], 2);

    // "/subjects" was the eviction victim
    get(&app, "/teachers").await;
    get(&app, "/subjects").await;
    let stats = cache_stats(&app).await;
    assert_eq!(stats["hits"], 2);
    assert_eq!(stats["misses"], 4);
}

#[tokio::test]
async fn test_manual_cache_clear() {
    let app = create_test_app();
    get(&app, "/teachers").await;
    get(&app, "/users").await;

    let (status, body) = send(&app, "DELETE", "/cache", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dropped"], 2);
    let stats = cache_stats(&app).await;
    assert_eq!(stats["totalEntries"], 0);
    assert_eq!(stats["clears"], 1);
}
