use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{check, positive_id, AppState};
use crate::error::Result;
use crate::models::{ReviewDto, ReviewRequest, ReviewSearchQuery, TeacherReviewCount};

/// Handler for GET /reviews
pub async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<ReviewDto>>> {
    state.reviews.all().map(Json)
}

/// Handler for POST /reviews
pub async fn create_review(
    State(state): State<AppState>,
    Json(req): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<ReviewDto>)> {
    check(req.validate_create())?;
    let review = state.reviews.create(&req)?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Handler for GET /reviews/:id
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ReviewDto>> {
    state.reviews.by_id(positive_id(id, "Review ID")?).map(Json)
}

/// Handler for PUT /reviews/:id
pub async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<ReviewDto>> {
    let id = positive_id(id, "Review ID")?;
    check(req.validate_update())?;
    state.reviews.update(id, &req).map(Json)
}

/// Handler for DELETE /reviews/:id
pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    state.reviews.delete(positive_id(id, "Review ID")?)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /reviews/teacher/:teacher_id
pub async fn reviews_by_teacher(
    State(state): State<AppState>,
    Path(teacher_id): Path<i32>,
) -> Result<Json<Vec<ReviewDto>>> {
    state
        .reviews
        .by_teacher(positive_id(teacher_id, "Teacher ID")?)
        .map(Json)
}

/// Handler for GET /reviews/user/:user_id
pub async fn reviews_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<ReviewDto>>> {
    state
        .reviews
        .by_user(positive_id(user_id, "User ID")?)
        .map(Json)
}

/// Handler for GET /reviews/username/:username
pub async fn reviews_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<ReviewDto>>> {
    state.reviews.by_username(&username).map(Json)
}

/// Handler for GET /reviews/stats/teacher-counts
pub async fn review_counts(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeacherReviewCount>>> {
    state.reviews.counts_per_teacher().map(Json)
}

/// Handler for GET /reviews/search
pub async fn search_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewSearchQuery>,
) -> Result<Json<Vec<ReviewDto>>> {
    check(query.validate())?;
    state.reviews.search(&query.into()).map(Json)
}
