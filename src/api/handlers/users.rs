use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{check, positive_id, AppState};
use crate::error::Result;
use crate::models::{UserDto, UserRequest};

/// Handler for GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserDto>>> {
    state.users.all().map(Json)
}

/// Handler for POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<UserRequest>,
) -> Result<(StatusCode, Json<UserDto>)> {
    check(req.validate())?;
    let user = state.users.create(&req)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for GET /users/:id
pub async fn get_user(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<UserDto>> {
    state.users.by_id(positive_id(id, "User ID")?).map(Json)
}

/// Handler for GET /users/username/:username
pub async fn user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserDto>> {
    state.users.by_username(&username).map(Json)
}

/// Handler for PUT /users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UserRequest>,
) -> Result<Json<UserDto>> {
    let id = positive_id(id, "User ID")?;
    check(req.validate())?;
    state.users.update(id, &req).map(Json)
}

/// Handler for DELETE /users/:id
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode> {
    state.users.delete(positive_id(id, "User ID")?)?;
    Ok(StatusCode::NO_CONTENT)
}
