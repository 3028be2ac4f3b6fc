use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{check, positive_id, AppState};
use crate::error::{ApiError, Result};
use crate::models::{FullNameQuery, SubjectNameQuery, TeacherDto, TeacherRequest};

/// Handler for GET /teachers
pub async fn list_teachers(State(state): State<AppState>) -> Result<Json<Vec<TeacherDto>>> {
    state.teachers.all().map(Json)
}

/// Handler for POST /teachers
pub async fn create_teacher(
    State(state): State<AppState>,
    Json(req): Json<TeacherRequest>,
) -> Result<(StatusCode, Json<TeacherDto>)> {
    check(req.validate())?;
    let teacher = state.teachers.create(&req)?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

/// Handler for GET /teachers/:id
pub async fn get_teacher(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TeacherDto>> {
    state.teachers.by_id(positive_id(id, "Teacher ID")?).map(Json)
}

/// Handler for PUT /teachers/:id
pub async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<TeacherRequest>,
) -> Result<Json<TeacherDto>> {
    let id = positive_id(id, "Teacher ID")?;
    check(req.validate())?;
    state.teachers.update(id, &req).map(Json)
}

/// Handler for DELETE /teachers/:id
pub async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    state.teachers.delete(positive_id(id, "Teacher ID")?)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /teachers/search/by-fullname?surname=..&name=..
pub async fn teacher_by_full_name(
    State(state): State<AppState>,
    Query(query): Query<FullNameQuery>,
) -> Result<Json<TeacherDto>> {
    check(query.validate())?;
    state
        .teachers
        .by_full_name(&query.surname, &query.name)
        .map(Json)
}

/// Handler for GET /teachers/search/by-subject?subjectName=..
pub async fn teachers_by_subject(
    State(state): State<AppState>,
    Query(query): Query<SubjectNameQuery>,
) -> Result<Json<Vec<TeacherDto>>> {
    if query.subject_name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Subject name cannot be blank".to_string(),
        ));
    }
    state.teachers.by_subject_name(&query.subject_name).map(Json)
}

/// Handler for POST /teachers/:id/subjects/:subject_id
pub async fn assign_subject(
    State(state): State<AppState>,
    Path((teacher_id, subject_id)): Path<(i32, i32)>,
) -> Result<StatusCode> {
    state.teachers.assign_subject(
        positive_id(teacher_id, "Teacher ID")?,
        positive_id(subject_id, "Subject ID")?,
    )?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /teachers/:id/subjects/:subject_id
pub async fn remove_subject(
    State(state): State<AppState>,
    Path((teacher_id, subject_id)): Path<(i32, i32)>,
) -> Result<StatusCode> {
    state.teachers.remove_subject(
        positive_id(teacher_id, "Teacher ID")?,
        positive_id(subject_id, "Subject ID")?,
    )?;
    Ok(StatusCode::NO_CONTENT)
}
