use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{check, positive_id, AppState};
use crate::error::Result;
use crate::models::{SubjectDto, SubjectRequest};

/// Handler for GET /subjects
pub async fn list_subjects(State(state): State<AppState>) -> Result<Json<Vec<SubjectDto>>> {
    state.subjects.all().map(Json)
}

/// Handler for POST /subjects
pub async fn create_subject(
    State(state): State<AppState>,
    Json(req): Json<SubjectRequest>,
) -> Result<(StatusCode, Json<SubjectDto>)> {
    check(req.validate())?;
    let subject = state.subjects.create(&req)?;
    Ok((StatusCode::CREATED, Json(subject)))
}

/// Handler for GET /subjects/:id
pub async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SubjectDto>> {
    state.subjects.by_id(positive_id(id, "Subject ID")?).map(Json)
}

/// Handler for GET /subjects/name/:name
pub async fn subject_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SubjectDto>> {
    state.subjects.by_name(&name).map(Json)
}

/// Handler for PUT /subjects/:id
pub async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<SubjectRequest>,
) -> Result<Json<SubjectDto>> {
    let id = positive_id(id, "Subject ID")?;
    check(req.validate())?;
    state.subjects.update(id, &req).map(Json)
}

/// Handler for DELETE /subjects/:id
///
/// Non-positive ids are rejected by the service itself.
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    state.subjects.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::tests::test_state;
    use crate::error::ApiError;

    #[tokio::test]
    async fn test_subject_crud() {
        let state = test_state();
        let req = SubjectRequest {
            name: "Math".to_string(),
        };

        let (_, created) = create_subject(State(state.clone()), Json(req))
            .await
            .unwrap();
        let by_name = subject_by_name(State(state.clone()), Path("Math".to_string()))
            .await
            .unwrap();
        assert_eq!(by_name.id, created.id);

        let renamed = update_subject(
            State(state.clone()),
            Path(created.id),
            Json(SubjectRequest {
                name: "Algebra".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(renamed.name, "Algebra");

        let list = list_subjects(State(state)).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Algebra");
    }

    #[tokio::test]
    async fn test_delete_subject_negative_id() {
        let state = test_state();
        let result = delete_subject(State(state), Path(-1)).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
