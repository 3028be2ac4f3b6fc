//! API Routes
//!
//! Configures the Axum router with every review server endpoint.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::*;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .merge(teacher_routes())
        .merge(subject_routes())
        .merge(user_routes())
        .merge(review_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn teacher_routes() -> Router<AppState> {
    Router::new()
        .route("/teachers", get(list_teachers).post(create_teacher))
        .route(
            "/teachers/:id",
            get(get_teacher).put(update_teacher).delete(delete_teacher),
        )
        .route("/teachers/search/by-fullname", get(teacher_by_full_name))
        .route("/teachers/search/by-subject", get(teachers_by_subject))
        .route(
            "/teachers/:id/subjects/:subject_id",
            post(assign_subject).delete(remove_subject),
        )
}

fn subject_routes() -> Router<AppState> {
    Router::new()
        .route("/subjects", get(list_subjects).post(create_subject))
        .route(
            "/subjects/:id",
            get(get_subject).put(update_subject).delete(delete_subject),
        )
        .route("/subjects/name/:name", get(subject_by_name))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/username/:username", get(user_by_username))
}

fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(list_reviews).post(create_review))
        .route(
            "/reviews/:id",
            get(get_review).put(update_review).delete(delete_review),
        )
        .route("/reviews/teacher/:teacher_id", get(reviews_by_teacher))
        .route("/reviews/user/:user_id", get(reviews_by_user))
        .route("/reviews/username/:username", get(reviews_by_username))
        .route("/reviews/stats/teacher-counts", get(review_counts))
        .route("/reviews/search", get(search_reviews))
}
