//! API Handlers
//!
//! HTTP request handlers, grouped by resource. Handlers validate input and
//! delegate to the services, which own all caching.

mod reviews;
mod subjects;
mod teachers;
mod users;

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::cache::BoundedCache;
use crate::config::Config;
use crate::error::{ApiError, CacheError, Result};
use crate::models::{CacheStatsResponse, ClearResponse, HealthResponse};
use crate::repository::Repository;
use crate::services::{ReviewService, SharedCache, SubjectService, TeacherService, UserService};

pub use reviews::*;
pub use subjects::*;
pub use teachers::*;
pub use users::*;

/// Application state shared across all handlers.
///
/// The cache is held directly as well as through the services so the cache
/// endpoints and the sweep task can reach it.
#[derive(Clone)]
pub struct AppState {
    pub cache: SharedCache,
    pub teachers: TeacherService,
    pub subjects: SubjectService,
    pub users: UserService,
    pub reviews: ReviewService,
}

impl AppState {
    pub fn new(cache: SharedCache, repo: Arc<Repository>) -> Self {
        Self {
            teachers: TeacherService::new(repo.clone(), cache.clone()),
            subjects: SubjectService::new(repo.clone(), cache.clone()),
            users: UserService::new(repo.clone(), cache.clone()),
            reviews: ReviewService::new(repo, cache.clone()),
            cache,
        }
    }

    /// Builds the cache from configuration over an empty repository.
    ///
    /// Fails when `cache_max_size` is not a positive number.
    pub fn from_config(config: &Config) -> std::result::Result<Self, CacheError> {
        let cache = BoundedCache::from_max_size(config.cache_max_size)?;
        Ok(Self::new(Arc::new(cache), Arc::new(Repository::new())))
    }
}

// Path ids are 1-based
pub(crate) fn positive_id(id: i32, field: &str) -> Result<i32> {
    if id < 1 {
        return Err(ApiError::BadRequest(format!("{} must be positive", field)));
    }
    Ok(id)
}

pub(crate) fn check(validation: Option<String>) -> Result<()> {
    match validation {
        Some(message) => Err(ApiError::BadRequest(message)),
        None => Ok(()),
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(state.cache.stats().into())
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    Json(ClearResponse::new(state.cache.clear()))
}
