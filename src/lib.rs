//! Course Reviewer - teacher review REST backend
//!
//! Serves teachers, subjects, users and reviews from an in-memory store,
//! fronted by a bounded LRU cache that is invalidated on writes and swept
//! on a schedule.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::BoundedCache;
pub use config::Config;
pub use tasks::spawn_sweep_task;
