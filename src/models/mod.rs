//! Request and Response models for the review API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    FullNameQuery, ReviewRequest, ReviewSearchQuery, SubjectNameQuery, SubjectRequest,
    TeacherRequest, UserRequest,
};
pub use responses::{
    CacheStatsResponse, ClearResponse, ErrorResponse, HealthResponse, ReviewDto, SubjectDto,
    TeacherDto, TeacherReviewCount, UserDto,
};
