//! Request DTOs for the review API
//!
//! Defines incoming HTTP bodies and query strings. Each `validate` returns an
//! error message if validation fails, `None` if the input is acceptable.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::repository::ReviewFilter;

/// Longest accepted surname, name or patronym
pub const MAX_NAME_LENGTH: usize = 50;

/// Accepted grade range, inclusive
pub const MIN_GRADE: i32 = 1;
pub const MAX_GRADE: i32 = 10;

fn require_text(value: &str, field: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{} cannot be blank", field));
    }
    if value.chars().count() > MAX_NAME_LENGTH {
        return Some(format!(
            "{} exceeds maximum length of {} characters",
            field, MAX_NAME_LENGTH
        ));
    }
    None
}

fn check_grade(grade: i32) -> Option<String> {
    if !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
        return Some(format!(
            "Grade must be between {} and {}",
            MIN_GRADE, MAX_GRADE
        ));
    }
    None
}

/// Body for creating or updating a teacher (POST/PUT /teachers)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherRequest {
    pub surname: String,
    pub name: String,
    #[serde(default)]
    pub patronym: Option<String>,
}

impl TeacherRequest {
    pub fn validate(&self) -> Option<String> {
        require_text(&self.surname, "Surname")
            .or_else(|| require_text(&self.name, "Name"))
            .or_else(|| {
                self.patronym
                    .as_deref()
                    .and_then(|p| require_text(p, "Patronym"))
            })
    }
}

/// Body for creating or updating a subject (POST/PUT /subjects)
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectRequest {
    pub name: String,
}

impl SubjectRequest {
    pub fn validate(&self) -> Option<String> {
        require_text(&self.name, "Subject name")
    }
}

/// Body for creating or updating a user (POST/PUT /users)
#[derive(Debug, Clone, Deserialize)]
pub struct UserRequest {
    pub username: String,
}

impl UserRequest {
    pub fn validate(&self) -> Option<String> {
        require_text(&self.username, "Username")
    }
}

/// Body for creating or updating a review (POST/PUT /reviews)
///
/// Creation needs the three ids and a grade. Updates only apply `date`,
/// `grade` and `comment`, each when present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[serde(default)]
    pub user_id: Option<i32>,
    #[serde(default)]
    pub teacher_id: Option<i32>,
    #[serde(default)]
    pub subject_id: Option<i32>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub grade: Option<i32>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ReviewRequest {
    pub fn validate_create(&self) -> Option<String> {
        for (value, field) in [
            (self.user_id, "User ID"),
            (self.teacher_id, "Teacher ID"),
            (self.subject_id, "Subject ID"),
        ] {
            match value {
                None => return Some(format!("{} is required", field)),
                Some(id) if id < 1 => return Some(format!("{} must be positive", field)),
                Some(_) => {}
            }
        }
        match self.grade {
            None => Some("Grade is required".to_string()),
            Some(grade) => check_grade(grade),
        }
    }

    pub fn validate_update(&self) -> Option<String> {
        self.grade.and_then(check_grade)
    }
}

/// Query for GET /teachers/search/by-fullname
#[derive(Debug, Clone, Deserialize)]
pub struct FullNameQuery {
    pub surname: String,
    pub name: String,
}

impl FullNameQuery {
    pub fn validate(&self) -> Option<String> {
        require_text(&self.surname, "Surname").or_else(|| require_text(&self.name, "Name"))
    }
}

/// Query for GET /teachers/search/by-subject
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectNameQuery {
    pub subject_name: String,
}

/// Query for GET /reviews/search; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSearchQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub teacher_surname: Option<String>,
    pub subject_name: Option<String>,
    pub min_grade: Option<i32>,
}

impl ReviewSearchQuery {
    pub fn validate(&self) -> Option<String> {
        match self.min_grade {
            Some(grade) if grade < MIN_GRADE => {
                Some(format!("Minimum grade must be at least {}", MIN_GRADE))
            }
            _ => None,
        }
    }
}

impl From<ReviewSearchQuery> for ReviewFilter {
    fn from(query: ReviewSearchQuery) -> Self {
        ReviewFilter {
            start_date: query.start_date,
            end_date: query.end_date,
            teacher_surname: query.teacher_surname,
            subject_name: query.subject_name,
            min_grade: query.min_grade,
        }
    }
}
