//! Stored rows for the four tables.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teacher {
    pub id: i32,
    pub surname: String,
    pub name: String,
    pub patronym: Option<String>,
    /// Subjects this teacher teaches, in assignment order
    pub subject_ids: Vec<i32>,
}

impl Teacher {
    /// "Surname Name Patronym", skipping a missing patronym.
    pub fn full_name(&self) -> String {
        match &self.patronym {
            Some(patronym) => format!("{} {} {}", self.surname, self.name, patronym),
            None => format!("{} {}", self.surname, self.name),
        }
    }

    pub fn teaches(&self, subject_id: i32) -> bool {
        self.subject_ids.contains(&subject_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: i32,
    pub user_id: i32,
    pub teacher_id: i32,
    pub subject_id: i32,
    pub date: NaiveDate,
    pub grade: i32,
    pub comment: Option<String>,
}

/// Column values for a review insert; the id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: i32,
    pub teacher_id: i32,
    pub subject_id: i32,
    pub date: NaiveDate,
    pub grade: i32,
    pub comment: Option<String>,
}

/// Optional filters for review search. `None` disables a filter.
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub teacher_surname: Option<String>,
    pub subject_name: Option<String>,
    pub min_grade: Option<i32>,
}
