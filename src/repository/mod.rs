//! Repository Module
//!
//! In-memory relational store standing in for the database. Tables are
//! ordered maps keyed by auto-increment ids behind one `RwLock`, so every
//! method sees a consistent snapshot.

mod entities;

use std::collections::BTreeMap;

use parking_lot::RwLock;

pub use entities::{NewReview, Review, ReviewFilter, Subject, Teacher, User};

#[derive(Debug, Default)]
struct Tables {
    teachers: BTreeMap<i32, Teacher>,
    subjects: BTreeMap<i32, Subject>,
    users: BTreeMap<i32, User>,
    reviews: BTreeMap<i32, Review>,
    next_teacher_id: i32,
    next_subject_id: i32,
    next_user_id: i32,
    next_review_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

// == Repository ==
/// Backing store for teachers, subjects, users and reviews.
#[derive(Debug, Default)]
pub struct Repository {
    tables: RwLock<Tables>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    // == Teachers ==
    pub fn insert_teacher(&self, surname: &str, name: &str, patronym: Option<&str>) -> Teacher {
        let mut tables = self.tables.write();
        let teacher = Teacher {
            id: next_id(&mut tables.next_teacher_id),
            surname: surname.to_string(),
            name: name.to_string(),
            patronym: patronym.map(str::to_string),
            subject_ids: Vec::new(),
        };
        tables.teachers.insert(teacher.id, teacher.clone());
        teacher
    }

    /// Overwrites an existing teacher row. Returns false if the id is unknown.
    pub fn save_teacher(&self, teacher: &Teacher) -> bool {
        let mut tables = self.tables.write();
        match tables.teachers.get_mut(&teacher.id) {
            Some(row) => {
                *row = teacher.clone();
                true
            }
            None => false,
        }
    }

    pub fn find_teacher(&self, id: i32) -> Option<Teacher> {
        self.tables.read().teachers.get(&id).cloned()
    }

    pub fn all_teachers(&self) -> Vec<Teacher> {
        self.tables.read().teachers.values().cloned().collect()
    }

    pub fn teacher_by_full_name(&self, surname: &str, name: &str) -> Option<Teacher> {
        self.tables
            .read()
            .teachers
            .values()
            .find(|t| t.surname == surname && t.name == name)
            .cloned()
    }

    pub fn teachers_by_subject_name(&self, subject_name: &str) -> Vec<Teacher> {
        let tables = self.tables.read();
        let subject_ids: Vec<i32> = tables
            .subjects
            .values()
            .filter(|s| eq_ignore_case(&s.name, subject_name))
            .map(|s| s.id)
            .collect();

        let teachers = tables
            .teachers
            .values()
            .filter(|t| t.subject_ids.iter().any(|id| subject_ids.contains(id)))
            .cloned()
            .collect();
        teachers
    }

    /// Teachers assigned to a subject, in id order.
    pub fn teachers_of_subject(&self, subject_id: i32) -> Vec<Teacher> {
        self.tables
            .read()
            .teachers
            .values()
            .filter(|t| t.teaches(subject_id))
            .cloned()
            .collect()
    }

    /// Deletes a teacher and the reviews written about them.
    pub fn delete_teacher(&self, id: i32) -> bool {
        let mut tables = self.tables.write();
        if tables.teachers.remove(&id).is_none() {
            return false;
        }
        tables.reviews.retain(|_, r| r.teacher_id != id);
        true
    }

    // == Subjects ==
    pub fn insert_subject(&self, name: &str) -> Subject {
        let mut tables = self.tables.write();
        let subject = Subject {
            id: next_id(&mut tables.next_subject_id),
            name: name.to_string(),
        };
        tables.subjects.insert(subject.id, subject.clone());
        subject
    }

    pub fn save_subject(&self, subject: &Subject) -> bool {
        let mut tables = self.tables.write();
        match tables.subjects.get_mut(&subject.id) {
            Some(row) => {
                *row = subject.clone();
                true
            }
            None => false,
        }
    }

    pub fn find_subject(&self, id: i32) -> Option<Subject> {
        self.tables.read().subjects.get(&id).cloned()
    }

    pub fn all_subjects(&self) -> Vec<Subject> {
        self.tables.read().subjects.values().cloned().collect()
    }

    pub fn subject_by_name(&self, name: &str) -> Option<Subject> {
        self.tables
            .read()
            .subjects
            .values()
            .find(|s| s.name == name)
            .cloned()
    }

    /// Detaches the subject from every teacher, deletes its reviews, then
    /// deletes the subject itself.
    pub fn delete_subject(&self, id: i32) -> bool {
        let mut tables = self.tables.write();
        if tables.subjects.remove(&id).is_none() {
            return false;
        }
        for teacher in tables.teachers.values_mut() {
            teacher.subject_ids.retain(|&s| s != id);
        }
        tables.reviews.retain(|_, r| r.subject_id != id);
        true
    }

    // == Users ==
    pub fn insert_user(&self, username: &str) -> User {
        let mut tables = self.tables.write();
        let user = User {
            id: next_id(&mut tables.next_user_id),
            username: username.to_string(),
        };
        tables.users.insert(user.id, user.clone());
        user
    }

    pub fn save_user(&self, user: &User) -> bool {
        let mut tables = self.tables.write();
        match tables.users.get_mut(&user.id) {
            Some(row) => {
                *row = user.clone();
                true
            }
            None => false,
        }
    }

    pub fn find_user(&self, id: i32) -> Option<User> {
        self.tables.read().users.get(&id).cloned()
    }

    pub fn all_users(&self) -> Vec<User> {
        self.tables.read().users.values().cloned().collect()
    }

    pub fn user_by_username(&self, username: &str) -> Option<User> {
        self.tables
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    /// Deletes a user and the reviews they wrote.
    pub fn delete_user(&self, id: i32) -> bool {
        let mut tables = self.tables.write();
        if tables.users.remove(&id).is_none() {
            return false;
        }
        tables.reviews.retain(|_, r| r.user_id != id);
        true
    }

    // == Reviews ==
    pub fn insert_review(&self, new: NewReview) -> Review {
        let mut tables = self.tables.write();
        let review = Review {
            id: next_id(&mut tables.next_review_id),
            user_id: new.user_id,
            teacher_id: new.teacher_id,
            subject_id: new.subject_id,
            date: new.date,
            grade: new.grade,
            comment: new.comment,
        };
        tables.reviews.insert(review.id, review.clone());
        review
    }

    pub fn save_review(&self, review: &Review) -> bool {
        let mut tables = self.tables.write();
        match tables.reviews.get_mut(&review.id) {
            Some(row) => {
                *row = review.clone();
                true
            }
            None => false,
        }
    }

    pub fn find_review(&self, id: i32) -> Option<Review> {
        self.tables.read().reviews.get(&id).cloned()
    }

    pub fn all_reviews(&self) -> Vec<Review> {
        self.tables.read().reviews.values().cloned().collect()
    }

    pub fn delete_review(&self, id: i32) -> bool {
        self.tables.write().reviews.remove(&id).is_some()
    }

    pub fn reviews_by_teacher(&self, teacher_id: i32) -> Vec<Review> {
        self.filter_reviews(|r| r.teacher_id == teacher_id)
    }

    pub fn reviews_by_user(&self, user_id: i32) -> Vec<Review> {
        self.filter_reviews(|r| r.user_id == user_id)
    }

    /// Reviews written by a username, compared case-insensitively.
    pub fn reviews_by_username(&self, username: &str) -> Vec<Review> {
        let tables = self.tables.read();
        let user_ids: Vec<i32> = tables
            .users
            .values()
            .filter(|u| eq_ignore_case(&u.username, username))
            .map(|u| u.id)
            .collect();

        let reviews = tables
            .reviews
            .values()
            .filter(|r| user_ids.contains(&r.user_id))
            .cloned()
            .collect();
        reviews
    }

    /// `(surname, review count)` for every reviewed teacher, most reviewed
    /// first. Equal counts keep teacher id order.
    pub fn review_counts_per_teacher(&self) -> Vec<(String, u64)> {
        let tables = self.tables.read();
        let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
        for review in tables.reviews.values() {
            *counts.entry(review.teacher_id).or_default() += 1;
        }

        let mut rows: Vec<(String, u64)> = counts
            .into_iter()
            .filter_map(|(teacher_id, count)| {
                tables
                    .teachers
                    .get(&teacher_id)
                    .map(|t| (t.surname.clone(), count))
            })
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows
    }

    /// Reviews matching every present filter. Surname and subject name are
    /// compared case-insensitively; date bounds are inclusive.
    pub fn search_reviews(&self, filter: &ReviewFilter) -> Vec<Review> {
        let tables = self.tables.read();
        let found = tables
            .reviews
            .values()
            .filter(|r| filter.start_date.map_or(true, |d| r.date >= d))
            .filter(|r| filter.end_date.map_or(true, |d| r.date <= d))
            .filter(|r| filter.min_grade.map_or(true, |g| r.grade >= g))
            .filter(|r| match &filter.teacher_surname {
                Some(surname) => tables
                    .teachers
                    .get(&r.teacher_id)
                    .is_some_and(|t| eq_ignore_case(&t.surname, surname)),
                None => true,
            })
            .filter(|r| match &filter.subject_name {
                Some(name) => tables
                    .subjects
                    .get(&r.subject_id)
                    .is_some_and(|s| eq_ignore_case(&s.name, name)),
                None => true,
            })
            .cloned()
            .collect();
        found
    }

    fn filter_reviews(&self, predicate: impl Fn(&Review) -> bool) -> Vec<Review> {
        self.tables
            .read()
            .reviews
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }
}
