//! Entity to DTO mapping. Joins are resolved against the repository.

use crate::models::{ReviewDto, SubjectDto, TeacherDto, UserDto};
use crate::repository::{Repository, Review, Subject, Teacher, User};

pub struct Mapper<'a> {
    repo: &'a Repository,
}

impl<'a> Mapper<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self { repo }
    }

    pub fn teacher(&self, teacher: &Teacher) -> TeacherDto {
        TeacherDto {
            id: teacher.id,
            surname: teacher.surname.clone(),
            name: teacher.name.clone(),
            patronym: teacher.patronym.clone(),
            subjects: teacher
                .subject_ids
                .iter()
                .filter_map(|id| self.repo.find_subject(*id))
                .map(|s| s.name)
                .collect(),
        }
    }

    pub fn teachers(&self, teachers: &[Teacher]) -> Vec<TeacherDto> {
        teachers.iter().map(|t| self.teacher(t)).collect()
    }

    pub fn subject(&self, subject: &Subject) -> SubjectDto {
        SubjectDto {
            id: subject.id,
            name: subject.name.clone(),
            teacher_names: self
                .repo
                .teachers_of_subject(subject.id)
                .iter()
                .map(Teacher::full_name)
                .collect(),
        }
    }

    pub fn review(&self, review: &Review) -> ReviewDto {
        ReviewDto {
            id: review.id,
            author: self.repo.find_user(review.user_id).map(|u| u.username),
            teacher: self
                .repo
                .find_teacher(review.teacher_id)
                .map(|t| self.teacher(&t)),
            subject_name: self.repo.find_subject(review.subject_id).map(|s| s.name),
            date: review.date,
            grade: review.grade,
            comment: review.comment.clone(),
        }
    }

    pub fn reviews(&self, reviews: &[Review]) -> Vec<ReviewDto> {
        reviews.iter().map(|r| self.review(r)).collect()
    }

    pub fn user(&self, user: &User) -> UserDto {
        UserDto {
            id: user.id,
            username: user.username.clone(),
            reviews: self.reviews(&self.repo.reviews_by_user(user.id)),
        }
    }
}
