use std::sync::Arc;

use tracing::{info, warn};

use super::{read_through, Mapper, SharedCache};
use crate::cache::keys::{ALL_TEACHERS, TEACHERS_BY_SUBJECT_NAME, TEACHER_BY_ID, TEACHER_BY_NAME};
use crate::cache::CacheKey;
use crate::error::{ApiError, Result};
use crate::models::{TeacherDto, TeacherRequest};
use crate::repository::{Repository, Teacher};

/// Teacher reads and writes. Every mutation clears the cache, since
/// teacher data is embedded in subject, review and user results.
#[derive(Clone)]
pub struct TeacherService {
    repo: Arc<Repository>,
    cache: SharedCache,
}

impl TeacherService {
    pub fn new(repo: Arc<Repository>, cache: SharedCache) -> Self {
        Self { repo, cache }
    }

    pub fn all(&self) -> Result<Vec<TeacherDto>> {
        read_through(&self.cache, CacheKey::new(ALL_TEACHERS), || {
            Ok(Mapper::new(&self.repo).teachers(&self.repo.all_teachers()))
        })
    }

    pub fn by_id(&self, id: i32) -> Result<TeacherDto> {
        read_through(&self.cache, CacheKey::new(TEACHER_BY_ID).arg(id), || {
            let teacher = self.find(id)?;
            Ok(Mapper::new(&self.repo).teacher(&teacher))
        })
    }

    pub fn by_full_name(&self, surname: &str, name: &str) -> Result<TeacherDto> {
        let key = CacheKey::new(TEACHER_BY_NAME).arg(surname).arg(name);
        read_through(&self.cache, key, || {
            let teacher = self
                .repo
                .teacher_by_full_name(surname, name)
                .ok_or_else(|| {
                    ApiError::not_found("Teacher", "full name", format!("{} {}", surname, name))
                })?;
            Ok(Mapper::new(&self.repo).teacher(&teacher))
        })
    }

    pub fn by_subject_name(&self, subject_name: &str) -> Result<Vec<TeacherDto>> {
        let key = CacheKey::new(TEACHERS_BY_SUBJECT_NAME).arg(subject_name);
        read_through(&self.cache, key, || {
            Ok(Mapper::new(&self.repo).teachers(&self.repo.teachers_by_subject_name(subject_name)))
        })
    }

    pub fn create(&self, req: &TeacherRequest) -> Result<TeacherDto> {
        let teacher = self
            .repo
            .insert_teacher(&req.surname, &req.name, req.patronym.as_deref());
        info!(id = teacher.id, "Teacher created");
        self.cache.clear();
        Ok(Mapper::new(&self.repo).teacher(&teacher))
    }

    pub fn update(&self, id: i32, req: &TeacherRequest) -> Result<TeacherDto> {
        let mut teacher = self.find(id)?;
        teacher.surname = req.surname.clone();
        teacher.name = req.name.clone();
        teacher.patronym = req.patronym.clone();
        self.save(&teacher)?;

        info!(id, "Teacher updated");
        self.cache.clear();
        Ok(Mapper::new(&self.repo).teacher(&teacher))
    }

    pub fn delete(&self, id: i32) -> Result<()> {
        if !self.repo.delete_teacher(id) {
            return Err(ApiError::not_found("Teacher", "id", id));
        }
        info!(id, "Teacher deleted");
        self.cache.clear();
        Ok(())
    }

    /// Links a subject to a teacher. Already linked is a no-op.
    pub fn assign_subject(&self, teacher_id: i32, subject_id: i32) -> Result<()> {
        let mut teacher = self.find(teacher_id)?;
        if self.repo.find_subject(subject_id).is_none() {
            return Err(ApiError::not_found("Subject", "id", subject_id));
        }

        if teacher.teaches(subject_id) {
            info!(teacher_id, subject_id, "Subject already assigned");
            return Ok(());
        }

        teacher.subject_ids.push(subject_id);
        self.save(&teacher)?;
        info!(teacher_id, subject_id, "Subject assigned to teacher");
        self.cache.clear();
        Ok(())
    }

    pub fn remove_subject(&self, teacher_id: i32, subject_id: i32) -> Result<()> {
        let mut teacher = self.find(teacher_id)?;
        if self.repo.find_subject(subject_id).is_none() {
            return Err(ApiError::not_found("Subject", "id", subject_id));
        }

        if !teacher.teaches(subject_id) {
            warn!(teacher_id, subject_id, "Subject is not assigned to teacher");
            return Err(ApiError::BadRequest(format!(
                "Teacher with id {} does not teach subject with id {}",
                teacher_id, subject_id
            )));
        }

        teacher.subject_ids.retain(|id| *id != subject_id);
        self.save(&teacher)?;
        info!(teacher_id, subject_id, "Subject removed from teacher");
        self.cache.clear();
        Ok(())
    }

    fn find(&self, id: i32) -> Result<Teacher> {
        self.repo
            .find_teacher(id)
            .ok_or_else(|| ApiError::not_found("Teacher", "id", id))
    }

    // Row may vanish between find and save under a concurrent delete
    fn save(&self, teacher: &Teacher) -> Result<()> {
        if self.repo.save_teacher(teacher) {
            Ok(())
        } else {
            Err(ApiError::not_found("Teacher", "id", teacher.id))
        }
    }
}
