use std::sync::Arc;

use tracing::{info, warn};

use super::{read_through, Mapper, SharedCache};
use crate::cache::keys::{ALL_SUBJECTS, SUBJECT_BY_ID, SUBJECT_BY_NAME};
use crate::cache::CacheKey;
use crate::error::{ApiError, Result};
use crate::models::{SubjectDto, SubjectRequest};
use crate::repository::Repository;

#[derive(Clone)]
pub struct SubjectService {
    repo: Arc<Repository>,
    cache: SharedCache,
}

impl SubjectService {
    pub fn new(repo: Arc<Repository>, cache: SharedCache) -> Self {
        Self { repo, cache }
    }

    pub fn create(&self, req: &SubjectRequest) -> Result<SubjectDto> {
        let subject = self.repo.insert_subject(&req.name);
        info!(id = subject.id, name = %subject.name, "Subject created");
        self.cache.clear();
        Ok(Mapper::new(&self.repo).subject(&subject))
    }

    pub fn all(&self) -> Result<Vec<SubjectDto>> {
        read_through(&self.cache, CacheKey::new(ALL_SUBJECTS), || {
            let mapper = Mapper::new(&self.repo);
            Ok(self
                .repo
                .all_subjects()
                .iter()
                .map(|s| mapper.subject(s))
                .collect())
        })
    }

    pub fn by_id(&self, id: i32) -> Result<SubjectDto> {
        read_through(&self.cache, CacheKey::new(SUBJECT_BY_ID).arg(id), || {
            let subject = self
                .repo
                .find_subject(id)
                .ok_or_else(|| ApiError::not_found("Subject", "id", id))?;
            Ok(Mapper::new(&self.repo).subject(&subject))
        })
    }

    pub fn by_name(&self, name: &str) -> Result<SubjectDto> {
        read_through(&self.cache, CacheKey::new(SUBJECT_BY_NAME).arg(name), || {
            let subject = self
                .repo
                .subject_by_name(name)
                .ok_or_else(|| ApiError::not_found("Subject", "name", name))?;
            Ok(Mapper::new(&self.repo).subject(&subject))
        })
    }

    pub fn update(&self, id: i32, req: &SubjectRequest) -> Result<SubjectDto> {
        let mut subject = self
            .repo
            .find_subject(id)
            .ok_or_else(|| ApiError::not_found("Subject", "id", id))?;
        subject.name = req.name.clone();
        if !self.repo.save_subject(&subject) {
            return Err(ApiError::not_found("Subject", "id", id));
        }

        info!(id, "Subject updated");
        self.cache.clear();
        Ok(Mapper::new(&self.repo).subject(&subject))
    }

    /// Deletes the subject, detaches it from its teachers and drops its
    /// reviews.
    pub fn delete(&self, id: i32) -> Result<()> {
        if id <= 0 {
            warn!(id, "Rejected subject delete with non-positive id");
            return Err(ApiError::BadRequest(
                "Subject ID must be a positive number".to_string(),
            ));
        }
        if !self.repo.delete_subject(id) {
            return Err(ApiError::not_found("Subject", "id", id));
        }

        info!(id, "Subject deleted");
        self.cache.clear();
        Ok(())
    }
}
