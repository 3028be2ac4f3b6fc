use std::sync::Arc;

use tracing::{info, warn};

use super::{read_through, Mapper, SharedCache};
use crate::cache::keys::{ALL_USERS, USER_BY_ID, USER_BY_USERNAME};
use crate::cache::CacheKey;
use crate::error::{ApiError, Result};
use crate::models::{UserDto, UserRequest};
use crate::repository::Repository;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<Repository>,
    cache: SharedCache,
}

impl UserService {
    pub fn new(repo: Arc<Repository>, cache: SharedCache) -> Self {
        Self { repo, cache }
    }

    pub fn create(&self, req: &UserRequest) -> Result<UserDto> {
        self.ensure_username_free(&req.username)?;

        let user = self.repo.insert_user(&req.username);
        info!(id = user.id, username = %user.username, "User created");
        self.cache.clear();
        Ok(Mapper::new(&self.repo).user(&user))
    }

    pub fn all(&self) -> Result<Vec<UserDto>> {
        read_through(&self.cache, CacheKey::new(ALL_USERS), || {
            let mapper = Mapper::new(&self.repo);
            Ok(self.repo.all_users().iter().map(|u| mapper.user(u)).collect())
        })
    }

    pub fn by_id(&self, id: i32) -> Result<UserDto> {
        read_through(&self.cache, CacheKey::new(USER_BY_ID).arg(id), || {
            let user = self
                .repo
                .find_user(id)
                .ok_or_else(|| ApiError::not_found("User", "id", id))?;
            Ok(Mapper::new(&self.repo).user(&user))
        })
    }

    pub fn by_username(&self, username: &str) -> Result<UserDto> {
        let key = CacheKey::new(USER_BY_USERNAME).arg(username);
        read_through(&self.cache, key, || {
            let user = self
                .repo
                .user_by_username(username)
                .ok_or_else(|| ApiError::not_found("User", "username", username))?;
            Ok(Mapper::new(&self.repo).user(&user))
        })
    }

    pub fn update(&self, id: i32, req: &UserRequest) -> Result<UserDto> {
        let mut user = self
            .repo
            .find_user(id)
            .ok_or_else(|| ApiError::not_found("User", "id", id))?;

        if user.username != req.username {
            self.ensure_username_free(&req.username)?;
            user.username = req.username.clone();
            if !self.repo.save_user(&user) {
                return Err(ApiError::not_found("User", "id", id));
            }
            info!(id, "User updated");
            self.cache.clear();
        }

        Ok(Mapper::new(&self.repo).user(&user))
    }

    pub fn delete(&self, id: i32) -> Result<()> {
        if !self.repo.delete_user(id) {
            return Err(ApiError::not_found("User", "id", id));
        }
        info!(id, "User deleted");
        self.cache.clear();
        Ok(())
    }

    fn ensure_username_free(&self, username: &str) -> Result<()> {
        if self.repo.user_by_username(username).is_some() {
            warn!(username, "Username already taken");
            return Err(ApiError::Conflict(format!(
                "User with username '{}' already exists",
                username
            )));
        }
        Ok(())
    }
}
