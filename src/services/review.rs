use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info, warn};

use super::{read_through, Cacheable, Mapper, SharedCache};
use crate::cache::keys::{
    ALL_REVIEWS, ALL_USERS, REVIEWS_BY_TEACHER_ID, REVIEWS_BY_USERNAME, REVIEWS_BY_USER_ID,
    REVIEW_BY_ID, REVIEW_COUNTS, USER_BY_ID, USER_BY_USERNAME,
};
use crate::cache::CacheKey;
use crate::error::{ApiError, Result};
use crate::models::{ReviewDto, ReviewRequest, TeacherReviewCount};
use crate::repository::{NewReview, Repository, Review, ReviewFilter};

/// Review reads and writes. Mutations invalidate only the keys derived
/// from the review's teacher and author instead of clearing everything.
#[derive(Clone)]
pub struct ReviewService {
    repo: Arc<Repository>,
    cache: SharedCache,
}

impl ReviewService {
    pub fn new(repo: Arc<Repository>, cache: SharedCache) -> Self {
        Self { repo, cache }
    }

    pub fn create(&self, req: &ReviewRequest) -> Result<ReviewDto> {
        let (user_id, teacher_id, subject_id, grade) =
            match (req.user_id, req.teacher_id, req.subject_id, req.grade) {
                (Some(u), Some(t), Some(s), Some(g)) => (u, t, s, g),
                _ => {
                    return Err(ApiError::BadRequest(
                        "User ID, Teacher ID, Subject ID and grade are required".to_string(),
                    ))
                }
            };

        self.repo
            .find_user(user_id)
            .ok_or_else(|| ApiError::not_found("User", "id", user_id))?;
        let teacher = self
            .repo
            .find_teacher(teacher_id)
            .ok_or_else(|| ApiError::not_found("Teacher", "id", teacher_id))?;
        self.repo
            .find_subject(subject_id)
            .ok_or_else(|| ApiError::not_found("Subject", "id", subject_id))?;

        if !teacher.teaches(subject_id) {
            warn!(teacher_id, subject_id, "Review for a subject the teacher does not teach");
            return Err(ApiError::BadRequest(format!(
                "Teacher with id {} does not teach subject with id {}",
                teacher_id, subject_id
            )));
        }

        let review = self.repo.insert_review(NewReview {
            user_id,
            teacher_id,
            subject_id,
            date: req.date.unwrap_or_else(|| Local::now().date_naive()),
            grade,
            comment: req.comment.clone(),
        });
        info!(id = review.id, teacher_id, user_id, "Review created");

        let dto = Mapper::new(&self.repo).review(&review);
        self.invalidate_for(&review);
        self.cache
            .put(CacheKey::new(REVIEW_BY_ID).arg(review.id), dto.clone().into_cached());
        Ok(dto)
    }

    pub fn all(&self) -> Result<Vec<ReviewDto>> {
        read_through(&self.cache, CacheKey::new(ALL_REVIEWS), || {
            Ok(Mapper::new(&self.repo).reviews(&self.repo.all_reviews()))
        })
    }

    pub fn by_id(&self, id: i32) -> Result<ReviewDto> {
        read_through(&self.cache, CacheKey::new(REVIEW_BY_ID).arg(id), || {
            let review = self.find(id)?;
            Ok(Mapper::new(&self.repo).review(&review))
        })
    }

    pub fn by_teacher(&self, teacher_id: i32) -> Result<Vec<ReviewDto>> {
        let key = CacheKey::new(REVIEWS_BY_TEACHER_ID).arg(teacher_id);
        let reviews: Vec<ReviewDto> = read_through(&self.cache, key, || {
            Ok(Mapper::new(&self.repo).reviews(&self.repo.reviews_by_teacher(teacher_id)))
        })?;
        non_empty(reviews, || ApiError::not_found("Reviews", "teacher id", teacher_id))
    }

    pub fn by_user(&self, user_id: i32) -> Result<Vec<ReviewDto>> {
        let key = CacheKey::new(REVIEWS_BY_USER_ID).arg(user_id);
        let reviews: Vec<ReviewDto> = read_through(&self.cache, key, || {
            Ok(Mapper::new(&self.repo).reviews(&self.repo.reviews_by_user(user_id)))
        })?;
        non_empty(reviews, || ApiError::not_found("Reviews", "user id", user_id))
    }

    /// Lookup is case-insensitive, so the key uses the lowercased name.
    pub fn by_username(&self, username: &str) -> Result<Vec<ReviewDto>> {
        let key = username_key(REVIEWS_BY_USERNAME, username);
        let reviews: Vec<ReviewDto> = read_through(&self.cache, key, || {
            Ok(Mapper::new(&self.repo).reviews(&self.repo.reviews_by_username(username)))
        })?;
        non_empty(reviews, || ApiError::not_found("Reviews", "username", username))
    }

    pub fn counts_per_teacher(&self) -> Result<Vec<TeacherReviewCount>> {
        read_through(&self.cache, CacheKey::new(REVIEW_COUNTS), || {
            Ok(self
                .repo
                .review_counts_per_teacher()
                .into_iter()
                .map(|(surname, review_count)| TeacherReviewCount {
                    surname,
                    review_count,
                })
                .collect())
        })
    }

    /// Filtered search. Results are never cached.
    pub fn search(&self, filter: &ReviewFilter) -> Result<Vec<ReviewDto>> {
        debug!(?filter, "Searching reviews");
        let reviews = self.repo.search_reviews(filter);
        if reviews.is_empty() {
            return Err(ApiError::NotFound(
                "No reviews found matching the specified criteria".to_string(),
            ));
        }
        Ok(Mapper::new(&self.repo).reviews(&reviews))
    }

    /// Applies `date`, `grade` and `comment` when present. The row is only
    /// written, and the cache only touched, when a value changed.
    pub fn update(&self, id: i32, req: &ReviewRequest) -> Result<ReviewDto> {
        let mut review = self.find(id)?;
        let mut changed = false;

        if let Some(date) = req.date {
            changed |= review.date != date;
            review.date = date;
        }
        if let Some(grade) = req.grade {
            changed |= review.grade != grade;
            review.grade = grade;
        }
        if let Some(comment) = &req.comment {
            changed |= review.comment.as_ref() != Some(comment);
            review.comment = Some(comment.clone());
        }

        let mapper = Mapper::new(&self.repo);
        if !changed {
            debug!(id, "Review update without changes");
            return Ok(mapper.review(&review));
        }

        if !self.repo.save_review(&review) {
            return Err(ApiError::not_found("Review", "id", id));
        }
        info!(id, "Review updated");

        let dto = mapper.review(&review);
        self.invalidate_for(&review);
        self.cache
            .put(CacheKey::new(REVIEW_BY_ID).arg(id), dto.clone().into_cached());
        Ok(dto)
    }

    pub fn delete(&self, id: i32) -> Result<()> {
        let review = self.find(id)?;
        if !self.repo.delete_review(id) {
            return Err(ApiError::not_found("Review", "id", id));
        }
        info!(id, "Review deleted");

        self.invalidate_for(&review);
        self.cache.remove(CacheKey::new(REVIEW_BY_ID).arg(id).as_str());
        Ok(())
    }

    fn find(&self, id: i32) -> Result<Review> {
        self.repo
            .find_review(id)
            .ok_or_else(|| ApiError::not_found("Review", "id", id))
    }

    /// Removes every cached result that embeds this review.
    fn invalidate_for(&self, review: &Review) {
        let mut keys = vec![
            CacheKey::new(ALL_REVIEWS),
            CacheKey::new(REVIEW_COUNTS),
            CacheKey::new(REVIEWS_BY_TEACHER_ID).arg(review.teacher_id),
            CacheKey::new(REVIEWS_BY_USER_ID).arg(review.user_id),
            CacheKey::new(USER_BY_ID).arg(review.user_id),
            CacheKey::new(ALL_USERS),
        ];
        if let Some(user) = self.repo.find_user(review.user_id) {
            keys.push(username_key(REVIEWS_BY_USERNAME, &user.username));
            keys.push(CacheKey::new(USER_BY_USERNAME).arg(&user.username));
        }

        let removed = keys
            .iter()
            .filter(|key| self.cache.remove(key.as_str()))
            .count();
        debug!(review_id = review.id, removed, "Invalidated review cache keys");
    }
}

fn username_key(prefix: &str, username: &str) -> CacheKey {
    CacheKey::new(prefix).arg(username.to_lowercase())
}

// An empty list is cached like any other result, and reported as not found.
fn non_empty<T>(items: Vec<T>, not_found: impl FnOnce() -> ApiError) -> Result<Vec<T>> {
    if items.is_empty() {
        Err(not_found())
    } else {
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::BoundedCache;
    use chrono::NaiveDate;

    struct Fixture {
        service: ReviewService,
        repo: Arc<Repository>,
        user_id: i32,
        teacher_id: i32,
        subject_id: i32,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(Repository::new());
        let cache = Arc::new(BoundedCache::new(32).unwrap());
        let user = repo.insert_user("Alice");
        let subject = repo.insert_subject("Math");
        let mut teacher = repo.insert_teacher("Ivanov", "Ivan", None);
        teacher.subject_ids.push(subject.id);
        repo.save_teacher(&teacher);

        Fixture {
            service: ReviewService::new(repo.clone(), cache),
            repo,
            user_id: user.id,
            teacher_id: teacher.id,
            subject_id: subject.id,
        }
    }

    fn request(f: &Fixture, grade: i32) -> ReviewRequest {
        ReviewRequest {
            user_id: Some(f.user_id),
            teacher_id: Some(f.teacher_id),
            subject_id: Some(f.subject_id),
            grade: Some(grade),
            ..ReviewRequest::default()
        }
    }

    #[test]
    fn test_create_defaults_date_and_caches_by_id() {
        let f = fixture();
        let review = f.service.create(&request(&f, 8)).unwrap();

        assert_eq!(review.date, Local::now().date_naive());
        assert_eq!(review.author.as_deref(), Some("Alice"));
        assert_eq!(review.subject_name.as_deref(), Some("Math"));

        f.service.by_id(review.id).unwrap();
        assert_eq!(f.service.cache.stats().hits, 1);
    }

    #[test]
    fn test_create_rejects_untaught_subject() {
        let f = fixture();
        let other = f.repo.insert_subject("History");
        let req = ReviewRequest {
            subject_id: Some(other.id),
            ..request(&f, 5)
        };

        assert!(matches!(f.service.create(&req), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_create_missing_user() {
        let f = fixture();
        let req = ReviewRequest {
            user_id: Some(99),
            ..request(&f, 5)
        };

        let err = f.service.create(&req).unwrap_err();
        assert_eq!(err.to_string(), "User not found with id: 99");
    }

    #[test]
    fn test_create_invalidates_only_affected_keys() {
        let f = fixture();
        f.service.create(&request(&f, 7)).unwrap();
        f.service.all().unwrap();
        f.service.by_teacher(f.teacher_id).unwrap();
        f.service.by_username("alice").unwrap();
        f.service.counts_per_teacher().unwrap();
        f.service
            .cache
            .put("teacherById:1", crate::services::CachedValue::Teachers(Vec::new()));

        let second = f.service.create(&request(&f, 9)).unwrap();

        let cache = &f.service.cache;
        assert!(cache.get("allReviews").is_none());
        assert!(cache.get("reviewsByTeacherId:1").is_none());
        assert!(cache.get("reviewsByUsername:alice").is_none());
        assert!(cache.get("reviewCountsPerTeacherNative").is_none());
        assert!(cache.get("teacherById:1").is_some());
        assert!(cache.get(&format!("reviewById:{}", second.id)).is_some());
    }

    #[test]
    fn test_update_is_partial() {
        let f = fixture();
        let created = f.service.create(&request(&f, 4)).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        let updated = f
            .service
            .update(
                created.id,
                &ReviewRequest {
                    date: Some(date),
                    comment: Some("Clear lectures".to_string()),
                    ..ReviewRequest::default()
                },
            )
            .unwrap();

        assert_eq!(updated.grade, 4);
        assert_eq!(updated.date, date);
        assert_eq!(updated.comment.as_deref(), Some("Clear lectures"));
        assert_eq!(f.service.by_id(created.id).unwrap(), updated);
    }

    #[test]
    fn test_delete_removes_cached_review() {
        let f = fixture();
        let created = f.service.create(&request(&f, 6)).unwrap();
        f.service.by_user(f.user_id).unwrap();

        f.service.delete(created.id).unwrap();

        assert!(matches!(f.service.by_id(created.id), Err(ApiError::NotFound(_))));
        assert!(matches!(f.service.by_user(f.user_id), Err(ApiError::NotFound(_))));
        assert!(matches!(f.service.delete(created.id), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_counts_and_search() {
        let f = fixture();
        f.service.create(&request(&f, 3)).unwrap();
        f.service.create(&request(&f, 9)).unwrap();

        let counts = f.service.counts_per_teacher().unwrap();
        assert_eq!(
            counts,
            vec![TeacherReviewCount {
                surname: "Ivanov".to_string(),
                review_count: 2
            }]
        );

        let filter = ReviewFilter {
            min_grade: Some(5),
            ..ReviewFilter::default()
        };
        assert_eq!(f.service.search(&filter).unwrap().len(), 1);

        let filter = ReviewFilter {
            subject_name: Some("history".to_string()),
            ..ReviewFilter::default()
        };
        assert!(matches!(f.service.search(&filter), Err(ApiError::NotFound(_))));
    }
}
