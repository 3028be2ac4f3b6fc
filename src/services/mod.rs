//! Services Module
//!
//! Read paths go through the cache (`get`, then fetch and `put` on a miss).
//! Write paths invalidate: teacher, subject and user mutations clear the
//! whole cache, review mutations remove exactly the keys they affect.

mod mapper;
mod review;
mod subject;
mod teacher;
mod user;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{BoundedCache, CacheKey};
use crate::error::Result;
use crate::models::{ReviewDto, SubjectDto, TeacherDto, TeacherReviewCount, UserDto};

pub use mapper::Mapper;
pub use review::ReviewService;
pub use subject::SubjectService;
pub use teacher::TeacherService;
pub use user::UserService;

// == Cached Value ==
/// Every result shape the services keep in the cache.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Teacher(TeacherDto),
    Teachers(Vec<TeacherDto>),
    Subject(SubjectDto),
    Subjects(Vec<SubjectDto>),
    User(UserDto),
    Users(Vec<UserDto>),
    Review(ReviewDto),
    Reviews(Vec<ReviewDto>),
    TeacherCounts(Vec<TeacherReviewCount>),
}

/// Cache shared by every service and the sweep task.
pub type SharedCache = Arc<BoundedCache<CachedValue>>;

/// Conversion between a service result and its [`CachedValue`] variant.
pub trait Cacheable: Sized {
    fn into_cached(self) -> CachedValue;

    /// Returns `None` when the entry holds a different shape.
    fn from_cached(value: &CachedValue) -> Option<Self>;
}

macro_rules! impl_cacheable {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Cacheable for $ty {
                fn into_cached(self) -> CachedValue {
                    CachedValue::$variant(self)
                }

                fn from_cached(value: &CachedValue) -> Option<Self> {
                    match value {
                        CachedValue::$variant(inner) => Some(inner.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_cacheable! {
    TeacherDto => Teacher,
    Vec<TeacherDto> => Teachers,
    SubjectDto => Subject,
    Vec<SubjectDto> => Subjects,
    UserDto => User,
    Vec<UserDto> => Users,
    ReviewDto => Review,
    Vec<ReviewDto> => Reviews,
    Vec<TeacherReviewCount> => TeacherCounts,
}

/// Returns the cached value for `key`, or runs `fetch`, caches its result
/// and returns it. Errors from `fetch` are not cached. An entry of another
/// shape counts as a miss and is overwritten.
pub(crate) fn read_through<T, F>(cache: &BoundedCache<CachedValue>, key: CacheKey, fetch: F) -> Result<T>
where
    T: Cacheable + Clone,
    F: FnOnce() -> Result<T>,
{
    if let Some(value) = cache.get_map(key.as_str(), T::from_cached) {
        debug!(key = %key, "Cache HIT");
        return Ok(value);
    }

    debug!(key = %key, "Cache MISS, fetching from repository");
    let value = fetch().map_err(|err| {
        warn!(key = %key, error = %err, "Lookup failed, nothing cached");
        err
    })?;
    cache.put(key, value.clone().into_cached());
    Ok(value)
}
