//! Cache key construction.
//!
//! Keys are `prefix:param1:param2:...`; absent parameters render as the
//! literal `null`. The cache itself only compares keys for equality.

use std::fmt;

/// Separator placed between the prefix and each parameter.
pub const KEY_SEPARATOR: char = ':';

/// Token written for an absent parameter.
pub const NULL_TOKEN: &str = "null";

// == Key Prefixes ==
pub const ALL_TEACHERS: &str = "allTeachers";
pub const TEACHER_BY_ID: &str = "teacherById";
pub const TEACHER_BY_NAME: &str = "teacherByName";
pub const TEACHERS_BY_SUBJECT_NAME: &str = "teachersBySubjectName";

pub const ALL_SUBJECTS: &str = "allSubjects";
pub const SUBJECT_BY_ID: &str = "subjectById";
pub const SUBJECT_BY_NAME: &str = "subjectByName";

pub const ALL_USERS: &str = "allUsers";
pub const USER_BY_ID: &str = "userById";
pub const USER_BY_USERNAME: &str = "userByUsername";

pub const ALL_REVIEWS: &str = "allReviews";
pub const REVIEW_BY_ID: &str = "reviewById";
pub const REVIEWS_BY_TEACHER_ID: &str = "reviewsByTeacherId";
pub const REVIEWS_BY_USER_ID: &str = "reviewsByUserId";
pub const REVIEWS_BY_USERNAME: &str = "reviewsByUsername";
pub const REVIEW_COUNTS: &str = "reviewCountsPerTeacherNative";

// == Cache Key ==
/// Composite cache key built from a prefix and ordered parameters.
///
/// # Examples
///
/// ```
/// use course_reviewer::cache::CacheKey;
///
/// let key = CacheKey::new("teacherByName").arg("Ivanov").opt_arg(None::<&str>);
/// assert_eq!(key.as_str(), "teacherByName:Ivanov:null");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(prefix: &str) -> Self {
        Self(prefix.to_string())
    }

    /// Appends a present parameter. `:` and `%` inside the parameter are
    /// percent-escaped, so distinct parameter lists never share a key.
    pub fn arg(mut self, param: impl fmt::Display) -> Self {
        self.0.push(KEY_SEPARATOR);
        for c in param.to_string().chars() {
            match c {
                KEY_SEPARATOR => self.0.push_str("%3A"),
                '%' => self.0.push_str("%25"),
                c => self.0.push(c),
            }
        }
        self
    }

    /// Appends a parameter that may be absent.
    pub fn opt_arg<T: fmt::Display>(self, param: Option<T>) -> Self {
        match param {
            Some(value) => self.arg(value),
            None => self.arg(NULL_TOKEN),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
