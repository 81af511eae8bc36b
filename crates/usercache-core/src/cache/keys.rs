use std::fmt;

/// Key under which one cached resource lives.
///
/// Two accessors that compute the same key share the same entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Full user list (`"users"`)
    Users,
    /// Aggregate counts (`"user-stats"`)
    UserStats,
    /// A single user (`"user-<id>"`)
    User(i64),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Users => write!(f, "users"),
            CacheKey::UserStats => write!(f, "user-stats"),
            CacheKey::User(id) => write!(f, "user-{}", id),
        }
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.to_string()
    }
}
