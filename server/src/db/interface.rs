use std::{future::Future, pin::Pin};

use crate::models::{Country, NewUser, User};

/// Storage backend for the tracker.
///
/// Object-safe so the web layer can hold a `dyn DatabaseClient` and tests can
/// substitute the in-memory backend.
pub trait DatabaseClient: Send + Sync + 'static {
    /// Returns the distinct set of country codes visited by `user_id`,
    /// ordered by code. Repeat visits collapse to one entry.
    fn list_visited_codes(
        &self,
        user_id: i32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, DatabaseError>> + Send>>;

    fn get_user(
        &self,
        user_id: i32,
    ) -> Pin<Box<dyn Future<Output = Result<User, DatabaseError>> + Send>>;

    /// Returns all traveler profiles, ordered by id.
    fn list_users(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<User>, DatabaseError>> + Send>>;

    /// Resolves a free-text fragment to at most one country.
    ///
    /// Matching is a case-insensitive substring search over the country name
    /// with a fixed ranking: an exact name match wins, then the shortest
    /// matching name, then lexical order.
    fn find_country_by_name<'q>(
        &self,
        fragment: &'q str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Country>, DatabaseError>> + Send + 'q>>;

    /// Records one visit. Not idempotent: repeat submissions insert repeat
    /// rows, and the visited set deduplicates on read.
    fn record_visit<'a>(
        &self,
        country_code: &'a str,
        user_id: i32,
    ) -> Pin<Box<dyn Future<Output = Result<(), DatabaseError>> + Send + 'a>>;

    fn create_user<'u>(
        &self,
        user: &'u NewUser,
    ) -> Pin<Box<dyn Future<Output = Result<User, DatabaseError>> + Send + 'u>>;
}

/// Error type for database operations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("row/resource not found")]
    NotFound,

    #[error("foreign key violation")]
    ForeignKeyViolation,

    #[error("database error: {0}")]
    Other(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(e) if e.is_foreign_key_violation() => Self::ForeignKeyViolation,
            other => Self::Other(Box::new(other)),
        }
    }
}
