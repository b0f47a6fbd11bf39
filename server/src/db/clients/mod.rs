//! # Database backend clients
//!
//! This module contains database clients which implement [`DatabaseClient`]
//! using various database backends. The Postgres client is the production
//! backend; the sqlite client backs local development and the test suite.
//!
//! [`DatabaseClient`]: crate::db::interface::DatabaseClient

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite3")]
pub mod sqlite;
