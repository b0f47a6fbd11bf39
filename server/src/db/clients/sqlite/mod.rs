use std::{env::VarError, future::Future, pin::Pin};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteSynchronous},
    SqlitePool,
};

use crate::{
    db::interface::{DatabaseClient, DatabaseError},
    models::{Country, NewUser, User},
};


#[derive(Debug, thiserror::Error)]
pub enum CreateSqliteClientError {
    #[error("required environment variable not set: {0}")]
    MissingEnv(&'static str),

    #[error("environment variable {0} is not valid UTF-8")]
    EnvNotUtf8(&'static str),

    #[error("failed to migrate database to current version: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Sqlite-backed [`DatabaseClient`], used for local development and tests.
#[derive(Debug, Clone)]
pub struct SqliteClient {
    pool: SqlitePool,
}

impl SqliteClient {
    /// Opens or creates the database at the path given by the `DB_PATH`
    /// environment variable.
    pub async fn open() -> Result<Self, CreateSqliteClientError> {
        match std::env::var("DB_PATH") {
            Ok(path) => Ok(Self {
                pool: Self::do_open(
                    SqliteConnectOptions::new()
                        .create_if_missing(true)
                        .filename(&path),
                )
                .await?,
            }),
            Err(VarError::NotPresent) => Err(CreateSqliteClientError::MissingEnv("DB_PATH")),
            Err(VarError::NotUnicode(_)) => Err(CreateSqliteClientError::EnvNotUtf8("DB_PATH")),
        }
    }

    /// Creates a client that uses a new in-memory database.
    pub async fn new_memory() -> Result<Self, CreateSqliteClientError> {
        // sqlx has some special handling for the in-memory database which only
        // happens when parsing from a URL string
        Ok(Self {
            pool: Self::do_open("sqlite://:memory:".parse().unwrap()).await?,
        })
    }

    async fn do_open(
        base_options: SqliteConnectOptions,
    ) -> Result<SqlitePool, CreateSqliteClientError> {
        let options = base_options
            .synchronous(SqliteSynchronous::Normal)
            .optimize_on_close(true, None)
            .pragma("foreign_keys", "ON");
        // A single connection keeps an in-memory database alive for the life
        // of the pool; pooled memory connections would each see their own
        // empty database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::migrate!("src/db/clients/sqlite/migrations")
            .run(&pool)
            .await?;

        Ok(pool)
    }
}

impl DatabaseClient for SqliteClient {
    fn list_visited_codes(
        &self,
        user_id: i32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, DatabaseError>> + Send>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let codes: Vec<String> = sqlx::query_scalar(
                "SELECT DISTINCT country_code FROM visited_countries
                 WHERE user_id = $1
                 ORDER BY country_code",
            )
            .bind(user_id)
            .fetch_all(&pool)
            .await?;
            Ok(codes)
        })
    }

    fn get_user(
        &self,
        user_id: i32,
    ) -> Pin<Box<dyn Future<Output = Result<User, DatabaseError>> + Send>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let user: User = sqlx::query_as("SELECT id, name, color FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_one(&pool)
                .await?;
            Ok(user)
        })
    }

    fn list_users(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<User>, DatabaseError>> + Send>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let users: Vec<User> =
                sqlx::query_as("SELECT id, name, color FROM users ORDER BY id")
                    .fetch_all(&pool)
                    .await?;
            Ok(users)
        })
    }

    fn find_country_by_name<'q>(
        &self,
        fragment: &'q str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Country>, DatabaseError>> + Send + 'q>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let needle = fragment.trim().to_lowercase();
            let country: Option<Country> = sqlx::query_as(
                "SELECT country_code, country_name FROM countries
                 WHERE LOWER(country_name) LIKE '%' || $1 || '%'
                 ORDER BY (LOWER(country_name) = $1) DESC,
                          LENGTH(country_name),
                          country_name
                 LIMIT 1",
            )
            .bind(needle)
            .fetch_optional(&pool)
            .await?;
            Ok(country)
        })
    }

    fn record_visit<'a>(
        &self,
        country_code: &'a str,
        user_id: i32,
    ) -> Pin<Box<dyn Future<Output = Result<(), DatabaseError>> + Send + 'a>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            sqlx::query("INSERT INTO visited_countries (country_code, user_id) VALUES ($1, $2)")
                .bind(country_code)
                .bind(user_id)
                .execute(&pool)
                .await?;
            Ok(())
        })
    }

    fn create_user<'u>(
        &self,
        user: &'u NewUser,
    ) -> Pin<Box<dyn Future<Output = Result<User, DatabaseError>> + Send + 'u>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let user: User = sqlx::query_as(
                "INSERT INTO users (name, color) VALUES ($1, $2)
                 RETURNING id, name, color",
            )
            .bind(&user.name)
            .bind(&user.color)
            .fetch_one(&pool)
            .await?;
            Ok(user)
        })
    }
}
