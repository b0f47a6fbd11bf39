use std::{env::VarError, future::Future, pin::Pin};

use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    PgPool,
};

use crate::{
    db::interface::{DatabaseClient, DatabaseError},
    models::{Country, NewUser, User},
};

#[derive(Debug, thiserror::Error)]
pub enum CreatePgClientError {
    #[error("required environment variable not set: {0}")]
    MissingEnv(&'static str),

    #[error("environment variable {0} is not valid UTF-8")]
    EnvNotUtf8(&'static str),

    #[error("failed to migrate database to current version: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Postgres-backed [`DatabaseClient`], the production backend.
#[derive(Debug, Clone)]
pub struct PgClient {
    pool: PgPool,
}

impl PgClient {
    /// Connects to the database named by the `DATABASE_URL` environment
    /// variable.
    ///
    /// TLS is attempted but the server certificate is not verified; managed
    /// Postgres hosts commonly present self-signed chains.
    pub async fn open() -> Result<Self, CreatePgClientError> {
        match std::env::var("DATABASE_URL") {
            Ok(url) => {
                let options = url
                    .parse::<PgConnectOptions>()?
                    .ssl_mode(PgSslMode::Prefer);
                Ok(Self {
                    pool: Self::do_open(options).await?,
                })
            }
            Err(VarError::NotPresent) => Err(CreatePgClientError::MissingEnv("DATABASE_URL")),
            Err(VarError::NotUnicode(_)) => Err(CreatePgClientError::EnvNotUtf8("DATABASE_URL")),
        }
    }

    async fn do_open(options: PgConnectOptions) -> Result<PgPool, CreatePgClientError> {
        let pool = PgPoolOptions::new().connect_with(options).await?;

        sqlx::migrate!("src/db/clients/postgres/migrations")
            .run(&pool)
            .await?;

        Ok(pool)
    }
}

impl DatabaseClient for PgClient {
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
