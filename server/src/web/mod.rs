use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::db::interface::{DatabaseClient, DatabaseError};

mod extractors;
mod handlers;
mod middleware;

#[cfg(all(test, feature = "sqlite3"))]
mod tests;

pub use extractors::CurrentTraveler;

/// Maximum request payload size in bytes
const MAX_REQUEST_PAYLOAD_BYTES: usize = 8 * 1024; // 8 KiB

/// Traveler id assumed when no cookie is present, so a fresh browser lands on
/// the starter profile.
pub const DEFAULT_USER_ID: i32 = 1;

/// Name of the cookie carrying the current traveler's id.
pub const TRAVELER_COOKIE: &str = "traveler";

struct AppStateInner {
    db: Arc<dyn DatabaseClient>,
}

type AppState = Arc<AppStateInner>;

/// Returns the application router serving the tracker's four pages.
pub fn router<D: DatabaseClient>(db: D) -> Router<()> {
    let db: Arc<dyn DatabaseClient> = Arc::new(db);
    let state = Arc::new(AppStateInner { db });
    Router::new()
        .route("/", get(handlers::home))
        .route("/add", post(handlers::add_visit))
        .route("/user", post(handlers::switch_user))
        .route("/new", post(handlers::create_user))
        .with_state(state)
        .layer(
            // order is top to bottom
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(MAX_REQUEST_PAYLOAD_BYTES))
                .layer(middleware::no_store_layer()),
        )
}

#[derive(Debug, thiserror::Error)]
enum PageError {
    #[error("no such traveler")]
    UnknownTraveler,

    #[error("missing or malformed form field: {0}")]
    BadForm(&'static str),

    #[error("internal server error")]
    Internal(#[source] DatabaseError),
}

impl From<DatabaseError> for PageError {
    fn from(error: DatabaseError) -> Self {
        PageError::Internal(error)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = match &self {
            PageError::UnknownTraveler => StatusCode::NOT_FOUND,
            PageError::BadForm(_) => StatusCode::BAD_REQUEST,
            PageError::Internal(source) => {
                tracing::error!(error = %source, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}
