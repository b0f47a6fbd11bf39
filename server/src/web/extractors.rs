use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::web::{AppState, DEFAULT_USER_ID, TRAVELER_COOKIE};

/// The traveler id carried by the request's cookie.
///
/// Each browser holds its own cookie, so concurrent clients cannot redirect
/// each other's context. An absent or unparseable cookie falls back to
/// [`DEFAULT_USER_ID`]; whether that traveler exists is the handler's problem.
pub struct CurrentTraveler(pub i32);

impl FromRequestParts<AppState> for CurrentTraveler {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = CookieJar::from_request_parts(parts, state).await.unwrap();
        let id = cookies
            .get(TRAVELER_COOKIE)
            .and_then(|c| c.value().parse::<i32>().ok())
            .unwrap_or(DEFAULT_USER_ID);
        Ok(CurrentTraveler(id))
    }
}
