use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    db::interface::DatabaseError,
    models::NewUser,
    views,
    web::{AppState, CurrentTraveler, PageError, TRAVELER_COOKIE},
};

fn traveler_cookie(user_id: i32) -> Cookie<'static> {
    Cookie::build((TRAVELER_COOKIE, user_id.to_string()))
        .path("/")
        .same_site(SameSite::Lax)
        .http_only(true)
        .into()
}

#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    error: Option<String>,
}

/// `GET /` — the aggregate page: visited count and codes, all travelers, the
/// current traveler's color. Read-only and idempotent.
pub async fn home(
    State(state): State<AppState>,
    CurrentTraveler(user_id): CurrentTraveler,
    Query(query): Query<HomeQuery>,
) -> Result<Html<String>, PageError> {
    let visited = state.db.list_visited_codes(user_id).await?;
    let color = match state.db.get_user(user_id).await {
        Ok(user) => user.color,
        // A stale cookie is not an error; render the neutral fallback.
        Err(DatabaseError::NotFound) => String::from("white"),
        Err(e) => return Err(e.into()),
    };
    let users = state.db.list_users().await?;
    Ok(Html(views::home(
        &visited,
        &users,
        user_id,
        &color,
        query.error.as_deref(),
    )))
}

#[derive(Debug, Deserialize)]
pub struct AddForm {
    #[serde(default)]
    country: String,
}

/// `POST /add` — resolve a free-text country name and record a visit for the
/// current traveler.
///
/// An unresolved name is a "no match" outcome, not an error: the client is
/// redirected home with a notice rather than shown an error page.
pub async fn add_visit(
    State(state): State<AppState>,
    CurrentTraveler(user_id): CurrentTraveler,
    Form(form): Form<AddForm>,
) -> Result<Redirect, PageError> {
    let input = form.country.trim();
    if input.is_empty() {
        return Ok(Redirect::to("/?error=empty-country"));
    }
    let Some(country) = state.db.find_country_by_name(input).await? else {
        info!(input, "no country matched");
        return Ok(Redirect::to("/?error=unknown-country"));
    };
    match state.db.record_visit(&country.country_code, user_id).await {
        Ok(()) => {}
        // The cookie names a traveler that no longer exists.
        Err(DatabaseError::ForeignKeyViolation) => return Err(PageError::UnknownTraveler),
        Err(e) => return Err(e.into()),
    }
    Ok(Redirect::to("/"))
}

#[derive(Debug, Deserialize)]
pub struct SwitchForm {
    add: Option<String>,
    user: Option<i32>,
}

/// `POST /user` — dispatch: `add=new` renders the creation form, `user=<id>`
/// switches the traveler cookie after checking the id exists.
pub async fn switch_user(
    State(state): State<AppState>,
    cookies: CookieJar,
    Form(form): Form<SwitchForm>,
) -> Result<Response, PageError> {
    if form.add.as_deref() == Some("new") {
        return Ok(Html(views::new_traveler_form()).into_response());
    }
    let Some(user_id) = form.user else {
        return Err(PageError::BadForm("user"));
    };
    // Check the traveler exists before handing out a cookie pointing at it.
    match state.db.get_user(user_id).await {
        Ok(user) => {
            Ok((cookies.add(traveler_cookie(user.id)), Redirect::to("/")).into_response())
        }
        Err(DatabaseError::NotFound) => Err(PageError::UnknownTraveler),
        Err(e) => Err(e.into()),
    }
}

/// `POST /new` — create a traveler and switch the cookie to it.
pub async fn create_user(
    State(state): State<AppState>,
    cookies: CookieJar,
    Form(form): Form<NewUser>,
) -> Result<(CookieJar, Redirect), PageError> {
    if form.name.trim().is_empty() {
        return Err(PageError::BadForm("name"));
    }
    if form.color.trim().is_empty() {
        return Err(PageError::BadForm("color"));
    }
    let user = state.db.create_user(&form).await?;
    info!(id = user.id, name = %user.name, "created traveler");
    Ok((cookies.add(traveler_cookie(user.id)), Redirect::to("/")))
}
