use serde::Deserialize;

/// A traveler profile.
///
/// Profiles are created through the "new traveler" flow and never updated or
/// deleted by this service.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    /// Display tag rendered as the page background for this traveler.
    pub color: String,
}

/// Fields for creating a [`User`]. The id is generated by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub color: String,
}
