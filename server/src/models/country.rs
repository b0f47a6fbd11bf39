/// A row of ISO 3166-1 reference data, seeded by migration and never mutated
/// by this service.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Country {
    pub country_code: String,
    pub country_name: String,
}
