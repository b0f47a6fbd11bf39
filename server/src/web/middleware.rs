//! # Custom HTTP middleware

use axum::http::{header::CACHE_CONTROL, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

/// Returns a layer that marks responses as uncacheable.
///
/// Every page this server renders depends on the traveler cookie and the
/// visited table, so intermediaries must not cache them.
pub fn no_store_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(CACHE_CONTROL, HeaderValue::from_static("no-store"))
}
