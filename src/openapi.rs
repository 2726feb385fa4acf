use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::GeneratedFeed;
use crate::models::{Booking, FeedSnapshot, LoadOutcome, Section, Sport};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
        components.add_security_scheme(
            "query_token",
            SecurityScheme::ApiKey(ApiKey::Query(ApiKeyValue::new("token"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::get_bookings,
        crate::handlers::load_more,
        crate::handlers::refresh,
        crate::handlers::generate_bookings,
        crate::handlers::get_ical
    ),
    components(schemas(Sport, Booking, Section, FeedSnapshot, LoadOutcome, GeneratedFeed)),
    tags(
        (name = "bookings", description = "Mock booking feed operations")
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_feed_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/bookings", "/bookings/more", "/bookings/refresh", "/bookings.ical"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
