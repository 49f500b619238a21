//! CORS layer built from [`CorsSettings`].
use crate::config::CorsSettings;
use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const ALLOWED_METHODS: [Method; 7] = [
    Method::OPTIONS,
    Method::GET,
    Method::HEAD,
    Method::PUT,
    Method::PATCH,
    Method::POST,
    Method::DELETE,
];

/// Build the CORS layer.
///
/// A `*` origin with credentials enabled mirrors the request origin, since
/// browsers refuse a literal wildcard on credentialed requests.
pub fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    let wildcard = settings.allow_origins.iter().any(|o| o == "*");

    let origin = match (wildcard, settings.allow_credentials) {
        (true, true) => AllowOrigin::mirror_request(),
        (true, false) => AllowOrigin::from(Any),
        (false, _) => AllowOrigin::list(
            settings
                .allow_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        ),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(ALLOWED_METHODS.to_vec())
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(settings.allow_credentials)
}
