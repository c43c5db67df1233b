use axum::http::HeaderValue;
use regex::Regex;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::CorsSettings;

/// Build the CORS layer from settings.
///
/// Origins outside the list and the pattern get no
/// `access-control-allow-origin` header, so browsers block them.
pub fn cors_layer(settings: &CorsSettings) -> anyhow::Result<CorsLayer> {
    let exact: Vec<HeaderValue> = settings
        .allow_origins
        .iter()
        .map(|o| HeaderValue::from_str(o))
        .collect::<Result<_, _>>()?;

    let pattern = settings
        .allow_origin_regex
        .as_deref()
        .map(Regex::new)
        .transpose()?;

    let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _parts| {
        if exact.iter().any(|o| o == origin) {
            return true;
        }
        match (&pattern, origin.to_str()) {
            (Some(re), Ok(origin)) => re.is_match(origin),
            _ => false,
        }
    });

    // Wildcards cannot be combined with credentials, so methods and headers
    // mirror the preflight request instead.
    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(settings.allow_credentials))
}
