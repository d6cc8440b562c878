use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::Response,
};
use tracing::warn;

use super::Projection;

/// Writes a 200 response from a projection.
///
/// Headers whose name or value is not valid HTTP are skipped. The content
/// type is set last and replaces any forwarded `Content-Type`.
pub fn write_from_projection(projection: Projection) -> Response {
    let mut response = Response::new(Body::from(projection.body));
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    for (name, value) in &projection.headers {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => warn!(
                component = "renderer",
                event = "invalid_header",
                header = %name,
                "skipping header that is not valid http"
            ),
        }
    }

    let content_type = HeaderValue::from_str(&projection.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(super::DEFAULT_CONTENT_TYPE));
    headers.insert(header::CONTENT_TYPE, content_type);

    response
}

/// Writes a bodiless response with the given status.
pub fn write_status(status: StatusCode) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}
