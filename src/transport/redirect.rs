//! Synthetic HSTS redirect responses.

use axum::http::uri::{PathAndQuery, Scheme};
use axum::http::{header, Request, Response, StatusCode, Uri};

use crate::transport::error::RedirectError;

/// Marker header set on responses fabricated locally instead of received over the wire.
pub const NON_AUTHORITATIVE_REASON: &str = "non-authoritative-reason";

/// Value of [`NON_AUTHORITATIVE_REASON`] for HSTS upgrades.
pub const HSTS_REASON: &str = "HSTS";

/// The same URI with the `https` scheme substituted.
pub fn secure_uri(uri: &Uri) -> Result<Uri, RedirectError> {
    let mut parts = uri.clone().into_parts();
    parts.scheme = Some(Scheme::HTTPS);
    if parts.path_and_query.is_none() {
        parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    Ok(Uri::from_parts(parts)?)
}

/// Build the `307 Temporary Redirect` that upgrades `req` to its secure URL.
///
/// The request is only read.
pub fn build_redirect<ReqBody, ResBody>(
    req: &Request<ReqBody>,
) -> Result<Response<ResBody>, RedirectError>
where
    ResBody: Default,
{
    let location = secure_uri(req.uri())?;

    Ok(Response::builder()
        .status(StatusCode::TEMPORARY_REDIRECT)
        .version(req.version())
        .header(header::LOCATION, location.to_string())
        .header(NON_AUTHORITATIVE_REASON, HSTS_REASON)
        .body(ResBody::default())?)
}

/// Host (with port, if any) a request is addressed to.
///
/// Taken from the URI authority, falling back to the `Host` header for
/// origin-form requests.
pub fn request_host<B>(req: &Request<B>) -> Option<String> {
    if let Some(authority) = req.uri().authority() {
        return Some(match authority.port() {
            Some(port) => format!("{}:{}", authority.host(), port),
            None => authority.host().to_string(),
        });
    }

    req.headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
}
