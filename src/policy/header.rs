//! `Strict-Transport-Security` header parsing.
//!
//! Parsing never fails: a header that is present but carries no usable
//! `max-age` yields the caller's fallback lifetime.

/// Max-age applied when the header is present but has no parseable `max-age`.
pub const DEFAULT_FALLBACK_MAX_AGE: i64 = 10;

const MAX_AGE: &str = "max-age=";
const INCLUDE_SUBDOMAINS: &str = "includeSubDomains";

/// Directives extracted from one header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HstsDirectives {
    pub include_subdomains: bool,
    pub max_age: i64,
}

/// Parse a header value.
///
/// `includeSubDomains` is matched as a case-sensitive substring anywhere in the
/// value. For `max-age`, every `;`-separated directive is inspected and the last
/// one that parses as an integer wins; anything else keeps `fallback_max_age`.
pub fn parse_header(value: &str, fallback_max_age: i64) -> HstsDirectives {
    let include_subdomains = value.contains(INCLUDE_SUBDOMAINS);
    let mut max_age = fallback_max_age;

    for directive in value.split(';') {
        if let Some(i) = directive.rfind(MAX_AGE) {
            if let Ok(age) = directive[i + MAX_AGE.len()..].trim().parse::<i64>() {
                max_age = age;
            }
        }
    }

    HstsDirectives {
        include_subdomains,
        max_age,
    }
}
