//! Locale resolution for every request.
//!
//! Precedence: explicit `?lang=` query parameter, then the `mv_lang`
//! cookie (set by the language switcher), then the `Accept-Language`
//! header, then French. The extractor never rejects; a storefront page
//! must render in some language no matter what the client sends.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::convert::Infallible;

use verlaine_core::Locale;

/// Cookie holding the shopper's chosen language.
pub const LANG_COOKIE: &str = "mv_lang";

/// Cookie lifetime for the language choice (one year).
const LANG_COOKIE_MAX_AGE_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Extractor resolving the request's locale.
#[derive(Debug, Clone, Copy)]
pub struct RequestLocale(pub Locale);

impl<S> FromRequestParts<S> for RequestLocale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve(parts)))
    }
}

/// Build the `Set-Cookie` value for a language choice.
#[must_use]
pub fn lang_cookie_value(locale: Locale) -> String {
    format!(
        "{LANG_COOKIE}={}; Path=/; Max-Age={LANG_COOKIE_MAX_AGE_SECONDS}; SameSite=Lax",
        locale.as_str()
    )
}

fn resolve(parts: &Parts) -> Locale {
    if let Some(locale) = from_query(parts.uri.query()) {
        return locale;
    }
    if let Some(locale) = from_cookie(parts) {
        return locale;
    }
    if let Some(locale) = parts
        .headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|h| h.to_str().ok())
        .and_then(Locale::from_accept_language)
    {
        return locale;
    }
    Locale::default()
}

fn from_query(query: Option<&str>) -> Option<Locale> {
    query?
        .split('&')
        .find_map(|pair| pair.strip_prefix("lang="))
        .and_then(Locale::parse)
}

fn from_cookie(parts: &Parts) -> Option<Locale> {
    let cookies = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix("mv_lang="))
        .and_then(Locale::parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(uri: &str, headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, ()) = builder.body(()).expect("valid request").into_parts();
        parts
    }

    #[test]
    fn test_query_wins_over_cookie_and_header() {
        let parts = parts(
            "/collections?lang=en",
            &[("cookie", "mv_lang=fr"), ("accept-language", "fr-FR")],
        );
        assert_eq!(resolve(&parts), Locale::En);
    }

    #[test]
    fn test_cookie_wins_over_header() {
        let parts = parts(
            "/",
            &[
                ("cookie", "other=1; mv_lang=en"),
                ("accept-language", "fr-FR,fr;q=0.9"),
            ],
        );
        assert_eq!(resolve(&parts), Locale::En);
    }

    #[test]
    fn test_accept_language_fallback() {
        let parts = parts("/", &[("accept-language", "en-GB,en;q=0.8")]);
        assert_eq!(resolve(&parts), Locale::En);
    }

    #[test]
    fn test_defaults_to_french() {
        let parts = parts("/", &[]);
        assert_eq!(resolve(&parts), Locale::Fr);
    }

    #[test]
    fn test_garbage_lang_param_ignored() {
        let parts = parts("/?lang=klingon", &[("cookie", "mv_lang=en")]);
        assert_eq!(resolve(&parts), Locale::En);
    }

    #[test]
    fn test_lang_cookie_value_shape() {
        let value = lang_cookie_value(Locale::En);
        assert!(value.starts_with("mv_lang=en; Path=/"));
        assert!(value.contains("SameSite=Lax"));
    }
}
