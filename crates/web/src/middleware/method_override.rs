//! HTML form method override.
//!
//! Forms can only `GET` or `POST`, so edit and delete forms post to
//! `?_method=PUT` / `?_method=DELETE`. This runs outside the router so the
//! rewritten method is what routing sees.

use axum::{extract::Request, http::Method};

/// Query parameter carrying the intended method.
const OVERRIDE_PARAM: &str = "_method";

/// Rewrite `POST ...?_method=X` to method `X` for `PUT`, `PATCH` and `DELETE`.
///
/// Other methods, and overrides to anything else, pass through unchanged.
pub fn method_override(mut request: Request) -> Request {
    if request.method() != Method::POST {
        return request;
    }

    if let Some(method) = request.uri().query().and_then(override_from_query) {
        tracing::trace!(%method, "Applying method override");
        *request.method_mut() = method;
    }

    request
}

fn override_from_query(query: &str) -> Option<Method> {
    let value = url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == OVERRIDE_PARAM)
        .map(|(_, value)| value.to_ascii_uppercase())?;

    match value.as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request(method: Method, uri: &str) -> Request {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_post_with_override() {
        let req = method_override(request(Method::POST, "/campgrounds/1?_method=DELETE"));
        assert_eq!(req.method(), Method::DELETE);

        let req = method_override(request(Method::POST, "/campgrounds/1?x=1&_method=put"));
        assert_eq!(req.method(), Method::PUT);
    }

    #[test]
    fn test_only_post_is_overridden() {
        let req = method_override(request(Method::GET, "/campgrounds/1?_method=DELETE"));
        assert_eq!(req.method(), Method::GET);
    }

    #[test]
    fn test_unknown_override_ignored() {
        let req = method_override(request(Method::POST, "/campgrounds?_method=CONNECT"));
        assert_eq!(req.method(), Method::POST);

        let req = method_override(request(Method::POST, "/campgrounds"));
        assert_eq!(req.method(), Method::POST);
    }
}
