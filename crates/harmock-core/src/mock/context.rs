//! Response instructions and their composition into a response.

use std::time::Duration;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, SET_COOKIE};
use http::{HeaderMap, HeaderName, HeaderValue, Response, StatusCode};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use time::macros::format_description;
use time::OffsetDateTime;

/// Characters escaped in serialized cookie values.
const COOKIE_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b',')
    .add(b';')
    .add(b'\\')
    .add(b'%');

/// Attributes of a cookie set by a mocked response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOptions {
    pub domain: Option<String>,
    pub path: Option<String>,
    pub http_only: bool,
    pub secure: bool,
    /// Serialized as `SameSite=Strict` when set.
    pub same_site: bool,
    pub expires: Option<OffsetDateTime>,
}

/// One step of building a mocked response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseTransformer {
    Header { name: String, value: String },
    Cookie {
        name: String,
        value: String,
        options: CookieOptions,
    },
    Body(Bytes),
    Delay(Duration),
    Status(u16),
    Json(serde_json::Value),
}

/// Builders for [`ResponseTransformer`]s, handed to resolvers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseContext;

impl ResponseContext {
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) -> ResponseTransformer {
        ResponseTransformer::Header {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn cookie(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
        options: CookieOptions,
    ) -> ResponseTransformer {
        ResponseTransformer::Cookie {
            name: name.into(),
            value: value.into(),
            options,
        }
    }

    pub fn body(&self, body: impl Into<Bytes>) -> ResponseTransformer {
        ResponseTransformer::Body(body.into())
    }

    pub fn delay(&self, delay: Duration) -> ResponseTransformer {
        ResponseTransformer::Delay(delay)
    }

    pub fn status(&self, status: u16) -> ResponseTransformer {
        ResponseTransformer::Status(status)
    }

    pub fn json(&self, value: serde_json::Value) -> ResponseTransformer {
        ResponseTransformer::Json(value)
    }
}

/// Result of applying a resolver's instructions in order.
#[derive(Debug, Clone)]
pub struct MockedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub delay: Duration,
}

impl Default for MockedResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            delay: Duration::ZERO,
        }
    }
}

impl MockedResponse {
    /// Folds instructions left to right; later body/json/status win.
    pub fn compose<I>(transformers: I) -> Self
    where
        I: IntoIterator<Item = ResponseTransformer>,
    {
        let mut response = MockedResponse::default();
        for transformer in transformers {
            response.apply(transformer);
        }
        response
    }

    fn apply(&mut self, transformer: ResponseTransformer) {
        match transformer {
            ResponseTransformer::Header { name, value } => self.append_header(&name, &value),
            ResponseTransformer::Cookie {
                name,
                value,
                options,
            } => {
                let cookie = serialize_cookie(&name, &value, &options);
                self.append_header(SET_COOKIE.as_str(), &cookie);
            }
            ResponseTransformer::Body(body) => self.body = body,
            ResponseTransformer::Delay(delay) => self.delay = delay,
            ResponseTransformer::Status(code) => {
                if let Ok(status) = StatusCode::from_u16(code) {
                    self.status = status;
                }
            }
            ResponseTransformer::Json(value) => {
                self.headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                self.body = Bytes::from(value.to_string());
            }
        }
    }

    /// Headers that are not valid HTTP are dropped.
    fn append_header(&mut self, name: &str, value: &str) {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn into_http(self) -> Response<Bytes> {
        let mut response = Response::new(self.body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

fn serialize_cookie(name: &str, value: &str, options: &CookieOptions) -> String {
    let mut cookie = format!("{}={}", name, utf8_percent_encode(value, COOKIE_VALUE));
    if let Some(domain) = &options.domain {
        cookie.push_str("; Domain=");
        cookie.push_str(domain);
    }
    if let Some(path) = &options.path {
        cookie.push_str("; Path=");
        cookie.push_str(path);
    }
    if let Some(expires) = options.expires.and_then(format_http_date) {
        cookie.push_str("; Expires=");
        cookie.push_str(&expires);
    }
    if options.http_only {
        cookie.push_str("; HttpOnly");
    }
    if options.secure {
        cookie.push_str("; Secure");
    }
    if options.same_site {
        cookie.push_str("; SameSite=Strict");
    }
    cookie
}

fn format_http_date(at: OffsetDateTime) -> Option<String> {
    let utc = at.to_offset(time::UtcOffset::UTC);
    utc.format(format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    ))
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn compose_applies_in_order() {
        let ctx = ResponseContext;
        let response = MockedResponse::compose([
            ctx.set("X-Trace", "1"),
            ctx.set("X-Trace", "2"),
            ctx.body("first"),
            ctx.body("second"),
            ctx.delay(Duration::from_millis(25)),
            ctx.status(201),
        ]);
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body, Bytes::from("second"));
        assert_eq!(response.delay, Duration::from_millis(25));
        let traces: Vec<_> = response.headers.get_all("x-trace").iter().collect();
        assert_eq!(traces.len(), 2);
    }

    #[test]
    fn json_replaces_body_and_sets_content_type() {
        let ctx = ResponseContext;
        let response =
            MockedResponse::compose([ctx.body("recorded"), ctx.json(json!({"status": true}))]);
        assert_eq!(response.body, Bytes::from(r#"{"status":true}"#));
        assert_eq!(response.header("content-type"), Some("application/json"));
    }

    #[test]
    fn invalid_status_and_header_are_skipped() {
        let ctx = ResponseContext;
        let response = MockedResponse::compose([ctx.status(0), ctx.set("bad header", "x")]);
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.headers.is_empty());
    }

    #[test]
    fn cookie_is_serialized_as_set_cookie() {
        let ctx = ResponseContext;
        let options = CookieOptions {
            domain: Some("api.example.com".to_string()),
            path: Some("/".to_string()),
            http_only: true,
            secure: true,
            same_site: true,
            expires: Some(datetime!(2021-06-09 10:18:14 UTC)),
        };
        let response = MockedResponse::compose([ctx.cookie("session", "a b;c", options)]);
        assert_eq!(
            response.header("set-cookie"),
            Some(
                "session=a%20b%3Bc; Domain=api.example.com; Path=/; \
                 Expires=Wed, 09 Jun 2021 10:18:14 GMT; HttpOnly; Secure; SameSite=Strict"
            )
        );
    }

    #[test]
    fn into_http_keeps_parts() {
        let ctx = ResponseContext;
        let response =
            MockedResponse::compose([ctx.status(404), ctx.set("X-Mock", "yes"), ctx.body("gone")])
                .into_http();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-mock"], "yes");
        assert_eq!(response.body(), &Bytes::from("gone"));
    }
}
