//! Maps one archive entry to a mock route.
//!
//! The recorded response is turned into response instructions once, at
//! registration time. On each request the resolver checks the query string
//! (when strict), rewrites the CORS origin and hands back those instructions.

use std::sync::Arc;
use std::time::Duration;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use bytes::Bytes;
use http::{HeaderName, HeaderValue, Method, StatusCode};
use url::Url;

use crate::cookie::{self, ParseOptions};
use crate::har::{HarEntry, HarResponse};
use crate::mock::{
    search, CookieOptions, MockRequest, MockResponse, RequestHandler, Resolver, ResponseContext,
    ResponseTransformer, RestApi,
};
use crate::options::ProviderOptions;

const SET_COOKIE: &str = "set-cookie";
const ACCESS_CONTROL_ALLOW_ORIGIN: &str = "access-control-allow-origin";

/// Standard alphabet, padding optional on decode.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Creates the mock route for `entry`, or `None` when the method is not
/// supported by `rest`, the URL does not parse, or `rest` rejects the route.
pub fn create_request_handler<R>(
    entry: &HarEntry,
    options: &ProviderOptions,
    rest: &R,
) -> Option<RequestHandler>
where
    R: RestApi + ?Sized,
{
    let request = &entry.request;
    options.debug(&format!(
        "Registering route for {} for {}",
        request.method, request.url
    ));

    let method = Method::from_bytes(request.method.to_ascii_uppercase().as_bytes()).ok()?;
    if !rest.supports(&method) {
        options.debug(&format!("Skipping unsupported method {}", request.method));
        return None;
    }

    let parsed_url = match Url::parse(&request.url) {
        Ok(url) => url,
        Err(err) => {
            options.warn(&format!("Skipping malformed URL {}: {}", request.url, err));
            return None;
        }
    };
    let route = crate::mock::route_url(&parsed_url);

    let transformers = recorded_response(entry, &parsed_url, options);
    let resolver = build_resolver(&parsed_url, transformers, options);

    rest.route(&method, route.as_str(), resolver)
}

fn build_resolver(
    recorded_url: &Url,
    transformers: Vec<ResponseTransformer>,
    options: &ProviderOptions,
) -> Resolver {
    let recorded_search = search(recorded_url);
    let options = options.clone();
    Arc::new(move |request: &MockRequest| {
        if options.strict_query_string && request.search() != recorded_search {
            options.warn("[WARNING] Query string did not match");
            return None;
        }
        let transformers = per_request(&transformers, &options);
        Some(if options.use_unique_requests {
            MockResponse::once(transformers)
        } else {
            MockResponse::repeat(transformers)
        })
    })
}

/// Applies the parts of the recorded response that are evaluated on every
/// request: the CORS origin rewrite and the delay notice.
fn per_request(
    transformers: &[ResponseTransformer],
    options: &ProviderOptions,
) -> Vec<ResponseTransformer> {
    transformers
        .iter()
        .map(|transformer| match transformer {
            ResponseTransformer::Header { name, value }
                if name.eq_ignore_ascii_case(ACCESS_CONTROL_ALLOW_ORIGIN) =>
            {
                options.info(&format!(
                    "CORS header detected, requesting new origin for {}",
                    value
                ));
                ResponseTransformer::Header {
                    name: name.clone(),
                    value: options.resolve_origin(value),
                }
            }
            ResponseTransformer::Delay(delay) => {
                if !delay.is_zero() {
                    options.warn(&format!(
                        "Response will be delayed with {}ms",
                        delay.as_millis()
                    ));
                }
                ResponseTransformer::Delay(*delay)
            }
            other => other.clone(),
        })
        .collect()
}

/// Headers, cookies, body, delay, status and the optional acknowledgment, in that order.
///
/// Headers and status codes that are not valid HTTP are reported and left out.
fn recorded_response(
    entry: &HarEntry,
    recorded_url: &Url,
    options: &ProviderOptions,
) -> Vec<ResponseTransformer> {
    let ctx = ResponseContext;
    let response = &entry.response;
    let mut transformers = Vec::with_capacity(response.headers.len() + 5);

    for header in &response.headers {
        if header.name.eq_ignore_ascii_case(SET_COOKIE) {
            continue;
        }
        if HeaderName::from_bytes(header.name.as_bytes()).is_err()
            || HeaderValue::from_str(&header.value).is_err()
        {
            options.warn(&format!("Skipping invalid response header {:?}", header.name));
            continue;
        }
        transformers.push(ctx.set(header.name.as_str(), header.value.as_str()));
    }

    transformers.extend(response_cookies(response, recorded_url));
    transformers.push(ctx.body(response_body(response, options)));
    transformers.push(ctx.delay(response_delay(entry.time)));
    if StatusCode::from_u16(response.status).is_ok() {
        transformers.push(ctx.status(response.status));
    } else {
        options.warn(&format!(
            "Ignoring invalid recorded status {}, answering 200",
            response.status
        ));
    }
    if options.acknowledge {
        transformers.push(ctx.json(serde_json::json!({ "status": true })));
    }
    transformers
}

fn response_cookies(response: &HarResponse, recorded_url: &Url) -> Vec<ResponseTransformer> {
    let ctx = ResponseContext;
    let domain = host_with_port(recorded_url);
    response
        .headers
        .iter()
        .filter(|header| header.name.eq_ignore_ascii_case(SET_COOKIE))
        .filter_map(|header| {
            cookie::parse(header.value.as_str(), &ParseOptions::default())
                .into_list()
                .into_iter()
                .next()
        })
        .map(|cookie| {
            let options = CookieOptions {
                domain: domain.clone(),
                path: cookie.path().map(str::to_string),
                http_only: cookie.http_only,
                secure: cookie.secure,
                // Legacy mapping: only an explicit empty `SameSite=` counts as cross-site.
                same_site: cookie.same_site.as_deref() != Some(""),
                expires: cookie.expires.as_ref().and_then(|expires| expires.at),
            };
            ctx.cookie(cookie.name, cookie.value, options)
        })
        .collect()
}

fn response_body(response: &HarResponse, options: &ProviderOptions) -> Bytes {
    let content = &response.content;
    let text = content.text.clone().unwrap_or_default();
    if !content.is_base64() {
        return Bytes::from(text);
    }
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    match LENIENT_BASE64.decode(compact.as_bytes()) {
        Ok(bytes) => Bytes::from(bytes),
        Err(err) => {
            options.warn(&format!(
                "Response body is not valid base64 ({}), serving it as text",
                err
            ));
            Bytes::from(text)
        }
    }
}

fn response_delay(time: Option<f64>) -> Duration {
    match time {
        Some(ms) if ms.is_finite() && ms > 0.0 => Duration::from_millis(ms.round() as u64),
        _ => Duration::ZERO,
    }
}

fn host_with_port(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
