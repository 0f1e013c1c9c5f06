//! Parse `Set-Cookie` values into [`CookieRecord`]s.

use http::header::{COOKIE, SET_COOKIE};
use http::HeaderMap;
use percent_encoding::percent_decode_str;

use super::{CookieRecord, CookieSource, Expires, ParseOptions, ParsedCookies};

/// Parses one or more `Set-Cookie` values.
///
/// Blank values are skipped. A header map without `set-cookie` but with a
/// request `cookie` header logs a warning (unless `silent`), since that
/// usually means a request was passed in by mistake.
pub fn parse<'a>(input: impl Into<CookieSource<'a>>, options: &ParseOptions) -> ParsedCookies {
    let values: Vec<&str> = match input.into() {
        CookieSource::Value(value) => vec![value],
        CookieSource::Values(values) => values.iter().map(String::as_str).collect(),
        CookieSource::Headers(headers) => set_cookie_values(headers, options),
    };

    let cookies = values
        .into_iter()
        .filter(|value| !value.trim().is_empty())
        .map(|value| parse_string(value, options));

    if options.map {
        ParsedCookies::Map(
            cookies
                .map(|cookie| (cookie.name.clone(), cookie))
                .collect(),
        )
    } else {
        ParsedCookies::List(cookies.collect())
    }
}

fn set_cookie_values<'a>(headers: &'a HeaderMap, options: &ParseOptions) -> Vec<&'a str> {
    let values: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();
    if values.is_empty() && headers.contains_key(COOKIE) && !options.silent {
        tracing::warn!(
            "set-cookie parser appears to have been called on a request: it parses Set-Cookie \
             headers from responses, not Cookie headers from requests (set `silent` to suppress)"
        );
    }
    values
}

/// Parses a single cookie definition (`name=value; Attr=...; Flag`).
pub fn parse_string(set_cookie_value: &str, options: &ParseOptions) -> CookieRecord {
    let mut parts = set_cookie_value
        .split(';')
        .filter(|part| !part.trim().is_empty());

    let (name, raw_value) = parts
        .next()
        .map(|first| first.split_once('=').unwrap_or((first, "")))
        .unwrap_or(("", ""));

    let value = if options.decode_values {
        decode_value(raw_value)
    } else {
        raw_value.to_string()
    };

    let mut cookie = CookieRecord {
        name: name.to_string(),
        value,
        ..CookieRecord::default()
    };

    for part in parts {
        let (key, value) = part.split_once('=').unwrap_or((part, ""));
        let key = key.trim_start().to_lowercase();
        match key.as_str() {
            "expires" => cookie.expires = Some(Expires::parse(value)),
            "max-age" => cookie.max_age = parse_leading_int(value),
            "secure" => cookie.secure = true,
            "httponly" => cookie.http_only = true,
            "samesite" => cookie.same_site = Some(value.to_string()),
            _ => {
                cookie.attributes.insert(key, value.to_string());
            }
        }
    }

    cookie
}

/// Malformed escapes or non-UTF-8 results leave the value untouched.
fn decode_value(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Leading base-10 integer, ignoring trailing garbage (`"60abc"` → 60).
fn parse_leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (sign, digits) = match value.as_bytes().first() {
        Some(b'-') => (-1, &value[1..]),
        Some(b'+') => (1, &value[1..]),
        _ => (1, value),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return None;
    }
    // Only overflow can fail here; it saturates.
    Some(match digits.parse::<i64>() {
        Ok(n) => sign * n,
        Err(_) if sign < 0 => i64::MIN,
        Err(_) => i64::MAX,
    })
}
