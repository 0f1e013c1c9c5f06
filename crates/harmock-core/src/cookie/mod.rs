//! `Set-Cookie` header parsing.
//!
//! Parses response cookie headers into [`CookieRecord`]s and splits
//! comma-joined header values (historical header folding) without choking
//! on commas inside attribute values such as `Expires`.
//!
//! Parsing never fails: malformed segments degrade to empty values.

mod expires;
mod parse;
mod split;

use std::collections::{BTreeMap, HashMap};

use http::HeaderMap;
use serde::Serialize;

pub use expires::Expires;
pub use parse::{parse, parse_string};
pub use split::split_cookies_string;

/// Options for [`parse`] and [`parse_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Percent-decode cookie values.
    pub decode_values: bool,
    /// Return [`ParsedCookies::Map`] keyed by cookie name instead of a list.
    pub map: bool,
    /// Suppress the warning emitted when a request `Cookie` header is passed in.
    pub silent: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            decode_values: true,
            map: false,
            silent: false,
        }
    }
}

/// One parsed `Set-Cookie` definition.
///
/// `name` and `value` are always present; every other field stays empty
/// unless the matching attribute appeared in the source string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<Expires>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub secure: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub http_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
    /// Remaining attributes (`path`, `domain`, unknown ones) keyed by lower-cased name.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

impl CookieRecord {
    pub fn path(&self) -> Option<&str> {
        self.attributes.get("path").map(String::as_str)
    }

    pub fn domain(&self) -> Option<&str> {
        self.attributes.get("domain").map(String::as_str)
    }
}

/// Result of [`parse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParsedCookies {
    List(Vec<CookieRecord>),
    /// Name → record; the last cookie with a given name wins.
    Map(HashMap<String, CookieRecord>),
}

impl ParsedCookies {
    /// Records in source order (map mode yields them in arbitrary order).
    pub fn into_list(self) -> Vec<CookieRecord> {
        match self {
            ParsedCookies::List(list) => list,
            ParsedCookies::Map(map) => map.into_values().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ParsedCookies::List(list) => list.len(),
            ParsedCookies::Map(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Input accepted by [`parse`] and [`split_cookies_string`].
#[derive(Debug, Clone, Copy)]
pub enum CookieSource<'a> {
    /// A single raw header value, possibly comma-joined.
    Value(&'a str),
    /// Header values that were already split.
    Values(&'a [String]),
    /// A full header collection; `set-cookie` is looked up case-insensitively.
    Headers(&'a HeaderMap),
}

impl<'a> From<&'a str> for CookieSource<'a> {
    fn from(value: &'a str) -> Self {
        CookieSource::Value(value)
    }
}

impl<'a> From<&'a String> for CookieSource<'a> {
    fn from(value: &'a String) -> Self {
        CookieSource::Value(value.as_str())
    }
}

impl<'a> From<&'a [String]> for CookieSource<'a> {
    fn from(values: &'a [String]) -> Self {
        CookieSource::Values(values)
    }
}

impl<'a> From<&'a Vec<String>> for CookieSource<'a> {
    fn from(values: &'a Vec<String>) -> Self {
        CookieSource::Values(values.as_slice())
    }
}

impl<'a> From<&'a HeaderMap> for CookieSource<'a> {
    fn from(headers: &'a HeaderMap) -> Self {
        CookieSource::Headers(headers)
    }
}
