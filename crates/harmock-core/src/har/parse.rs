//! HAR 1.2 structures needed to replay request/response pairs.

use serde::{Deserialize, Serialize};

/// `log` object of a HAR document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HarLog {
    #[serde(default)]
    pub version: Option<String>,
    pub entries: Vec<HarEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HarEntry {
    pub request: HarRequest,
    pub response: HarResponse,
    /// Total elapsed time of the request in milliseconds.
    #[serde(default)]
    pub time: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HarRequest {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: Vec<HarHeader>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HarResponse {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub headers: Vec<HarHeader>,
    #[serde(default)]
    pub content: HarContent,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HarContent {
    #[serde(default)]
    pub text: Option<String>,
    /// `"base64"` when `text` carries encoded bytes.
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default, rename = "mimeType")]
    pub mime_type: Option<String>,
}

impl HarContent {
    pub fn is_base64(&self) -> bool {
        self.encoding
            .as_deref()
            .is_some_and(|encoding| encoding.eq_ignore_ascii_case("base64"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HarHeader {
    pub name: String,
    pub value: String,
}
