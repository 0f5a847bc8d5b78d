use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// HTTP method used by a command. The remote API only uses these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Returns the method name as an uppercase string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved HTTP call against the remote service.
///
/// Built once per operation request and consumed by the transport. The API
/// key is not part of the command; the transport attaches it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpCommand {
    /// HTTP method.
    pub method: HttpMethod,

    /// Path relative to the configured base URL, always starting with `/`.
    pub path: &'static str,

    /// Request headers.
    pub headers: BTreeMap<String, String>,

    /// JSON body. `None` for `GET`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl HttpCommand {
    /// Build a `GET` command.
    pub fn get(path: &'static str) -> Self {
        Self {
            method: HttpMethod::Get,
            path,
            headers: json_headers(),
            body: None,
        }
    }

    /// Build a `POST` command carrying a JSON body.
    pub fn post(path: &'static str, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path,
            headers: json_headers(),
            body: Some(body),
        }
    }

    /// Join the command path onto a base URL.
    ///
    /// A trailing `/` on the base URL is ignored so `http://host/` and
    /// `http://host` produce the same URL.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path)
    }
}

fn json_headers() -> BTreeMap<String, String> {
    BTreeMap::from([("Content-Type".to_owned(), "application/json".to_owned())])
}
