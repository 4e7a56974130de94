//! Plain-data descriptions of an HTTP exchange.
//!
//! The caller owns the [`RequestDescriptor`] and decides everything about it.
//! The [`RawResponse`] is what comes back off the wire before any status
//! check or decoding happens.

use url::Url;

pub use reqwest::Method;

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// A bodiless `GET` for `url`.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }
}

/// Status, headers and body bytes of a received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// First value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
