//! Transport settings for [`crate::Client`].

use std::time::Duration;

/// Total time allowed for one request, body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings applied when building the underlying HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Option<Duration>,
    pub user_agent: String,
    /// Sent with every request unless the request sets the same header itself.
    pub default_headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: None,
            user_agent: default_user_agent(),
            default_headers: Vec::new(),
        }
    }
}

impl ClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
