//! HTTP status validation.

use crate::{request::RawResponse, ApiError};

/// Longest body excerpt written to the log when a call fails.
const MAX_SNIPPET: usize = 2000;

/// Passes the body of a `2xx` response through unchanged.
///
/// Any other status becomes [`ApiError::InvalidResponse`] whose reason names
/// `call_context`. The body is never inspected to decide validity.
pub fn validate(response: RawResponse, call_context: &str) -> Result<Vec<u8>, ApiError> {
    if response.is_success() {
        return Ok(response.body);
    }

    tracing::error!(
        "{} failed with status {}: {}",
        call_context,
        response.status,
        truncate_body(&response.body)
    );
    Err(ApiError::InvalidResponse {
        call_context: call_context.to_string(),
        status: response.status,
        reason: format!("{} API call failed with invalid http response", call_context),
    })
}

pub(crate) fn truncate_body(body: &[u8]) -> String {
    let body = String::from_utf8_lossy(body);
    if body.len() <= MAX_SNIPPET {
        return body.into_owned();
    }
    let mut end = MAX_SNIPPET;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn success_statuses_pass_body_through() {
        for status in 200..=299 {
            let body = validate(response(status, r#"{"id":1}"#), "getItem").unwrap();
            assert_eq!(body, br#"{"id":1}"#);
        }
    }

    #[test]
    fn other_statuses_are_invalid_responses() {
        for status in [100, 101, 199, 300, 301, 304, 400, 401, 404, 418, 500, 503, 599] {
            let err = validate(response(status, "nope"), "getItem").unwrap_err();
            match err {
                ApiError::InvalidResponse {
                    call_context,
                    status: got,
                    reason,
                } => {
                    assert_eq!(call_context, "getItem");
                    assert_eq!(got, status);
                    assert_eq!(reason, "getItem API call failed with invalid http response");
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn call_context_is_embedded_verbatim() {
        let err = validate(response(404, ""), "Fetch user/profile (v2)").unwrap_err();
        assert_eq!(
            err.reason(),
            "Fetch user/profile (v2) API call failed with invalid http response"
        );
    }

    #[test]
    fn error_status_ignores_body_content() {
        let err = validate(response(500, r#"{"id":1}"#), "getItem").unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse { status: 500, .. }));
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body(b"short"), "short");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "é".repeat(MAX_SNIPPET);
        let snippet = truncate_body(body.as_bytes());
        assert!(snippet.ends_with("...[truncated]"));
        assert!(snippet.len() <= MAX_SNIPPET + "...[truncated]".len());
    }
}
