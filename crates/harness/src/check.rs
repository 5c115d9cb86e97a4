//! Response assertions.
//!
//! [`expect_status`] is the single choke point between raw responses
//! and test verdicts: on a match the response is handed back untouched
//! for further inspection, on a mismatch it is consumed to build a
//! diagnostic carrying the status, request URL and response body.

use reqwest::Response;

use crate::error::TestError;

/// Assert that a response carries one of the accepted status codes.
///
/// Negative-path tests pass the expected failure code here (`401`,
/// `404`, ...); a "failure" status is only an error when it is not the
/// one the test asked for.
///
/// # Errors
///
/// Returns `TestError::Status` with the observed code, URL and body
/// when the status is not in `expected`.
pub async fn expect_status(response: Response, expected: &[u16]) -> Result<Response, TestError> {
    let actual = response.status().as_u16();
    if expected.contains(&actual) {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_else(|e| format!("<unreadable body: {e}>"));
    Err(TestError::Status {
        expected: expected.to_vec(),
        actual,
        url,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(code: u16, body: &str) -> Response {
        let inner = http::Response::builder()
            .status(code)
            .body(body.to_string())
            .expect("static response should build");
        Response::from(inner)
    }

    #[tokio::test]
    async fn matching_status_passes_response_through() {
        let resp = expect_status(response(200, "ok"), &[200])
            .await
            .expect("200 should be accepted");
        assert_eq!(resp.text().await.expect("body"), "ok");
    }

    #[tokio::test]
    async fn negative_path_status_is_accepted_when_expected() {
        assert!(expect_status(response(401, ""), &[200, 401]).await.is_ok());
    }

    #[tokio::test]
    async fn mismatch_carries_diagnostics() {
        let err = expect_status(response(409, "duplicate shop name"), &[200])
            .await
            .expect_err("409 should be rejected");
        match err {
            TestError::Status {
                expected,
                actual,
                body,
                ..
            } => {
                assert_eq!(expected, vec![200]);
                assert_eq!(actual, 409);
                assert_eq!(body, "duplicate shop name");
            }
            other => panic!("unexpected error variant: {other}"),
        }
    }
}
