//! Response assertions with readable failure output

use axum_test::TestResponse;
use serde_json::Value;

/// Assert the status code, printing the body on mismatch
pub fn assert_status(response: &TestResponse, expected: u16) {
    let actual = response.status_code().as_u16();
    assert_eq!(
        actual,
        expected,
        "Expected status {}, got {} with body: {}",
        expected,
        actual,
        response.text()
    );
}

/// Assert an error response: status, `status` field and an `error` fragment
pub fn assert_error(response: &TestResponse, expected: u16, fragment: &str) {
    assert_status(response, expected);
    let body: Value = response.json();
    assert_eq!(body["status"], expected);
    let message = body["error"].as_str().unwrap_or_default();
    assert!(
        message.contains(fragment),
        "Expected error '{}' to contain '{}'",
        message,
        fragment
    );
}
