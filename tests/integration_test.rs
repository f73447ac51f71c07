use api_error::http::error_for_status;
use api_error::{ApiError, ErrorKind, FixedClock, Headers};
use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::Server;

fn api_error_cmd() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("api-error"));
    cmd.env_remove("API_ERROR_NOW");
    cmd
}

#[test]
fn test_inspect_rate_limited() {
    api_error_cmd()
        .args([
            "inspect",
            "-s",
            "429",
            "-H",
            "retry-after: 12",
            "-H",
            "Retry-After: 13",
        ])
        .assert()
        .success()
        .stdout(predicates::str::contains("kind: Rate limit exceeded"))
        .stdout(predicates::str::contains("\nretry-after: 12\n"));
}

#[test]
fn test_inspect_capitalized_retry_after_only() {
    api_error_cmd()
        .args(["inspect", "-s", "429", "-H", "Retry-After: 16"])
        .assert()
        .success()
        .stdout(predicates::str::contains("\nretry-after: 16\n"));
}

#[test]
fn test_inspect_reset_with_pinned_clock() {
    api_error_cmd()
        .args([
            "inspect",
            "-m",
            "Too many calls",
            "-H",
            "x-ratelimit-reset: 1700003600",
            "-H",
            "X-RateLimit-Reset: 1700009999",
        ])
        .env("API_ERROR_NOW", "1700000000")
        .assert()
        .success()
        .stdout(predicates::str::contains("message: Too many calls"))
        .stdout(predicates::str::contains("ratelimit-reset: 1700003600"))
        .stdout(predicates::str::contains("retry-after: 3600"));
}

#[test]
fn test_inspect_out_of_range_reset_does_not_panic() {
    api_error_cmd()
        .args([
            "inspect",
            "-H",
            "X-RateLimit-Reset: 9223372036854775808",
            "--now",
            "1700000000",
        ])
        .assert()
        .success()
        .stdout(predicates::str::contains("ratelimit-reset: 0"))
        .stdout(predicates::str::contains("\nretry-after: 0\n"));
}

#[test]
fn test_inspect_reset_in_the_past() {
    api_error_cmd()
        .args([
            "inspect",
            "-H",
            "X-RateLimit-Reset: 1699996400",
            "--now",
            "1700000000",
        ])
        .assert()
        .success()
        .stdout(predicates::str::contains("retry-after: 0"));
}

#[test]
fn test_inspect_empty_headers_default_to_zero() {
    api_error_cmd()
        .args(["inspect", "--json"])
        .assert()
        .success()
        .stdout(predicates::str::contains(r#""limit": 0"#))
        .stdout(predicates::str::contains(r#""remaining": 0"#))
        .stdout(predicates::str::contains(r#""reset": 0"#))
        .stdout(predicates::str::contains(r#""retry_after": 0"#));
}

#[test]
fn test_inspect_rejects_non_mapping_headers() {
    api_error_cmd()
        .args(["inspect", "--headers-json", r#"["header"]"#])
        .assert()
        .failure()
        .stderr(predicates::str::contains("headers must be a mapping"));
}

#[test]
fn test_inspect_rejects_malformed_header() {
    api_error_cmd()
        .args(["inspect", "-H", "Retry-After"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("expected 'Name: value'"));
}

#[tokio::test]
async fn test_client_error_from_rate_limited_response() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/1/startups/6702")
        .with_status(429)
        .with_header("retry-after", "12")
        .with_header("x-ratelimit-limit", "1000")
        .with_header("x-ratelimit-remaining", "0")
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "over_limit", "message": "Enhance your calm"}"#)
        .create_async()
        .await;

    let response = reqwest::get(format!("{}/1/startups/6702", server.url()))
        .await
        .unwrap();
    let error = error_for_status(response).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::RateLimitExceeded);
    assert_eq!(error.to_string(), "Enhance your calm");
    assert_eq!(error.retry_after(), 12);
    assert_eq!(error.ratelimit_limit(), 1000);
    assert_eq!(error.ratelimit_remaining(), 0);
    assert!(error.is_retryable());
}

#[test]
fn test_errors_can_be_shared_across_threads() {
    let headers: Headers = [("x-ratelimit-reset", 1_700_000_060_u64)]
        .into_iter()
        .collect();
    let error = std::sync::Arc::new(ApiError::from_status(
        reqwest::StatusCode::SERVICE_UNAVAILABLE,
        None,
        headers,
    ));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let error = std::sync::Arc::clone(&error);
            std::thread::spawn(move || {
                error.retry_after_with(&FixedClock::from_unix_secs(1_700_000_000))
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 60);
    }
}
