//! End-to-end tests of the Strict-Transport-Security header over real TCP.

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use hsts_middleware::{HstsError, HstsPolicy, HstsSettings};

mod common;

async fn hsts_header(client: &reqwest::Client, url: &str) -> Option<String> {
    let response = client.get(url).send().await.unwrap();
    assert!(response.status().is_success());
    response
        .headers()
        .get("strict-transport-security")
        .map(|v| v.to_str().unwrap().to_string())
}

#[tokio::test]
async fn test_default_one_year() {
    let server = common::start_server(HstsSettings::new(31_536_000)).await;
    let client = reqwest::Client::new();

    for path in ["/", "/index.html", "/api/v1/items?page=2"] {
        assert_eq!(
            hsts_header(&client, &server.url(path)).await.as_deref(),
            Some("max-age=31536000")
        );
    }
}

#[tokio::test]
async fn test_all_directives() {
    let settings = HstsSettings::new(3600).with_include_subdomains().with_preload();
    let server = common::start_server(settings).await;
    let client = reqwest::Client::new();

    assert_eq!(
        hsts_header(&client, &server.url("/")).await.as_deref(),
        Some("max-age=3600; includeSubDomains; preload")
    );

    let response = client.post(server.url("/form")).body("x=1").send().await.unwrap();
    assert_eq!(
        response.headers().get("strict-transport-security").unwrap(),
        "max-age=3600; includeSubDomains; preload"
    );
}

#[tokio::test]
async fn test_expiry_countdown_and_fallback() {
    let settings = HstsSettings::new(0).with_expires(Utc::now() + TimeDelta::seconds(2));
    let server = common::start_server(settings).await;
    let client = reqwest::Client::new();

    let first = hsts_header(&client, &server.url("/")).await.unwrap();
    assert!(
        first == "max-age=1" || first == "max-age=2",
        "unexpected countdown value: {first}"
    );

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(
        hsts_header(&client, &server.url("/")).await.as_deref(),
        Some("max-age=0")
    );
}

#[tokio::test]
async fn test_past_expiry_uses_max_age() {
    let settings = HstsSettings::new(100).with_expires(Utc::now() - TimeDelta::hours(1));
    let server = common::start_server(settings).await;
    let client = reqwest::Client::new();

    for _ in 0..3 {
        assert_eq!(
            hsts_header(&client, &server.url("/")).await.as_deref(),
            Some("max-age=100")
        );
    }
}

#[test]
fn test_negative_max_age_rejected() {
    assert_eq!(
        HstsPolicy::configure(&HstsSettings::new(-1)),
        Err(HstsError::InvalidMaxAge(-1))
    );
}
