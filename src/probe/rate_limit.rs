use crate::concurrent::ConcurrentProbe;
use crate::config::RateLimitConfig;
use crate::error::ProbeError;
use crate::findings::{FindingLog, Severity};
use crate::http_client::{execute, Session};
use serde_json::json;
use url::Url;

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";

/// More non-429 answers than this in the flood means rate limiting is too lax.
/// Absolute count, independent of the flood size; a flood of this many or
/// fewer requests can never be flagged.
pub const FLOOD_THRESHOLD: usize = 10;

pub const BYPASS_ATTEMPTS: usize = 20;
pub const BYPASS_THRESHOLD: usize = 15;

/// Client-identifying headers a proxy-aware limiter may trust.
pub const BYPASS_HEADERS: &[(&str, &str)] = &[
    ("X-Forwarded-For", "1.1.1.1"),
    ("X-Real-IP", "2.2.2.2"),
    ("X-Originating-IP", "3.3.3.3"),
    ("Client-IP", "4.4.4.4"),
];

pub async fn test_rate_limiting(session: &Session, findings: &mut FindingLog, config: &RateLimitConfig) {
    println!("\n[*] Testing rate limiting");

    let url = match session.endpoint(LOGIN_ENDPOINT) {
        Ok(url) => url,
        Err(e) => {
            println!("[!] Error testing rate limiting: {}", e);
            return;
        }
    };

    test_concurrent_login_flood(session, findings, &url, config).await;
    test_ip_header_bypass(session, findings, &url).await;
}

/// Fire `concurrent_requests` bad-credential logins at once, unauthenticated.
/// Returns how many were answered with something other than 429.
pub async fn test_concurrent_login_flood(
    session: &Session,
    findings: &mut FindingLog,
    url: &Url,
    config: &RateLimitConfig,
) -> usize {
    let total = config.concurrent_requests;
    if total <= FLOOD_THRESHOLD {
        tracing::warn!(total, threshold = FLOOD_THRESHOLD, "flood too small to ever exceed the threshold");
    }
    println!("[*] Sending {} concurrent login attempts...", total);

    let client = session.unauthenticated_client();
    let target = url.clone();
    let body = json!({ "username": "invalid_user", "password": "invalid_pass" });
    let pool = ConcurrentProbe::new(config.max_in_flight);

    let results = pool
        .execute((0..total).collect::<Vec<_>>(), move |_attempt: usize| {
            let request = client.post(target.clone()).json(&body);
            let target = target.clone();
            async move { execute(request, &target).await.map(|resp| resp.status) }
        })
        .await;

    let successes = count_unthrottled(&results);
    let (completed, failed) = pool.get_stats();
    tracing::info!(successes, completed, failed, "concurrent login flood finished");

    if successes > FLOOD_THRESHOLD {
        findings.log(
            "Rate Limiting - Insufficient Protection",
            Severity::Medium,
            format!("{}/{} concurrent requests succeeded", successes, total),
            "Concurrent login attempts bypass rate limiting",
        );
    }

    successes
}

/// For each spoofable header, send a burst of logins carrying it and count
/// the ones that were not throttled.
pub async fn test_ip_header_bypass(session: &Session, findings: &mut FindingLog, url: &Url) {
    let body = json!({ "username": "test", "password": "test" });

    for &(name, value) in BYPASS_HEADERS {
        let mut unthrottled = 0;
        for _ in 0..BYPASS_ATTEMPTS {
            match session.post_json_unauthenticated(url, &body, Some((name, value))).await {
                Ok(resp) if resp.status != 429 => unthrottled += 1,
                Ok(_) => {}
                Err(e) => tracing::debug!(error = %e, header = name, "bypass request failed"),
            }
        }

        tracing::debug!(header = name, unthrottled, "header bypass burst finished");
        if unthrottled > BYPASS_THRESHOLD {
            findings.log(
                "Rate Limiting - IP Header Bypass",
                Severity::Medium,
                format!("Rate limiting bypassed using {} header", name),
                format!("{} requests with {}: {} bypassed rate limiting", BYPASS_ATTEMPTS, name, value),
            );
        }
    }
}

/// Responses with a status other than 429. Transport failures and lost tasks count as throttled.
pub fn count_unthrottled(results: &[Option<Result<u16, ProbeError>>]) -> usize {
    results
        .iter()
        .filter(|r| match r {
            Some(Ok(status)) => *status != 429,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "flood request failed");
                false
            }
            None => false,
        })
        .count()
}
