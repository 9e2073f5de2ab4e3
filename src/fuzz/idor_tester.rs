use crate::findings::{FindingLog, Severity};
use crate::http_client::Session;

/// Object ids substituted into every template.
pub const TEST_IDS: &[u32] = &[1, 2, 3, 100, 999, 1000, 9999];

/// One family of id-bearing endpoints and what counts as leaked data there.
struct IdorFamily {
    kind: &'static str,
    noun: &'static str,
    /// What the description says was reached ("data", "profile")
    reached: &'static str,
    templates: &'static [&'static str],
    keywords: &'static [&'static str],
    leak: &'static str,
}

const ORGANIZATIONS: IdorFamily = IdorFamily {
    kind: "IDOR - Organization Access",
    noun: "organization",
    reached: "data",
    templates: &[
        "/api/organizations/{id}",
        "/api/organizations/{id}/members",
        "/api/organizations/{id}/settings",
        "/api/organizations/{id}/projects",
    ],
    keywords: &["email", "phone", "address", "private", "secret"],
    leak: "sensitive data",
};

const USERS: IdorFamily = IdorFamily {
    kind: "IDOR - User Profile Access",
    noun: "user",
    reached: "profile",
    templates: &[
        "/api/users/{id}",
        "/api/users/{id}/profile",
        "/api/users/{id}/projects",
        "/api/users/{id}/settings",
    ],
    keywords: &["email", "phone", "personal", "private"],
    leak: "personal information",
};

/// Walk organization and user endpoints with foreign ids, flagging any 200
/// whose body carries personal or sensitive keywords.
pub async fn test_idor_vulnerabilities(session: &Session, findings: &mut FindingLog) {
    println!("\n[*] Testing IDOR vulnerabilities");

    for family in [&ORGANIZATIONS, &USERS] {
        probe_family(session, findings, family).await;
    }
}

async fn probe_family(session: &Session, findings: &mut FindingLog, family: &IdorFamily) {
    for template in family.templates {
        for id in TEST_IDS {
            let endpoint = template.replace("{id}", &id.to_string());
            let url = match session.endpoint(&endpoint) {
                Ok(url) => url,
                Err(e) => {
                    println!("[!] Error testing {}: {}", endpoint, e);
                    continue;
                }
            };

            match session.get(&url).await {
                Ok(resp) if resp.is_ok() && contains_keyword(&resp.body, family.keywords) => {
                    findings.log(
                        family.kind,
                        Severity::High,
                        format!("Can access {} {} {} via {}", family.noun, id, family.reached, endpoint),
                        format!("GET {} returns {}", url, family.leak),
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "IDOR request failed");
                    println!("[!] Error testing {}: {}", url, e);
                }
            }
        }
    }
}

/// Case-insensitive substring check of `body` against `keywords`.
pub fn contains_keyword(body: &str, keywords: &[&str]) -> bool {
    let body = body.to_lowercase();
    keywords.iter().any(|k| body.contains(k))
}
