use crate::findings::{Finding, FindingLog, Severity};
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// Finding kinds that are raised on a 2xx alone, without proof the payload took effect.
const ACCEPTANCE_ONLY_KINDS: &[&str] = &["File Upload", "Authorization Bypass", "JWT"];

/// Print the assessment report and, if anything was found, write the JSON
/// array of findings to `path`. Returns the path written, or `None` when
/// there was nothing to report (no file is created or overwritten).
pub fn generate_report(findings: &FindingLog, path: &Path) -> anyhow::Result<Option<PathBuf>> {
    println!("\n{}", "=".repeat(50));
    println!("VULNERABILITY ASSESSMENT REPORT");
    println!("{}", "=".repeat(50));

    if findings.is_empty() {
        println!("[OK] No vulnerabilities detected in automated testing.");
        println!("     Manual testing may still reveal issues.");
        return Ok(None);
    }

    let counts = findings.severity_counts();
    println!("\n[*] Summary:");
    for severity in Severity::ALL {
        println!("    {}: {}", severity.title(), counts.get(&severity).copied().unwrap_or(0));
    }

    println!("\n[*] Detailed Findings:");
    for (i, finding) in findings.as_slice().iter().enumerate() {
        println!("\n{}. {} ({})", i + 1, finding.kind, finding.severity);
        println!("   Description: {}", finding.description);
        println!("   PoC: {}", finding.proof_of_concept);
        println!("   Found: {}", finding.timestamp);
    }

    if findings.as_slice().iter().any(is_acceptance_only) {
        println!("\n[i] Upload and authorization findings reflect 2xx acceptance only; confirm exploitation manually.");
    }

    write_json(path, findings.as_slice())?;
    println!("\n[+] Full report saved to: {}", path.display());

    Ok(Some(path.to_path_buf()))
}

/// Overwrite `path` with the findings as a pretty-printed JSON array.
fn write_json(path: &Path, findings: &[Finding]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(findings)?;
    fs::write(path, json).with_context(|| format!("failed to write report {}", path.display()))?;
    Ok(())
}

fn is_acceptance_only(finding: &Finding) -> bool {
    ACCEPTANCE_ONLY_KINDS.iter().any(|k| finding.kind.starts_with(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn empty_log_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vulnerability_report.json");

        let written = generate_report(&FindingLog::new(), &path).unwrap();
        assert!(written.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn empty_log_leaves_previous_report_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vulnerability_report.json");
        fs::write(&path, "previous").unwrap();

        generate_report(&FindingLog::new(), &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
    }

    #[test]
    fn findings_are_written_as_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vulnerability_report.json");
        fs::write(&path, "stale").unwrap();

        let mut log = FindingLog::new();
        log.log("Reflected XSS", Severity::High, "XSS payload reflected in /api/search", "POST ...");
        log.log("Rate Limiting - IP Header Bypass", Severity::Medium, "bypassed", "20 requests");
        log.log("File Upload - PHP Upload", Severity::Critical, "uploaded", "POST ...");

        let written = generate_report(&log, &path).unwrap();
        assert_eq!(written.as_deref(), Some(path.as_path()));

        let parsed: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let items = parsed.as_array().unwrap();
        assert_eq!(items.len(), 3);
        for item in items {
            let obj = item.as_object().unwrap();
            assert_eq!(obj.len(), 5);
            for key in ["type", "severity", "description", "proof_of_concept", "timestamp"] {
                assert!(obj.contains_key(key), "missing {}", key);
            }
        }
        assert_eq!(items[1]["severity"], "MEDIUM");
    }

    #[test]
    fn acceptance_only_kinds() {
        let finding = |kind: &str| Finding {
            kind: kind.to_string(),
            severity: Severity::Critical,
            description: String::new(),
            proof_of_concept: String::new(),
            timestamp: String::new(),
        };
        assert!(is_acceptance_only(&finding("File Upload - SVG XSS")));
        assert!(is_acceptance_only(&finding("JWT - Weak Secret")));
        assert!(!is_acceptance_only(&finding("Reflected XSS")));
    }
}
