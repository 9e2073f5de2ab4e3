use crate::findings::{FindingLog, Severity};
use crate::http_client::{Session, UploadFile};

pub const UPLOAD_ENDPOINTS: &[&str] = &[
    "/api/upload",
    "/api/files/upload",
    "/upload",
    "/api/projects/upload",
    "/api/datasets/upload",
];

const SVG_XSS: &str = r#"<?xml version="1.0" standalone="no"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN"
"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg version="1.1" baseProfile="full" xmlns="http://www.w3.org/2000/svg">
   <rect width="300" height="100" style="fill:rgb(0,0,255);stroke-width:3;stroke:rgb(0,0,0)" />
   <script type="text/javascript">
      alert('XSS_VULNERABILITY_DETECTED');
   </script>
</svg>"#;

const PHP_PROBE: &str = "<?php echo 'PHP_EXECUTION_TEST'; ?>";

/// A malicious file and how to report it when the server takes it.
struct UploadCase {
    file: UploadFile,
    kind: &'static str,
    severity: Severity,
    accepted: &'static str,
    poc: &'static str,
}

const CASES: [UploadCase; 2] = [
    UploadCase {
        file: UploadFile { file_name: "xss_test.svg", content: SVG_XSS, mime: "image/svg+xml" },
        kind: "File Upload - SVG XSS",
        severity: Severity::High,
        accepted: "SVG file with XSS uploaded successfully to",
        poc: "with malicious SVG file",
    },
    UploadCase {
        file: UploadFile { file_name: "test.php", content: PHP_PROBE, mime: "application/x-php" },
        kind: "File Upload - PHP Upload",
        severity: Severity::Critical,
        accepted: "PHP file uploaded successfully to",
        poc: "with PHP file",
    },
];

/// Try an SVG carrying a script and a PHP file against each upload endpoint.
/// A 200/201 is reported as-is; whether the stored file is later served or
/// executed is not checked.
pub async fn test_file_upload_vulnerabilities(session: &Session, findings: &mut FindingLog) {
    println!("\n[*] Testing file upload vulnerabilities");

    for &endpoint in UPLOAD_ENDPOINTS {
        let url = match session.endpoint(endpoint) {
            Ok(url) => url,
            Err(e) => {
                println!("[!] Error testing upload to {}: {}", endpoint, e);
                continue;
            }
        };

        for case in &CASES {
            match session.post_file(&url, &case.file).await {
                Ok(resp) if resp.is_accepted() => {
                    findings.log(
                        case.kind,
                        case.severity,
                        format!("{} {}", case.accepted, endpoint),
                        format!("POST {} {}", url, case.poc),
                    );
                }
                Ok(resp) => {
                    tracing::debug!(endpoint, status = resp.status, file = case.file.file_name, "upload rejected");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "upload request failed");
                    println!("[!] Error testing {} upload to {}: {}", case.file.file_name, url, e);
                }
            }
        }
    }
}
