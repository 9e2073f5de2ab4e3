use crate::config::{ProbeConfig, RateLimitConfig};
use crate::findings::{Finding, FindingLog, Severity};
use crate::http_client::{ProbeTarget, Session};
use crate::{auth, fuzz, output, probe};
use std::path::{Path, PathBuf};

/// Owns the session, target and findings of one assessment and runs the
/// probe catalogue against it.
pub struct SecurityProbeRunner {
    session: Session,
    findings: FindingLog,
    rate_limit: RateLimitConfig,
    report_path: PathBuf,
}

impl SecurityProbeRunner {
    pub fn new(config: ProbeConfig) -> anyhow::Result<Self> {
        let target = ProbeTarget::new(&config.base_url, &config.api_url)?;
        let mut session = Session::new(target, config.timeout_secs, config.insecure)?;
        session.set_cookies(&config.cookies);
        if let Some(token) = &config.bearer_token {
            session.set_bearer_token(token);
        }

        Ok(Self {
            session,
            findings: FindingLog::new(),
            rate_limit: config.rate_limit,
            report_path: config.report_path,
        })
    }

    pub fn set_session_cookies<I, K, V>(&mut self, cookies: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.session.set_cookies(cookies);
    }

    pub fn set_bearer_token(&mut self, token: &str) {
        self.session.set_bearer_token(token);
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    pub fn log_vulnerability(
        &mut self,
        kind: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
        proof_of_concept: impl Into<String>,
    ) {
        self.findings.log(kind, severity, description, proof_of_concept);
    }

    pub fn findings(&self) -> &[Finding] {
        self.findings.as_slice()
    }

    /// IDOR, upload, auth bypass, rate limiting, XSS, then the report.
    /// Individual request failures are reported by each probe and never stop the run.
    pub async fn run_all_tests(&mut self) -> anyhow::Result<Option<PathBuf>> {
        let target = self.session.target();
        println!("[*] Starting security assessment");
        println!("[>] Base: {}", target.base_url());
        println!("[>] API:  {}", target.api_url());
        if !self.session.has_cookies() {
            println!("[!] No session cookies set; authenticated probes will run anonymously");
        }

        fuzz::test_idor_vulnerabilities(&self.session, &mut self.findings).await;
        probe::test_file_upload_vulnerabilities(&self.session, &mut self.findings).await;
        auth::test_authentication_bypass(&self.session, &mut self.findings).await;
        probe::test_rate_limiting(&self.session, &mut self.findings, &self.rate_limit).await;
        fuzz::test_xss_vulnerabilities(&self.session, &mut self.findings).await;

        self.generate_report()
    }

    /// Print the report; writes the JSON file only when something was found.
    pub fn generate_report(&self) -> anyhow::Result<Option<PathBuf>> {
        output::generate_report(&self.findings, &self.report_path)
    }
}
