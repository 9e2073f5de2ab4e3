pub mod idor_tester;
pub mod xss_tester;

pub use idor_tester::test_idor_vulnerabilities;
pub use xss_tester::test_xss_vulnerabilities;
