pub mod rate_limit;
pub mod upload;

pub use rate_limit::test_rate_limiting;
pub use upload::test_file_upload_vulnerabilities;
