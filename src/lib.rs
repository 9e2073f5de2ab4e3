pub mod assessment;
pub mod auth;
pub mod concurrent;
pub mod config;
pub mod error;
pub mod findings;
pub mod fuzz;
pub mod http_client;
pub mod output;
pub mod probe;
pub mod security;

pub use crate::assessment::SecurityProbeRunner;
pub use crate::config::ProbeConfig;
pub use crate::findings::{Finding, FindingLog, Severity};
