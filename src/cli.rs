use clap::Parser;

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable detailed debug logging (global)
    #[arg(long, default_value_t = false, global = true)]
    pub debug: bool,

    /// Enable verbose logging (global)
    #[arg(long, default_value_t = false, global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run every probe against the target and write the findings report
    Run {
        /// Web application URL (e.g. https://app.example.com)
        #[arg(long)]
        base_url: Option<String>,

        /// API URL the probe paths are resolved against
        #[arg(long)]
        api_url: Option<String>,

        /// Session cookie as NAME=VALUE (repeatable)
        #[arg(short = 'C', long = "cookie", value_name = "NAME=VALUE", value_parser = parse_cookie)]
        cookies: Vec<(String, String)>,

        /// Bearer token for authenticated requests; enables JWT tampering checks
        #[arg(long)]
        bearer: Option<String>,

        /// JSON config file; flags given here override it
        #[arg(short = 'c', long, value_name = "FILE")]
        config: Option<String>,

        /// Report file (default: vulnerability_report.json)
        #[arg(short = 'o', long, value_name = "FILE")]
        report: Option<String>,

        /// Request timeout in seconds (default: 10)
        #[arg(long)]
        timeout: Option<u64>,

        /// Requests fired in the concurrent login flood (default: 50); flagged above 10 successes
        #[arg(short = 'n', long)]
        concurrency: Option<usize>,

        /// Accept invalid TLS certificates
        #[arg(long, default_value_t = false)]
        insecure: bool,
    },

    /// Decode a JWT without verifying it and show the claims the tamper checks would forge
    DecodeJwt {
        /// Compact JWT (a leading "Bearer " is accepted)
        token: String,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Split a `NAME=VALUE` cookie argument at the first `=`.
pub fn parse_cookie(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}
