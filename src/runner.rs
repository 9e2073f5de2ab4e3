use std::path::{Path, PathBuf};

use crate::cli::{Cli, Commands};
use secprobe::security::jwt_analyzer;
use secprobe::{ProbeConfig, SecurityProbeRunner};

pub async fn run_from_cli(cli: Cli) -> anyhow::Result<()> {
    // Our crate at the requested level; keep reqwest/hyper quiet so the console report stays readable.
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.debug { "debug" } else if cli.verbose { "info" } else { "warn" };
    let filter_str = format!("secprobe={level},reqwest=info,hyper=info,h2=info", level = crate_level);
    let env_filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(true)
        .with_target(false)
        .init();

    match cli.command {
        Commands::DecodeJwt { token } => {
            let token = token.trim();
            let token = token.strip_prefix("Bearer ").unwrap_or(token);
            println!("{}", jwt_analyzer::describe(token)?);
        }
        Commands::Run { base_url, api_url, cookies, bearer, config, report, timeout, concurrency, insecure } => {
            let mut config = match config {
                Some(path) => ProbeConfig::from_file(Path::new(&path))?,
                None => ProbeConfig::default(),
            };

            if let Some(base_url) = base_url {
                config.base_url = base_url;
            }
            if let Some(api_url) = api_url {
                config.api_url = api_url;
            }
            if let Some(report) = report {
                config.report_path = PathBuf::from(report);
            }
            if let Some(timeout) = timeout {
                config.timeout_secs = timeout;
            }
            if let Some(n) = concurrency {
                config.rate_limit.set_flood_size(n);
            }
            if bearer.is_some() {
                config.bearer_token = bearer;
            }
            config.insecure |= insecure;
            config.cookies.extend(cookies);

            tracing::info!(base = %config.base_url, api = %config.api_url, cookies = config.cookies.len(), "starting assessment");

            let mut runner = SecurityProbeRunner::new(config)?;
            if runner.run_all_tests().await?.is_none() {
                tracing::debug!(path = %runner.report_path().display(), "no findings, report not written");
            }
        }
    }
    Ok(())
}
