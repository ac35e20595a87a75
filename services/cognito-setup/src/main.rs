//! Cognito setup
//!
//! One-shot provisioning binary that:
//! 1. Resolves the AWS region (default us-west-2)
//! 2. Creates an OAuth authorizer backed by a managed Cognito user pool
//! 3. Fetches an initial access token with the issued client credentials
//! 4. Writes `cognito_config.env` into each output directory
//!
//! Exits non-zero naming the failed stage when any step fails.

mod config;
mod error;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use cognito_auth::{HttpGateway, SERVICE_NAME, provision};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, resolve_output_dirs, resolve_region};

const USAGE: &str = "\
Usage: cognito-setup [--config <path>] [--region <region>] [--output-dir <dir>]...

Provisions a Cognito-backed OAuth authorizer and writes cognito_config.env.

Options:
  --config <path>      TOML config file (default: $CONFIG_PATH or cognito-setup.toml)
  --region <region>    AWS region (default: $AWS_REGION or us-west-2)
  --output-dir <dir>   Directory to write cognito_config.env into; repeatable
  -h, --help           Print this help";

/// Parsed command line
#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<String>,
    region: Option<String>,
    output_dirs: Vec<PathBuf>,
    help: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> error::Result<Self> {
        let mut parsed = Args::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => parsed.config = Some(flag_value(&arg, args.next())?),
                "--region" => parsed.region = Some(flag_value(&arg, args.next())?),
                "--output-dir" => parsed
                    .output_dirs
                    .push(PathBuf::from(flag_value(&arg, args.next())?)),
                "-h" | "--help" => parsed.help = true,
                other => {
                    return Err(error::Error::Cli(format!("unexpected argument: {other}")));
                }
            }
        }
        Ok(parsed)
    }
}

fn flag_value(flag: &str, value: Option<String>) -> error::Result<String> {
    value.ok_or_else(|| error::Error::Cli(format!("{flag} needs a value")))
}

/// Human-readable lines on stdout, or JSON lines when LOG_FORMAT=json.
/// Filter comes from LOG_LEVEL, then RUST_LOG, then "info".
fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = Config::discover(args.config.as_deref())
        .context("failed to load configuration")?;

    let region = resolve_region(args.region.as_deref(), config.region.as_deref());
    info!(%region, "using AWS region");

    let output_dirs = resolve_output_dirs(&args.output_dirs, &config.output.dirs)
        .context("failed to resolve output directories")?;

    let mut gateway = HttpGateway::new(
        config.gateway.endpoint()?,
        region,
        Duration::from_secs(config.gateway.timeout_secs),
    )?;
    if let Some(url) = &config.gateway.token_endpoint {
        gateway = gateway.with_token_endpoint(url);
    }

    match provision::run(&gateway, SERVICE_NAME, &output_dirs)
        .await
        .into_result()
    {
        Ok(_) => Ok(()),
        Err((stage, cause)) => Err(error::Error::Setup { stage, cause }.into()),
    }
}
