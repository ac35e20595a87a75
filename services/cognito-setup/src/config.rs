//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! Every key is optional in the file except that the gateway endpoint must
//! come from somewhere: `[gateway] endpoint` or `IDENTITY_GATEWAY_URL`.

use std::path::{Path, PathBuf};

use cognito_auth::{DEFAULT_REGION, REGION_ENV};
use serde::Deserialize;
use tracing::debug;

/// Config file looked up in the working directory when none is named
const DEFAULT_CONFIG_FILE: &str = "cognito-setup.toml";

/// Environment variable overriding `[gateway] endpoint`
const GATEWAY_URL_ENV: &str = "IDENTITY_GATEWAY_URL";

/// Root configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Region used when neither `--region` nor `AWS_REGION` is set
    pub region: Option<String>,
    pub gateway: GatewayConfig,
    pub output: OutputConfig,
}

/// Identity gateway settings
#[derive(Debug, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Replaces the token endpoint reported by the gateway
    #[serde(default)]
    pub token_endpoint: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Where the env file is written
#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub dirs: Vec<PathBuf>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            token_endpoint: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl GatewayConfig {
    /// Provisioning endpoint; an error when it was never configured.
    pub fn endpoint(&self) -> common::Result<&str> {
        self.endpoint.as_deref().ok_or_else(|| {
            common::Error::Config(format!(
                "gateway endpoint is not set; use [gateway] endpoint or {GATEWAY_URL_ENV}"
            ))
        })
    }
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.finish()
    }

    /// Configuration without a file: defaults plus environment.
    pub fn from_env() -> common::Result<Self> {
        Config::default().finish()
    }

    /// Load the named config file, or fall back to the default one.
    ///
    /// A path given on the command line or in `CONFIG_PATH` must exist. The
    /// default `cognito-setup.toml` is optional.
    pub fn discover(cli_path: Option<&str>) -> common::Result<Self> {
        let explicit = cli_path.is_some() || non_empty_env("CONFIG_PATH").is_some();
        let path = Self::resolve_path(cli_path);
        if explicit || path.exists() {
            debug!(path = %path.display(), "loading configuration");
            Self::load(&path)
        } else {
            debug!("no configuration file, using defaults");
            Self::from_env()
        }
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    ///
    /// An empty `CONFIG_PATH` counts as unset.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Some(p) = non_empty_env("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    fn finish(mut self) -> common::Result<Self> {
        if let Some(url) = non_empty_env(GATEWAY_URL_ENV) {
            self.gateway.endpoint = Some(url);
        }

        let endpoint = self.gateway.endpoint()?;
        require_http_url("gateway endpoint", endpoint)?;
        if let Some(ref url) = self.gateway.token_endpoint {
            require_http_url("token_endpoint", url)?;
        }

        if self.gateway.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(self)
    }
}

fn require_http_url(name: &str, url: &str) -> common::Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(common::Error::Config(format!(
            "{name} must start with http:// or https://, got: {url}"
        )))
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Region to provision in.
///
/// `--region` wins, then a non-empty `AWS_REGION`, then the config file,
/// then `us-west-2`. The value is not validated; a bad region fails inside
/// the gateway.
pub fn resolve_region(cli_region: Option<&str>, file_region: Option<&str>) -> String {
    cli_region
        .filter(|r| !r.is_empty())
        .map(str::to_owned)
        .or_else(|| non_empty_env(REGION_ENV))
        .or_else(|| file_region.filter(|r| !r.is_empty()).map(str::to_owned))
        .unwrap_or_else(|| DEFAULT_REGION.to_owned())
}

/// Directories that receive the env file.
///
/// `--output-dir` flags replace the config file list, which replaces the
/// defaults: `../config` relative to the binary's directory, and `config`
/// under the working directory.
pub fn resolve_output_dirs(
    cli_dirs: &[PathBuf],
    file_dirs: &[PathBuf],
) -> common::Result<Vec<PathBuf>> {
    if !cli_dirs.is_empty() {
        return Ok(cli_dirs.to_vec());
    }
    if !file_dirs.is_empty() {
        return Ok(file_dirs.to_vec());
    }
    default_output_dirs()
}

fn default_output_dirs() -> common::Result<Vec<PathBuf>> {
    let exe = std::env::current_exe()?;
    let exe_dir = exe.parent().ok_or_else(|| {
        common::Error::Config(format!("{} has no parent directory", exe.display()))
    })?;
    let cwd = std::env::current_dir()?;
    Ok(vec![exe_dir.join("..").join("config"), cwd.join("config")])
}
