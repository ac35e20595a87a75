//! Fixed names used by the provisioning flow

/// Name of the authorizer created for the DB performance analyzer.
/// Not configurable: downstream scripts look the authorizer up by this name.
pub const SERVICE_NAME: &str = "db-performance-analyzer";

/// Region used when neither the CLI nor the environment supplies one
pub const DEFAULT_REGION: &str = "us-west-2";

/// Environment variable holding the region override
pub const REGION_ENV: &str = "AWS_REGION";

/// File written into every output directory
pub const CONFIG_FILE_NAME: &str = "cognito_config.env";

/// Number of access-token characters shown in log output
pub const TOKEN_PREVIEW_CHARS: usize = 20;

/// Exported variable names, in the order they appear in the env file
pub const ENV_KEYS: [&str; 6] = [
    "COGNITO_USERPOOL_ID",
    "COGNITO_APP_CLIENT_ID",
    "COGNITO_CLIENT_SECRET",
    "COGNITO_DOMAIN_NAME",
    "COGNITO_DISCOVERY_URL",
    "COGNITO_ACCESS_TOKEN",
];
