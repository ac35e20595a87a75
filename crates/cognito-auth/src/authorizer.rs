//! Authorizer data returned by the identity gateway
//!
//! The gateway answers `create_authorizer` with a JSON document carrying the
//! issued client credentials (`client_info`) and the JWT authorizer settings
//! (`authorizer_config`). Field names follow the gateway's wire format, so
//! the nested authorizer block keeps its camelCase keys.

use serde::Deserialize;

use common::Secret;

/// Result of creating an OAuth authorizer.
///
/// All values are opaque strings; nothing here validates their contents.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizerResult {
    pub client_info: ClientInfo,
    pub authorizer_config: AuthorizerConfig,
}

impl AuthorizerResult {
    /// OpenID discovery endpoint of the managed identity provider
    pub fn discovery_url(&self) -> &str {
        &self.authorizer_config.custom_jwt_authorizer.discovery_url
    }
}

/// Client credentials issued for the new authorizer.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    pub user_pool_id: String,
    pub client_id: String,
    pub client_secret: Secret<String>,
    /// Hosted-UI domain prefix; the token endpoint is derived from it
    pub domain_prefix: String,
    /// Token endpoint, when the gateway reports one explicitly
    #[serde(default)]
    pub token_endpoint: Option<String>,
    /// OAuth scope to request during the client-credentials grant
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizerConfig {
    #[serde(rename = "customJWTAuthorizer")]
    pub custom_jwt_authorizer: CustomJwtAuthorizer,
}

/// Only the discovery URL is consumed; other authorizer keys are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomJwtAuthorizer {
    pub discovery_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "client_info": {
            "user_pool_id": "us-west-2_AbCdEf",
            "client_id": "3n4k5j6h",
            "client_secret": "very-secret",
            "domain_prefix": "db-perf-1a2b",
            "token_endpoint": "https://db-perf-1a2b.auth.us-west-2.amazoncognito.com/oauth2/token",
            "scope": "db-performance-analyzer/invoke"
        },
        "authorizer_config": {
            "customJWTAuthorizer": {
                "discoveryUrl": "https://cognito-idp.us-west-2.amazonaws.com/us-west-2_AbCdEf/.well-known/openid-configuration",
                "allowedClients": ["3n4k5j6h"]
            }
        }
    }"#;

    #[test]
    fn deserializes_gateway_response() {
        let result: AuthorizerResult = serde_json::from_str(FULL).unwrap();
        assert_eq!(result.client_info.user_pool_id, "us-west-2_AbCdEf");
        assert_eq!(result.client_info.client_id, "3n4k5j6h");
        assert_eq!(result.client_info.client_secret.expose(), "very-secret");
        assert_eq!(result.client_info.domain_prefix, "db-perf-1a2b");
        assert_eq!(
            result.client_info.scope.as_deref(),
            Some("db-performance-analyzer/invoke")
        );
        assert!(result.discovery_url().ends_with("/.well-known/openid-configuration"));
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let json = r#"{
            "client_info": {
                "user_pool_id": "up-1",
                "client_id": "cid-1",
                "client_secret": "secret-1",
                "domain_prefix": "dom-1"
            },
            "authorizer_config": {
                "customJWTAuthorizer": { "discoveryUrl": "https://example/.well-known" }
            }
        }"#;
        let result: AuthorizerResult = serde_json::from_str(json).unwrap();
        assert!(result.client_info.token_endpoint.is_none());
        assert!(result.client_info.scope.is_none());
        assert_eq!(result.discovery_url(), "https://example/.well-known");
    }

    #[test]
    fn missing_discovery_url_is_rejected() {
        let json = r#"{
            "client_info": {
                "user_pool_id": "up-1",
                "client_id": "cid-1",
                "client_secret": "secret-1",
                "domain_prefix": "dom-1"
            },
            "authorizer_config": { "customJWTAuthorizer": {} }
        }"#;
        assert!(serde_json::from_str::<AuthorizerResult>(json).is_err());
    }

    #[test]
    fn debug_output_redacts_client_secret() {
        let result: AuthorizerResult = serde_json::from_str(FULL).unwrap();
        let debug = format!("{result:?}");
        assert!(!debug.contains("very-secret"), "secret leaked: {debug}");
        assert!(debug.contains("[REDACTED]"));
    }
}
