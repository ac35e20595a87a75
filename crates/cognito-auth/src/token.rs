//! OAuth client-credentials token exchange
//!
//! The authorizer's app client is a confidential client, so the token is
//! obtained with the `client_credentials` grant: a form POST to the hosted
//! domain's token endpoint, authenticated with HTTP Basic using the client
//! id and secret.

use serde::Deserialize;

use common::Secret;

use crate::authorizer::ClientInfo;
use crate::error::{Error, Result};

/// Response from the token endpoint.
///
/// Only `access_token` is persisted; the other fields are informational.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Secret<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Seconds until the access token expires
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Token endpoint of a Cognito hosted domain.
pub fn cognito_token_endpoint(domain_prefix: &str, region: &str) -> String {
    format!("https://{domain_prefix}.auth.{region}.amazoncognito.com/oauth2/token")
}

/// Pick the token endpoint for a client.
///
/// An explicit override wins, then the endpoint reported by the gateway,
/// then the endpoint derived from the domain prefix.
pub fn resolve_token_endpoint(
    override_url: Option<&str>,
    client_info: &ClientInfo,
    region: &str,
) -> String {
    override_url
        .or(client_info.token_endpoint.as_deref())
        .map(str::to_owned)
        .unwrap_or_else(|| cognito_token_endpoint(&client_info.domain_prefix, region))
}

/// Exchange client credentials for an access token.
pub async fn request_client_credentials(
    client: &reqwest::Client,
    endpoint: &str,
    client_info: &ClientInfo,
) -> Result<TokenResponse> {
    let mut form = vec![("grant_type", "client_credentials")];
    if let Some(scope) = client_info.scope.as_deref() {
        form.push(("scope", scope));
    }

    let response = client
        .post(endpoint)
        .basic_auth(&client_info.client_id, Some(client_info.client_secret.expose()))
        .form(&form)
        .send()
        .await
        .map_err(|e| Error::Http(format!("token request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));

        // 401/403 means the client id/secret pair was rejected
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(Error::InvalidCredentials(format!(
                "client credentials rejected ({status}): {body}"
            )));
        }

        return Err(Error::TokenExchange(format!(
            "token endpoint returned {status}: {body}"
        )));
    }

    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| Error::TokenExchange(format!("invalid token response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_info(token_endpoint: Option<&str>) -> ClientInfo {
        ClientInfo {
            user_pool_id: "up-1".into(),
            client_id: "cid-1".into(),
            client_secret: Secret::new("secret-1".into()),
            domain_prefix: "dom-1".into(),
            token_endpoint: token_endpoint.map(str::to_owned),
            scope: None,
        }
    }

    #[test]
    fn token_response_deserializes() {
        let json = r#"{"access_token":"eyJraWQ","token_type":"Bearer","expires_in":3600}"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token.expose(), "eyJraWQ");
        assert_eq!(token.token_type.as_deref(), Some("Bearer"));
        assert_eq!(token.expires_in, Some(3600));
    }

    #[test]
    fn token_response_needs_only_access_token() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token":"at"}"#).unwrap();
        assert_eq!(token.access_token.expose(), "at");
        assert!(token.expires_in.is_none());
    }

    #[test]
    fn cognito_endpoint_uses_domain_and_region() {
        assert_eq!(
            cognito_token_endpoint("dom-1", "eu-central-1"),
            "https://dom-1.auth.eu-central-1.amazoncognito.com/oauth2/token"
        );
    }

    #[test]
    fn override_beats_reported_endpoint() {
        let info = client_info(Some("https://reported/token"));
        assert_eq!(
            resolve_token_endpoint(Some("https://override/token"), &info, "us-west-2"),
            "https://override/token"
        );
    }

    #[test]
    fn reported_endpoint_beats_derived_one() {
        let info = client_info(Some("https://reported/token"));
        assert_eq!(
            resolve_token_endpoint(None, &info, "us-west-2"),
            "https://reported/token"
        );
    }

    #[test]
    fn derived_endpoint_is_the_fallback() {
        let info = client_info(None);
        assert_eq!(
            resolve_token_endpoint(None, &info, "us-west-2"),
            "https://dom-1.auth.us-west-2.amazoncognito.com/oauth2/token"
        );
    }
}
