//! Identity gateway capability
//!
//! `IdentityGateway` is the seam between the provisioning flow and whatever
//! actually creates user pools and issues tokens. The flow only needs two
//! calls: create an authorizer for a named service, and trade the issued
//! client credentials for an access token.
//!
//! `HttpGateway` is the production implementation. It asks a provisioning
//! endpoint to create the authorizer and talks OAuth directly to the managed
//! identity provider for the token.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use common::Secret;

use crate::authorizer::{AuthorizerResult, ClientInfo};
use crate::error::{Error, Result};
use crate::token::{request_client_credentials, resolve_token_endpoint};

/// Provisioning and token operations of a managed identity provider.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
/// (`&dyn IdentityGateway`), so callers and tests can swap implementations.
pub trait IdentityGateway: Send + Sync {
    /// Provision an OAuth authorizer bound to a new identity provider instance.
    fn create_authorizer<'a>(
        &'a self,
        service_name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<AuthorizerResult>> + Send + 'a>>;

    /// Exchange the client credentials for a bearer token.
    fn access_token<'a>(
        &'a self,
        client_info: &'a ClientInfo,
    ) -> Pin<Box<dyn Future<Output = Result<Secret<String>>> + Send + 'a>>;
}

#[derive(Debug, Serialize)]
struct CreateAuthorizerRequest<'a> {
    name: &'a str,
    region: &'a str,
}

/// Gateway backed by a provisioning HTTP endpoint.
pub struct HttpGateway {
    client: reqwest::Client,
    endpoint: String,
    region: String,
    token_endpoint: Option<String>,
}

impl HttpGateway {
    /// Build a gateway for `endpoint` operating in `region`.
    ///
    /// `timeout` bounds every request made by this gateway.
    pub fn new(
        endpoint: impl Into<String>,
        region: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(format!("building HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            region: region.into(),
            token_endpoint: None,
        })
    }

    /// Send token requests to `url` instead of the provider's hosted domain.
    pub fn with_token_endpoint(mut self, url: impl Into<String>) -> Self {
        self.token_endpoint = Some(url.into());
        self
    }

    fn authorizers_url(&self) -> String {
        format!("{}/authorizers", self.endpoint.trim_end_matches('/'))
    }
}

impl IdentityGateway for HttpGateway {
    fn create_authorizer<'a>(
        &'a self,
        service_name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<AuthorizerResult>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.authorizers_url();
            debug!(%url, service_name, "requesting authorizer");

            let response = self
                .client
                .post(&url)
                .json(&CreateAuthorizerRequest {
                    name: service_name,
                    region: &self.region,
                })
                .send()
                .await
                .map_err(|e| Error::Http(format!("authorizer request failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<no body>"));
                return Err(Error::Gateway(format!(
                    "creating authorizer {service_name} returned {status}: {body}"
                )));
            }

            response
                .json::<AuthorizerResult>()
                .await
                .map_err(|e| Error::InvalidResponse(format!("parsing authorizer result: {e}")))
        })
    }

    fn access_token<'a>(
        &'a self,
        client_info: &'a ClientInfo,
    ) -> Pin<Box<dyn Future<Output = Result<Secret<String>>> + Send + 'a>> {
        Box::pin(async move {
            let endpoint =
                resolve_token_endpoint(self.token_endpoint.as_deref(), client_info, &self.region);
            debug!(%endpoint, client_id = %client_info.client_id, "requesting access token");

            let token = request_client_credentials(&self.client, &endpoint, client_info).await?;
            debug!(
                token_type = token.token_type.as_deref().unwrap_or("unknown"),
                expires_in = ?token.expires_in,
                "access token received"
            );
            Ok(token.access_token)
        })
    }
}
