//! Resource-manager HTTP client for scale sets.
//!
//! Each method is a single HTTP round trip:
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | submit | `PUT` | `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Compute/virtualMachineScaleSets/{name}` |
//! | get | `GET` | same |
//! | delete | `DELETE` | same |
//!
//! All requests carry `api-version` and, when configured, a bearer token.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::debug;

use crate::consts::{DEFAULT_ARM_API_VERSION, SCALE_SET_PROVIDER, SCALE_SET_TYPE};

use super::{RemoteScaleSet, ScaleSetApi, TransportError};

#[derive(Debug, Clone)]
pub struct ArmClient {
  http: Client,
  endpoint: String,
  subscription_id: String,
  api_version: String,
  token: Option<String>,
}

impl ArmClient {
  pub fn new(endpoint: impl Into<String>, subscription_id: impl Into<String>) -> Self {
    Self {
      http: Client::new(),
      endpoint: endpoint.into().trim_end_matches('/').to_string(),
      subscription_id: subscription_id.into(),
      api_version: DEFAULT_ARM_API_VERSION.to_string(),
      token: None,
    }
  }

  pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
    self.api_version = api_version.into();
    self
  }

  pub fn with_token(mut self, token: impl Into<String>) -> Self {
    self.token = Some(token.into());
    self
  }

  fn scale_set_url(&self, resource_group: &str, name: &str) -> String {
    format!(
      "{}/subscriptions/{}/resourceGroups/{}/providers/{}/{}/{}",
      self.endpoint, self.subscription_id, resource_group, SCALE_SET_PROVIDER, SCALE_SET_TYPE, name
    )
  }

  fn prepare(&self, builder: RequestBuilder) -> RequestBuilder {
    let builder = builder.query(&[("api-version", self.api_version.as_str())]);
    match &self.token {
      Some(token) => builder.bearer_auth(token),
      None => builder,
    }
  }

  async fn send(&self, builder: RequestBuilder) -> Result<Response, TransportError> {
    self
      .prepare(builder)
      .send()
      .await
      .map_err(|e| TransportError::Request(e.to_string()))
  }
}

/// Map non-success statuses to errors, keeping the provider's message.
async fn check_status(response: Response, what: &str) -> Result<Response, TransportError> {
  let status = response.status();
  if status == StatusCode::NOT_FOUND {
    return Err(TransportError::NotFound(what.to_string()));
  }
  if !status.is_success() {
    let message = response.text().await.unwrap_or_default();
    return Err(TransportError::Status {
      status: status.as_u16(),
      message,
    });
  }
  Ok(response)
}

async fn decode(response: Response, what: &str) -> Result<RemoteScaleSet, TransportError> {
  let response = check_status(response, what).await?;
  response
    .json::<RemoteScaleSet>()
    .await
    .map_err(|e| TransportError::Decode(e.to_string()))
}

#[async_trait]
impl ScaleSetApi for ArmClient {
  async fn submit(
    &self,
    resource_group: &str,
    name: &str,
    request: &RemoteScaleSet,
  ) -> Result<RemoteScaleSet, TransportError> {
    let url = self.scale_set_url(resource_group, name);
    debug!(url = %url, "PUT scale set");
    let response = self.send(self.http.put(&url).json(request)).await?;
    decode(response, &url).await
  }

  async fn get(&self, resource_group: &str, name: &str) -> Result<RemoteScaleSet, TransportError> {
    let url = self.scale_set_url(resource_group, name);
    debug!(url = %url, "GET scale set");
    let response = self.send(self.http.get(&url)).await?;
    decode(response, &url).await
  }

  async fn delete(&self, resource_group: &str, name: &str) -> Result<(), TransportError> {
    let url = self.scale_set_url(resource_group, name);
    debug!(url = %url, "DELETE scale set");
    let response = self.send(self.http.delete(&url)).await?;
    check_status(response, &url).await?;
    Ok(())
  }
}
