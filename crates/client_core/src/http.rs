//! reqwest-backed transport for the customer/address REST service.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use shared::{
    domain::{Customer, Entity},
    error::{ApiError, ErrorCode},
    protocol::{ListParams, ListResponse},
};
use tracing::{debug, warn};

use crate::{
    error::ClientError,
    settings::ClientSettings,
    transport::{CustomerTransport, ResourceTransport},
};

const FILTERED_SEGMENT: &str = "filtered";

#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|err| ClientError::Config(format!("failed to build http client: {err}")))?;
        Ok(Self::with_client(http, settings.api_base_url.clone()))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url<E: Entity>(&self) -> String {
        format!("{}/{}", self.base_url, E::RESOURCE)
    }

    fn member_url<E: Entity>(&self, id: E::Id) -> String {
        format!("{}/{}/{id}", self.base_url, E::RESOURCE)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!(%method, url, "api request");
        self.http.request(method, url)
    }

    /// Sends the request and returns the decoded body, `Value::Null` for an empty one.
    /// `target` names the resource in not-found errors.
    async fn execute(&self, request: RequestBuilder, target: &str) -> Result<Value, ClientError> {
        let response = request.send().await.map_err(|err| {
            warn!(target, error = %err, "api request failed");
            ClientError::from(err)
        })?;
        let status = response.status();
        debug!(target, status = status.as_u16(), "api response");
        let body = response.bytes().await?;

        if !status.is_success() {
            let api_error: ApiError = serde_json::from_slice(&body).unwrap_or_default();
            let err = error_from_status(status, target, &api_error);
            warn!(target, status = status.as_u16(), error = %err, "api error response");
            return Err(err);
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|err| {
            ClientError::MalformedResponse(format!("invalid JSON from {target}: {err}"))
        })
    }

    async fn list_at<E: Entity>(
        &self,
        url: &str,
        params: &ListParams,
    ) -> Result<ListResponse<E>, ClientError> {
        let request = self.request(Method::GET, url).query(params.as_slice());
        let value = self.execute(request, E::RESOURCE).await?;
        let (response, rejected) = ListResponse::decode(value);
        for reason in &rejected {
            warn!(resource = E::RESOURCE, %reason, "skipping undecodable list entry");
        }
        Ok(response)
    }
}

fn error_from_status(status: StatusCode, target: &str, body: &ApiError) -> ClientError {
    match ErrorCode::from_status(status.as_u16()) {
        Some(ErrorCode::NotFound) => ClientError::NotFound {
            resource: target.to_string(),
        },
        Some(ErrorCode::Validation) => {
            let mut messages = body.messages();
            if messages.is_empty() {
                messages.push(format!("request rejected with status {}", status.as_u16()));
            }
            ClientError::Validation { messages }
        }
        None => ClientError::Server {
            status: status.as_u16(),
            message: body
                .summary()
                .or_else(|| status.canonical_reason())
                .unwrap_or("unexpected status")
                .to_string(),
        },
    }
}

/// Accepts the entity itself or the entity wrapped under its singular name.
fn decode_entity<E: Entity>(value: Value) -> Result<E, ClientError> {
    let value = match value {
        Value::Object(mut fields) if fields.get(E::SINGULAR).is_some_and(Value::is_object) => {
            fields.remove(E::SINGULAR).unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(value).map_err(|err| {
        ClientError::MalformedResponse(format!("unexpected {} payload: {err}", E::SINGULAR))
    })
}

#[async_trait]
impl<E: Entity> ResourceTransport<E> for HttpTransport {
    async fn list(&self, params: &ListParams) -> Result<ListResponse<E>, ClientError> {
        self.list_at(&self.collection_url::<E>(), params).await
    }

    async fn get(&self, id: E::Id) -> Result<E, ClientError> {
        let url = self.member_url::<E>(id);
        let target = format!("{} {id}", E::SINGULAR);
        let value = self.execute(self.request(Method::GET, &url), &target).await?;
        decode_entity(value)
    }

    async fn create(&self, draft: &E::Draft) -> Result<E, ClientError> {
        let url = self.collection_url::<E>();
        let request = self.request(Method::POST, &url).json(draft);
        let value = self.execute(request, E::RESOURCE).await?;
        decode_entity(value)
    }

    async fn update(&self, id: E::Id, draft: &E::Draft) -> Result<E, ClientError> {
        let url = self.member_url::<E>(id);
        let target = format!("{} {id}", E::SINGULAR);
        let request = self.request(Method::PUT, &url).json(draft);
        let value = self.execute(request, &target).await?;
        decode_entity(value)
    }

    async fn delete(&self, id: E::Id) -> Result<(), ClientError> {
        let url = self.member_url::<E>(id);
        let target = format!("{} {id}", E::SINGULAR);
        self.execute(self.request(Method::DELETE, &url), &target)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CustomerTransport for HttpTransport {
    async fn list_filtered(
        &self,
        params: &ListParams,
    ) -> Result<ListResponse<Customer>, ClientError> {
        let url = format!("{}/{FILTERED_SEGMENT}", self.collection_url::<Customer>());
        self.list_at(&url, params).await
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
