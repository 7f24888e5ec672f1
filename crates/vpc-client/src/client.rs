//! VPC API client
//!
//! Implements the VPC compute REST client for the instance lifecycle
//! endpoints: GET/POST /v1/instances and DELETE /v1/instances/{id}.

use crate::error::VpcError;
use crate::models::*;
use crate::vpc_trait::VpcClientTrait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// VPC compute API client
pub struct VpcClient {
    client: Client,
    base_url: String,
    token: String,
}

impl VpcClient {
    /// Create a new VPC client
    ///
    /// # Arguments
    /// * `base_url` - VPC API base URL (e.g., "https://eu-gb.vpc.example.com")
    /// * `token` - Bearer token for authentication
    pub fn new(base_url: String, token: String) -> Result<Self, VpcError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(VpcError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Map a non-success response to the matching error variant.
    ///
    /// 404 is surfaced as `VpcError::NotFound` so callers can classify
    /// "already absent" without parsing messages.
    async fn check_response(response: Response, context: &str) -> Result<Response, VpcError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(VpcError::Authentication(
                format!("{}: {} - {}", context, status, body),
            )),
            StatusCode::NOT_FOUND => Err(VpcError::NotFound(format!("{}: {}", context, body))),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Err(
                VpcError::InvalidRequest(format!("{}: {} - {}", context, status, body)),
            ),
            _ => Err(VpcError::Api(format!(
                "{}: {} - {}",
                context, status, body
            ))),
        }
    }

    /// List instances, optionally filtered by display name on the provider
    /// side, following pagination links until the collection is exhausted.
    pub async fn list_instances(&self, name: Option<&str>) -> Result<Vec<Instance>, VpcError> {
        let mut all_instances = Vec::new();
        let mut request = self
            .client
            .get(format!("{}/v1/instances", self.base_url))
            .bearer_auth(&self.token)
            .header("Accept", "application/json");
        if let Some(name) = name {
            request = request.query(&[("name", name)]);
        }

        loop {
            debug!("Listing instances from {}", self.base_url);
            let response = request.send().await?;
            let response = Self::check_response(response, "Failed to list instances").await?;

            let page: InstanceCollection = response.json().await?;
            all_instances.extend(page.instances);

            match page.next {
                Some(link) => {
                    request = self
                        .client
                        .get(link.href)
                        .bearer_auth(&self.token)
                        .header("Accept", "application/json");
                }
                None => break,
            }
        }

        Ok(all_instances)
    }

    /// Get an instance by ID
    pub async fn get_instance(&self, id: &str) -> Result<Instance, VpcError> {
        let url = format!("{}/v1/instances/{}", self.base_url, id);
        debug!("Getting instance {}", id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await?;
        let response =
            Self::check_response(response, &format!("Failed to get instance {}", id)).await?;

        Ok(response.json().await?)
    }

    /// Create an instance
    pub async fn create_instance(
        &self,
        request: &CreateInstanceRequest,
    ) -> Result<Instance, VpcError> {
        let url = format!("{}/v1/instances", self.base_url);
        debug!("Creating instance {}", request.name);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;
        let response = Self::check_response(
            response,
            &format!("Failed to create instance {}", request.name),
        )
        .await?;

        Ok(response.json().await?)
    }

    /// Delete an instance by ID
    ///
    /// A 404 from the provider maps to `VpcError::NotFound`; deciding
    /// whether that counts as success is left to the caller.
    pub async fn delete_instance(&self, id: &str) -> Result<(), VpcError> {
        let url = format!("{}/v1/instances/{}", self.base_url, id);
        debug!("Deleting instance {}", id);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await?;
        Self::check_response(response, &format!("Failed to delete instance {}", id)).await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl VpcClientTrait for VpcClient {
    fn base_url(&self) -> &str {
        self.base_url()
    }

    async fn list_instances(&self, name: Option<&str>) -> Result<Vec<Instance>, VpcError> {
        self.list_instances(name).await
    }

    async fn get_instance(&self, id: &str) -> Result<Instance, VpcError> {
        self.get_instance(id).await
    }

    async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<Instance, VpcError> {
        self.create_instance(request).await
    }

    async fn delete_instance(&self, id: &str) -> Result<(), VpcError> {
        self.delete_instance(id).await
    }
}
