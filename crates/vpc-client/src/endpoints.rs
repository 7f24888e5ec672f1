//! Service endpoint overrides
//!
//! Parses the service endpoint override flag into per-region, per-service
//! base URL records consumed at client construction time. The grammar is
//!
//! ```text
//! region ":" service "=" url ("," service "=" url)* (";" region ":" ...)*
//! ```
//!
//! e.g. `eu-gb:vpc=https://vpchost:8080;lon:vpc=https://lonhost:8080`.

use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// Errors produced while parsing the service endpoint flag
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    /// The same service ID appears twice within one region
    #[error("duplicate service endpoint ID: {0}")]
    DuplicateServiceEndpoint(String),

    /// An endpoint URL is not a valid absolute URI
    #[error("invalid service endpoint URL: {0}")]
    InvalidServiceEndpointURL(String),

    /// A configuration section carries no region prefix
    #[error("missing region in service endpoint configuration: {0}")]
    MissingRegion(String),
}

/// One per-region, per-service base URL override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    /// Region the override applies to
    pub region: String,
    /// Service identifier (e.g., "vpc")
    pub id: String,
    /// Base URL substituted for the provider default
    pub url: String,
}

/// Parse the service endpoint override flag.
///
/// An empty flag yields an empty list; otherwise every section requires a
/// region and at least one `service=url` pair, each URL must be an
/// absolute URI, and a service ID may appear at most once per region.
/// Output preserves input order.
pub fn parse_service_endpoint_flag(flag: &str) -> Result<Vec<ServiceEndpoint>, EndpointError> {
    let mut endpoints = Vec::new();
    if flag.trim().is_empty() {
        return Ok(endpoints);
    }

    let mut seen: HashSet<(String, String)> = HashSet::new();
    for section in flag.split(';').filter(|s| !s.is_empty()) {
        let Some((region, services)) = section.split_once(':') else {
            return Err(EndpointError::MissingRegion(section.to_string()));
        };
        // a '=' in the region position means the section has no region
        // prefix at all (e.g. "eu-gb=localhost")
        if region.is_empty() || region.contains('=') {
            return Err(EndpointError::MissingRegion(section.to_string()));
        }

        for pair in services.split(',') {
            let Some((id, url)) = pair.split_once('=') else {
                return Err(EndpointError::InvalidServiceEndpointURL(pair.to_string()));
            };
            if id.is_empty() {
                return Err(EndpointError::InvalidServiceEndpointURL(pair.to_string()));
            }
            if !seen.insert((region.to_string(), id.to_string())) {
                return Err(EndpointError::DuplicateServiceEndpoint(id.to_string()));
            }
            let parsed = Url::parse(url)
                .map_err(|_| EndpointError::InvalidServiceEndpointURL(url.to_string()))?;
            if !parsed.has_host() {
                return Err(EndpointError::InvalidServiceEndpointURL(url.to_string()));
            }

            endpoints.push(ServiceEndpoint {
                region: region.to_string(),
                id: id.to_string(),
                url: url.to_string(),
            });
        }
    }

    Ok(endpoints)
}

/// Look up the override URL for a region/service pair, if configured
pub fn endpoint_for<'a>(
    endpoints: &'a [ServiceEndpoint],
    region: &str,
    service: &str,
) -> Option<&'a str> {
    endpoints
        .iter()
        .find(|e| e.region == region && e.id == service)
        .map(|e| e.url.as_str())
}
