use crate::{ProviderError, Resource, ResourceProvider};
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// A resource source reachable over HTTP: `GET {url}?q=<query>&limit=<n>` answering with a
/// JSON array of resources (or `{"resources": [...]}`). Site-specific scraping lives behind
/// the endpoint.
#[derive(Clone)]
pub struct HttpProviderConfig {
    pub name: String,
    pub url: String,
    pub limit: usize,
    /// Appended to the query before sending, e.g. " tutorial for beginners".
    pub query_suffix: String,
}

#[derive(Clone)]
pub struct HttpResourceProvider {
    client: Client,
    cfg: HttpProviderConfig,
}

impl HttpResourceProvider {
    pub fn new(cfg: HttpProviderConfig) -> Self {
        Self {
            client: Client::new(),
            cfg,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ResourcePayload {
    Bare(Vec<Resource>),
    Wrapped { resources: Vec<Resource> },
}

#[async_trait::async_trait]
impl ResourceProvider for HttpResourceProvider {
    fn name(&self) -> &str {
        &self.cfg.name
    }

    async fn scrape(&self, query: &str) -> Result<Vec<Resource>, ProviderError> {
        let search = format!("{}{}", query, self.cfg.query_suffix);
        let limit = self.cfg.limit.to_string();
        let resp = self
            .client
            .get(&self.cfg.url)
            .query(&[("q", search.as_str()), ("limit", limit.as_str())])
            .header("User-Agent", "Mozilla/5.0")
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.bytes().await.unwrap_or(Bytes::from_static(b""));
            return Err(ProviderError::RequestFailed(format!(
                "status {} body {:?}",
                status, body
            )));
        }
        let payload: ResourcePayload = resp
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        let resources = match payload {
            ResourcePayload::Bare(r) => r,
            ResourcePayload::Wrapped { resources } => resources,
        };
        debug!(
            "[{}] '{}' answered with {} resources",
            self.cfg.name,
            search,
            resources.len()
        );
        Ok(finalize(resources, query, self.cfg.limit))
    }
}

/// Drops entries without a link, caps to `limit`, and fills a missing `skills_taught`.
fn finalize(resources: Vec<Resource>, query: &str, limit: usize) -> Vec<Resource> {
    resources
        .into_iter()
        .filter(|r| !r.link.trim().is_empty())
        .take(limit)
        .map(|mut r| {
            if r.skills_taught.trim().is_empty() {
                r.skills_taught = format!("Covers topics related to '{}'", query);
            }
            r
        })
        .collect()
}
