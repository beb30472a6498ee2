//! In-process fakes shared by the unit tests.

use crate::models::CorpusItem;
use providers::{EmbedResponse, EmbeddingProvider, ProviderError, Resource, ResourceProvider};
use std::collections::HashMap;
use std::time::Duration;

/// Returns a fixed vector per known text; unknown text is a provider error.
pub struct FixedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
}

impl FixedEmbedder {
    pub fn new(entries: &[(&str, Vec<f32>)]) -> Self {
        Self {
            vectors: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for FixedEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<EmbedResponse, ProviderError> {
        let vectors = texts
            .iter()
            .map(|t| {
                self.vectors
                    .get(t)
                    .cloned()
                    .ok_or_else(|| ProviderError::RequestFailed(format!("no vector for '{t}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EmbedResponse { vectors })
    }
}

pub enum Behavior {
    Returns(Vec<Resource>),
    Fails,
    Hangs,
    Panics,
}

pub struct FakeProvider {
    pub name: &'static str,
    pub behavior: Behavior,
}

#[async_trait::async_trait]
impl ResourceProvider for FakeProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn scrape(&self, _query: &str) -> Result<Vec<Resource>, ProviderError> {
        match &self.behavior {
            Behavior::Returns(r) => Ok(r.clone()),
            Behavior::Fails => Err(ProviderError::RequestFailed("connection reset".into())),
            Behavior::Hangs => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(vec![])
            }
            Behavior::Panics => panic!("selector not found"),
        }
    }
}

pub fn resource(link: &str, title: &str) -> Resource {
    Resource {
        title: title.into(),
        source: "test".into(),
        kind: "Course".into(),
        link: link.into(),
        skills_taught: String::new(),
    }
}

pub fn item(id: &str, title: &str, description: &str, embedding: Vec<f32>) -> CorpusItem {
    CorpusItem {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        attributes: HashMap::new(),
        embedding,
    }
}

pub fn course(id: &str, link: &str, skills_taught: &str, embedding: Vec<f32>) -> CorpusItem {
    let mut c = item(id, id, "", embedding);
    c.attributes.insert("link".into(), link.into());
    c.attributes.insert("skills_taught".into(), skills_taught.into());
    c
}
