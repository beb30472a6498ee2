//! Live resource fetching across external providers.
//!
//! One task per provider, all started together and joined in provider order.
//! A provider that errors, panics or runs past its timeout contributes nothing;
//! the others are unaffected and the caller never sees the failure.

use providers::{Resource, ResourceProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct LiveFetcher {
    providers: Vec<Arc<dyn ResourceProvider>>,
    timeout: Duration,
}

impl LiveFetcher {
    pub fn new(providers: Vec<Arc<dyn ResourceProvider>>, timeout: Duration) -> Self {
        Self { providers, timeout }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Waits for every provider, then concatenates results in provider order.
    ///
    /// Provider tasks live in a `JoinSet`, so dropping this future aborts them.
    pub async fn fetch_live(&self, query: &str) -> Vec<Resource> {
        let mut tasks = JoinSet::new();
        for (index, provider) in self.providers.iter().enumerate() {
            let provider = Arc::clone(provider);
            let query = query.to_string();
            let timeout = self.timeout;
            tasks.spawn(async move { (index, fetch_isolated(provider, query, timeout).await) });
        }

        let mut slots: Vec<Vec<Resource>> = vec![Vec::new(); self.providers.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, found)) => slots[index] = found,
                Err(e) => warn!("provider task aborted: {}", e),
            }
        }
        let resources: Vec<Resource> = slots.into_iter().flatten().collect();
        debug!("live fetch for '{}' returned {} resources", query, resources.len());
        resources
    }
}

async fn fetch_isolated(
    provider: Arc<dyn ResourceProvider>,
    query: String,
    timeout: Duration,
) -> Vec<Resource> {
    info!("[{}] live lookup for '{}'", provider.name(), query);
    match tokio::time::timeout(timeout, provider.scrape(&query)).await {
        Ok(Ok(found)) => {
            info!("[{}] found {} resources", provider.name(), found.len());
            found
        }
        Ok(Err(e)) => {
            warn!("[{}] provider failed: {}", provider.name(), e);
            Vec::new()
        }
        Err(_) => {
            warn!(
                "[{}] provider timed out after {:?}",
                provider.name(),
                timeout
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{resource, Behavior, FakeProvider};
    use std::time::Instant;

    fn returns(name: &'static str, links: &[&str]) -> Arc<dyn ResourceProvider> {
        Arc::new(FakeProvider {
            name,
            behavior: Behavior::Returns(links.iter().map(|l| resource(l, name)).collect()),
        })
    }

    fn behaving(name: &'static str, behavior: Behavior) -> Arc<dyn ResourceProvider> {
        Arc::new(FakeProvider { name, behavior })
    }

    #[tokio::test]
    async fn failing_provider_is_isolated() {
        let fetcher = LiveFetcher::new(
            vec![
                behaving("a", Behavior::Fails),
                returns("b", &["https://b/1", "https://b/2", "https://b/3"]),
            ],
            Duration::from_secs(5),
        );
        let out = fetcher.fetch_live("rust").await;
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|r| r.title == "b"));
    }

    #[tokio::test]
    async fn results_follow_provider_order() {
        let fetcher = LiveFetcher::new(
            vec![returns("videos", &["https://v/1"]), returns("courses", &["https://c/1", "https://c/2"])],
            Duration::from_secs(5),
        );
        let out = fetcher.fetch_live("sql").await;
        let links: Vec<&str> = out.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(links, vec!["https://v/1", "https://c/1", "https://c/2"]);
        assert_eq!(fetcher.provider_names(), vec!["videos", "courses"]);
    }

    #[tokio::test]
    async fn hung_provider_times_out_empty() {
        let fetcher = LiveFetcher::new(
            vec![behaving("slow", Behavior::Hangs), returns("fast", &["https://f/1"])],
            Duration::from_millis(50),
        );
        let started = Instant::now();
        let out = fetcher.fetch_live("docker").await;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].link, "https://f/1");
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn panicking_provider_is_isolated() {
        let fetcher = LiveFetcher::new(
            vec![returns("ok", &["https://ok/1"]), behaving("boom", Behavior::Panics)],
            Duration::from_secs(5),
        );
        let out = fetcher.fetch_live("go").await;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].link, "https://ok/1");
    }

    #[tokio::test]
    async fn dropping_the_fetch_aborts_provider_tasks() {
        let hung = Arc::new(FakeProvider {
            name: "slow",
            behavior: Behavior::Hangs,
        });
        let shared: Arc<dyn ResourceProvider> = hung.clone();
        let fetcher = LiveFetcher::new(vec![shared], Duration::from_secs(3600));

        let outcome =
            tokio::time::timeout(Duration::from_millis(50), fetcher.fetch_live("rust")).await;
        assert!(outcome.is_err());
        drop(fetcher);

        // the aborted task releases its clone of the provider
        let deadline = Instant::now() + Duration::from_secs(5);
        while Arc::strong_count(&hung) > 1 && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(Arc::strong_count(&hung), 1);
    }

    #[tokio::test]
    async fn no_providers_no_results() {
        let fetcher = LiveFetcher::new(vec![], Duration::from_secs(1));
        assert!(fetcher.fetch_live("anything").await.is_empty());
    }
}
