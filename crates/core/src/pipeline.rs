use crate::config::AppConfig;
use crate::embeddings::QueryEncoder;
use crate::error::{MatchError, Result};
use crate::live::LiveFetcher;
use crate::models::{RankedMatch, Recommendation, FALLBACK_TARGET_TITLE};
use crate::roadmap::{self, Priority, StaticResolver};
use crate::search;
use crate::skills::{self, SkillVocabulary};
use crate::vectorstore::Corpus;
use providers::hashing::HashingEmbedder;
use providers::http::{HttpProviderConfig, HttpResourceProvider};
use providers::openai::{OpenAiConfig, OpenAiProvider};
use providers::{ProviderRegistry, Resource};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Ranking knobs carried by the context.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub top_k: usize,
    pub roadmap_top_k: usize,
    pub semantic_threshold: f64,
    pub priority: Priority,
}

impl Settings {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        if !config.ranking.semantic_threshold.is_finite() {
            return Err(MatchError::Config(
                "ranking.semantic_threshold must be finite".into(),
            ));
        }
        Ok(Self {
            top_k: config.ranking.top_k,
            roadmap_top_k: config.ranking.roadmap_top_k,
            semantic_threshold: config.ranking.semantic_threshold,
            priority: config.roadmap.priority,
        })
    }
}

/// Everything a request needs, built once at startup and shared read-only.
pub struct MatchContext {
    encoder: QueryEncoder,
    vocabulary: SkillVocabulary,
    jobs: Corpus,
    courses: Corpus,
    live: LiveFetcher,
    settings: Settings,
}

impl MatchContext {
    pub fn new(
        encoder: QueryEncoder,
        vocabulary: SkillVocabulary,
        jobs: Corpus,
        courses: Corpus,
        live: LiveFetcher,
        settings: Settings,
    ) -> Self {
        Self {
            encoder,
            vocabulary,
            jobs,
            courses,
            live,
            settings,
        }
    }

    /// Builds providers, loads both corpora and the vocabulary.
    ///
    /// Missing corpora only degrade results; configuration problems are errors.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        info!("Loading matching context...");
        let settings = Settings::from_config(config)?;
        let registry = build_registry(config);
        let encoder = QueryEncoder::from_registry(&registry, None, &config.embeddings.model)?;
        let vocabulary = SkillVocabulary::new(
            config
                .skills
                .vocabulary
                .iter()
                .chain(config.skills.extra.iter()),
        )?;

        let dimension = Some(config.embeddings.dimension).filter(|d| *d > 0);
        let model = Some(encoder.model()).filter(|m| !m.is_empty());
        let jobs = Corpus::load("jobs", Path::new(&config.corpus.jobs_path), dimension, model);
        if !jobs.is_available() {
            error!("Job corpus unavailable: job ranking will return no results");
        }
        let courses = Corpus::load(
            "courses",
            Path::new(&config.corpus.courses_path),
            dimension,
            model,
        );

        let live = LiveFetcher::new(
            registry.resources().to_vec(),
            Duration::from_millis(config.live.timeout_ms),
        );
        info!(
            "Context ready: {} jobs, {} courses, {} skills, live providers {:?}",
            jobs.size(),
            courses.size(),
            vocabulary.len(),
            live.provider_names()
        );
        Ok(Self::new(encoder, vocabulary, jobs, courses, live, settings))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn jobs(&self) -> &Corpus {
        &self.jobs
    }

    pub fn courses(&self) -> &Corpus {
        &self.courses
    }

    /// Top-k jobs for a profile, each with required skills and the gap against the profile.
    pub async fn rank_jobs(&self, profile_text: &str, k: usize) -> Result<Vec<RankedMatch>> {
        if profile_text.trim().is_empty() {
            return Err(MatchError::EmptyQuery);
        }
        if !self.jobs.is_available() {
            return Ok(Vec::new());
        }
        let query = self.encoder.encode(profile_text).await?;
        let mentioned = self.vocabulary.extract(profile_text);

        let matches = search::top_k(&query, &self.jobs, k)?
            .into_iter()
            .map(|hit| {
                let required = self
                    .vocabulary
                    .extract(&format!("{} {}", hit.item.title, hit.item.description));
                let skills_gap = skills::gap(&required, &mentioned);
                RankedMatch {
                    score: search::normalize_score(hit.raw_score),
                    raw_score: hit.raw_score,
                    item: hit.item,
                    required_skills: required,
                    skills_gap,
                }
            })
            .collect();
        Ok(matches)
    }

    /// Live and static resources for a target, merged with the configured priority.
    pub async fn build_roadmap(
        &self,
        target_title: &str,
        target_profile: &str,
    ) -> Result<Vec<Resource>> {
        self.build_roadmap_with(target_title, target_profile, self.settings.priority)
            .await
    }

    pub async fn build_roadmap_with(
        &self,
        target_title: &str,
        target_profile: &str,
        priority: Priority,
    ) -> Result<Vec<Resource>> {
        if target_title.trim().is_empty() {
            return Err(MatchError::EmptyQuery);
        }
        let resolver = StaticResolver {
            encoder: &self.encoder,
            courses: &self.courses,
            top_k: self.settings.roadmap_top_k,
            threshold: self.settings.semantic_threshold,
        };
        let (live, fixed) = tokio::join!(
            self.live.fetch_live(target_title),
            resolver.resolve(target_title, target_profile)
        );
        let (primary, secondary) = priority.order(live, fixed?);
        Ok(roadmap::aggregate(primary, secondary))
    }

    /// Roadmap seeded by a title alone.
    pub async fn interactive_roadmap(&self, title: &str) -> Result<Vec<Resource>> {
        self.build_roadmap(title, title).await
    }

    /// Ranked jobs plus a roadmap toward the best match.
    pub async fn recommend(&self, profile_text: &str) -> Result<Recommendation> {
        let jobs = self.rank_jobs(profile_text, self.settings.top_k).await?;
        let Some(top) = jobs.first() else {
            return Ok(Recommendation {
                top_job_title: FALLBACK_TARGET_TITLE.to_string(),
                jobs,
                roadmap: Vec::new(),
            });
        };
        let top_job_title = top.item.title.clone();
        let roadmap = self
            .build_roadmap(&top_job_title, &top.item.profile_text())
            .await?;
        Ok(Recommendation {
            top_job_title,
            jobs,
            roadmap,
        })
    }
}

pub fn build_registry(config: &AppConfig) -> ProviderRegistry {
    let mut reg = ProviderRegistry::new().with_embedding(
        "hashing",
        Arc::new(HashingEmbedder::new(config.embeddings.dimension)),
    );

    let base_url = config
        .embeddings
        .base_url
        .clone()
        .or_else(|| std::env::var("OPENAI_BASE_URL").ok());
    if let Some(base) = base_url {
        let provider = OpenAiProvider::new(OpenAiConfig {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: base,
            embedding_model: config.embeddings.model.clone(),
        });
        reg = reg.with_embedding("openai", Arc::new(provider));
    }

    for p in &config.live.providers {
        reg = reg.with_resource(Arc::new(HttpResourceProvider::new(HttpProviderConfig {
            name: p.name.clone(),
            url: p.url.clone(),
            limit: p.limit,
            query_suffix: p.query_suffix.clone(),
        })));
    }

    reg.set_preferred_embedding(&config.embeddings.provider)
}
