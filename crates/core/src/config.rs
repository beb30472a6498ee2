use crate::error::Result;
use crate::roadmap::Priority;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub embeddings: EmbeddingConfig,
    pub corpus: CorpusConfig,
    pub ranking: RankingConfig,
    pub skills: SkillConfig,
    pub live: LiveConfig,
    pub roadmap: RoadmapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub dimension: usize,
    pub base_url: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "hashing".to_string(),
            model: "hashing-384".to_string(),
            dimension: 384,
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub jobs_path: String,
    pub courses_path: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            jobs_path: "data/job_embeddings.json".to_string(),
            courses_path: "data/course_embeddings.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub top_k: usize,
    /// How many course matches the semantic roadmap pass considers.
    pub roadmap_top_k: usize,
    /// Courses at or below this raw cosine are dropped from the semantic pass.
    pub semantic_threshold: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            roadmap_top_k: 5,
            semantic_threshold: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    pub vocabulary: Vec<String>,
    pub extra: Vec<String>,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            vocabulary: crate::skills::DEFAULT_SKILLS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            extra: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    pub timeout_ms: u64,
    pub providers: Vec<LiveProviderConfig>,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            providers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveProviderConfig {
    pub name: String,
    pub url: String,
    #[serde(default = "default_provider_limit")]
    pub limit: usize,
    #[serde(default)]
    pub query_suffix: String,
}

fn default_provider_limit() -> usize {
    4
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadmapConfig {
    pub priority: Priority,
}

pub fn load(path: Option<&str>) -> Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(
        config::Environment::with_prefix("PATHFINDER")
            .separator("__")
            .try_parsing(true),
    );
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
