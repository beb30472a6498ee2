//! Core library: corpora, query encoding, job ranking, skill gaps and learning roadmaps.

pub mod config;
pub mod embeddings;
pub mod error;
pub mod live;
pub mod models;
pub mod pipeline;
pub mod roadmap;
pub mod search;
pub mod skills;
pub mod vectorstore;

#[cfg(test)]
mod testing;

pub use error::{MatchError, Result};
pub use providers::Resource;
