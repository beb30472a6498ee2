use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cli::render;
use pathfinder_core::config;
use pathfinder_core::models::UserProfile;
use pathfinder_core::pipeline::MatchContext;
use pathfinder_core::roadmap::Priority;
use pathfinder_core::skills;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Skills { text, required, json } => {
            let vocab = skills::SkillVocabulary::new(
                cfg.skills.vocabulary.iter().chain(cfg.skills.extra.iter()),
            )?;
            let found = vocab.extract(&text);
            match required {
                Some(required) => {
                    let gap = skills::gap(&vocab.extract(&required), &found);
                    if json {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(
                                &serde_json::json!({ "mentioned": found, "gap": gap })
                            )?
                        );
                    } else {
                        println!("missing: {}", gap.join(", "));
                    }
                }
                None if json => println!("{}", serde_json::to_string_pretty(&found)?),
                None => println!("{}", found.into_iter().collect::<Vec<_>>().join(", ")),
            }
            Ok(())
        }
        Commands::Rank {
            profile,
            top_k,
            json,
        } => {
            let ctx = MatchContext::from_config(&cfg)?;
            let k = top_k.unwrap_or(ctx.settings().top_k);
            let jobs = ctx.rank_jobs(&profile, k).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&render::jobs_json(&jobs))?);
            } else {
                println!("{}", render::jobs_text(&jobs));
            }
            Ok(())
        }
        Commands::Roadmap {
            title,
            profile,
            priority,
            json,
        } => {
            let ctx = MatchContext::from_config(&cfg)?;
            let priority = priority.unwrap_or(ctx.settings().priority);
            let profile = profile.unwrap_or_else(|| title.clone());
            let roadmap = ctx.build_roadmap_with(&title, &profile, priority).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&roadmap)?);
            } else {
                println!("{}", render::roadmap_text(&roadmap));
            }
            Ok(())
        }
        Commands::Recommend {
            skills,
            degree,
            college,
            json,
        } => {
            let profile = UserProfile {
                degree,
                skills: Some(skills),
                college,
            };
            let query = profile
                .to_query()
                .context("a profile needs at least one skill")?;
            let ctx = MatchContext::from_config(&cfg)?;
            let rec = ctx.recommend(&query).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&render::recommendation_json(&rec))?);
            } else {
                println!("{}", render::recommendation_text(&rec));
            }
            Ok(())
        }
    }
}

#[derive(Parser)]
#[command(name = "pathfinder")]
#[command(about = "Job matching, skill gaps and learning roadmaps", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank jobs for a free-text profile
    Rank {
        profile: String,
        /// Number of jobs to return
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Build a learning roadmap toward a target title
    Roadmap {
        title: String,
        /// Profile text for the semantic pass (defaults to the title)
        #[arg(long)]
        profile: Option<String>,
        /// live_first or static_first
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        json: bool,
    },
    /// Rank jobs for a profile and build a roadmap toward the best one
    Recommend {
        /// Comma-separated skills
        #[arg(long)]
        skills: String,
        #[arg(long)]
        degree: Option<String>,
        #[arg(long)]
        college: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Extract vocabulary skills from text
    Skills {
        text: String,
        /// Compare against the skills this text requires
        #[arg(long)]
        required: Option<String>,
        #[arg(long)]
        json: bool,
    },
}
