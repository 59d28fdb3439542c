//! Terminal view of the teacher dashboards.
//!
//! Connects the store from environment configuration and prints the
//! aggregate each subcommand asks for. Useful for checking a deployment
//! without opening the app.

use clap::{Parser, Subcommand};
use godsaeng_store::{Storage, StorageConfig};

#[derive(Parser)]
#[command(name = "godsaeng-dash", about = "Teacher dashboard aggregates, in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Per-student certified-day totals across all challenges.
    Effort,
    /// Per-student completed-course counts with reflections.
    Growth,
    /// The course catalog ranked by completion count.
    Courses,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = StorageConfig::from_env();
    let storage = Storage::connect(&config).await?;
    tracing::info!(remote = storage.is_remote(), "connected");

    match cli.command {
        Command::Effort => {
            for row in storage.aggregate_challenge_effort().await? {
                println!(
                    "{:<20} {:>4} days across {} challenges",
                    row.display_name, row.total_completed_days, row.challenge_count
                );
            }
        }
        Command::Growth => {
            for row in storage.aggregate_growth().await? {
                println!(
                    "{:<20} {:>3} courses  {}",
                    row.display_name, row.course_completion_count, row.reflection_text
                );
            }
        }
        Command::Courses => {
            for ranked in storage.list_courses().await? {
                println!(
                    "{:<12} {:>4} completions  {}",
                    ranked.course.id, ranked.completion_count, ranked.course.title
                );
            }
        }
    }

    Ok(())
}
