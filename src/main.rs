use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use auto_changelog::analyzer::ReleaseGrouper;
use auto_changelog::config;
use auto_changelog::git::Git2Repository;
use auto_changelog::ui;

#[derive(clap::Parser)]
#[command(
    name = "auto-changelog",
    version,
    about = "Group conventional commits into releases by git tag"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, default_value = ".", help = "Path inside the git repository")]
    repo: String,

    #[arg(short, long, help = "Branch bounding the unreleased section")]
    branch: Option<String>,

    #[arg(short, long, help = "Log debug output")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    let repo = Git2Repository::open(&args.repo)
        .with_context(|| format!("Git repository error at '{}'", args.repo))?;

    let branch = args
        .branch
        .as_deref()
        .or(config.repository.default_branch.as_deref());

    let grouper = ReleaseGrouper::from_config(&config)?;
    let changelog = grouper.traverse(&repo, branch)?;

    ui::display_status(&format!(
        "{} releases, {} commits",
        changelog.tags.len(),
        changelog.total_commits()
    ));
    ui::display_changelog_summary(&changelog);

    Ok(())
}
