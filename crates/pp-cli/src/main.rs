//! # ppower CLI entry point
//!
//! Parses command-line arguments, installs logging, loads configuration,
//! and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pp_cli::config::Config;
use pp_cli::generate::{run_generate, GenerateArgs};
use pp_cli::profile::{run_profile, ProfileArgs};
use pp_cli::query::{
    run_country, run_groups, run_leaderboard, run_lookup, run_resolve, run_stats, CountryArgs,
    GroupsArgs, LeaderboardArgs, LookupArgs, ResolveArgs, StatsArgs,
};

/// Passport Power: visa requirements, held-visa substitution, and passport ranking.
#[derive(Parser, Debug)]
#[command(name = "ppower", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (default: ppower.yaml in the repository root).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the visa matrix from the passport-index CSV.
    Generate(GenerateArgs),

    /// Show a country record.
    Country(CountryArgs),

    /// Direct bilateral requirement, ignoring held visas.
    Lookup(LookupArgs),

    /// Effective requirement after held-visa substitution, for one
    /// destination or every destination with `--all`.
    Resolve(ResolveArgs),

    /// Requirement counts and global rank for a passport.
    Stats(StatsArgs),

    /// List power groups, marking those activated by held visas.
    Groups(GroupsArgs),

    /// Baseline passport ranking.
    Leaderboard(LeaderboardArgs),

    /// Edit or show a traveler profile file.
    Profile(ProfileArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "ppower starting");

    // Walk up from CWD looking for `data/` next to a `Cargo.toml`.
    let repo_root = resolve_repo_root().unwrap_or_else(|| {
        tracing::warn!("Could not locate repository root; using current directory");
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    });

    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");

    let result = Config::load(cli.config.as_deref(), &repo_root).and_then(|config| match cli.command {
        Commands::Generate(args) => run_generate(&args, &config),
        Commands::Country(args) => run_country(&args, &config),
        Commands::Lookup(args) => run_lookup(&args, &config),
        Commands::Resolve(args) => run_resolve(&args, &config),
        Commands::Stats(args) => run_stats(&args, &config),
        Commands::Groups(args) => run_groups(&args, &config),
        Commands::Leaderboard(args) => run_leaderboard(&args, &config),
        Commands::Profile(args) => run_profile(&args),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// Walk up from the current directory to find the repository root.
///
/// The root holds both a `data/` directory and a `Cargo.toml`.
fn resolve_repo_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut dir = cwd.as_path();
    loop {
        if dir.join("data").is_dir() && dir.join("Cargo.toml").is_file() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}
