//! # Traveler Profiles
//!
//! A profile is a small JSON file (chosen passport, held visas, visited
//! countries). The engine never persists anything; this command is the only
//! writer. Query commands read it through `--profile` or the `profile`
//! configuration key.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use pp_core::TravelerProfile;

use crate::{parse_code, print_json, OutputFormat};

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Profile file. Created on first write.
    pub path: PathBuf,

    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Add a held visa, or remove it if already held.
    ToggleVisa { code: String },
    /// Mark a country as visited.
    Visit { code: String },
    /// Remove a country from the visited set.
    Unvisit { code: String },
    /// Set the profile's passport.
    SetPassport { code: String },
    /// Print the profile.
    Show {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Read a profile; it is an error for the file to be missing.
pub fn read_profile(path: &Path) -> Result<TravelerProfile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading profile: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing profile: {}", path.display()))
}

fn read_or_new(path: &Path) -> Result<TravelerProfile> {
    if path.exists() {
        read_profile(path)
    } else {
        tracing::debug!(path = %path.display(), "starting a new profile");
        Ok(TravelerProfile::default())
    }
}

pub fn write_profile(path: &Path, profile: &TravelerProfile) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating profile directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(profile)?;
    std::fs::write(path, json).with_context(|| format!("writing profile: {}", path.display()))
}

pub fn run_profile(args: &ProfileArgs) -> Result<u8> {
    let path = args.path.as_path();
    let mut profile = read_or_new(path)?;

    let message = match &args.command {
        ProfileCommand::Show { format } => {
            show(&profile, *format)?;
            return Ok(0);
        }
        ProfileCommand::ToggleVisa { code } => {
            let code = parse_code(code)?;
            if profile.toggle_held_visa(code.clone()) {
                format!("now holding a {code} visa")
            } else {
                format!("no longer holding a {code} visa")
            }
        }
        ProfileCommand::Visit { code } => {
            let code = parse_code(code)?;
            if profile.mark_visited(code.clone()) {
                format!("marked {code} as visited")
            } else {
                format!("{code} was already visited")
            }
        }
        ProfileCommand::Unvisit { code } => {
            let code = parse_code(code)?;
            if profile.unmark_visited(&code) {
                format!("unmarked {code}")
            } else {
                format!("{code} was not marked as visited")
            }
        }
        ProfileCommand::SetPassport { code } => {
            let code = parse_code(code)?;
            let message = format!("passport set to {code}");
            profile.passport = Some(code);
            message
        }
    };

    write_profile(path, &profile)?;
    println!("{message}");
    Ok(0)
}

fn show(profile: &TravelerProfile, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(profile);
    }
    let join = |codes: Vec<String>| if codes.is_empty() { "-".to_string() } else { codes.join(" ") };
    println!(
        "  passport:   {}",
        profile.passport.as_ref().map_or("-".to_string(), ToString::to_string)
    );
    println!("  held visas: {}", join(profile.held_visas.iter().map(ToString::to_string).collect()));
    println!("  visited:    {}", join(profile.visited.iter().map(ToString::to_string).collect()));
    Ok(())
}
