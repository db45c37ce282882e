//! # Query Commands
//!
//! Read-only views over the engine: a country record, direct and effective
//! requirements (one destination or every destination), per-passport
//! statistics, power groups, and the leaderboard.
//! Each accepts `--format json`.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use pp_core::{Country, CountryCode, EffectiveRequirement, GroupId, HeldVisas};
use pp_engine::{Access, PassportStats, RankedPassport, Resolved, VisaEngine};

use crate::config::Config;
use crate::profile::read_profile;
use crate::{parse_code, print_json, OutputFormat};

/// Held-visa sources shared by the queries that resolve substitution.
#[derive(Args, Debug, Default, Clone)]
pub struct HeldArgs {
    /// A held visa (repeatable).
    #[arg(long = "held", value_name = "CODE")]
    pub held: Vec<String>,

    /// Profile whose held visas are added to `--held`.
    #[arg(long)]
    pub profile: Option<PathBuf>,
}

impl HeldArgs {
    /// Held visas from the profile (flag, else configuration) plus `--held`.
    pub fn held_visas(&self, config: &Config) -> Result<HeldVisas> {
        let mut held = match self.profile.as_ref().or(config.profile.as_ref()) {
            Some(path) => read_profile(path)?.held_visas,
            None => HeldVisas::new(),
        };
        for raw in &self.held {
            held.insert(parse_code(raw)?);
        }
        Ok(held)
    }
}

#[derive(Args, Debug)]
pub struct CountryArgs {
    pub code: String,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    pub passport: String,
    pub destination: String,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    pub passport: String,
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub destination: Option<String>,
    /// Resolve every destination in the matrix instead of one.
    #[arg(long)]
    pub all: bool,
    #[command(flatten)]
    pub held: HeldArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    pub passport: String,
    #[command(flatten)]
    pub held: HeldArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct GroupsArgs {
    #[command(flatten)]
    pub held: HeldArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct LeaderboardArgs {
    /// Show only the first N rows.
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

// ---------------------------------------------------------------------------
// JSON views
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ResolveView<'a> {
    passport: &'a CountryCode,
    destination: &'a CountryCode,
    #[serde(flatten)]
    access: &'a Access,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unlocked_via: Vec<GroupId>,
}

#[derive(Debug, Serialize)]
struct ResolveAllView<'a> {
    passport: &'a CountryCode,
    held_visas: &'a HeldVisas,
    destinations: &'a [Resolved],
}

#[derive(Debug, Serialize)]
struct StatsView<'a> {
    passport: &'a CountryCode,
    held_visas: &'a HeldVisas,
    #[serde(flatten)]
    stats: PassportStats,
    access_score: u32,
    rank: u32,
    ranked_among: usize,
}

#[derive(Debug, Serialize)]
struct GroupView<'a> {
    id: &'a GroupId,
    label: &'a str,
    anchor: &'a CountryCode,
    activated: bool,
    members: Vec<&'a CountryCode>,
}

#[derive(Debug, Serialize)]
struct LeaderboardRow<'a> {
    #[serde(flatten)]
    ranked: &'a RankedPassport,
    name: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

fn display_name(engine: &VisaEngine, code: &CountryCode) -> String {
    match engine.country(code) {
        Some(c) => format!("{} {} ({code})", c.flag, c.name),
        None => code.to_string(),
    }
}

fn describe(effective: &EffectiveRequirement) -> String {
    let mut text = effective.requirement.label().to_string();
    if let Some(duration) = effective.duration_label() {
        text.push_str(&format!(", {duration}"));
    }
    if let Some(notes) = &effective.notes {
        text.push_str(&format!(" [{notes}]"));
    }
    text
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn run_country(args: &CountryArgs, config: &Config) -> Result<u8> {
    let code = parse_code(&args.code)?;
    let engine = config.load_engine()?.with_derived_rankings();
    let Some(country) = engine.country(&code) else {
        bail!("no country with code {code} in {}", config.countries.display());
    };
    if args.format == OutputFormat::Json {
        print_json(country)?;
        return Ok(0);
    }
    print_country(country);
    Ok(0)
}

fn print_country(country: &Country) {
    let or_dash = |v: Option<u32>| v.map_or("-".to_string(), |n| n.to_string());
    println!("  {} {} ({})", country.flag, country.name, country.code);
    println!("  continent:        {}", country.continent);
    println!("  passport rank:    {}", or_dash(country.passport_rank));
    println!("  visa-free count:  {}", or_dash(country.visa_free_destinations_count));
}

pub fn run_lookup(args: &LookupArgs, config: &Config) -> Result<u8> {
    let passport = parse_code(&args.passport)?;
    let destination = parse_code(&args.destination)?;
    let engine = config.load_engine()?;

    let access = if passport == destination {
        Access::Home
    } else {
        Access::Foreign(engine.lookup_direct(&passport, &destination))
    };
    if args.format == OutputFormat::Json {
        print_json(&ResolveView {
            passport: &passport,
            destination: &destination,
            access: &access,
            unlocked_via: Vec::new(),
        })?;
        return Ok(0);
    }
    print_access(&engine, &passport, &destination, &access, &[]);
    Ok(0)
}

pub fn run_resolve(args: &ResolveArgs, config: &Config) -> Result<u8> {
    let passport = parse_code(&args.passport)?;
    let held = args.held.held_visas(config)?;
    if args.all {
        return run_resolve_all(&passport, &held, args.format, config);
    }
    let Some(destination) = args.destination.as_deref() else {
        bail!("a destination is required unless --all is given");
    };
    let destination = parse_code(destination)?;
    let engine = config.load_engine()?;

    let access = engine.classify(&passport, &destination, &held);
    let unlocked_via = match &access {
        Access::Foreign(r) if r.is_unlocked_by_held_visa() => engine.unlock_sources(&held, &destination),
        _ => Vec::new(),
    };
    if args.format == OutputFormat::Json {
        print_json(&ResolveView {
            passport: &passport,
            destination: &destination,
            access: &access,
            unlocked_via,
        })?;
        return Ok(0);
    }
    print_access(&engine, &passport, &destination, &access, &unlocked_via);
    Ok(0)
}

fn run_resolve_all(
    passport: &CountryCode,
    held: &HeldVisas,
    format: OutputFormat,
    config: &Config,
) -> Result<u8> {
    let engine = config.load_engine()?;
    let listing = engine.resolve_all(passport, held, &engine.universe());
    if format == OutputFormat::Json {
        print_json(&ResolveAllView {
            passport,
            held_visas: held,
            destinations: &listing,
        })?;
        return Ok(0);
    }
    println!("  {}", display_name(&engine, passport));
    for row in &listing {
        println!("    {:<40} {}", display_name(&engine, &row.destination), describe(&row.effective));
    }
    println!(
        "  {} of {} destinations without a consular visa",
        count_unrestricted(&listing),
        listing.len()
    );
    Ok(0)
}

fn count_unrestricted(listing: &[Resolved]) -> usize {
    listing
        .iter()
        .filter(|row| row.effective.requirement.is_unrestricted())
        .count()
}

fn print_access(
    engine: &VisaEngine,
    passport: &CountryCode,
    destination: &CountryCode,
    access: &Access,
    unlocked_via: &[GroupId],
) {
    let route = format!(
        "{} -> {}",
        display_name(engine, passport),
        display_name(engine, destination)
    );
    match access {
        Access::Home => println!("  {route}: home country"),
        Access::Foreign(effective) => {
            println!("  {route}: {}", describe(effective));
            for group in unlocked_via {
                println!("    unlocked via {group}");
            }
        }
    }
}

pub fn run_stats(args: &StatsArgs, config: &Config) -> Result<u8> {
    let passport = parse_code(&args.passport)?;
    let held = args.held.held_visas(config)?;
    let engine = config.load_engine()?;
    let universe = engine.universe();

    let stats = engine.compute_stats(&passport, &held, &universe);
    let rank = engine.compute_global_rank(&passport, &held, &universe);
    let ranked_among = universe.len() + usize::from(!universe.contains(&passport));

    if args.format == OutputFormat::Json {
        print_json(&StatsView {
            passport: &passport,
            held_visas: &held,
            stats,
            access_score: stats.access_score(),
            rank,
            ranked_among,
        })?;
        return Ok(0);
    }
    println!("  {}", display_name(&engine, &passport));
    if !held.is_empty() {
        let codes: Vec<String> = held.iter().map(ToString::to_string).collect();
        println!("  held visas:       {}", codes.join(" "));
    }
    println!("  destinations:     {}", stats.total);
    println!("  visa free:        {}", stats.visa_free);
    println!("  visa on arrival:  {}", stats.visa_on_arrival);
    println!("  eVisa / ETA:      {}", stats.e_visa);
    println!("  visa required:    {}", stats.visa_required);
    println!("  access score:     {}", stats.access_score());
    println!("  global rank:      {rank} of {ranked_among}");
    Ok(0)
}

pub fn run_groups(args: &GroupsArgs, config: &Config) -> Result<u8> {
    let held = args.held.held_visas(config)?;
    let engine = config.load_engine()?;
    let activated = engine.list_activated_groups(&held);

    let views: Vec<GroupView<'_>> = engine
        .groups()
        .iter()
        .map(|g| GroupView {
            id: g.id(),
            label: g.label(),
            anchor: g.anchor(),
            activated: activated.contains(g.id()),
            members: g.members().iter().collect(),
        })
        .collect();

    if args.format == OutputFormat::Json {
        print_json(&views)?;
        return Ok(0);
    }
    for view in &views {
        let marker = if view.activated { "*" } else { " " };
        println!(
            "{marker} {:<14} {} (anchor {}, {} members)",
            view.id.as_str(),
            view.label,
            view.anchor,
            view.members.len()
        );
    }
    if !held.is_empty() {
        println!();
        println!("  unlocked destinations: {}", engine.unlocked_destinations(&held).len());
    }
    Ok(0)
}

pub fn run_leaderboard(args: &LeaderboardArgs, config: &Config) -> Result<u8> {
    let engine = config.load_engine()?;
    let board = engine.leaderboard(&engine.universe());
    let limit = args.limit.unwrap_or(board.len());

    let rows: Vec<LeaderboardRow<'_>> = board
        .iter()
        .take(limit)
        .map(|ranked| LeaderboardRow {
            ranked,
            name: engine.country(&ranked.passport).map(|c| c.name.as_str()),
        })
        .collect();

    if args.format == OutputFormat::Json {
        print_json(&rows)?;
        return Ok(0);
    }
    for row in &rows {
        println!(
            "{:>4}  {}  {:<32} {:>4}",
            row.ranked.rank,
            row.ranked.passport,
            row.name.unwrap_or("-"),
            row.ranked.score
        );
    }
    Ok(0)
}
