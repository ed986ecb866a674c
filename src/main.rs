use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod aggregate;
mod backfill;
mod config;
mod error;
mod filter;
#[cfg(test)]
mod fixtures;
mod models;
mod movers;
mod profile;
mod ranking;
mod report;
mod source;

use config::AnalyticsConfig;
use error::ConfigError;
use models::{ConferenceLevel, FilterCriteria, PlayerSeasonRecord, SeasonFilter, TenureClass};

#[derive(Parser)]
#[command(name = "cbb-coach-analytics")]
#[command(about = "Coach development analytics for college basketball", long_about = None)]
struct Cli {
    /// TOML file with data paths, era cutoff and default thresholds
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Player-season CSV
    #[arg(long, global = true)]
    players: Option<PathBuf>,
    /// Team-season CSV
    #[arg(long, global = true)]
    teams: Option<PathBuf>,
    /// Precomputed coach profile CSV
    #[arg(long, global = true)]
    profiles: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Season year or `All`
    #[arg(long, default_value = "All")]
    season: SeasonFilter,
    #[arg(long, value_enum, default_value_t = ConferenceLevel::P5)]
    conference: ConferenceLevel,
    #[arg(long, value_enum, default_value_t = TenureClass::SingleSeason)]
    tenure: TenureClass,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            season: self.season,
            conference: self.conference,
            tenure: self.tenure,
        }
    }
}

#[derive(Args)]
struct ThresholdArgs {
    #[arg(long, allow_hyphen_values = true)]
    min_transfer_change: Option<f64>,
    #[arg(long)]
    min_nba_entrants: Option<u32>,
}

impl ThresholdArgs {
    fn apply(&self, config: &mut AnalyticsConfig) {
        if let Some(value) = self.min_transfer_change {
            config.min_transfer_change = value;
        }
        if let Some(value) = self.min_nba_entrants {
            config.min_nba_entrants = value;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate coaches under the selected filters
    Coaches {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        thresholds: ThresholdArgs,
        /// Mark coaches whose name contains this text
        #[arg(long)]
        highlight: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List the largest individual probability jumps
    Movers {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// List season filter options
    Seasons,
    /// Show a coach's resume and ranks within the era
    Resume {
        #[arg(long)]
        coach_id: String,
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown dashboard report
    Report {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        thresholds: ThresholdArgs,
        #[arg(long)]
        highlight: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

impl Commands {
    fn apply_overrides(&self, config: &mut AnalyticsConfig) {
        match self {
            Commands::Coaches { thresholds, .. } | Commands::Report { thresholds, .. } => {
                thresholds.apply(config)
            }
            Commands::Movers {
                limit: Some(limit), ..
            } => config.top_movers_limit = *limit,
            _ => {}
        }
    }
}

/// File and defaults, then path and command flags, validated as a whole.
fn resolve_config(cli: &Cli) -> Result<AnalyticsConfig, ConfigError> {
    let mut config = AnalyticsConfig::load(cli.config.as_deref())?;
    if let Some(path) = &cli.players {
        config.players_csv = path.clone();
    }
    if let Some(path) = &cli.teams {
        config.teams_csv = path.clone();
    }
    if let Some(path) = &cli.profiles {
        config.profiles_csv = path.clone();
    }
    cli.command.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

fn load_players(config: &AnalyticsConfig) -> anyhow::Result<Vec<PlayerSeasonRecord>> {
    let raw = source::load_player_seasons(&config.players_csv)
        .with_context(|| format!("failed to load players from {}", config.players_csv.display()))?;
    Ok(backfill::backfill_conferences(&raw))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli).context("failed to load configuration")?;

    match cli.command {
        Commands::Coaches {
            filters,
            highlight,
            json,
            ..
        } => {
            let records = load_players(&config)?;
            let criteria = filters.criteria();
            let filtered = filter::filter_records(&records, &criteria);
            let mut coaches =
                aggregate::aggregate_coaches(&filtered, criteria.tenure, &config.thresholds());
            let field = report::primary_field(&criteria);
            report::sort_for_display(&mut coaches, field);

            if json {
                println!("{}", serde_json::to_string_pretty(&coaches)?);
            } else if coaches.is_empty() {
                println!("No coaches match these filters.");
            } else {
                for coach in &coaches {
                    println!("{}", report::coach_line(coach, field, highlight.as_deref()));
                }
            }
        }
        Commands::Movers { filters, json, .. } => {
            let records = load_players(&config)?;
            let criteria = filters.criteria();
            let movers = movers::top_movers(&records, &criteria, config.top_movers_limit);

            if json {
                println!("{}", serde_json::to_string_pretty(&movers)?);
            } else if movers.is_empty() {
                println!("No player movements recorded for these filters.");
            } else {
                for record in &movers {
                    println!("{}", report::mover_line(record, criteria.conference));
                }
            }
        }
        Commands::Seasons => {
            let records = load_players(&config)?;
            for season in filter::season_options(&records) {
                println!("{season}");
            }
        }
        Commands::Resume { coach_id, json } => {
            let coach_id = coach_id.trim();
            let records = load_players(&config)?;
            let teams = source::load_team_seasons(&config.teams_csv).with_context(|| {
                format!("failed to load team stats from {}", config.teams_csv.display())
            })?;
            let profiles = if config.profiles_csv.exists() {
                source::load_coach_profiles(&config.profiles_csv)?
            } else {
                info!(path = %config.profiles_csv.display(), "no coach profiles found");
                Vec::new()
            };

            let coached = filter::records_for_coach(&records, coach_id);
            let ranking = ranking::coach_resume(&teams, config.era_cutoff, coach_id);
            let profile = profile::find_profile(&profiles, coach_id);
            let radar = profile.map(profile::radar_axes);

            if json {
                let payload = serde_json::json!({
                    "coach_id": coach_id,
                    "player_seasons": coached.len(),
                    "ranking": ranking,
                    "radar": radar,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                let coach_name = coached
                    .first()
                    .map(|r| r.coach_name.as_str())
                    .or(profile.map(|p| p.coach_name.as_str()));
                print!(
                    "{}",
                    report::build_resume(
                        coach_id,
                        coach_name,
                        config.era_cutoff,
                        coached.len(),
                        ranking.as_ref(),
                        radar.as_deref(),
                    )
                );
            }
        }
        Commands::Report {
            filters,
            highlight,
            out,
            ..
        } => {
            let records = load_players(&config)?;
            let criteria = filters.criteria();
            let thresholds = config.thresholds();
            let filtered = filter::filter_records(&records, &criteria);
            let coaches = aggregate::aggregate_coaches(&filtered, criteria.tenure, &thresholds);
            let movers = movers::top_movers(&records, &criteria, config.top_movers_limit);
            let report = report::build_report(
                &criteria,
                &thresholds,
                chrono::Utc::now().date_naive(),
                &coaches,
                &movers,
                highlight.as_deref(),
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
