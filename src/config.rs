use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::Thresholds;

/// First season of the transfer-portal era.
pub const DEFAULT_ERA_CUTOFF: i32 = 2021;
pub const DEFAULT_TOP_MOVERS_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub players_csv: PathBuf,
    pub teams_csv: PathBuf,
    pub profiles_csv: PathBuf,
    pub era_cutoff: i32,
    pub top_movers_limit: usize,
    pub min_transfer_change: f64,
    pub min_nba_entrants: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            players_csv: PathBuf::from("final_merged.csv"),
            teams_csv: PathBuf::from("CbbTeamStats.csv"),
            profiles_csv: PathBuf::from("coach_profiles.csv"),
            era_cutoff: DEFAULT_ERA_CUTOFF,
            top_movers_limit: DEFAULT_TOP_MOVERS_LIMIT,
            min_transfer_change: 0.0,
            min_nba_entrants: 0,
        }
    }
}

impl AnalyticsConfig {
    /// Defaults when no path is given, otherwise the TOML file layered over defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            None => Self::default(),
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_movers_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "top_movers_limit",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !self.min_transfer_change.is_finite() {
            return Err(ConfigError::Invalid {
                field: "min_transfer_change",
                reason: format!("{} is not a finite number", self.min_transfer_change),
            });
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            min_transfer_change: self.min_transfer_change,
            min_nba_entrants: self.min_nba_entrants,
        }
    }
}
