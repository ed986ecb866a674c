use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::SourceError;
use crate::models::{CoachProfileRecord, ConferenceLevel, PlayerSeasonRecord, TeamSeasonRecord};

#[derive(Debug, Deserialize)]
struct PlayerRow {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Coach", default)]
    coach: Option<String>,
    #[serde(rename = "Coach_ID", default)]
    coach_id: Option<String>,
    #[serde(rename = "teamId", default)]
    team_id: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    season: Option<i32>,
    #[serde(default)]
    conference_level: Option<String>,
    #[serde(rename = "oneYears", default, deserialize_with = "csv::invalid_option")]
    one_years: Option<f64>,
    #[serde(rename = "NBA_Probability", default, deserialize_with = "csv::invalid_option")]
    nba_probability: Option<f64>,
    #[serde(rename = "NBA_Prob_Change", default, deserialize_with = "csv::invalid_option")]
    nba_prob_change: Option<f64>,
    #[serde(rename = "Transfer_Prob_Change", default, deserialize_with = "csv::invalid_option")]
    transfer_prob_change: Option<f64>,
    #[serde(rename = "Actual_NBA", default, deserialize_with = "csv::invalid_option")]
    actual_nba: Option<f64>,
    #[serde(rename = "Actual_Transfer", default, deserialize_with = "csv::invalid_option")]
    actual_transfer: Option<f64>,
    #[serde(rename = "eventually_NBA", default, deserialize_with = "csv::invalid_option")]
    eventually_nba: Option<f64>,
    #[serde(rename = "High_Transfer_Prob", default, deserialize_with = "csv::invalid_option")]
    high_transfer_prob: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TeamRow {
    #[serde(rename = "Season", default, deserialize_with = "csv::invalid_option")]
    season: Option<i32>,
    #[serde(rename = "Coach_ID", default)]
    coach_id: Option<String>,
    #[serde(rename = "W", default, deserialize_with = "csv::invalid_option")]
    wins: Option<u32>,
    #[serde(rename = "L", default, deserialize_with = "csv::invalid_option")]
    losses: Option<u32>,
    #[serde(rename = "Pace", default, deserialize_with = "csv::invalid_option")]
    pace: Option<f64>,
    #[serde(rename = "ORtg", default, deserialize_with = "csv::invalid_option")]
    offensive_rating: Option<f64>,
    #[serde(rename = "SRS", default, deserialize_with = "csv::invalid_option")]
    srs: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    #[serde(rename = "Coach", default)]
    coach: Option<String>,
    #[serde(rename = "Coach_ID", default)]
    coach_id: Option<String>,
    #[serde(default)]
    conference_level: Option<String>,
    #[serde(rename = "avg_NBA_Prob_first_year", default, deserialize_with = "csv::invalid_option")]
    nba_prob_first_year: Option<f64>,
    #[serde(rename = "avg_Transfer_Prob_first_year", default, deserialize_with = "csv::invalid_option")]
    transfer_prob_first_year: Option<f64>,
    #[serde(rename = "avg_NBA_Prob_multi_year", default, deserialize_with = "csv::invalid_option")]
    nba_prob_multi_year: Option<f64>,
    #[serde(rename = "avg_NBA_Prob_Change_multi_year", default, deserialize_with = "csv::invalid_option")]
    nba_prob_change_multi_year: Option<f64>,
    #[serde(rename = "avg_Transfer_Prob_multi_year", default, deserialize_with = "csv::invalid_option")]
    transfer_prob_multi_year: Option<f64>,
    #[serde(rename = "avg_High_Transfer_first_year", default, deserialize_with = "csv::invalid_option")]
    high_transfer_first_year: Option<f64>,
    #[serde(rename = "avg_High_Transfer_multi_year", default, deserialize_with = "csv::invalid_option")]
    high_transfer_multi_year: Option<f64>,
    #[serde(
        rename = "avg_high_transfer_prob_change_multi_year",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    high_transfer_change_multi_year: Option<f64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn flag(value: Option<f64>) -> bool {
    value == Some(1.0)
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl PlayerRow {
    /// Rows missing a coach, a coach id or a numeric NBA probability change are unusable.
    fn into_record(self) -> Option<PlayerSeasonRecord> {
        let coach_name = non_empty(self.coach)?;
        let coach_id = non_empty(self.coach_id)?;
        let nba_probability_change = finite(self.nba_prob_change)?;

        Some(PlayerSeasonRecord {
            player_name: non_empty(self.name).unwrap_or_default(),
            coach_name,
            coach_id,
            team_id: non_empty(self.team_id).unwrap_or_default(),
            season: self.season,
            conference_level: self
                .conference_level
                .as_deref()
                .and_then(ConferenceLevel::parse_label),
            is_single_season_tenure: flag(self.one_years),
            nba_probability: finite(self.nba_probability).unwrap_or(0.0),
            nba_probability_change,
            transfer_probability_change: finite(self.transfer_prob_change),
            actual_nba_outcome: flag(self.actual_nba),
            actual_transfer_outcome: flag(self.actual_transfer),
            eventually_reached_nba: flag(self.eventually_nba),
            high_transfer_probability: finite(self.high_transfer_prob),
        })
    }
}

impl TeamRow {
    fn into_record(self) -> Option<TeamSeasonRecord> {
        Some(TeamSeasonRecord {
            coach_id: non_empty(self.coach_id)?,
            season: self.season,
            wins: self.wins.unwrap_or(0),
            losses: self.losses.unwrap_or(0),
            pace: finite(self.pace).unwrap_or(0.0),
            offensive_rating: finite(self.offensive_rating).unwrap_or(0.0),
            simple_rating_system: finite(self.srs).unwrap_or(0.0),
        })
    }
}

impl ProfileRow {
    fn into_record(self) -> Option<CoachProfileRecord> {
        Some(CoachProfileRecord {
            coach_id: non_empty(self.coach_id)?,
            coach_name: non_empty(self.coach).unwrap_or_default(),
            conference_level: self
                .conference_level
                .as_deref()
                .and_then(ConferenceLevel::parse_label),
            nba_prob_first_year: self.nba_prob_first_year,
            transfer_prob_first_year: self.transfer_prob_first_year,
            nba_prob_multi_year: self.nba_prob_multi_year,
            nba_prob_change_multi_year: self.nba_prob_change_multi_year,
            transfer_prob_multi_year: self.transfer_prob_multi_year,
            high_transfer_first_year: self.high_transfer_first_year,
            high_transfer_multi_year: self.high_transfer_multi_year,
            high_transfer_change_multi_year: self.high_transfer_change_multi_year,
        })
    }
}

fn read_rows<R, T, U>(
    path: &Path,
    reader: R,
    convert: impl Fn(T) -> Option<U>,
) -> Result<Vec<U>, SourceError>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    let mut discarded = 0usize;

    for result in reader.deserialize::<T>() {
        let row = result.map_err(|source| SourceError::Row {
            path: path.to_path_buf(),
            source,
        })?;
        match convert(row) {
            Some(record) => records.push(record),
            None => discarded += 1,
        }
    }

    if discarded > 0 {
        debug!(path = %path.display(), discarded, "discarded unusable rows");
    }
    info!(path = %path.display(), loaded = records.len(), "loaded records");
    Ok(records)
}

fn open(path: &Path) -> Result<std::fs::File, SourceError> {
    std::fs::File::open(path).map_err(|err| SourceError::Open {
        path: path.to_path_buf(),
        source: csv::Error::from(err),
    })
}

/// Player-season rows in file order, with unusable rows dropped.
pub fn load_player_seasons(path: &Path) -> Result<Vec<PlayerSeasonRecord>, SourceError> {
    read_rows(path, open(path)?, PlayerRow::into_record)
}

pub fn load_team_seasons(path: &Path) -> Result<Vec<TeamSeasonRecord>, SourceError> {
    read_rows(path, open(path)?, TeamRow::into_record)
}

pub fn load_coach_profiles(path: &Path) -> Result<Vec<CoachProfileRecord>, SourceError> {
    read_rows(path, open(path)?, ProfileRow::into_record)
}
