use std::fmt;
use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
pub enum ConferenceLevel {
    #[value(name = "P5")]
    P5,
    #[value(name = "Other")]
    Other,
}

impl ConferenceLevel {
    /// Lenient parse used at ingest; unknown labels are treated as missing.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "p5" => Some(Self::P5),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for ConferenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConferenceLevel::P5 => write!(f, "P5"),
            ConferenceLevel::Other => write!(f, "Other"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum TenureClass {
    #[value(name = "one-year")]
    SingleSeason,
    #[value(name = "multi-year")]
    MultiSeason,
}

impl TenureClass {
    pub fn matches(self, is_single_season: bool) -> bool {
        match self {
            TenureClass::SingleSeason => is_single_season,
            TenureClass::MultiSeason => !is_single_season,
        }
    }
}

/// Season selector; `All` is the sentinel that disables season filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeasonFilter {
    All,
    Season(i32),
}

impl SeasonFilter {
    pub fn matches(self, season: Option<i32>) -> bool {
        match self {
            SeasonFilter::All => true,
            SeasonFilter::Season(wanted) => season == Some(wanted),
        }
    }
}

impl FromStr for SeasonFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(SeasonFilter::All);
        }
        trimmed
            .parse::<i32>()
            .map(SeasonFilter::Season)
            .map_err(|_| format!("expected `All` or a season year, got `{value}`"))
    }
}

impl fmt::Display for SeasonFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonFilter::All => write!(f, "All"),
            SeasonFilter::Season(season) => write!(f, "{season}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub season: SeasonFilter,
    pub conference: ConferenceLevel,
    pub tenure: TenureClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub min_transfer_change: f64,
    pub min_nba_entrants: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_transfer_change: 0.0,
            min_nba_entrants: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSeasonRecord {
    pub player_name: String,
    pub coach_name: String,
    pub coach_id: String,
    pub team_id: String,
    pub season: Option<i32>,
    pub conference_level: Option<ConferenceLevel>,
    pub is_single_season_tenure: bool,
    pub nba_probability: f64,
    pub nba_probability_change: f64,
    pub transfer_probability_change: Option<f64>,
    pub actual_nba_outcome: bool,
    pub actual_transfer_outcome: bool,
    pub eventually_reached_nba: bool,
    pub high_transfer_probability: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSeasonRecord {
    pub coach_id: String,
    pub season: Option<i32>,
    pub wins: u32,
    pub losses: u32,
    pub pace: f64,
    pub offensive_rating: f64,
    pub simple_rating_system: f64,
}

/// Per-coach output of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachSummary {
    pub coach_id: String,
    pub coach_name: String,
    pub team_id: String,
    pub avg_one_year_prob: f64,
    pub avg_multi_year_prob: f64,
    pub avg_transfer_prob_change: f64,
    pub nba_entrants: u32,
    pub transfer_entrants: u32,
    pub record_count: usize,
}

/// Era totals for one coach, the input row of the ranking engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenureStats {
    pub coach_id: String,
    pub wins: u32,
    pub losses: u32,
    pub avg_pace: f64,
    pub avg_offensive_rating: f64,
    pub avg_srs: f64,
}

impl TenureStats {
    pub fn games(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }

    /// NaN when no games were played.
    pub fn win_pct(&self) -> f64 {
        self.wins as f64 / self.games() as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub stats: TenureStats,
    pub win_pct_rank: usize,
    pub pace_rank: usize,
    pub offensive_rating_rank: usize,
    pub srs_rank: usize,
    pub population: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum PercentileTier {
    Top10,
    Top25,
    Top50,
    Top75,
    Bottom25,
}

impl PercentileTier {
    pub fn label(self) -> &'static str {
        match self {
            PercentileTier::Top10 => "top 10%",
            PercentileTier::Top25 => "top 25%",
            PercentileTier::Top50 => "top 50%",
            PercentileTier::Top75 => "top 75%",
            PercentileTier::Bottom25 => "bottom 25%",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachProfileRecord {
    pub coach_name: String,
    pub coach_id: String,
    pub conference_level: Option<ConferenceLevel>,
    pub nba_prob_first_year: Option<f64>,
    pub transfer_prob_first_year: Option<f64>,
    pub nba_prob_multi_year: Option<f64>,
    pub nba_prob_change_multi_year: Option<f64>,
    pub transfer_prob_multi_year: Option<f64>,
    pub high_transfer_first_year: Option<f64>,
    pub high_transfer_multi_year: Option<f64>,
    pub high_transfer_change_multi_year: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxis {
    pub label: &'static str,
    pub value: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_filter_parses_sentinel_and_years() {
        assert_eq!("All".parse::<SeasonFilter>(), Ok(SeasonFilter::All));
        assert_eq!("all".parse::<SeasonFilter>(), Ok(SeasonFilter::All));
        assert_eq!("2023".parse::<SeasonFilter>(), Ok(SeasonFilter::Season(2023)));
        assert!("last year".parse::<SeasonFilter>().is_err());
    }

    #[test]
    fn season_filter_all_matches_missing_season() {
        assert!(SeasonFilter::All.matches(None));
        assert!(!SeasonFilter::Season(2022).matches(None));
        assert!(SeasonFilter::Season(2022).matches(Some(2022)));
    }

    #[test]
    fn conference_labels_parse_leniently() {
        assert_eq!(ConferenceLevel::parse_label(" p5 "), Some(ConferenceLevel::P5));
        assert_eq!(ConferenceLevel::parse_label("Other"), Some(ConferenceLevel::Other));
        assert_eq!(ConferenceLevel::parse_label("Mid-major"), None);
    }

    #[test]
    fn games_saturate_instead_of_overflowing() {
        let stats = TenureStats {
            coach_id: "c1".to_string(),
            wins: u32::MAX,
            losses: 3,
            avg_pace: 0.0,
            avg_offensive_rating: 0.0,
            avg_srs: 0.0,
        };
        assert_eq!(stats.games(), u32::MAX);
        assert!(stats.win_pct() > 0.99);
    }

    #[test]
    fn zero_games_yield_undefined_win_pct() {
        let stats = TenureStats {
            coach_id: "c1".to_string(),
            wins: 0,
            losses: 0,
            avg_pace: 0.0,
            avg_offensive_rating: 0.0,
            avg_srs: 0.0,
        };
        assert!(stats.win_pct().is_nan());
    }
}
