use crate::models::{ConferenceLevel, PlayerSeasonRecord};

/// A single-season P5 record from 2022 with every metric at zero.
pub(crate) fn record(player: &str, coach_id: &str, team: &str) -> PlayerSeasonRecord {
    PlayerSeasonRecord {
        player_name: player.to_string(),
        coach_name: format!("Coach {coach_id}"),
        coach_id: coach_id.to_string(),
        team_id: team.to_string(),
        season: Some(2022),
        conference_level: Some(ConferenceLevel::P5),
        is_single_season_tenure: true,
        nba_probability: 0.0,
        nba_probability_change: 0.0,
        transfer_probability_change: Some(0.0),
        actual_nba_outcome: false,
        actual_transfer_outcome: false,
        eventually_reached_nba: false,
        high_transfer_probability: None,
    }
}
