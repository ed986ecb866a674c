use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{ConferenceLevel, FilterCriteria, PlayerSeasonRecord};

/// The change that drives top-mover ranking for a conference tier.
pub fn mover_metric(conference: ConferenceLevel, record: &PlayerSeasonRecord) -> Option<f64> {
    let value = match conference {
        ConferenceLevel::P5 => Some(record.nba_probability_change),
        ConferenceLevel::Other => record.transfer_probability_change,
    };
    value.filter(|v| v.is_finite())
}

/// Largest individual movements under the filter, one row per player.
///
/// Truncation to `limit` happens before deduplication, so the result can be shorter
/// than `limit` when a player holds several of the top rows.
pub fn top_movers(
    records: &[PlayerSeasonRecord],
    criteria: &FilterCriteria,
    limit: usize,
) -> Vec<PlayerSeasonRecord> {
    let mut ranked: Vec<(f64, &PlayerSeasonRecord)> = records
        .iter()
        .filter(|record| criteria.matches(record))
        .filter_map(|record| mover_metric(criteria.conference, record).map(|m| (m, record)))
        .collect();

    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    ranked.truncate(limit);

    let mut seen: HashSet<&str> = HashSet::new();
    ranked
        .into_iter()
        .filter(|(_, record)| seen.insert(record.player_name.as_str()))
        .map(|(_, record)| record.clone())
        .collect()
}
