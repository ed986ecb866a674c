use std::collections::HashMap;

use tracing::debug;

use crate::models::{ConferenceLevel, PlayerSeasonRecord};

/// Maps each team to the first conference label seen for it, in input order.
pub fn first_known_conferences(records: &[PlayerSeasonRecord]) -> HashMap<String, ConferenceLevel> {
    let mut map = HashMap::new();
    for record in records {
        if let Some(level) = record.conference_level {
            map.entry(record.team_id.clone()).or_insert(level);
        }
    }
    map
}

/// Fills every missing conference label from the team map, falling back to `Other`.
///
/// The result depends on input order when a team's records disagree on their label,
/// so callers must keep the source order intact.
pub fn backfill_conferences(records: &[PlayerSeasonRecord]) -> Vec<PlayerSeasonRecord> {
    let known = first_known_conferences(records);
    let mut filled = 0usize;

    let output = records
        .iter()
        .map(|record| {
            let mut record = record.clone();
            if record.conference_level.is_none() {
                filled += 1;
                record.conference_level = Some(
                    known
                        .get(&record.team_id)
                        .copied()
                        .unwrap_or(ConferenceLevel::Other),
                );
            }
            record
        })
        .collect();

    debug!(teams = known.len(), filled, "backfilled conference labels");
    output
}
