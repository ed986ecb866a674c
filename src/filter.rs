use std::collections::BTreeSet;

use crate::models::{FilterCriteria, PlayerSeasonRecord, SeasonFilter};

impl FilterCriteria {
    /// Season, conference and tenure must all match. Unlabelled records never match.
    pub fn matches(&self, record: &PlayerSeasonRecord) -> bool {
        self.season.matches(record.season)
            && record.conference_level == Some(self.conference)
            && self.tenure.matches(record.is_single_season_tenure)
    }
}

/// Stable filter over backfilled records.
pub fn filter_records(
    records: &[PlayerSeasonRecord],
    criteria: &FilterCriteria,
) -> Vec<PlayerSeasonRecord> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

/// `All` followed by every distinct season in ascending order.
pub fn season_options(records: &[PlayerSeasonRecord]) -> Vec<SeasonFilter> {
    let seasons: BTreeSet<i32> = records.iter().filter_map(|r| r.season).collect();
    std::iter::once(SeasonFilter::All)
        .chain(seasons.into_iter().map(SeasonFilter::Season))
        .collect()
}

/// Surrounding whitespace is ignored on both sides of the id comparison.
pub fn records_for_coach<'a>(
    records: &'a [PlayerSeasonRecord],
    coach_id: &str,
) -> Vec<&'a PlayerSeasonRecord> {
    let coach_id = coach_id.trim();
    records
        .iter()
        .filter(|r| r.coach_id.trim() == coach_id)
        .collect()
}
