use std::collections::HashMap;

use tracing::debug;

use crate::models::{CoachSummary, PlayerSeasonRecord, TenureClass, Thresholds};

#[derive(Debug, Default)]
struct CoachAccumulator {
    coach_id: String,
    coach_name: String,
    team_id: String,
    one_year_probs: Vec<f64>,
    multi_year_probs: Vec<f64>,
    transfer_changes: Vec<f64>,
    nba_entrants: u32,
    transfer_entrants: u32,
}

/// Zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl CoachAccumulator {
    fn push(&mut self, record: &PlayerSeasonRecord) {
        if record.is_single_season_tenure {
            self.one_year_probs.push(record.nba_probability);
        } else {
            self.multi_year_probs.push(record.nba_probability);
        }
        self.transfer_changes
            .push(record.transfer_probability_change.unwrap_or(0.0));
        self.nba_entrants += u32::from(record.actual_nba_outcome);
        self.transfer_entrants += u32::from(record.actual_transfer_outcome);
    }

    fn finish(self) -> CoachSummary {
        CoachSummary {
            record_count: self.one_year_probs.len() + self.multi_year_probs.len(),
            avg_one_year_prob: mean(&self.one_year_probs),
            avg_multi_year_prob: mean(&self.multi_year_probs),
            avg_transfer_prob_change: mean(&self.transfer_changes),
            nba_entrants: self.nba_entrants,
            transfer_entrants: self.transfer_entrants,
            coach_id: self.coach_id,
            coach_name: self.coach_name,
            team_id: self.team_id,
        }
    }
}

/// Groups records by coach id and keeps only coaches clearing both thresholds.
///
/// Only records of the selected tenure class contribute. Output is in order of each
/// coach's first contributing record; display name and team come from that record.
pub fn aggregate_coaches(
    records: &[PlayerSeasonRecord],
    tenure: TenureClass,
    thresholds: &Thresholds,
) -> Vec<CoachSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut coaches: Vec<CoachAccumulator> = Vec::new();

    for record in records {
        if !tenure.matches(record.is_single_season_tenure) {
            continue;
        }
        let slot = *index.entry(record.coach_id.as_str()).or_insert_with(|| {
            coaches.push(CoachAccumulator {
                coach_id: record.coach_id.clone(),
                coach_name: record.coach_name.clone(),
                team_id: record.team_id.clone(),
                ..CoachAccumulator::default()
            });
            coaches.len() - 1
        });
        coaches[slot].push(record);
    }

    let grouped = coaches.len();
    let summaries: Vec<CoachSummary> = coaches
        .into_iter()
        .map(CoachAccumulator::finish)
        .filter(|coach| {
            coach.avg_transfer_prob_change >= thresholds.min_transfer_change
                && coach.nba_entrants >= thresholds.min_nba_entrants
        })
        .collect();

    debug!(grouped, retained = summaries.len(), "aggregated coaches");
    summaries
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryField {
    NbaEntrants,
    TransferEntrants,
    AvgOneYearProb,
    AvgMultiYearProb,
    AvgTransferProbChange,
}

impl SummaryField {
    pub fn value(self, summary: &CoachSummary) -> f64 {
        match self {
            SummaryField::NbaEntrants => summary.nba_entrants as f64,
            SummaryField::TransferEntrants => summary.transfer_entrants as f64,
            SummaryField::AvgOneYearProb => summary.avg_one_year_prob,
            SummaryField::AvgMultiYearProb => summary.avg_multi_year_prob,
            SummaryField::AvgTransferProbChange => summary.avg_transfer_prob_change,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SummaryField::NbaEntrants => "NBA entrants",
            SummaryField::TransferEntrants => "players transferred to P5",
            SummaryField::AvgOneYearProb => "avg NBA probability (one-year)",
            SummaryField::AvgMultiYearProb => "avg NBA probability (multi-year)",
            SummaryField::AvgTransferProbChange => "avg transfer-to-P5 probability change",
        }
    }

    /// The probability axis that matches the selected tenure class.
    pub fn nba_probability_for(tenure: TenureClass) -> Self {
        match tenure {
            TenureClass::SingleSeason => SummaryField::AvgOneYearProb,
            TenureClass::MultiSeason => SummaryField::AvgMultiYearProb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationMeans {
    pub x: f64,
    pub y: f64,
}

/// Mean of two summary fields across the population, or `None` when it is empty.
pub fn population_means(
    summaries: &[CoachSummary],
    x: SummaryField,
    y: SummaryField,
) -> Option<PopulationMeans> {
    if summaries.is_empty() {
        return None;
    }
    let xs: Vec<f64> = summaries.iter().map(|s| x.value(s)).collect();
    let ys: Vec<f64> = summaries.iter().map(|s| y.value(s)).collect();
    Some(PopulationMeans {
        x: mean(&xs),
        y: mean(&ys),
    })
}

pub fn matches_highlight(summary: &CoachSummary, needle: &str) -> bool {
    let needle = needle.trim();
    !needle.is_empty()
        && summary
            .coach_name
            .to_lowercase()
            .contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::record;
    use proptest::prelude::*;

    fn coach_record(coach_id: &str, transfer_change: f64, nba: bool) -> PlayerSeasonRecord {
        let mut r = record("p", coach_id, "t1");
        r.transfer_probability_change = Some(transfer_change);
        r.actual_nba_outcome = nba;
        r
    }

    #[test]
    fn default_thresholds_drop_negative_transfer_change() {
        let records = vec![
            coach_record("a", 0.10, false),
            coach_record("b", -0.05, false),
            coach_record("c", 0.30, false),
        ];

        let coaches = aggregate_coaches(&records, TenureClass::SingleSeason, &Thresholds::default());
        let ids: Vec<_> = coaches.iter().map(|c| c.coach_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn averages_and_counts_per_coach() {
        let mut first = coach_record("a", 0.2, true);
        first.nba_probability = 0.6;
        first.actual_transfer_outcome = true;
        let mut second = coach_record("a", 0.0, true);
        second.nba_probability = 0.2;
        let records = vec![first, second];

        let coaches = aggregate_coaches(&records, TenureClass::SingleSeason, &Thresholds::default());
        assert_eq!(coaches.len(), 1);
        let coach = &coaches[0];
        assert!((coach.avg_one_year_prob - 0.4).abs() < 1e-9);
        assert_eq!(coach.avg_multi_year_prob, 0.0);
        assert!((coach.avg_transfer_prob_change - 0.1).abs() < 1e-9);
        assert_eq!(coach.nba_entrants, 2);
        assert_eq!(coach.transfer_entrants, 1);
        assert_eq!(coach.record_count, 2);
    }

    #[test]
    fn only_selected_tenure_contributes() {
        let mut veteran = coach_record("b", 0.5, true);
        veteran.is_single_season_tenure = false;
        veteran.nba_probability = 0.9;
        let records = vec![coach_record("a", 0.1, false), veteran];

        let multi = aggregate_coaches(&records, TenureClass::MultiSeason, &Thresholds::default());
        assert_eq!(multi.len(), 1);
        assert_eq!(multi[0].coach_id, "b");
        assert!((multi[0].avg_multi_year_prob - 0.9).abs() < 1e-9);
        assert_eq!(multi[0].avg_one_year_prob, 0.0);
    }

    #[test]
    fn groups_by_id_even_when_names_collide() {
        let mut a = coach_record("c1", 0.1, false);
        a.coach_name = "Chris Jones".to_string();
        let mut b = coach_record("c2", 0.1, false);
        b.coach_name = "Chris Jones".to_string();

        let coaches = aggregate_coaches(&[a, b], TenureClass::SingleSeason, &Thresholds::default());
        assert_eq!(coaches.len(), 2);
    }

    #[test]
    fn missing_transfer_change_counts_as_zero() {
        let mut r = coach_record("a", 0.0, false);
        r.transfer_probability_change = None;
        let records = vec![r, coach_record("a", 0.4, false)];

        let coaches = aggregate_coaches(&records, TenureClass::SingleSeason, &Thresholds::default());
        assert!((coaches[0].avg_transfer_prob_change - 0.2).abs() < 1e-9);
    }

    #[test]
    fn population_means_cover_selected_axes() {
        let records = vec![
            coach_record("a", 0.1, true),
            coach_record("b", 0.3, false),
            coach_record("b", 0.3, true),
        ];
        let coaches = aggregate_coaches(&records, TenureClass::SingleSeason, &Thresholds::default());

        let means = population_means(
            &coaches,
            SummaryField::NbaEntrants,
            SummaryField::AvgTransferProbChange,
        )
        .unwrap();
        assert!((means.x - 1.0).abs() < 1e-9);
        assert!((means.y - 0.2).abs() < 1e-9);
        assert_eq!(
            population_means(&[], SummaryField::NbaEntrants, SummaryField::AvgOneYearProb),
            None
        );
    }

    #[test]
    fn highlight_is_case_insensitive_substring() {
        let mut r = coach_record("a", 0.1, false);
        r.coach_name = "Dana Altman".to_string();
        let coaches = aggregate_coaches(&[r], TenureClass::SingleSeason, &Thresholds::default());

        assert!(matches_highlight(&coaches[0], "altm"));
        assert!(!matches_highlight(&coaches[0], "  "));
        assert!(!matches_highlight(&coaches[0], "izzo"));
    }

    proptest! {
        #[test]
        fn raising_entrant_threshold_never_grows_output(
            rows in prop::collection::vec((0..6u8, -1.0..1.0f64, any::<bool>()), 0..60),
            low in 0..4u32,
            bump in 0..4u32,
        ) {
            let records: Vec<_> = rows
                .iter()
                .map(|(coach, change, nba)| coach_record(&format!("c{coach}"), *change, *nba))
                .collect();
            let loose = Thresholds { min_transfer_change: -1.0, min_nba_entrants: low };
            let strict = Thresholds { min_transfer_change: -1.0, min_nba_entrants: low + bump };

            let wide = aggregate_coaches(&records, TenureClass::SingleSeason, &loose);
            let narrow = aggregate_coaches(&records, TenureClass::SingleSeason, &strict);

            prop_assert!(narrow.len() <= wide.len());
            prop_assert!(narrow.iter().all(|c| wide.contains(c)));
        }
    }
}
