use crate::models::{CoachProfileRecord, ConferenceLevel, RadarAxis};

/// Upper bound of every radar axis; values are precomputed percentiles.
pub const AXIS_MAX: i64 = 100;

fn axis_value(value: Option<f64>) -> i64 {
    match value {
        Some(v) if v.is_finite() => v.round() as i64,
        _ => 0,
    }
}

/// Radar axes for a coach; the axis set follows the coach's conference tier.
pub fn radar_axes(profile: &CoachProfileRecord) -> Vec<RadarAxis> {
    let axes: Vec<(&'static str, Option<f64>)> = match profile.conference_level {
        Some(ConferenceLevel::P5) => vec![
            ("Prob of NBA for 1st-Yrs", profile.nba_prob_first_year),
            ("Prob of Transfer for 1st-Yrs", profile.transfer_prob_first_year),
            ("Prob of NBA for Multi-Yrs", profile.nba_prob_multi_year),
            ("Δ in Prob of NBA for Multi-Yrs", profile.nba_prob_change_multi_year),
            ("Prob of Transfer for Multi-Yrs", profile.transfer_prob_multi_year),
        ],
        _ => vec![
            ("Prob of NBA for 1st-Yrs", profile.nba_prob_first_year),
            ("Prob of Transfer to P5 for 1st-Yrs", profile.high_transfer_first_year),
            ("Prob of NBA for Multi-Yrs", profile.nba_prob_multi_year),
            ("Δ in Prob of NBA for Multi-Yrs", profile.nba_prob_change_multi_year),
            ("Prob of Transfer to P5 for Multi-Yrs", profile.high_transfer_multi_year),
            (
                "Δ in Prob of Transfer to P5 for Multi-Yrs",
                profile.high_transfer_change_multi_year,
            ),
        ],
    };

    axes.into_iter()
        .map(|(label, value)| RadarAxis {
            label,
            value: axis_value(value),
        })
        .collect()
}

pub fn find_profile<'a>(
    profiles: &'a [CoachProfileRecord],
    coach_id: &str,
) -> Option<&'a CoachProfileRecord> {
    let coach_id = coach_id.trim();
    profiles.iter().find(|p| p.coach_id.trim() == coach_id)
}
