use std::fmt::Write;

use chrono::NaiveDate;

use crate::aggregate::{matches_highlight, population_means, SummaryField};
use crate::models::{
    CoachSummary, ConferenceLevel, FilterCriteria, PlayerSeasonRecord, RadarAxis, RankingEntry,
    TenureClass, Thresholds,
};
use crate::movers::mover_metric;
use crate::profile::AXIS_MAX;
use crate::ranking::{percentile_tier, rank_text};

pub fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// The summary field a tier is judged on in the coach table.
pub fn primary_field(criteria: &FilterCriteria) -> SummaryField {
    match criteria.conference {
        ConferenceLevel::P5 => SummaryField::nba_probability_for(criteria.tenure),
        ConferenceLevel::Other => SummaryField::AvgTransferProbChange,
    }
}

/// Descending by `field`, then by display name.
pub fn sort_for_display(summaries: &mut [CoachSummary], field: SummaryField) {
    summaries.sort_by(|a, b| {
        field
            .value(b)
            .partial_cmp(&field.value(a))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.coach_name.cmp(&b.coach_name))
    });
}

pub fn coach_line(summary: &CoachSummary, field: SummaryField, highlight: Option<&str>) -> String {
    let marker = match highlight {
        Some(needle) if matches_highlight(summary, needle) => "* ",
        _ => "",
    };
    format!(
        "{}{} [{}] ({}) {} {}, {} NBA entrants, {} transfers across {} player-seasons",
        marker,
        summary.coach_name,
        summary.coach_id,
        summary.team_id,
        field.label(),
        percent(field.value(summary)),
        summary.nba_entrants,
        summary.transfer_entrants,
        summary.record_count
    )
}

pub fn mover_line(record: &PlayerSeasonRecord, conference: ConferenceLevel) -> String {
    let change = mover_metric(conference, record).unwrap_or(0.0);
    let season = record
        .season
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    let nba = if record.eventually_reached_nba { " (NBA)" } else { "" };
    format!(
        "{}{} under {} in {}: {:+.3}",
        record.player_name, nba, record.coach_name, season, change
    )
}

fn write_means(output: &mut String, summaries: &[CoachSummary], x: SummaryField, y: SummaryField) {
    if let Some(means) = population_means(summaries, x, y) {
        let _ = writeln!(
            output,
            "- mean {}: {:.2}; mean {}: {:.3}",
            x.label(),
            means.x,
            y.label(),
            means.y
        );
    }
}

pub fn build_report(
    criteria: &FilterCriteria,
    thresholds: &Thresholds,
    generated_on: NaiveDate,
    summaries: &[CoachSummary],
    movers: &[PlayerSeasonRecord],
    highlight: Option<&str>,
) -> String {
    let field = primary_field(criteria);
    let mut coaches = summaries.to_vec();
    sort_for_display(&mut coaches, field);

    let mut output = String::new();
    let _ = writeln!(output, "# College Basketball Coach Dashboard");
    let _ = writeln!(
        output,
        "Generated {} for season {}, {} conferences, {} players",
        generated_on,
        criteria.season,
        criteria.conference,
        match criteria.tenure {
            TenureClass::SingleSeason => "one-year",
            TenureClass::MultiSeason => "multi-year",
        }
    );
    let _ = writeln!(
        output,
        "Minimum transfer change {:.2}, minimum NBA entrants {}",
        thresholds.min_transfer_change, thresholds.min_nba_entrants
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Coaches");

    if coaches.is_empty() {
        let _ = writeln!(output, "No coaches match these filters.");
    } else {
        for coach in coaches.iter() {
            let _ = writeln!(output, "- {}", coach_line(coach, field, highlight));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Population Averages");
    if coaches.is_empty() {
        let _ = writeln!(output, "No coaches to average.");
    } else {
        write_means(
            &mut output,
            &coaches,
            SummaryField::NbaEntrants,
            SummaryField::nba_probability_for(criteria.tenure),
        );
        if criteria.conference == ConferenceLevel::Other {
            write_means(
                &mut output,
                &coaches,
                SummaryField::TransferEntrants,
                SummaryField::AvgTransferProbChange,
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Top Player Jumps: {}",
        match criteria.conference {
            ConferenceLevel::P5 => "NBA Probability",
            ConferenceLevel::Other => "Transfer to P5",
        }
    );
    if movers.is_empty() {
        let _ = writeln!(output, "No player movements recorded for these filters.");
    } else {
        for record in movers {
            let _ = writeln!(output, "- {}", mover_line(record, criteria.conference));
        }
    }

    output
}

fn ranked_stat(output: &mut String, label: &str, value: String, rank: usize, population: usize) {
    let tier = percentile_tier(rank, population)
        .map(|t| format!(", {}", t.label()))
        .unwrap_or_default();
    let _ = writeln!(
        output,
        "- {label}: {value} {}{tier}",
        rank_text(rank, population)
    );
}

pub fn build_resume(
    coach_id: &str,
    coach_name: Option<&str>,
    era_cutoff: i32,
    player_seasons: usize,
    ranking: Option<&RankingEntry>,
    radar: Option<&[RadarAxis]>,
) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# {}", coach_name.unwrap_or(coach_id));
    let _ = writeln!(output, "Showing {player_seasons} player-seasons developed under this coach.");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Coach Resume");
    let _ = writeln!(output, "Stats since {era_cutoff} (Transfer Portal Era)");

    let stats = ranking.filter(|entry| {
        let s = &entry.stats;
        let win_pct = s.win_pct();
        let all_zero = (win_pct == 0.0 || win_pct.is_nan())
            && s.avg_pace == 0.0
            && s.avg_offensive_rating == 0.0
            && s.avg_srs == 0.0;
        !all_zero
    });

    match stats {
        None => {
            let _ = writeln!(output, "No team stats available");
        }
        Some(entry) => {
            let s = &entry.stats;
            let win_pct = if s.win_pct().is_nan() {
                "n/a".to_string()
            } else {
                percent(s.win_pct())
            };
            ranked_stat(&mut output, "Win %", win_pct, entry.win_pct_rank, entry.population);
            let _ = writeln!(output, "- Wins: {} ({} games)", s.wins, s.games());
            ranked_stat(
                &mut output,
                "Offensive Rating",
                format!("{:.1}", s.avg_offensive_rating),
                entry.offensive_rating_rank,
                entry.population,
            );
            ranked_stat(
                &mut output,
                "Pace",
                format!("{:.1}", s.avg_pace),
                entry.pace_rank,
                entry.population,
            );
            ranked_stat(
                &mut output,
                "SRS",
                format!("{:.1}", s.avg_srs),
                entry.srs_rank,
                entry.population,
            );
        }
    }

    if let Some(axes) = radar {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Development Profile (0-{AXIS_MAX})");
        for axis in axes {
            let _ = writeln!(output, "- {}: {}", axis.label, axis.value);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::record;
    use crate::models::{SeasonFilter, TenureStats};

    fn summary(id: &str, name: &str, one_year: f64, transfer: f64) -> CoachSummary {
        CoachSummary {
            coach_id: id.to_string(),
            coach_name: name.to_string(),
            team_id: "t1".to_string(),
            avg_one_year_prob: one_year,
            avg_multi_year_prob: 0.0,
            avg_transfer_prob_change: transfer,
            nba_entrants: 1,
            transfer_entrants: 0,
            record_count: 2,
        }
    }

    fn criteria(conference: ConferenceLevel) -> FilterCriteria {
        FilterCriteria {
            season: SeasonFilter::Season(2023),
            conference,
            tenure: TenureClass::SingleSeason,
        }
    }

    #[test]
    fn percent_formats_one_decimal() {
        assert_eq!(percent(0.1234), "12.3%");
        assert_eq!(percent(0.0), "0.0%");
    }

    #[test]
    fn primary_field_follows_conference_and_tenure() {
        assert_eq!(primary_field(&criteria(ConferenceLevel::P5)), SummaryField::AvgOneYearProb);
        assert_eq!(
            primary_field(&criteria(ConferenceLevel::Other)),
            SummaryField::AvgTransferProbChange
        );
    }

    #[test]
    fn report_sorts_coaches_and_marks_highlight() {
        let summaries = vec![
            summary("c1", "Ann Lowe", 0.2, 0.0),
            summary("c2", "Bo Ryan", 0.6, 0.0),
        ];
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let report = build_report(
            &criteria(ConferenceLevel::P5),
            &Thresholds::default(),
            date,
            &summaries,
            &[],
            Some("ryan"),
        );

        assert!(report.contains("Generated 2026-03-01 for season 2023, P5 conferences, one-year players"));
        let bo = report.find("* Bo Ryan [c2]").unwrap();
        let ann = report.find("- Ann Lowe [c1]").unwrap();
        assert!(bo < ann);
        assert!(report.contains("Top Player Jumps: NBA Probability"));
        assert!(report.contains("No player movements recorded"));
    }

    #[test]
    fn other_tier_report_adds_transfer_means() {
        let summaries = vec![summary("c1", "Ann Lowe", 0.2, 0.1)];
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let report = build_report(
            &criteria(ConferenceLevel::Other),
            &Thresholds::default(),
            date,
            &summaries,
            &[],
            None,
        );
        assert!(report.contains("mean players transferred to P5"));
        assert!(report.contains("Top Player Jumps: Transfer to P5"));
    }

    #[test]
    fn mover_line_shows_signed_change() {
        let mut r = record("Jay Reed", "c1", "t1");
        r.nba_probability_change = 0.25;
        r.eventually_reached_nba = true;
        r.coach_name = "Kim Boyd".to_string();
        assert_eq!(
            mover_line(&r, ConferenceLevel::P5),
            "Jay Reed (NBA) under Kim Boyd in 2022: +0.250"
        );
    }

    #[test]
    fn resume_prints_ranks_and_tiers() {
        let entry = RankingEntry {
            stats: TenureStats {
                coach_id: "c1".to_string(),
                wins: 60,
                losses: 30,
                avg_pace: 68.3,
                avg_offensive_rating: 112.0,
                avg_srs: 14.5,
            },
            win_pct_rank: 3,
            pace_rank: 150,
            offensive_rating_rank: 20,
            srs_rank: 1,
            population: 200,
        };
        let radar = vec![RadarAxis {
            label: "Prob of NBA for 1st-Yrs",
            value: 82,
        }];

        let resume = build_resume("c1", Some("Kim Boyd"), 2021, 14, Some(&entry), Some(&radar));
        assert!(resume.starts_with("# Kim Boyd\n"));
        assert!(resume.contains("Showing 14 player-seasons"));
        assert!(resume.contains("- Win %: 66.7% (3rd of 200), top 10%"));
        assert!(resume.contains("- Wins: 60 (90 games)"));
        assert!(resume.contains("- Pace: 68.3 (150th of 200), top 75%"));
        assert!(resume.contains("- Prob of NBA for 1st-Yrs: 82"));
    }

    #[test]
    fn resume_without_stats_says_so() {
        let resume = build_resume("c9", None, 2021, 0, None, None);
        assert!(resume.starts_with("# c9\n"));
        assert!(resume.contains("No team stats available"));
    }
}
