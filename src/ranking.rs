use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::aggregate::mean;
use crate::models::{PercentileTier, RankingEntry, TeamSeasonRecord, TenureStats};

#[derive(Debug, Default)]
struct TenureAccumulator {
    wins: u32,
    losses: u32,
    pace: Vec<f64>,
    offensive_rating: Vec<f64>,
    srs: Vec<f64>,
}

/// Era totals per coach id, in order of each coach's first era season.
///
/// Rows before `era_cutoff`, without a season, or without a coach id are left out.
pub fn tenure_population(records: &[TeamSeasonRecord], era_cutoff: i32) -> Vec<TenureStats> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut coaches: Vec<(&str, TenureAccumulator)> = Vec::new();

    for record in records {
        let in_era = record.season.is_some_and(|season| season >= era_cutoff);
        let coach_id = record.coach_id.trim();
        if !in_era || coach_id.is_empty() {
            continue;
        }
        let slot = *index.entry(coach_id).or_insert_with(|| {
            coaches.push((coach_id, TenureAccumulator::default()));
            coaches.len() - 1
        });
        let acc = &mut coaches[slot].1;
        acc.wins = acc.wins.saturating_add(record.wins);
        acc.losses = acc.losses.saturating_add(record.losses);
        acc.pace.push(record.pace);
        acc.offensive_rating.push(record.offensive_rating);
        acc.srs.push(record.simple_rating_system);
    }

    coaches
        .into_iter()
        .map(|(coach_id, acc)| TenureStats {
            coach_id: coach_id.to_string(),
            wins: acc.wins,
            losses: acc.losses,
            avg_pace: mean(&acc.pace),
            avg_offensive_rating: mean(&acc.offensive_rating),
            avg_srs: mean(&acc.srs),
        })
        .collect()
}

/// Descending order with undefined values after every defined one.
fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// 1-based rank of every member on one metric. Ties keep population order.
fn ranks_by(population: &[TenureStats], metric: impl Fn(&TenureStats) -> f64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&a, &b| descending_nan_last(metric(&population[a]), metric(&population[b])));

    let mut ranks = vec![0; population.len()];
    for (position, member) in order.into_iter().enumerate() {
        ranks[member] = position + 1;
    }
    ranks
}

pub fn rank_population(population: &[TenureStats]) -> Vec<RankingEntry> {
    let win_pct = ranks_by(population, TenureStats::win_pct);
    let pace = ranks_by(population, |s| s.avg_pace);
    let offense = ranks_by(population, |s| s.avg_offensive_rating);
    let srs = ranks_by(population, |s| s.avg_srs);

    population
        .iter()
        .enumerate()
        .map(|(i, stats)| RankingEntry {
            stats: stats.clone(),
            win_pct_rank: win_pct[i],
            pace_rank: pace[i],
            offensive_rating_rank: offense[i],
            srs_rank: srs[i],
            population: population.len(),
        })
        .collect()
}

/// Ranks one coach against every coach active in the era.
pub fn coach_resume(
    records: &[TeamSeasonRecord],
    era_cutoff: i32,
    coach_id: &str,
) -> Option<RankingEntry> {
    let population = tenure_population(records, era_cutoff);
    debug!(population = population.len(), era_cutoff, "built tenure population");
    rank_population(&population)
        .into_iter()
        .find(|entry| entry.stats.coach_id == coach_id.trim())
}

/// Tier of `rank / population`, each tier inclusive of its upper bound.
pub fn percentile_tier(rank: usize, population: usize) -> Option<PercentileTier> {
    if rank == 0 || population == 0 {
        return None;
    }
    let percentile = rank as f64 / population as f64;
    let tier = if percentile <= 0.10 {
        PercentileTier::Top10
    } else if percentile <= 0.25 {
        PercentileTier::Top25
    } else if percentile <= 0.50 {
        PercentileTier::Top50
    } else if percentile <= 0.75 {
        PercentileTier::Top75
    } else {
        PercentileTier::Bottom25
    };
    Some(tier)
}

pub fn ordinal(rank: usize) -> String {
    let suffix = match (rank % 10, rank % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{rank}{suffix}")
}

/// `(3rd of 250)`
pub fn rank_text(rank: usize, population: usize) -> String {
    format!("({} of {})", ordinal(rank), population)
}
