//! Cohort Ranker: stable ascending order within each (category, gender) cohort

use std::collections::BTreeMap;

use super::records::{CohortKey, RankedResult, ResultRecord};

/// Group records by cohort, keeping input order inside each group
///
/// The map iterates cohorts in (category, gender) order. Cohorts with no
/// records simply have no entry.
pub fn group_by_cohort(records: &[ResultRecord]) -> BTreeMap<CohortKey, Vec<ResultRecord>> {
    let mut groups: BTreeMap<CohortKey, Vec<ResultRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.cohort()).or_default().push(record.clone());
    }
    groups
}

/// Rank every record of one cohort (no truncation)
///
/// Ranks are positional and 1-based; equal results keep input order, so a
/// tie never shares a rank.
pub fn rank_cohort(records: &[ResultRecord]) -> Vec<RankedResult> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.result.total_cmp(&b.result));

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, record)| RankedResult { rank: i + 1, record })
        .collect()
}

/// Rank each cohort and keep at most `top_n` rows per cohort
pub fn rank_cohorts(
    records: &[ResultRecord],
    top_n: usize,
) -> BTreeMap<CohortKey, Vec<RankedResult>> {
    group_by_cohort(records)
        .into_iter()
        .map(|(key, members)| {
            let mut ranked = rank_cohort(&members);
            ranked.truncate(top_n);
            (key, ranked)
        })
        .collect()
}
