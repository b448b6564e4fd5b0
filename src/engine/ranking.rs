use crate::types::{RankedOption, Scores, Username};
use std::collections::HashMap;

/// Aggregate score submissions into the final ranking.
///
/// Each option's aggregate is the sum of the scores every submission
/// gave it; a submission without a key for an option contributes 0, and
/// participants who never submitted contribute nothing at all. Options
/// are ordered descending by aggregate; equal aggregates keep the order
/// the options were added to the room, never map iteration order.
///
/// Pure function of the close-time snapshot, so re-running it on the
/// same inputs always yields the identical ranking.
pub fn rank_options(options: &[String], votes: &HashMap<Username, Scores>) -> Vec<RankedOption> {
    let mut ranking: Vec<RankedOption> = options
        .iter()
        .map(|option| {
            let score: u64 = votes
                .values()
                .map(|scores| u64::from(scores.get(option).copied().unwrap_or(0)))
                .sum();
            RankedOption {
                option: option.clone(),
                score,
            }
        })
        .collect();

    // Stable sort: equal scores keep their insertion order
    ranking.sort_by(|a, b| b.score.cmp(&a.score));
    ranking
}
