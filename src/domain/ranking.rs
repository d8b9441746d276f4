//! Candidate selection over scored instruments.

use crate::domain::reason::ScoreResult;
use std::cmp::Reverse;

/// The `top_n` highest scores, best first.
///
/// Every scored result ranks ahead of every failure placeholder, so
/// placeholders only pad the list. Ties keep their input order
/// (`sort_by_key` is stable).
pub fn rank_buy_candidates(results: &[ScoreResult], top_n: usize) -> Vec<ScoreResult> {
    let mut ranked = results.to_vec();
    ranked.sort_by_key(|r| (r.is_placeholder(), Reverse(r.score())));
    ranked.truncate(top_n);
    ranked
}

/// Holdings whose score is negative, in holdings order.
///
/// Holdings that were never scored are skipped. Duplicate results for the
/// same code resolve to the first one.
pub fn sell_candidates(results: &[ScoreResult], holdings: &[String]) -> Vec<ScoreResult> {
    holdings
        .iter()
        .filter_map(|code| results.iter().find(|r| r.code() == code))
        .filter(|r| r.score() < 0)
        .cloned()
        .collect()
}
