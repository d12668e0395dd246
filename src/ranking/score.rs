//! Pure scoring functions for query/candidate matching.

use super::RankerConfig;

/// Score a candidate against a query, or `None` when the candidate does not
/// match at all.
///
/// Both inputs must already be lowercased. A candidate containing the query
/// as a contiguous substring scores `substring_score` flat. Otherwise the
/// query must appear as an in-order subsequence of the candidate; the score
/// is the average per-character credit scaled by `fuzzy_scale`, minus a
/// penalty for the candidate's extra length. The result can be negative for
/// long, scattered matches.
pub(crate) fn match_score(query: &str, candidate: &str, config: &RankerConfig) -> Option<f64> {
    if query.is_empty() || candidate.is_empty() {
        return None;
    }
    if candidate.contains(query) {
        return Some(config.substring_score);
    }

    let credit = subsequence_credit(query, candidate)?;
    let query_len = query.chars().count();
    let candidate_len = candidate.chars().count();

    let base = credit / query_len as f64 * config.fuzzy_scale;
    let penalty = config.length_penalty * (candidate_len - query_len) as f64;
    Some(base - penalty)
}

/// Sum of per-character credits for matching `query` as a subsequence of
/// `candidate`, or `None` when some query character cannot be matched in
/// order.
///
/// Each matched character earns `1 / (1 + gap)` where `gap` is the number of
/// candidate characters skipped since the previous match. Contiguous runs
/// earn full credit, scattered matches decay fast.
fn subsequence_credit(query: &str, candidate: &str) -> Option<f64> {
    let mut credit = 0.0;
    let mut chars = candidate.chars();

    for wanted in query.chars() {
        let mut gap = 0usize;
        loop {
            match chars.next() {
                Some(c) if c == wanted => break,
                Some(_) => gap += 1,
                None => return None,
            }
        }
        credit += 1.0 / (1.0 + gap as f64);
    }
    Some(credit)
}
