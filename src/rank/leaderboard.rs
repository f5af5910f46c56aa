use serde::Serialize;
use std::cmp::Reverse;

use super::position::LadderPosition;
use super::score::global_score;

/// One row of a ranked view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing<T> {
    /// 1-based place.
    pub place: usize,
    pub score: i64,
    #[serde(flatten)]
    pub item: T,
}

/// Orders `items` by global score, highest first.
///
/// Equal scores keep their input order (the sort is stable), so callers that
/// pass players in roster order get roster order as the tie-break.
pub fn rank_by_score<T, I, F>(items: I, position_of: F) -> Vec<Standing<T>>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> LadderPosition,
{
    let mut scored: Vec<(i64, T)> = items
        .into_iter()
        .map(|item| (global_score(&position_of(&item)), item))
        .collect();

    scored.sort_by_key(|(score, _)| Reverse(*score));

    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (score, item))| Standing {
            place: idx + 1,
            score,
            item,
        })
        .collect()
}
