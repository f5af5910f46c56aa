use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use super::position::LadderPosition;
use super::score::score_delta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameResult {
    Victory,
    Defeat,
    Remake,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::Victory => "VICTORY",
            GameResult::Defeat => "DEFEAT",
            GameResult::Remake => "REMAKE",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which boundary, if any, the game moved the player across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    Lp,
    Rank,
    Tier,
    #[serde(rename = "NONE")]
    Unchanged,
}

/// Result of diffing two snapshots around one completed match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub result: GameResult,
    pub change: ChangeType,
    /// `global_score(new) - global_score(old)`, zero for floor losses and remakes.
    pub lp_delta: i64,
}

impl Outcome {
    fn scored(result: GameResult, change: ChangeType, old: &LadderPosition, new: &LadderPosition) -> Self {
        Self {
            result,
            change,
            lp_delta: score_delta(old, new),
        }
    }

    fn floor_loss() -> Self {
        Self {
            result: GameResult::Defeat,
            change: ChangeType::Lp,
            lp_delta: 0,
        }
    }

    fn remake() -> Self {
        Self {
            result: GameResult::Remake,
            change: ChangeType::Unchanged,
            lp_delta: 0,
        }
    }

    pub fn is_remake(&self) -> bool {
        self.result == GameResult::Remake
    }

    /// A loss at 0 LP that left the player pinned at the division floor.
    pub fn is_floor_loss(&self) -> bool {
        self.result == GameResult::Defeat && self.change == ChangeType::Lp && self.lp_delta == 0
    }
}

/// Classifies the rank change around a completed match.
///
/// Returns `None` when the match identity did not change: no new game, no outcome.
pub fn classify_change(old: &LadderPosition, new: &LadderPosition, match_changed: bool) -> Option<Outcome> {
    match_changed.then(|| classify(old, new))
}

/// Classifies the move from `old` to `new`, assuming a new match completed in between.
pub fn classify(old: &LadderPosition, new: &LadderPosition) -> Outcome {
    if let Some(result) = direction(old.tier().cmp(&new.tier())) {
        return Outcome::scored(result, ChangeType::Tier, old, new);
    }

    // Same tier: both divisions are present, or both absent at Master and above.
    if let Some(result) = direction(old.division().cmp(&new.division())) {
        return Outcome::scored(result, ChangeType::Rank, old, new);
    }

    match old.lp().cmp(&new.lp()) {
        Ordering::Less => Outcome::scored(GameResult::Victory, ChangeType::Lp, old, new),
        Ordering::Greater => Outcome::scored(GameResult::Defeat, ChangeType::Lp, old, new),
        Ordering::Equal if new.lp() == 0 => Outcome::floor_loss(),
        Ordering::Equal => Outcome::remake(),
    }
}

fn direction(old_vs_new: Ordering) -> Option<GameResult> {
    match old_vs_new {
        Ordering::Less => Some(GameResult::Victory),
        Ordering::Greater => Some(GameResult::Defeat),
        Ordering::Equal => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::tier::{Division, Tier};
    use proptest::prelude::*;

    fn pos(tier: Tier, division: Option<Division>, lp: u32) -> LadderPosition {
        LadderPosition::new(tier, division, lp).unwrap()
    }

    fn gold(division: Division, lp: u32) -> LadderPosition {
        pos(Tier::Gold, Some(division), lp)
    }

    #[test]
    fn test_lp_gain() {
        let outcome = classify(&gold(Division::Four, 50), &gold(Division::Four, 70));
        assert_eq!(outcome.result, GameResult::Victory);
        assert_eq!(outcome.change, ChangeType::Lp);
        assert_eq!(outcome.lp_delta, 20);
    }

    #[test]
    fn test_lp_loss() {
        let outcome = classify(&gold(Division::Four, 50), &gold(Division::Four, 30));
        assert_eq!(outcome.result, GameResult::Defeat);
        assert_eq!(outcome.change, ChangeType::Lp);
        assert_eq!(outcome.lp_delta, -20);
    }

    #[test]
    fn test_division_promotion() {
        let outcome = classify(&gold(Division::Four, 90), &gold(Division::Three, 10));
        assert_eq!(outcome.result, GameResult::Victory);
        assert_eq!(outcome.change, ChangeType::Rank);
        assert_eq!(outcome.lp_delta, 20);
    }

    #[test]
    fn test_division_demotion() {
        let outcome = classify(&gold(Division::Three, 0), &gold(Division::Four, 75));
        assert_eq!(outcome.result, GameResult::Defeat);
        assert_eq!(outcome.change, ChangeType::Rank);
        assert_eq!(outcome.lp_delta, -25);
    }

    #[test]
    fn test_tier_promotion() {
        let old = pos(Tier::Silver, Some(Division::One), 90);
        let outcome = classify(&old, &gold(Division::Four, 1));
        assert_eq!(outcome.result, GameResult::Victory);
        assert_eq!(outcome.change, ChangeType::Tier);
        assert_eq!(outcome.lp_delta, 11);
    }

    #[test]
    fn test_tier_demotion() {
        let new = pos(Tier::Silver, Some(Division::One), 75);
        let outcome = classify(&gold(Division::Four, 0), &new);
        assert_eq!(outcome.result, GameResult::Defeat);
        assert_eq!(outcome.change, ChangeType::Tier);
        assert_eq!(outcome.lp_delta, -25);
    }

    #[test]
    fn test_no_new_match_produces_no_outcome() {
        let position = gold(Division::Four, 50);
        assert_eq!(classify_change(&position, &position, false), None);
    }

    #[test]
    fn test_floor_loss_is_pinned_defeat() {
        let outcome = classify(&gold(Division::Four, 0), &gold(Division::Four, 0));
        assert_eq!(outcome.result, GameResult::Defeat);
        assert_eq!(outcome.change, ChangeType::Lp);
        assert_eq!(outcome.lp_delta, 0);
        assert!(outcome.is_floor_loss());
    }

    #[test]
    fn test_identical_values_with_new_match_is_remake() {
        let position = gold(Division::Four, 50);
        let outcome = classify_change(&position, &position, true).unwrap();
        assert_eq!(outcome.result, GameResult::Remake);
        assert_eq!(outcome.change, ChangeType::Unchanged);
        assert_eq!(outcome.lp_delta, 0);
        assert!(outcome.is_remake());
    }

    #[test]
    fn test_unranked_to_iron_is_tier_promotion() {
        let outcome = classify(&LadderPosition::unranked(), &pos(Tier::Iron, Some(Division::Four), 12));
        assert_eq!(outcome.result, GameResult::Victory);
        assert_eq!(outcome.change, ChangeType::Tier);
        assert_eq!(outcome.lp_delta, 12);
    }

    #[test]
    fn test_apex_tiers_compare_lp_without_divisions() {
        let old = pos(Tier::Master, None, 120);
        let outcome = classify(&old, &pos(Tier::Master, None, 101));
        assert_eq!(outcome.result, GameResult::Defeat);
        assert_eq!(outcome.change, ChangeType::Lp);
        assert_eq!(outcome.lp_delta, -19);

        let outcome = classify(&old, &pos(Tier::Grandmaster, None, 140));
        assert_eq!(outcome.result, GameResult::Victory);
        assert_eq!(outcome.change, ChangeType::Tier);
        assert_eq!(outcome.lp_delta, 20);
    }

    #[test]
    fn test_diamond_to_master() {
        let old = pos(Tier::Diamond, Some(Division::One), 85);
        let outcome = classify(&old, &pos(Tier::Master, None, 0));
        assert_eq!(outcome.change, ChangeType::Tier);
        assert_eq!(outcome.lp_delta, 15);
    }

    fn any_position() -> impl Strategy<Value = LadderPosition> {
        (0usize..Tier::ALL.len(), 0usize..Division::ALL.len(), 0u32..200).prop_map(|(t, d, lp)| {
            let tier = Tier::ALL[t];
            let division = tier.has_divisions().then_some(Division::ALL[d]);
            let lp = if tier == Tier::Unranked { 0 } else { lp };
            LadderPosition::new(tier, division, lp).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_classify_is_deterministic(old in any_position(), new in any_position()) {
            prop_assert_eq!(classify(&old, &new), classify(&old, &new));
        }

        #[test]
        fn prop_delta_is_score_difference_except_pins(old in any_position(), new in any_position()) {
            let outcome = classify(&old, &new);
            if outcome.is_remake() || outcome.is_floor_loss() {
                prop_assert_eq!(outcome.lp_delta, 0);
            } else {
                prop_assert_eq!(outcome.lp_delta, score_delta(&old, &new));
            }
        }

        #[test]
        fn prop_same_band_delta_equals_raw_lp_difference(
            old in any_position(),
            lp in 0u32..200,
        ) {
            prop_assume!(!old.is_unranked());
            let new = LadderPosition::new(old.tier(), old.division(), lp).unwrap();
            let outcome = classify(&old, &new);
            prop_assert_eq!(outcome.lp_delta, i64::from(lp) - i64::from(old.lp()));
        }
    }
}
