use super::position::LadderPosition;
use super::tier::{Division, Tier};

// Points between the floors of two consecutive tiers
const TIER_STEP: i64 = 400;
// Points between the floors of two consecutive divisions
const DIVISION_STEP: i64 = 100;
// Master, Grandmaster and Challenger share one floor and differ by LP only
const APEX_BASE: i64 = 2800;

/// Maps a ladder position onto a single comparable number.
pub fn global_score(position: &LadderPosition) -> i64 {
    tier_base(position.tier()) + division_offset(position.division()) + i64::from(position.lp())
}

/// Signed score change between two positions.
pub fn score_delta(old: &LadderPosition, new: &LadderPosition) -> i64 {
    global_score(new) - global_score(old)
}

fn tier_base(tier: Tier) -> i64 {
    match tier {
        Tier::Unranked | Tier::Iron => 0,
        Tier::Master | Tier::Grandmaster | Tier::Challenger => APEX_BASE,
        divided => i64::from(divided.rank() - Tier::Iron.rank()) * TIER_STEP,
    }
}

fn division_offset(division: Option<Division>) -> i64 {
    division.map_or(0, |d| i64::from(d.rank()) * DIVISION_STEP)
}
