use serde::Serialize;
use std::fmt;

use super::tier::{Division, Tier};
use crate::errors::DataContractViolation;

/// A place on the ladder. The fields are private so every value in circulation
/// satisfies "division present iff the tier has divisions".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LadderPosition {
    tier: Tier,
    division: Option<Division>,
    lp: u32,
}

impl LadderPosition {
    pub fn new(tier: Tier, division: Option<Division>, lp: u32) -> Result<Self, DataContractViolation> {
        match (tier.has_divisions(), division) {
            (true, None) => Err(DataContractViolation::MissingDivision {
                tier: tier.to_string(),
            }),
            (false, Some(division)) => Err(DataContractViolation::UnexpectedDivision {
                tier: tier.to_string(),
                division: division.to_string(),
            }),
            _ => Ok(Self { tier, division, lp }),
        }
    }

    /// Position for a player with no entry in the tracked queue.
    pub fn unranked() -> Self {
        Self {
            tier: Tier::Unranked,
            division: None,
            lp: 0,
        }
    }

    /// Builds a position from the provider's raw strings.
    ///
    /// Apex tiers are reported with rank `"I"`; that (or an empty rank) means
    /// "no division". Any other rank on an apex tier is a violation.
    pub fn from_wire(tier: &str, rank: &str, lp: u32) -> Result<Self, DataContractViolation> {
        let tier: Tier = tier.parse()?;
        let rank = rank.trim();

        let division = if tier.has_divisions() {
            Some(rank.parse::<Division>()?)
        } else if rank.is_empty() || (tier.is_apex() && rank == Division::One.as_str()) {
            None
        } else {
            // Surface unknown strings as such before the presence rule.
            let division: Division = rank.parse()?;
            return Err(DataContractViolation::UnexpectedDivision {
                tier: tier.to_string(),
                division: division.to_string(),
            });
        };

        Self::new(tier, division, lp)
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn division(&self) -> Option<Division> {
        self.division
    }

    pub fn lp(&self) -> u32 {
        self.lp
    }

    pub fn is_unranked(&self) -> bool {
        self.tier == Tier::Unranked
    }
}

impl Default for LadderPosition {
    fn default() -> Self {
        Self::unranked()
    }
}

impl fmt::Display for LadderPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.tier, self.division) {
            (Tier::Unranked, _) => write!(f, "{}", self.tier),
            (tier, Some(division)) => write!(f, "{} {} {} LP", tier, division, self.lp),
            (tier, None) => write!(f, "{} {} LP", tier, self.lp),
        }
    }
}

/// A ladder position together with the queue record it came with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LadderEntry {
    #[serde(flatten)]
    pub position: LadderPosition,
    pub wins: u32,
    pub losses: u32,
}

impl LadderEntry {
    pub fn new(position: LadderPosition, wins: u32, losses: u32) -> Self {
        Self {
            position,
            wins,
            losses,
        }
    }

    pub fn unranked() -> Self {
        Self::default()
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses
    }
}
