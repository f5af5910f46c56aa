use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DataContractViolation;

/// Major ladder band. Declaration order is the ladder order, so the derived
/// `Ord` compares the discriminants directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Tier {
    Unranked = 0,
    Iron = 1,
    Bronze = 2,
    Silver = 3,
    Gold = 4,
    Platinum = 5,
    Emerald = 6,
    Diamond = 7,
    Master = 8,
    Grandmaster = 9,
    Challenger = 10,
}

impl Tier {
    pub const ALL: [Tier; 11] = [
        Tier::Unranked,
        Tier::Iron,
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Emerald,
        Tier::Diamond,
        Tier::Master,
        Tier::Grandmaster,
        Tier::Challenger,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Tiers below Master are split into divisions.
    pub fn has_divisions(self) -> bool {
        self != Tier::Unranked && self < Tier::Master
    }

    /// Master and above: no divisions, unbounded LP.
    pub fn is_apex(self) -> bool {
        self >= Tier::Master
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Unranked => "UNRANKED",
            Tier::Iron => "IRON",
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
            Tier::Emerald => "EMERALD",
            Tier::Diamond => "DIAMOND",
            Tier::Master => "MASTER",
            Tier::Grandmaster => "GRANDMASTER",
            Tier::Challenger => "CHALLENGER",
        }
    }
}

impl FromStr for Tier {
    type Err = DataContractViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Tier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == upper)
            .ok_or_else(|| DataContractViolation::UnknownTier(s.to_string()))
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minor band inside a tier: IV < III < II < I.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Division {
    #[serde(rename = "IV")]
    Four = 0,
    #[serde(rename = "III")]
    Three = 1,
    #[serde(rename = "II")]
    Two = 2,
    #[serde(rename = "I")]
    One = 3,
}

impl Division {
    pub const ALL: [Division; 4] = [Division::Four, Division::Three, Division::Two, Division::One];

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Division::Four => "IV",
            Division::Three => "III",
            Division::Two => "II",
            Division::One => "I",
        }
    }
}

impl FromStr for Division {
    type Err = DataContractViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Division::ALL
            .into_iter()
            .find(|division| division.as_str() == trimmed)
            .ok_or_else(|| DataContractViolation::UnknownDivision(s.to_string()))
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ranked queue whose ladder entry is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QueueType {
    #[default]
    #[serde(rename = "RANKED_SOLO_5x5")]
    RankedSolo,
    #[serde(rename = "RANKED_FLEX_SR")]
    RankedFlex,
}

impl QueueType {
    /// Name used by league entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueType::RankedSolo => "RANKED_SOLO_5x5",
            QueueType::RankedFlex => "RANKED_FLEX_SR",
        }
    }

    /// Numeric id used by the match history filter.
    pub fn queue_id(&self) -> u16 {
        match self {
            QueueType::RankedSolo => 420,
            QueueType::RankedFlex => 440,
        }
    }
}

impl FromStr for QueueType {
    type Err = DataContractViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "RANKED_SOLO_5x5" | "solo" => Ok(QueueType::RankedSolo),
            "RANKED_FLEX_SR" | "flex" => Ok(QueueType::RankedFlex),
            other => Err(DataContractViolation::UnknownQueue(other.to_string())),
        }
    }
}
