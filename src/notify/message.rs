use serde::Serialize;

use crate::rank::{ChangeType, GameResult, Standing, Tier};
use crate::tracker::{LeaderboardRow, RankEvent};

const CHAMPION_ICON_URL: &str = "https://ddragon.leagueoflegends.com/cdn/15.2.1/img/champion";

// Discord palette
const GREEN: u32 = 0x57F287;
const RED: u32 = 0xED4245;
const DARK_GREEN: u32 = 0x1F8B4C;
const DARK_RED: u32 = 0x992D22;
const GOLD: u32 = 0xF1C40F;
const NOT_QUITE_BLACK: u32 = 0x23272A;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageField {
    pub name: String,
    pub value: String,
}

/// Transport-neutral chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankMessage {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<MessageField>,
    pub thumbnail_url: Option<String>,
}

impl RankMessage {
    fn field(&mut self, name: &str, value: impl Into<String>) {
        self.fields.push(MessageField {
            name: name.to_string(),
            value: value.into(),
        });
    }
}

/// Turns rank events and leaderboards into chat messages
#[derive(Debug, Clone)]
pub struct MessageComposer {
    opgg_region: String,
}

impl MessageComposer {
    pub fn new(opgg_region: impl Into<String>) -> Self {
        Self {
            opgg_region: opgg_region.into(),
        }
    }

    pub fn compose(&self, event: &RankEvent) -> RankMessage {
        let outcome = &event.outcome;
        let standing = format!("{} is **{}**", event.player.mention(), event.current.position);
        let position = &event.current.position;

        let (description, color) = match outcome.change {
            ChangeType::Rank => {
                let band = format!("{} {}", position.tier(), division_label(event));
                let verb = if outcome.result == GameResult::Victory { "Promoted to" } else { "Demoted to" };
                (format!("*{} **{}***\n\n{}", verb, band, standing), pick(outcome.result, DARK_GREEN, DARK_RED))
            }
            ChangeType::Tier => {
                let verb = if outcome.result == GameResult::Victory { "Promoted to" } else { "Demoted to" };
                (format!("*{} **{}***\n\n{}", verb, position.tier(), standing), pick(outcome.result, GOLD, NOT_QUITE_BLACK))
            }
            ChangeType::Lp | ChangeType::Unchanged => (standing, pick(outcome.result, GREEN, RED)),
        };

        let participant = &event.participant;
        let mut message = RankMessage {
            title: outcome.result.to_string(),
            description,
            color,
            fields: Vec::new(),
            thumbnail_url: Some(format!("{}/{}.png", CHAMPION_ICON_URL, participant.champion)),
        };

        message.field("Champion", participant.champion.clone());
        message.field(
            "Score",
            format!("{} / {} / {}", participant.kills, participant.deaths, participant.assists),
        );
        message.field("Duration", format_duration(event.duration_seconds));
        message.field(
            "Details",
            format!("[**OP.GG**]({})", self.opgg_link(&participant.display_name, &participant.display_tag)),
        );

        if outcome.is_floor_loss() {
            message.field(
                " ",
                format!("Ouch, a loss at 0 LP for {}\nDemotion incoming!", event.player.mention()),
            );
        }
        message.field(" ", format!("**{} LP**", format_lp_delta(outcome.result, outcome.lp_delta)));

        message
    }

    pub fn render_leaderboard(&self, standings: &[Standing<LeaderboardRow>]) -> RankMessage {
        let mut description = String::new();

        for standing in standings {
            let row = &standing.item;
            let prefix = place_prefix(standing.place);
            let position = &row.entry.position;
            if position.tier() == Tier::Unranked {
                description.push_str(&format!("{} {}\n\u{2003} *{}*\n\n", prefix, row.mention, position.tier()));
            } else {
                let band = match position.division() {
                    Some(division) => format!("{} {}", position.tier(), division),
                    None => position.tier().to_string(),
                };
                description.push_str(&format!(
                    "{} {}\n\u{2003} *{}* **{} LP** ({} games)\n\n",
                    prefix,
                    row.mention,
                    band,
                    position.lp(),
                    row.games
                ));
            }
        }

        RankMessage {
            title: ":trophy: SoloQ Leaderboard".to_string(),
            description,
            color: GOLD,
            fields: Vec::new(),
            thumbnail_url: None,
        }
    }

    pub fn opgg_link(&self, name: &str, tag: &str) -> String {
        format!(
            "https://www.op.gg/summoners/{}/{}-{}",
            self.opgg_region,
            urlencoding::encode(name),
            urlencoding::encode(tag)
        )
    }
}

fn pick(result: GameResult, win: u32, loss: u32) -> u32 {
    if result == GameResult::Victory { win } else { loss }
}

fn division_label(event: &RankEvent) -> String {
    event
        .current
        .position
        .division()
        .map(|d| d.to_string())
        .unwrap_or_default()
}

pub fn place_prefix(place: usize) -> String {
    match place {
        1 => ":first_place:".to_string(),
        2 => ":second_place:".to_string(),
        3 => ":third_place:".to_string(),
        n => format!("**{}.**", n),
    }
}

/// `m:ss`
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// A floor loss prints as `-0`.
pub fn format_lp_delta(result: GameResult, delta: i64) -> String {
    let sign = match delta {
        d if d > 0 => "+",
        d if d < 0 => "-",
        _ if result == GameResult::Defeat => "-",
        _ => "",
    };
    format!("{}{}", sign, delta.unsigned_abs())
}
