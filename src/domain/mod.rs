pub mod models;

pub use models::{MatchDetail, MatchIdentity, Participant, PlayerIdentity};
