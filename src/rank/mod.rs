pub mod classifier;
pub mod leaderboard;
pub mod position;
pub mod score;
pub mod tier;

pub use classifier::{classify, classify_change, ChangeType, GameResult, Outcome};
pub use leaderboard::{rank_by_score, Standing};
pub use position::{LadderEntry, LadderPosition};
pub use score::{global_score, score_delta};
pub use tier::{Division, QueueType, Tier};
