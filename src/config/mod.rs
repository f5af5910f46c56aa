pub mod players;
pub mod settings;

pub use players::{load_roster, parse_roster, TrackedPlayer};
pub use settings::AppConfig;
