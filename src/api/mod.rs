pub mod handlers;
pub mod models;
pub mod provider;
pub mod riot_client;
pub mod routes;

pub use provider::LadderProvider;
pub use riot_client::RiotClient;
