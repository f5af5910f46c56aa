pub mod server;
pub mod standings;
pub mod tracking;
