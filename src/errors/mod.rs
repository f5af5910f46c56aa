use std::time::Duration;
use thiserror::Error;

/// A value from the provider that does not fit the fixed tier/division tables,
/// or a ladder position that breaks the division-presence rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataContractViolation {
    #[error("unknown tier `{0}`")]
    UnknownTier(String),
    #[error("unknown division `{0}`")]
    UnknownDivision(String),
    #[error("unknown queue type `{0}`")]
    UnknownQueue(String),
    #[error("tier {tier} has no divisions but `{division}` was given")]
    UnexpectedDivision { tier: String, division: String },
    #[error("tier {tier} requires a division")]
    MissingDivision { tier: String },
}

/// Why a single player's refresh cycle was abandoned.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("not found upstream: {0}")]
    NotFound(String),
    #[error("transient fetch failure: {0:#}")]
    Transient(#[from] anyhow::Error),
    #[error("data contract violation: {0}")]
    DataContract(#[from] DataContractViolation),
    #[error("refresh exceeded deadline of {0:?}")]
    TimedOut(Duration),
}

impl RefreshError {
    /// Contract violations mean the fixed tables are stale, not a runtime hiccup.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, RefreshError::DataContract(_))
    }
}

/// Add context to fetch errors
pub fn fetch_context(url: &str) -> String {
    format!("Failed to fetch from: {}", redact_api_key(url))
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}

fn redact_api_key(url: &str) -> &str {
    url.split_once('?').map(|(path, _)| path).unwrap_or(url)
}
