use thiserror::Error;

/// Failures that abort a search and propagate to the caller.
#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    /// The game adapter broke its contract, e.g. reported no legal actions
    /// for a state that is not terminal or an undefined payoff.
    #[error("game adapter contract violation: {0}")]
    AdapterContractViolation(String),
    /// The state to search from has no legal actions, so there is nothing to
    /// choose from.
    #[error("the root state has no legal actions")]
    EmptyRootActions,
    /// Search parameters are out of range.
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
}
