use super::SearchError;

/// Parameters for MCTS search algorithm.
///
/// The values are fixed for the duration of a single decision and passed
/// explicitly to every search, so independent searches never share state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Number of search iterations to perform.
    pub iterations: u32,
    /// Exploration constant scaling the `ln(t) / n` bonus of the scoring
    /// formula.
    pub exploration: f64,
}

impl Config {
    /// Iterations per decision unless configured otherwise.
    pub const DEFAULT_ITERATIONS: u32 = 100;
    /// Exploration constant unless configured otherwise.
    pub const DEFAULT_EXPLORATION: f64 = 2.0;

    /// Returns a copy with `iterations` search iterations per decision.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Returns a copy with exploration constant `exploration`.
    #[must_use]
    pub const fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Checks that the parameters describe a search that can run.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidConfig`] for zero iterations or an
    /// exploration constant that is negative, NaN or infinite.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.iterations == 0 {
            return Err(SearchError::InvalidConfig(
                "at least one iteration is required".to_string(),
            ));
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration constant should be finite and non-negative, got {}",
                self.exploration
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterations: Self::DEFAULT_ITERATIONS,
            exploration: Self::DEFAULT_EXPLORATION,
        }
    }
}
