//! Local-search tuning parameters.

use super::types::SearchStrategy;

/// Parameters shared by the local-search strategies.
///
/// Each strategy reads only the fields it uses; [`SearchConfig::for_strategy`]
/// gives the tuned defaults.
///
/// # Examples
///
/// ```
/// use u_cnp::search::{SearchConfig, SearchStrategy};
///
/// let config = SearchConfig::for_strategy(SearchStrategy::Bcls)
///     .with_max_idle_steps(50);
/// assert_eq!(config.max_idle_steps, 50);
/// assert!((config.selection_prob - 0.8).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Consecutive non-improving steps before the search stops.
    pub max_idle_steps: usize,
    /// CHNS: probability of an impact-driven removal.
    pub theta: f64,
    /// DLAS: length of the late-acceptance cost history.
    pub history_length: usize,
    /// BCLS: probability of acting on the front candidate.
    pub selection_prob: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_idle_steps: 1000,
            theta: 0.3,
            history_length: 5,
            selection_prob: 0.8,
        }
    }
}

impl SearchConfig {
    /// Defaults tuned for `strategy`.
    pub fn for_strategy(strategy: SearchStrategy) -> Self {
        match strategy {
            SearchStrategy::Bcls => Self::default().with_max_idle_steps(150),
            SearchStrategy::Cbns | SearchStrategy::Chns | SearchStrategy::Dlas => Self::default(),
        }
    }

    /// Sets the idle-step limit.
    pub fn with_max_idle_steps(mut self, n: usize) -> Self {
        self.max_idle_steps = n;
        self
    }

    /// Sets the CHNS impact probability (clamped to [0, 1]).
    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta.clamp(0.0, 1.0);
        self
    }

    /// Sets the DLAS history length.
    pub fn with_history_length(mut self, n: usize) -> Self {
        self.history_length = n;
        self
    }

    /// Sets the BCLS selection probability (clamped to [0, 1]).
    pub fn with_selection_prob(mut self, p: f64) -> Self {
        self.selection_prob = p.clamp(0.0, 1.0);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_idle_steps == 0 {
            return Err("max_idle_steps must be at least 1".into());
        }
        if self.history_length == 0 {
            return Err("history_length must be at least 1".into());
        }
        Ok(())
    }
}
