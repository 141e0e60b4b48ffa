//! Engine error types.
//!
//! Only two things are allowed to fail loudly: a configuration that
//! contradicts itself (rejected before any session starts) and a caller
//! that breaks the select → answer ordering of a session. Numerical
//! trouble inside the estimator is recovered locally and never shows up
//! here.

use thiserror::Error;

/// A contradiction in an [`AdaptiveConfig`](crate::config::AdaptiveConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The question floor is above the ceiling.
    #[error("min_questions ({min}) must not exceed max_questions ({max})")]
    QuestionBounds { min: usize, max: usize },

    /// A session must be allowed at least one question.
    #[error("max_questions must be at least 1")]
    NoQuestions,

    /// The precision target must be a positive standard error.
    #[error("target_sem must be positive, got {0}")]
    TargetSem(f64),

    /// The theta range is empty or inverted.
    #[error("theta_min ({min}) must be below theta_max ({max})")]
    ThetaBounds { min: f64, max: f64 },

    /// Tier cut points must be strictly increasing.
    #[error("tier cut points must be strictly increasing: {0:?}")]
    TierCutPoints([f64; 3]),

    /// A trailing window was configured with no room for responses.
    #[error("{name} must be at least 1")]
    EmptyWindow { name: &'static str },

    /// A correct-count threshold can never be reached inside its window.
    #[error("{name} ({threshold}) exceeds its window size ({window})")]
    ThresholdOutsideWindow {
        name: &'static str,
        threshold: usize,
        window: usize,
    },

    /// A smoothing factor outside (0, 1].
    #[error("{name} must be in (0, 1], got {value}")]
    SmoothingFactor { name: &'static str, value: f64 },

    /// A value that has to be strictly positive was not.
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    /// The estimation phases overlap.
    #[error("transition_start ({start}) must be below transition_end ({end})")]
    PhaseBounds { start: usize, end: usize },
}

/// A violation of the per-session call ordering (select → answer → update → stop).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// An answer was recorded but no item is waiting for one.
    #[error("no item is pending an answer in session {0}")]
    NoPendingItem(String),

    /// A new item was requested while the previous one is still unanswered.
    #[error("item '{item_id}' is still pending an answer in session {session_id}")]
    ItemPending { session_id: String, item_id: String },

    /// The session already hit its stopping rule.
    #[error("session {0} has already finished")]
    Finished(String),
}

impl SessionError {
    /// Returns `true` if retrying the same call later could succeed.
    pub fn is_ordering_error(&self) -> bool {
        matches!(
            self,
            SessionError::NoPendingItem(_) | SessionError::ItemPending { .. }
        )
    }
}
