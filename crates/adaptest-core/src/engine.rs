//! Adaptive test engine.
//!
//! [`AdaptiveEngine`] holds only an immutable, validated configuration and
//! a shared [`IrtCache`]. Every call takes the caller's [`SessionState`]
//! explicitly, so one engine can serve any number of concurrent sessions.
//!
//! Per session the caller must serialise calls:
//! `select_next_item` → (examinee answers) → `record_response` → `should_stop`.
//! [`AdaptiveEngine::next_step`] folds the stop check and selection into one
//! call for drivers that do not need them separately.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::AdaptiveConfig;
use crate::error::{ConfigError, SessionError};
use crate::estimator::{estimate_ability, AbilityUpdate, EstimationInput};
use crate::irt::IrtCache;
use crate::model::{CompetenceLevel, ItemParameters, ResponseEvent, Tier};
use crate::selector::{record_selection, select_item, Selection};
use crate::session::SessionState;
use crate::stopping::{self, StopDecision, StopInput, StopReason};
use crate::tier::{classify, evaluate_progression, ProgressionInput, TierTransition};

/// Everything that changed after one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseOutcome {
    pub item_id: String,
    pub correct: bool,
    pub update: AbilityUpdate,
    pub sem: f64,
    pub estimated_tier: Tier,
    pub active_tier: Tier,
    pub transition: TierTransition,
}

/// What the session should do next.
#[derive(Debug, Clone, PartialEq)]
pub enum NextStep {
    Ask(Selection),
    Stop(StopDecision),
}

/// Stateless adaptive engine shared by all sessions.
#[derive(Debug, Clone)]
pub struct AdaptiveEngine {
    config: AdaptiveConfig,
    cache: Arc<IrtCache>,
}

impl AdaptiveEngine {
    /// Validate `config` and build an engine with its own cache.
    pub fn new(config: AdaptiveConfig) -> Result<Self, ConfigError> {
        Self::with_cache(config, Arc::new(IrtCache::default()))
    }

    /// Build an engine that shares an existing cache.
    pub fn with_cache(config: AdaptiveConfig, cache: Arc<IrtCache>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, cache })
    }

    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<IrtCache> {
        &self.cache
    }

    /// Starting theta for a self-reported competence level.
    pub fn initialize_ability(&self, level: CompetenceLevel) -> f64 {
        self.config.estimator.clamp_theta(level.initial_theta())
    }

    pub fn start_session(&self, level: CompetenceLevel) -> SessionState {
        self.start_session_at(self.initialize_ability(level))
    }

    /// Start a session from an explicit prior theta.
    pub fn start_session_at(&self, theta: f64) -> SessionState {
        let theta = self.config.estimator.clamp_theta(theta);
        let state = SessionState::new(theta, classify(theta, &self.config.tiers));
        tracing::debug!(session = %state.id, theta, tier = %state.active_tier, "session started");
        state
    }

    /// Pick the next item from `pool` and mark it pending.
    ///
    /// `Ok(None)` means nothing is left to ask; callers should treat it as a
    /// forced stop (see [`AdaptiveEngine::next_step`]).
    pub fn select_next_item(
        &self,
        state: &mut SessionState,
        pool: &[ItemParameters],
    ) -> Result<Option<Selection>, SessionError> {
        if state.finished {
            return Err(SessionError::Finished(state.id.to_string()));
        }
        if let Some(pending) = &state.pending_item {
            return Err(SessionError::ItemPending {
                session_id: state.id.to_string(),
                item_id: pending.id.clone(),
            });
        }

        let selection = select_item(state.theta, pool, state, &self.config, Some(&self.cache));
        if let Some(selection) = &selection {
            record_selection(state, &selection.item);
        }
        Ok(selection)
    }

    /// Record the answer to the pending item and update every estimate.
    pub fn record_response(
        &self,
        state: &mut SessionState,
        correct: bool,
    ) -> Result<ResponseOutcome, SessionError> {
        if state.finished {
            return Err(SessionError::Finished(state.id.to_string()));
        }
        let item = state
            .pending_item
            .take()
            .ok_or_else(|| SessionError::NoPendingItem(state.id.to_string()))?;

        let sequence = state.responses.len();
        state.responses.push(ResponseEvent {
            item_id: item.id.clone(),
            correct,
            sequence,
            irt: item.irt(),
        });

        let scored = state.scored_responses();
        let update = estimate_ability(
            EstimationInput {
                theta: state.theta,
                initial_theta: state.initial_theta,
                responses: &scored,
            },
            &self.config.estimator,
        );
        state.theta = update.theta;
        state.theta_history.push(update.theta);
        state.sem = self.cache.standard_error(state.theta, &state.answered_items());
        state.estimated_tier = classify(state.theta, &self.config.tiers);

        let history = state.response_history();
        let transition = evaluate_progression(
            ProgressionInput {
                active: state.active_tier,
                responses: &history,
                last_change_at: state.last_tier_change_at,
                min_questions: self.config.min_questions_before_tier_change(),
            },
            &self.config.tiers,
        );
        if transition.is_change() {
            tracing::info!(
                session = %state.id,
                from = %state.active_tier,
                to = %transition.resulting_tier(state.active_tier),
                answered = history.len(),
                "active tier changed"
            );
            state.active_tier = transition.resulting_tier(state.active_tier);
            state.last_tier_change_at = Some(history.len());
        }

        tracing::debug!(
            session = %state.id,
            item = %item.id,
            correct,
            theta = state.theta,
            sem = state.sem,
            "response recorded"
        );

        Ok(ResponseOutcome {
            item_id: item.id,
            correct,
            update,
            sem: state.sem,
            estimated_tier: state.estimated_tier,
            active_tier: state.active_tier,
            transition,
        })
    }

    /// Evaluate the stopping rules; marks the session finished when they fire.
    pub fn should_stop(&self, state: &mut SessionState) -> StopDecision {
        let history = state.response_history();
        let decision = stopping::should_stop(
            StopInput {
                sem: state.sem,
                questions_answered: state.questions_answered(),
                responses: &history,
                theta_history: &state.theta_history,
            },
            &self.config,
        );
        if decision.stop {
            self.finish(state, decision);
        }
        decision
    }

    /// Stop check followed by selection.
    pub fn next_step(
        &self,
        state: &mut SessionState,
        pool: &[ItemParameters],
    ) -> Result<NextStep, SessionError> {
        if state.finished {
            return Err(SessionError::Finished(state.id.to_string()));
        }
        let decision = self.should_stop(state);
        if decision.stop {
            return Ok(NextStep::Stop(decision));
        }
        match self.select_next_item(state, pool)? {
            Some(selection) => Ok(NextStep::Ask(selection)),
            None => {
                let decision = StopDecision::stop(StopReason::NoItemsAvailable);
                self.finish(state, decision);
                Ok(NextStep::Stop(decision))
            }
        }
    }

    fn finish(&self, state: &mut SessionState, decision: StopDecision) {
        state.finished = true;
        tracing::info!(
            session = %state.id,
            reason = ?decision.reason,
            answered = state.questions_answered(),
            theta = state.theta,
            sem = state.sem,
            "session finished"
        );
    }
}
