//! Per-session mutable state.
//!
//! A [`SessionState`] belongs to exactly one assessment session and is
//! passed explicitly into every engine call. Nothing about a session is
//! kept inside the engine, so any number of sessions can run against one
//! engine at the same time. Calls for a single session must still be
//! serialised by the caller: select → answer → update → stop check.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::estimator::ScoredResponse;
use crate::irt::UNKNOWN_SEM;
use crate::model::{IrtParams, ItemParameters, ResponseEvent, Tier};

/// Mutable state of one assessment session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub id: Uuid,
    /// Current ability estimate.
    pub theta: f64,
    /// Theta the session started from.
    pub initial_theta: f64,
    /// Theta after every update, oldest first (starts with `initial_theta`).
    pub theta_history: Vec<f64>,
    /// Standard error of measurement; 1.0 until anything is known.
    pub sem: f64,
    /// Answered items, oldest first.
    pub responses: Vec<ResponseEvent>,
    /// Every item ever selected in this session. Only grows.
    pub asked_item_ids: BTreeSet<String>,
    /// Difficulty of the most recently selected item.
    pub last_item_difficulty: Option<f64>,
    /// Item selected and awaiting an answer.
    pub pending_item: Option<ItemParameters>,
    /// Times each topic has been administered in this session.
    pub content_usage_counts: HashMap<String, u32>,
    /// Times each item has been administered, seeded from bank history.
    pub item_exposure_counts: HashMap<String, u32>,
    /// Direct theta → tier mapping.
    pub estimated_tier: Tier,
    /// Hysteresis-gated tier used to filter items.
    pub active_tier: Tier,
    /// Answer count at which the active tier last changed.
    pub last_tier_change_at: Option<usize>,
    /// Set once the stopping rule has fired.
    pub finished: bool,
}

impl SessionState {
    /// A fresh session at `theta` in the given tier.
    pub fn new(theta: f64, tier: Tier) -> Self {
        Self {
            id: Uuid::new_v4(),
            theta,
            initial_theta: theta,
            theta_history: vec![theta],
            sem: UNKNOWN_SEM,
            responses: Vec::new(),
            asked_item_ids: BTreeSet::new(),
            last_item_difficulty: None,
            pending_item: None,
            content_usage_counts: HashMap::new(),
            item_exposure_counts: HashMap::new(),
            estimated_tier: tier,
            active_tier: tier,
            last_tier_change_at: None,
            finished: false,
        }
    }

    /// Seed exposure counts from the item bank's administration history.
    pub fn with_exposure_counts(mut self, counts: HashMap<String, u32>) -> Self {
        self.item_exposure_counts = counts;
        self
    }

    pub fn questions_answered(&self) -> usize {
        self.responses.len()
    }

    /// Correct/incorrect outcomes, oldest first.
    pub fn response_history(&self) -> Vec<bool> {
        self.responses.iter().map(|r| r.correct).collect()
    }

    /// Outcome of the most recent answer.
    pub fn last_outcome(&self) -> Option<bool> {
        self.responses.last().map(|r| r.correct)
    }

    pub fn scored_responses(&self) -> Vec<ScoredResponse> {
        self.responses.iter().map(ScoredResponse::from).collect()
    }

    pub fn answered_items(&self) -> Vec<IrtParams> {
        self.responses.iter().map(|r| r.irt).collect()
    }

    pub fn has_asked(&self, item_id: &str) -> bool {
        self.asked_item_ids.contains(item_id)
    }

    pub fn correct_count(&self) -> usize {
        self.responses.iter().filter(|r| r.correct).count()
    }
}
