//! Concurrent simulation of adaptive sessions.
//!
//! Every session owns its own [`SessionState`](crate::session::SessionState);
//! the engine (config and cache), the item bank and an [`ExposureTracker`]
//! are shared. Concurrency is bounded by a semaphore.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::engine::{AdaptiveEngine, NextStep};
use crate::model::{CompetenceLevel, ItemBank, ItemParameters, Tier};
use crate::report::{ItemBankSummary, SimulationReport};
use crate::statistics::compute_simulation_stats;
use crate::stopping::StopReason;
use crate::traits::{Examinee, ProgressReporter};

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Maximum concurrent sessions.
    pub parallelism: usize,
    /// Competence level every session starts from.
    pub starting_level: CompetenceLevel,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            starting_level: CompetenceLevel::Intermediate,
        }
    }
}

/// Outcome of one finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub examinee: String,
    /// Known only for simulated examinees.
    pub true_theta: Option<f64>,
    pub initial_theta: f64,
    pub final_theta: f64,
    pub final_sem: f64,
    pub questions_answered: usize,
    pub correct: usize,
    pub stop_reason: Option<StopReason>,
    pub estimated_tier: Tier,
    pub active_tier: Tier,
    /// Administered item ids, in order.
    pub items: Vec<String>,
    pub theta_history: Vec<f64>,
}

/// Administration counts per item, shared by every session of a run.
///
/// Sessions are seeded from a snapshot when they start and report the items
/// they administered when they finish, so exposure control sees the bank's
/// history rather than one session's.
#[derive(Debug, Default)]
pub struct ExposureTracker {
    counts: Mutex<HashMap<String, u32>>,
}

impl ExposureTracker {
    pub fn new(seed: HashMap<String, u32>) -> Self {
        Self {
            counts: Mutex::new(seed),
        }
    }

    pub fn snapshot(&self) -> HashMap<String, u32> {
        self.lock().clone()
    }

    /// Count each administered item once.
    pub fn record<'a>(&self, items: impl IntoIterator<Item = &'a String>) {
        let mut counts = self.lock();
        for id in items {
            *counts.entry(id.clone()).or_insert(0) += 1;
        }
    }

    pub fn count(&self, item_id: &str) -> u32 {
        self.lock().get(item_id).copied().unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, u32>> {
        // Counts are plain integers, a poisoned map is still consistent.
        self.counts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Drive one session to its stopping point.
pub async fn run_session(
    engine: &AdaptiveEngine,
    pool: &[ItemParameters],
    exposure_counts: HashMap<String, u32>,
    examinee: &dyn Examinee,
    starting_level: CompetenceLevel,
) -> Result<SessionSummary> {
    let mut state = engine
        .start_session(starting_level)
        .with_exposure_counts(exposure_counts);

    let decision = loop {
        match engine.next_step(&mut state, pool)? {
            NextStep::Ask(selection) => {
                let correct = examinee.answer(&selection.item).await?;
                engine.record_response(&mut state, correct)?;
            }
            NextStep::Stop(decision) => break decision,
        }
    };

    Ok(SessionSummary {
        session_id: state.id,
        examinee: examinee.name().to_string(),
        true_theta: examinee.true_theta(),
        initial_theta: state.initial_theta,
        final_theta: state.theta,
        final_sem: state.sem,
        questions_answered: state.questions_answered(),
        correct: state.correct_count(),
        stop_reason: decision.reason,
        estimated_tier: state.estimated_tier,
        active_tier: state.active_tier,
        items: state.responses.iter().map(|r| r.item_id.clone()).collect(),
        theta_history: state.theta_history,
    })
}

/// Runs many examinees against one engine and item bank.
pub struct Simulator {
    engine: Arc<AdaptiveEngine>,
    bank: Arc<ItemBank>,
    config: SimulationConfig,
    exposure: Arc<ExposureTracker>,
}

impl Simulator {
    pub fn new(engine: Arc<AdaptiveEngine>, bank: Arc<ItemBank>, config: SimulationConfig) -> Self {
        let exposure = Arc::new(ExposureTracker::new(bank.exposure_counts.clone()));
        Self {
            engine,
            bank,
            config,
            exposure,
        }
    }

    /// Exposure counts accumulated so far, including the bank's seed.
    pub fn exposure(&self) -> &Arc<ExposureTracker> {
        &self.exposure
    }

    /// Run one session per examinee and aggregate the results.
    pub async fn run(
        &self,
        examinees: Vec<Arc<dyn Examinee>>,
        progress: &dyn ProgressReporter,
    ) -> Result<SimulationReport> {
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));

        tracing::info!(
            run = %run_id,
            examinees = examinees.len(),
            items = self.bank.items.len(),
            purpose = %self.engine.config().purpose,
            "starting simulation"
        );

        let mut futures = FuturesUnordered::new();

        for examinee in examinees {
            let engine = Arc::clone(&self.engine);
            let bank = Arc::clone(&self.bank);
            let semaphore = Arc::clone(&semaphore);
            let exposure = Arc::clone(&self.exposure);
            let level = self.config.starting_level;
            progress.on_session_start(examinee.name());

            futures.push(async move {
                let name = examinee.name().to_string();
                let inner = async {
                    let _permit = semaphore
                        .clone()
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                    let summary = run_session(
                        &engine,
                        &bank.items,
                        exposure.snapshot(),
                        examinee.as_ref(),
                        level,
                    )
                    .await?;
                    exposure.record(&summary.items);
                    Ok::<_, anyhow::Error>(summary)
                };
                (name, inner.await)
            });
        }

        let mut sessions = Vec::new();
        let mut failed = 0usize;
        let total = futures.len();

        while let Some((name, result)) = futures.next().await {
            match result {
                Ok(summary) => {
                    progress.on_session_complete(&summary);
                    sessions.push(summary);
                }
                Err(e) => {
                    tracing::error!("session failed for {name}: {e:#}");
                    progress.on_session_error(&name, &e.to_string());
                    failed += 1;
                }
            }
        }

        let elapsed = start.elapsed();
        progress.on_run_complete(total, sessions.len(), failed, elapsed);

        let config = self.engine.config().clone();
        let stats = compute_simulation_stats(&sessions, self.bank.items.len(), &config.tiers);

        Ok(SimulationReport {
            id: run_id,
            created_at: chrono::Utc::now(),
            item_bank: ItemBankSummary {
                id: self.bank.id.clone(),
                name: self.bank.name.clone(),
                item_count: self.bank.items.len(),
            },
            purpose: config.purpose,
            config,
            sessions,
            failed_sessions: failed,
            stats,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}

/// Evenly spaced true abilities over `[lo, hi]`, one seeded examinee each.
pub fn examinee_grid(count: usize, lo: f64, hi: f64, seed: u64) -> Vec<Arc<dyn Examinee>> {
    (0..count)
        .map(|i| {
            let theta = if count <= 1 {
                (lo + hi) / 2.0
            } else {
                lo + (hi - lo) * i as f64 / (count - 1) as f64
            };
            Arc::new(crate::examinee::SimulatedExaminee::new(
                format!("sim-{i:04}"),
                theta,
                seed.wrapping_add(i as u64),
            )) as Arc<dyn Examinee>
        })
        .collect()
}
