//! Examinees for simulations and tests.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::irt::probability_correct;
use crate::model::ItemParameters;
use crate::traits::Examinee;

/// An examinee whose answers follow the 3PL model at a known true theta.
pub struct SimulatedExaminee {
    name: String,
    true_theta: f64,
    rng: Mutex<StdRng>,
    answered: AtomicU32,
}

impl SimulatedExaminee {
    /// Reproducible examinee: the same seed yields the same answers.
    pub fn new(name: impl Into<String>, true_theta: f64, seed: u64) -> Self {
        Self {
            name: name.into(),
            true_theta,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            answered: AtomicU32::new(0),
        }
    }

    /// Number of items answered so far.
    pub fn answered(&self) -> u32 {
        self.answered.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Examinee for SimulatedExaminee {
    fn name(&self) -> &str {
        &self.name
    }

    fn true_theta(&self) -> Option<f64> {
        Some(self.true_theta)
    }

    async fn answer(&self, item: &ItemParameters) -> anyhow::Result<bool> {
        self.answered.fetch_add(1, Ordering::Relaxed);
        let p = probability_correct(
            self.true_theta,
            item.difficulty,
            item.discrimination,
            item.guessing,
        );
        let draw: f64 = self
            .rng
            .lock()
            .map_err(|_| anyhow::anyhow!("examinee rng poisoned"))?
            .r#gen();
        Ok(draw < p)
    }
}

/// An examinee that replays a fixed answer script, then errors.
pub struct ScriptedExaminee {
    name: String,
    true_theta: Option<f64>,
    script: Vec<bool>,
    position: AtomicUsize,
}

impl ScriptedExaminee {
    pub fn new(name: impl Into<String>, script: Vec<bool>) -> Self {
        Self {
            name: name.into(),
            true_theta: None,
            script,
            position: AtomicUsize::new(0),
        }
    }

    /// Always answers the same way.
    pub fn constant(name: impl Into<String>, correct: bool, len: usize) -> Self {
        Self::new(name, vec![correct; len])
    }

    pub fn with_true_theta(mut self, theta: f64) -> Self {
        self.true_theta = Some(theta);
        self
    }
}

#[async_trait]
impl Examinee for ScriptedExaminee {
    fn name(&self) -> &str {
        &self.name
    }

    fn true_theta(&self) -> Option<f64> {
        self.true_theta
    }

    async fn answer(&self, item: &ItemParameters) -> anyhow::Result<bool> {
        let index = self.position.fetch_add(1, Ordering::Relaxed);
        self.script.get(index).copied().ok_or_else(|| {
            anyhow::anyhow!(
                "script for '{}' exhausted after {} answers (asked '{}')",
                self.name,
                self.script.len(),
                item.id
            )
        })
    }
}
