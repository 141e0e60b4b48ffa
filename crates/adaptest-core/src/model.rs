//! Core data model types for adaptest.
//!
//! Items, tiers, competence levels and response events. Everything here is
//! immutable once created; the only mutable state in the system lives in
//! [`SessionState`](crate::session::SessionState).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Ordinal competency band derived from theta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    C1,
    C2,
    C3,
    C4,
}

impl Tier {
    /// All tiers in ascending order.
    pub const ALL: [Tier; 4] = [Tier::C1, Tier::C2, Tier::C3, Tier::C4];

    /// Zero-based ordinal position.
    pub fn index(self) -> usize {
        match self {
            Tier::C1 => 0,
            Tier::C2 => 1,
            Tier::C3 => 2,
            Tier::C4 => 3,
        }
    }

    /// Tier at the given ordinal position, clamped to the valid range.
    pub fn from_index(index: usize) -> Tier {
        Tier::ALL[index.min(Tier::ALL.len() - 1)]
    }

    /// One step up, or `None` at the top.
    pub fn promoted(self) -> Option<Tier> {
        match self {
            Tier::C4 => None,
            other => Some(Tier::from_index(other.index() + 1)),
        }
    }

    /// One step down, or `None` at the bottom.
    pub fn demoted(self) -> Option<Tier> {
        match self {
            Tier::C1 => None,
            other => Some(Tier::from_index(other.index() - 1)),
        }
    }

    /// Parse a tier label, falling back to `C1` for anything unrecognised.
    pub fn parse_lenient(label: &str) -> Tier {
        match label.parse() {
            Ok(tier) => tier,
            Err(e) => {
                tracing::warn!("{e}, defaulting to C1");
                Tier::C1
            }
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::C1 => write!(f, "C1"),
            Tier::C2 => write!(f, "C2"),
            Tier::C3 => write!(f, "C3"),
            Tier::C4 => write!(f, "C4"),
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "C1" | "1" => Ok(Tier::C1),
            "C2" | "2" => Ok(Tier::C2),
            "C3" | "3" => Ok(Tier::C3),
            "C4" | "4" => Ok(Tier::C4),
            other => Err(format!("unknown tier: {other}")),
        }
    }
}

/// Self-reported competence used to seed the initial ability estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetenceLevel {
    Beginner,
    Elementary,
    Intermediate,
    Advanced,
    Expert,
}

impl CompetenceLevel {
    /// Starting theta for this competence level.
    pub fn initial_theta(self) -> f64 {
        match self {
            CompetenceLevel::Beginner => -1.5,
            CompetenceLevel::Elementary => -0.5,
            CompetenceLevel::Intermediate => 0.0,
            CompetenceLevel::Advanced => 1.0,
            CompetenceLevel::Expert => 2.0,
        }
    }
}

impl fmt::Display for CompetenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompetenceLevel::Beginner => write!(f, "beginner"),
            CompetenceLevel::Elementary => write!(f, "elementary"),
            CompetenceLevel::Intermediate => write!(f, "intermediate"),
            CompetenceLevel::Advanced => write!(f, "advanced"),
            CompetenceLevel::Expert => write!(f, "expert"),
        }
    }
}

impl FromStr for CompetenceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" | "novice" => Ok(CompetenceLevel::Beginner),
            "elementary" => Ok(CompetenceLevel::Elementary),
            "intermediate" => Ok(CompetenceLevel::Intermediate),
            "advanced" => Ok(CompetenceLevel::Advanced),
            "expert" => Ok(CompetenceLevel::Expert),
            other => Err(format!("unknown competence level: {other}")),
        }
    }
}

/// The three 3PL parameters of an item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrtParams {
    /// Difficulty (b).
    pub difficulty: f64,
    /// Discrimination (a), strictly positive.
    pub discrimination: f64,
    /// Pseudo-guessing lower asymptote (c), in `[0, 1)`.
    pub guessing: f64,
}

/// A calibrated item from the item bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemParameters {
    /// Unique identifier within the bank.
    pub id: String,
    /// Difficulty (b).
    pub difficulty: f64,
    /// Discrimination (a).
    pub discrimination: f64,
    /// Pseudo-guessing (c).
    #[serde(default)]
    pub guessing: f64,
    /// Competency tier the item was authored for.
    pub tier: Tier,
    /// Topic or content area, used for content balancing.
    #[serde(default = "default_topic")]
    pub topic: String,
}

pub(crate) fn default_topic() -> String {
    "general".to_string()
}

impl ItemParameters {
    pub fn new(id: impl Into<String>, difficulty: f64, discrimination: f64, guessing: f64) -> Self {
        Self {
            id: id.into(),
            difficulty,
            discrimination,
            guessing,
            tier: Tier::C1,
            topic: default_topic(),
        }
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn irt(&self) -> IrtParams {
        IrtParams {
            difficulty: self.difficulty,
            discrimination: self.discrimination,
            guessing: self.guessing,
        }
    }
}

/// A single answered item. Appended once per answer, never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEvent {
    /// The answered item.
    pub item_id: String,
    /// Whether the answer was correct.
    pub correct: bool,
    /// Zero-based position in the session.
    pub sequence: usize,
    /// Item parameters at the time of answering.
    pub irt: IrtParams,
}

/// A collection of calibrated items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of the bank.
    #[serde(default)]
    pub description: String,
    /// The items.
    #[serde(default)]
    pub items: Vec<ItemParameters>,
    /// Prior administrations per item id, seeding exposure control.
    #[serde(default)]
    pub exposure_counts: HashMap<String, u32>,
}

impl ItemBank {
    /// Number of items per tier, in tier order.
    pub fn tier_counts(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for item in &self.items {
            counts[item.tier.index()] += 1;
        }
        counts
    }

    pub fn get(&self, id: &str) -> Option<&ItemParameters> {
        self.items.iter().find(|item| item.id == id)
    }
}
