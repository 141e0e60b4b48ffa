//! Adaptive test configuration.
//!
//! Every tuning constant the engine uses lives in one versioned
//! [`AdaptiveConfig`] per test purpose. Configs are validated once, before
//! any session starts, and never mutated afterwards.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Current config schema version.
pub const CONFIG_VERSION: u32 = 1;

/// What a test is being administered for. Each purpose has its own preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestPurpose {
    Screening,
    Diagnostic,
    Placement,
    Formative,
}

impl TestPurpose {
    pub const ALL: [TestPurpose; 4] = [
        TestPurpose::Screening,
        TestPurpose::Diagnostic,
        TestPurpose::Placement,
        TestPurpose::Formative,
    ];
}

impl fmt::Display for TestPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestPurpose::Screening => write!(f, "screening"),
            TestPurpose::Diagnostic => write!(f, "diagnostic"),
            TestPurpose::Placement => write!(f, "placement"),
            TestPurpose::Formative => write!(f, "formative"),
        }
    }
}

impl FromStr for TestPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "screening" => Ok(TestPurpose::Screening),
            "diagnostic" => Ok(TestPurpose::Diagnostic),
            "placement" => Ok(TestPurpose::Placement),
            "formative" | "practice" => Ok(TestPurpose::Formative),
            other => Err(format!("unknown test purpose: {other}")),
        }
    }
}

/// Ability estimator tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorSettings {
    /// Lower theta bound.
    pub theta_min: f64,
    /// Upper theta bound.
    pub theta_max: f64,
    /// Newton-Raphson iteration cap.
    pub max_iterations: usize,
    /// Stop iterating once |delta| falls below this.
    pub convergence_tolerance: f64,
    /// A second derivative smaller than this in magnitude is degenerate.
    pub min_second_derivative: f64,
    /// Ceiling on the cumulative Newton-Raphson change within one update.
    pub max_total_change: f64,
    /// Ceiling on the distance from the session's initial theta.
    pub max_session_drift: f64,
    /// Last question count of the "building" phase.
    pub transition_start: usize,
    /// Last question count of the "transition" phase.
    pub transition_end: usize,
    /// Recent-response window used once the estimate matures.
    pub window_size: usize,
    pub max_step_building: f64,
    pub max_step_transition: f64,
    pub max_step_mature: f64,
    /// Smoothing factor while early-question protection applies.
    pub smoothing_early: f64,
    pub smoothing_building: f64,
    pub smoothing_transition: f64,
    pub smoothing_mature: f64,
    /// Multiplier applied to the smoothing factor when Newton-Raphson converged.
    pub converged_damping: f64,
    /// Number of opening questions with a tight change clamp.
    pub early_protection_questions: usize,
    /// Largest change allowed during early-question protection.
    pub early_protection_max_change: f64,
    /// A raw jump larger than this is replaced by an EAP estimate.
    pub large_jump_threshold: f64,
    /// Standard deviation of the EAP prior.
    pub eap_prior_sd: f64,
    /// Quadrature points for EAP.
    pub eap_grid_points: usize,
    /// Step of the maximum-likelihood grid search.
    pub grid_search_step: f64,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            theta_min: -3.0,
            theta_max: 3.0,
            max_iterations: 10,
            convergence_tolerance: 1e-3,
            min_second_derivative: 1e-6,
            max_total_change: 1.0,
            max_session_drift: 3.0,
            transition_start: 10,
            transition_end: 20,
            window_size: 10,
            max_step_building: 0.5,
            max_step_transition: 0.4,
            max_step_mature: 0.3,
            smoothing_early: 0.3,
            smoothing_building: 0.5,
            smoothing_transition: 0.6,
            smoothing_mature: 0.7,
            converged_damping: 0.85,
            early_protection_questions: 5,
            early_protection_max_change: 0.2,
            large_jump_threshold: 1.5,
            eap_prior_sd: 1.0,
            eap_grid_points: 81,
            grid_search_step: 0.05,
        }
    }
}

impl EstimatorSettings {
    pub fn clamp_theta(&self, theta: f64) -> f64 {
        theta.clamp(self.theta_min, self.theta_max)
    }
}

/// Difficulty and discrimination band an item of a tier is expected to fall in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBand {
    pub min_difficulty: f64,
    pub max_difficulty: f64,
    pub min_discrimination: f64,
    pub max_discrimination: f64,
}

impl TierBand {
    pub fn contains_difficulty(&self, b: f64) -> bool {
        (self.min_difficulty..=self.max_difficulty).contains(&b)
    }

    pub fn contains_discrimination(&self, a: f64) -> bool {
        (self.min_discrimination..=self.max_discrimination).contains(&a)
    }
}

/// Tier classification and progression tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierSettings {
    /// Theta boundaries between C1|C2, C2|C3 and C3|C4. Each tier is `[lo, hi)`.
    pub cut_points: [f64; 3],
    /// Per-tier item bands, C1 first.
    pub bands: [TierBand; 4],
    /// Answers required before the active tier may change at all.
    pub min_questions_before_change: usize,
    pub promotion_window: usize,
    pub demotion_window: usize,
    /// Correct answers within the promotion window needed to promote.
    pub promotion_threshold: usize,
    /// Correct answers within the demotion window at or below which we demote.
    pub demotion_threshold: usize,
    /// Answers that must pass after a tier change before the next one.
    pub change_cooldown: usize,
}

impl Default for TierSettings {
    fn default() -> Self {
        Self {
            cut_points: [-1.0, 0.0, 1.0],
            bands: [
                TierBand {
                    min_difficulty: -3.0,
                    max_difficulty: -1.0,
                    min_discrimination: 0.5,
                    max_discrimination: 1.5,
                },
                TierBand {
                    min_difficulty: -1.0,
                    max_difficulty: 0.0,
                    min_discrimination: 0.7,
                    max_discrimination: 1.8,
                },
                TierBand {
                    min_difficulty: 0.0,
                    max_difficulty: 1.0,
                    min_discrimination: 0.8,
                    max_discrimination: 2.2,
                },
                TierBand {
                    min_difficulty: 1.0,
                    max_difficulty: 3.0,
                    min_discrimination: 0.9,
                    max_discrimination: 2.5,
                },
            ],
            min_questions_before_change: 8,
            promotion_window: 8,
            demotion_window: 8,
            promotion_threshold: 6,
            demotion_threshold: 2,
            change_cooldown: 8,
        }
    }
}

/// Item selection tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSettings {
    /// Base anticipation shift for a uniform recent streak.
    pub max_anticipation_change: f64,
    /// Fraction of the base shift applied for a mixed-majority streak.
    pub mixed_anticipation_factor: f64,
    /// How many recent responses feed the anticipation.
    pub anticipation_lookback: usize,
    /// Margin below the last difficulty tolerated before the monotonic rule is dropped.
    pub difficulty_relaxation: f64,
    pub content_decay: f64,
    /// Repeats after which the content penalty stops decaying.
    pub content_penalty_cap: u32,
    pub exposure_decay: f64,
    /// Exposures after which the exposure penalty stops decaying.
    pub exposure_penalty_cap: u32,
    /// Score multiplier for a strictly harder item after a correct answer.
    pub progression_bonus: f64,
    /// Distance kept inside a tier when an anticipated jump is clamped.
    pub tier_edge_margin: f64,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            max_anticipation_change: 0.5,
            mixed_anticipation_factor: 0.75,
            anticipation_lookback: 3,
            difficulty_relaxation: 0.05,
            content_decay: 0.8,
            content_penalty_cap: 3,
            exposure_decay: 0.9,
            exposure_penalty_cap: 3,
            progression_bonus: 1.1,
            tier_edge_margin: 0.01,
        }
    }
}

/// Stability and streak detection tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoppingSettings {
    /// Enables the stability and streak rules.
    pub detect_stability: bool,
    /// Number of recent theta updates whose variance is inspected.
    pub stability_window: usize,
    pub stability_variance: f64,
    /// Number of recent responses inspected for streaks.
    pub streak_window: usize,
    /// Identical consecutive outcomes within the streak window that end the session.
    pub streak_length: usize,
}

impl Default for StoppingSettings {
    fn default() -> Self {
        Self {
            detect_stability: false,
            stability_window: 5,
            stability_variance: 0.01,
            streak_window: 8,
            streak_length: 6,
        }
    }
}

/// Immutable per-purpose configuration for an adaptive test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    /// Schema version.
    #[serde(default = "default_version")]
    pub version: u32,
    pub purpose: TestPurpose,
    pub min_questions: usize,
    pub max_questions: usize,
    pub target_sem: f64,
    /// Halves the evidence required before the active tier may change.
    pub tier_change_aggressive: bool,
    pub enable_content_balancing: bool,
    /// Scales the anticipated-theta shift used during selection.
    pub anticipation_multiplier: f64,
    #[serde(default)]
    pub estimator: EstimatorSettings,
    #[serde(default)]
    pub tiers: TierSettings,
    #[serde(default)]
    pub selector: SelectorSettings,
    #[serde(default)]
    pub stopping: StoppingSettings,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self::for_purpose(TestPurpose::Diagnostic)
    }
}

impl AdaptiveConfig {
    /// Built-in preset for a test purpose.
    pub fn for_purpose(purpose: TestPurpose) -> Self {
        let base = Self {
            version: CONFIG_VERSION,
            purpose,
            min_questions: 10,
            max_questions: 30,
            target_sem: 0.3,
            tier_change_aggressive: false,
            enable_content_balancing: true,
            anticipation_multiplier: 1.0,
            estimator: EstimatorSettings::default(),
            tiers: TierSettings::default(),
            selector: SelectorSettings::default(),
            stopping: StoppingSettings::default(),
        };

        match purpose {
            TestPurpose::Diagnostic => base,
            TestPurpose::Screening => Self {
                min_questions: 5,
                max_questions: 15,
                target_sem: 0.4,
                tier_change_aggressive: true,
                enable_content_balancing: false,
                anticipation_multiplier: 1.5,
                stopping: StoppingSettings {
                    detect_stability: true,
                    ..StoppingSettings::default()
                },
                ..base
            },
            TestPurpose::Placement => Self {
                min_questions: 8,
                max_questions: 20,
                target_sem: 0.35,
                tier_change_aggressive: true,
                anticipation_multiplier: 1.25,
                stopping: StoppingSettings {
                    detect_stability: true,
                    ..StoppingSettings::default()
                },
                ..base
            },
            TestPurpose::Formative => Self {
                min_questions: 5,
                max_questions: 25,
                target_sem: 0.35,
                ..base
            },
        }
    }

    /// Answers required before the active tier may change.
    pub fn min_questions_before_tier_change(&self) -> usize {
        let min = self.tiers.min_questions_before_change;
        if self.tier_change_aggressive {
            (min / 2).max(1)
        } else {
            min
        }
    }

    /// Reject self-contradictory configurations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_questions == 0 {
            return Err(ConfigError::NoQuestions);
        }
        if self.min_questions > self.max_questions {
            return Err(ConfigError::QuestionBounds {
                min: self.min_questions,
                max: self.max_questions,
            });
        }
        // NaN fails this comparison too
        if !(self.target_sem > 0.0) {
            return Err(ConfigError::TargetSem(self.target_sem));
        }
        if self.anticipation_multiplier < 0.0 || !self.anticipation_multiplier.is_finite() {
            return Err(ConfigError::NotPositive {
                name: "anticipation_multiplier",
                value: self.anticipation_multiplier,
            });
        }

        let est = &self.estimator;
        if !(est.theta_min < est.theta_max) {
            return Err(ConfigError::ThetaBounds {
                min: est.theta_min,
                max: est.theta_max,
            });
        }
        if est.transition_start >= est.transition_end {
            return Err(ConfigError::PhaseBounds {
                start: est.transition_start,
                end: est.transition_end,
            });
        }
        if est.window_size == 0 {
            return Err(ConfigError::EmptyWindow {
                name: "estimator.window_size",
            });
        }
        for (name, value) in [
            ("estimator.max_total_change", est.max_total_change),
            ("estimator.max_session_drift", est.max_session_drift),
            ("estimator.max_step_building", est.max_step_building),
            ("estimator.max_step_transition", est.max_step_transition),
            ("estimator.max_step_mature", est.max_step_mature),
            ("estimator.early_protection_max_change", est.early_protection_max_change),
            ("estimator.large_jump_threshold", est.large_jump_threshold),
            ("estimator.eap_prior_sd", est.eap_prior_sd),
            ("estimator.grid_search_step", est.grid_search_step),
            ("estimator.convergence_tolerance", est.convergence_tolerance),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        for (name, value) in [
            ("estimator.smoothing_early", est.smoothing_early),
            ("estimator.smoothing_building", est.smoothing_building),
            ("estimator.smoothing_transition", est.smoothing_transition),
            ("estimator.smoothing_mature", est.smoothing_mature),
            ("estimator.converged_damping", est.converged_damping),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::SmoothingFactor { name, value });
            }
        }
        if est.max_iterations == 0 {
            return Err(ConfigError::EmptyWindow {
                name: "estimator.max_iterations",
            });
        }
        if est.eap_grid_points < 2 {
            return Err(ConfigError::EmptyWindow {
                name: "estimator.eap_grid_points",
            });
        }

        let tiers = &self.tiers;
        let [c1, c2, c3] = tiers.cut_points;
        if !(c1 < c2 && c2 < c3) {
            return Err(ConfigError::TierCutPoints(tiers.cut_points));
        }
        for (name, window, threshold_name, threshold) in [
            (
                "tiers.promotion_window",
                tiers.promotion_window,
                "tiers.promotion_threshold",
                tiers.promotion_threshold,
            ),
            (
                "tiers.demotion_window",
                tiers.demotion_window,
                "tiers.demotion_threshold",
                tiers.demotion_threshold,
            ),
        ] {
            if window == 0 {
                return Err(ConfigError::EmptyWindow { name });
            }
            if threshold > window {
                return Err(ConfigError::ThresholdOutsideWindow {
                    name: threshold_name,
                    threshold,
                    window,
                });
            }
        }

        let sel = &self.selector;
        for (name, value) in [
            ("selector.content_decay", sel.content_decay),
            ("selector.exposure_decay", sel.exposure_decay),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::SmoothingFactor { name, value });
            }
        }
        if !(sel.progression_bonus > 0.0) {
            return Err(ConfigError::NotPositive {
                name: "selector.progression_bonus",
                value: sel.progression_bonus,
            });
        }

        let stop = &self.stopping;
        if stop.detect_stability {
            if stop.stability_window < 2 {
                return Err(ConfigError::EmptyWindow {
                    name: "stopping.stability_window",
                });
            }
            if stop.streak_window == 0 {
                return Err(ConfigError::EmptyWindow {
                    name: "stopping.streak_window",
                });
            }
            if stop.streak_length > stop.streak_window {
                return Err(ConfigError::ThresholdOutsideWindow {
                    name: "stopping.streak_length",
                    threshold: stop.streak_length,
                    window: stop.streak_window,
                });
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config file
// ---------------------------------------------------------------------------

/// Top-level `adaptest.toml` contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptestConfig {
    /// Purpose used when none is requested explicitly.
    #[serde(default = "default_purpose")]
    pub default_purpose: TestPurpose,
    /// Capacity of the shared probability/information cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Per-purpose overrides, merged field by field onto the preset.
    #[serde(default)]
    pub purposes: HashMap<String, toml::Value>,
}

fn default_purpose() -> TestPurpose {
    TestPurpose::Diagnostic
}

fn default_cache_capacity() -> usize {
    10_000
}

impl Default for AdaptestConfig {
    fn default() -> Self {
        Self {
            default_purpose: default_purpose(),
            cache_capacity: default_cache_capacity(),
            purposes: HashMap::new(),
        }
    }
}

impl AdaptestConfig {
    /// Parse and check a config file body. Every override must produce a valid config.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AdaptestConfig =
            toml::from_str(content).context("failed to parse adaptest config")?;
        for name in config.purposes.keys() {
            let purpose: TestPurpose = name.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            config.resolve(purpose)?;
        }
        Ok(config)
    }

    /// The validated config for a purpose, with file overrides applied.
    pub fn resolve(&self, purpose: TestPurpose) -> Result<AdaptiveConfig> {
        let preset = AdaptiveConfig::for_purpose(purpose);
        let config = match self.purposes.get(&purpose.to_string()) {
            Some(overrides) => {
                let mut merged = toml::Value::try_from(&preset)
                    .context("failed to serialize purpose preset")?;
                merge_toml(&mut merged, overrides);
                let config: AdaptiveConfig = merged
                    .try_into()
                    .with_context(|| format!("invalid overrides for purpose '{purpose}'"))?;
                anyhow::ensure!(
                    config.purpose == purpose,
                    "purpose '{purpose}' overrides must not change the purpose field"
                );
                config
            }
            None => preset,
        };
        config
            .validate()
            .with_context(|| format!("invalid config for purpose '{purpose}'"))?;
        Ok(config)
    }
}

/// Recursively overlay `overrides` onto `base`; tables merge, everything else replaces.
fn merge_toml(base: &mut toml::Value, overrides: &toml::Value) {
    match (base, overrides) {
        (toml::Value::Table(base), toml::Value::Table(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overrides) => *base = overrides.clone(),
    }
}

/// Load configuration from `./adaptest.toml`, or defaults if absent.
pub fn load_config() -> Result<AdaptestConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default location.
pub fn load_config_from(path: Option<&Path>) -> Result<AdaptestConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("adaptest.toml");
            local.exists().then_some(local)
        }
    };

    match config_path {
        Some(p) => {
            let content = std::fs::read_to_string(&p)
                .with_context(|| format!("failed to read config: {}", p.display()))?;
            tracing::debug!("loaded config from {}", p.display());
            AdaptestConfig::from_toml_str(&content)
                .with_context(|| format!("in config file {}", p.display()))
        }
        None => Ok(AdaptestConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for purpose in TestPurpose::ALL {
            let config = AdaptiveConfig::for_purpose(purpose);
            assert_eq!(config.purpose, purpose);
            config.validate().unwrap();
        }
    }

    #[test]
    fn purpose_display_and_parse() {
        assert_eq!(TestPurpose::Placement.to_string(), "placement");
        assert_eq!("Screening".parse::<TestPurpose>().unwrap(), TestPurpose::Screening);
        assert_eq!("practice".parse::<TestPurpose>().unwrap(), TestPurpose::Formative);
        assert!("exam".parse::<TestPurpose>().is_err());
    }

    #[test]
    fn rejects_inverted_question_bounds() {
        let config = AdaptiveConfig {
            min_questions: 12,
            max_questions: 10,
            ..AdaptiveConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::QuestionBounds { min: 12, max: 10 })
        );
    }

    #[test]
    fn equal_question_bounds_are_allowed() {
        let config = AdaptiveConfig {
            min_questions: 5,
            max_questions: 5,
            ..AdaptiveConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_target_sem() {
        for sem in [0.0, -0.2, f64::NAN] {
            let config = AdaptiveConfig {
                target_sem: sem,
                ..AdaptiveConfig::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::TargetSem(_))));
        }
    }

    #[test]
    fn rejects_unreachable_promotion_threshold() {
        let mut config = AdaptiveConfig::default();
        config.tiers.promotion_threshold = 9;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOutsideWindow { .. })
        ));
    }

    #[test]
    fn rejects_unordered_cut_points() {
        let mut config = AdaptiveConfig::default();
        config.tiers.cut_points = [0.0, -1.0, 1.0];
        assert!(matches!(config.validate(), Err(ConfigError::TierCutPoints(_))));
    }

    #[test]
    fn aggressive_halves_tier_evidence() {
        let calm = AdaptiveConfig::for_purpose(TestPurpose::Diagnostic);
        let aggressive = AdaptiveConfig::for_purpose(TestPurpose::Screening);
        assert_eq!(calm.min_questions_before_tier_change(), 8);
        assert_eq!(aggressive.min_questions_before_tier_change(), 4);
    }

    #[test]
    fn file_overrides_merge_onto_preset() {
        let toml = r#"
default_purpose = "placement"

[purposes.screening]
max_questions = 12

[purposes.screening.stopping]
streak_length = 5
"#;
        let file = AdaptestConfig::from_toml_str(toml).unwrap();
        assert_eq!(file.default_purpose, TestPurpose::Placement);

        let screening = file.resolve(TestPurpose::Screening).unwrap();
        assert_eq!(screening.max_questions, 12);
        assert_eq!(screening.min_questions, 5);
        assert_eq!(screening.stopping.streak_length, 5);
        assert!(screening.stopping.detect_stability);

        let diagnostic = file.resolve(TestPurpose::Diagnostic).unwrap();
        assert_eq!(diagnostic, AdaptiveConfig::for_purpose(TestPurpose::Diagnostic));
    }

    #[test]
    fn file_with_contradiction_fails_fast() {
        let toml = r#"
[purposes.diagnostic]
min_questions = 40
"#;
        let err = AdaptestConfig::from_toml_str(toml).unwrap_err();
        assert!(format!("{err:#}").contains("min_questions"));
    }

    #[test]
    fn file_with_unknown_purpose_fails() {
        let toml = r#"
[purposes.olympiad]
max_questions = 40
"#;
        assert!(AdaptestConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let result = load_config_from(Some(Path::new("/definitely/not/here.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn defaults_without_local_file() {
        // tests run from the crate directory, which has no adaptest.toml
        let config = load_config().unwrap();
        assert_eq!(config.cache_capacity, 10_000);
        assert!(config.purposes.is_empty());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adaptest.toml");
        std::fs::write(&path, "cache_capacity = 64\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.cache_capacity, 64);
        assert_eq!(config.default_purpose, TestPurpose::Diagnostic);
    }
}
