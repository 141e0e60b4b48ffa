//! TOML item bank parser.
//!
//! Loads item banks from TOML files and directories, and validates them.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::TierSettings;
use crate::irt::MAX_GUESSING;
use crate::model::{default_topic, ItemBank, ItemParameters, Tier};
use crate::tier::classify;

/// Intermediate TOML structure for parsing item bank files.
#[derive(Debug, Deserialize)]
struct TomlItemBankFile {
    item_bank: TomlItemBankHeader,
    #[serde(default)]
    items: Vec<TomlItem>,
}

#[derive(Debug, Deserialize)]
struct TomlItemBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlItem {
    id: String,
    difficulty: f64,
    discrimination: f64,
    #[serde(default)]
    guessing: f64,
    #[serde(default)]
    tier: Option<String>,
    #[serde(default = "default_topic")]
    topic: String,
    /// Times the item was administered before, for exposure control.
    #[serde(default)]
    exposure_count: u32,
}

/// A warning from item bank validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    /// The item ID (if applicable).
    pub item_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn item(id: &str, message: impl Into<String>) -> Self {
        Self {
            item_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Parse a single TOML file into an `ItemBank`.
pub fn parse_item_bank(path: &Path) -> Result<ItemBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read item bank file: {}", path.display()))?;

    parse_item_bank_str(&content, path)
}

/// Parse a TOML string into an `ItemBank` (useful for testing).
pub fn parse_item_bank_str(content: &str, source_path: &Path) -> Result<ItemBank> {
    parse_with_warnings(content, source_path).map(|(bank, _)| bank)
}

/// Parse a file and return it together with every validation warning,
/// including tier labels that had to be replaced.
pub fn check_item_bank(path: &Path) -> Result<(ItemBank, Vec<ValidationWarning>)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read item bank file: {}", path.display()))?;
    check_item_bank_str(&content, path)
}

/// String form of [`check_item_bank`].
pub fn check_item_bank_str(
    content: &str,
    source_path: &Path,
) -> Result<(ItemBank, Vec<ValidationWarning>)> {
    let (bank, mut warnings) = parse_with_warnings(content, source_path)?;
    warnings.extend(validate_item_bank(&bank, &TierSettings::default()));
    Ok((bank, warnings))
}

fn parse_with_warnings(
    content: &str,
    source_path: &Path,
) -> Result<(ItemBank, Vec<ValidationWarning>)> {
    let parsed: TomlItemBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let tiers = TierSettings::default();
    let mut warnings = Vec::new();
    let mut exposure_counts = HashMap::new();

    let items = parsed
        .items
        .into_iter()
        .map(|item| {
            anyhow::ensure!(
                item.difficulty.is_finite(),
                "item '{}': difficulty must be finite",
                item.id
            );
            anyhow::ensure!(
                item.discrimination.is_finite() && item.discrimination > 0.0,
                "item '{}': discrimination must be positive, got {}",
                item.id,
                item.discrimination
            );
            anyhow::ensure!(
                (0.0..1.0).contains(&item.guessing),
                "item '{}': guessing must be in [0, 1), got {}",
                item.id,
                item.guessing
            );

            let tier = match item.tier.as_deref() {
                Some(label) => {
                    if let Err(e) = label.parse::<Tier>() {
                        warnings.push(ValidationWarning::item(
                            &item.id,
                            format!("{e}, using C1"),
                        ));
                    }
                    Tier::parse_lenient(label)
                }
                None => classify(item.difficulty, &tiers),
            };

            if item.exposure_count > 0 {
                exposure_counts.insert(item.id.clone(), item.exposure_count);
            }

            Ok(ItemParameters {
                id: item.id,
                difficulty: item.difficulty,
                discrimination: item.discrimination,
                guessing: item.guessing,
                tier,
                topic: item.topic,
            })
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("invalid item in {}", source_path.display()))?;

    let bank = ItemBank {
        id: parsed.item_bank.id,
        name: parsed.item_bank.name,
        description: parsed.item_bank.description,
        items,
        exposure_counts,
    };
    Ok((bank, warnings))
}

/// Recursively load all `.toml` item bank files from a directory.
pub fn load_item_bank_directory(dir: &Path) -> Result<Vec<ItemBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_item_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_item_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a file, or merge every bank found under a directory into one.
pub fn load_item_banks(path: &Path) -> Result<ItemBank> {
    if !path.is_dir() {
        return parse_item_bank(path);
    }
    let mut banks = load_item_bank_directory(path)?;
    if banks.len() <= 1 {
        return banks
            .pop()
            .with_context(|| format!("no item banks found in {}", path.display()));
    }

    let mut merged = ItemBank {
        id: banks.iter().map(|b| b.id.as_str()).collect::<Vec<_>>().join("+"),
        name: format!("{} item banks", banks.len()),
        description: format!("merged from {}", path.display()),
        items: Vec::new(),
        exposure_counts: HashMap::new(),
    };
    for bank in banks {
        merged.items.extend(bank.items);
        merged.exposure_counts.extend(bank.exposure_counts);
    }
    Ok(merged)
}

/// Validate an item bank for common issues.
pub fn validate_item_bank(bank: &ItemBank, tiers: &TierSettings) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.items.is_empty() {
        warnings.push(ValidationWarning {
            item_id: None,
            message: "item bank has no items".into(),
        });
        return warnings;
    }

    // Check for duplicate item IDs
    let mut seen_ids = HashSet::new();
    for item in &bank.items {
        if !seen_ids.insert(&item.id) {
            warnings.push(ValidationWarning::item(
                &item.id,
                format!("duplicate item ID: {}", item.id),
            ));
        }
    }

    // Check parameters against the labelled tier's band
    for item in &bank.items {
        let band = &tiers.bands[item.tier.index()];
        if !band.contains_difficulty(item.difficulty) {
            warnings.push(ValidationWarning::item(
                &item.id,
                format!(
                    "difficulty {} is outside the {} band [{}, {}]",
                    item.difficulty, item.tier, band.min_difficulty, band.max_difficulty
                ),
            ));
        }
        if !band.contains_discrimination(item.discrimination) {
            warnings.push(ValidationWarning::item(
                &item.id,
                format!(
                    "discrimination {} is outside the {} band [{}, {}]",
                    item.discrimination,
                    item.tier,
                    band.min_discrimination,
                    band.max_discrimination
                ),
            ));
        }
        if item.guessing > MAX_GUESSING {
            warnings.push(ValidationWarning::item(
                &item.id,
                format!(
                    "guessing {} will be clamped to {MAX_GUESSING} during scoring",
                    item.guessing
                ),
            ));
        }
        if item.topic.trim().is_empty() {
            warnings.push(ValidationWarning::item(&item.id, "topic is empty"));
        }
    }

    // Tiers nothing can be selected from
    for (tier, count) in Tier::ALL.iter().zip(bank.tier_counts()) {
        if count == 0 {
            warnings.push(ValidationWarning {
                item_id: None,
                message: format!("no items in tier {tier}"),
            });
        }
    }

    warnings
}
