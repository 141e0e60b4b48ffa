//! The `adaptest init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create adaptest.toml
    if Path::new("adaptest.toml").exists() {
        println!("adaptest.toml already exists, skipping.");
    } else {
        std::fs::write("adaptest.toml", SAMPLE_CONFIG)?;
        println!("Created adaptest.toml");
    }

    // Create example item bank
    std::fs::create_dir_all("item-banks")?;
    let example_path = Path::new("item-banks/example.toml");
    if example_path.exists() {
        println!("item-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_ITEM_BANK)?;
        println!("Created item-banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Add calibrated items to item-banks/example.toml");
    println!("  2. Run: adaptest validate --item-bank item-banks/example.toml");
    println!("  3. Run: adaptest simulate --item-bank item-banks/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# adaptest configuration

default_purpose = "diagnostic"
cache_capacity = 10000

# Per-purpose overrides are merged onto the built-in presets.
[purposes.screening]
max_questions = 12
target_sem = 0.45

[purposes.diagnostic.stopping]
detect_stability = false
"#;

const EXAMPLE_ITEM_BANK: &str = r#"[item_bank]
id = "example"
name = "Example Item Bank"
description = "A small item bank with a few items per tier"

[[items]]
id = "c1-vocab-1"
difficulty = -2.2
discrimination = 0.9
guessing = 0.2
tier = "C1"
topic = "vocabulary"

[[items]]
id = "c1-grammar-1"
difficulty = -1.5
discrimination = 1.1
guessing = 0.2
tier = "C1"
topic = "grammar"

[[items]]
id = "c2-vocab-1"
difficulty = -0.7
discrimination = 1.2
guessing = 0.15
tier = "C2"
topic = "vocabulary"

[[items]]
id = "c2-grammar-1"
difficulty = -0.3
discrimination = 1.3
guessing = 0.15
tier = "C2"
topic = "grammar"

[[items]]
id = "c3-reading-1"
difficulty = 0.3
discrimination = 1.5
guessing = 0.1
tier = "C3"
topic = "reading"

[[items]]
id = "c3-grammar-1"
difficulty = 0.7
discrimination = 1.4
guessing = 0.1
tier = "C3"
topic = "grammar"

[[items]]
id = "c4-reading-1"
difficulty = 1.4
discrimination = 1.7
guessing = 0.05
tier = "C4"
topic = "reading"

[[items]]
id = "c4-vocab-1"
difficulty = 2.1
discrimination = 1.8
guessing = 0.0
tier = "C4"
topic = "vocabulary"
"#;
