//! The `adaptest validate` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use adaptest_core::parser::{self, ValidationWarning};

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }
    Ok(())
}

pub fn execute(item_bank_path: PathBuf) -> Result<()> {
    let files = if item_bank_path.is_dir() {
        let mut files = Vec::new();
        collect_files(&item_bank_path, &mut files)?;
        files.sort();
        files
    } else {
        vec![item_bank_path.clone()]
    };
    anyhow::ensure!(
        !files.is_empty(),
        "no .toml item banks found in {}",
        item_bank_path.display()
    );

    let mut total_warnings = 0;
    let mut failures = 0;

    for file in &files {
        let (bank, warnings) = match parser::check_item_bank(file) {
            Ok(checked) => checked,
            Err(e) => {
                println!("{}: ERROR: {e:#}", file.display());
                failures += 1;
                continue;
            }
        };

        let [c1, c2, c3, c4] = bank.tier_counts();
        println!(
            "Item bank: {} ({} items; C1 {c1}, C2 {c2}, C3 {c3}, C4 {c4})",
            bank.name,
            bank.items.len()
        );
        print_warnings(&warnings);
        total_warnings += warnings.len();
    }

    if failures > 0 {
        anyhow::bail!("{failures} item bank file(s) failed to load");
    }

    if total_warnings == 0 {
        println!("All item banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

fn print_warnings(warnings: &[ValidationWarning]) {
    for w in warnings {
        let prefix = w
            .item_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }
}
