//! The `adaptest purposes` command.

use std::path::PathBuf;

use anyhow::Result;

use adaptest_core::config::{load_config_from, TestPurpose};

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    use comfy_table::{Cell, Table};

    let config = load_config_from(config_path.as_deref())?;

    let mut table = Table::new();
    table.set_header(vec![
        "Purpose",
        "Min Q",
        "Max Q",
        "Target SEM",
        "Aggressive Tiers",
        "Content Balancing",
        "Anticipation",
        "Early Stop",
    ]);

    for purpose in TestPurpose::ALL {
        let c = config.resolve(purpose)?;
        let name = if purpose == config.default_purpose {
            format!("{purpose} (default)")
        } else {
            purpose.to_string()
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(c.min_questions),
            Cell::new(c.max_questions),
            Cell::new(format!("{:.2}", c.target_sem)),
            Cell::new(yes_no(c.tier_change_aggressive)),
            Cell::new(yes_no(c.enable_content_balancing)),
            Cell::new(format!("x{:.2}", c.anticipation_multiplier)),
            Cell::new(yes_no(c.stopping.detect_stability)),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
