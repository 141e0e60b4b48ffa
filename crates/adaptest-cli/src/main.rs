//! adaptest CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "adaptest",
    version,
    about = "Computerized adaptive testing engine and simulator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate adaptive sessions against an item bank
    Simulate {
        /// Path to .toml item bank or directory
        #[arg(long)]
        item_bank: PathBuf,

        /// Test purpose: screening, diagnostic, placement, formative
        #[arg(long)]
        purpose: Option<String>,

        /// Number of simulated examinees
        #[arg(long, default_value = "200")]
        examinees: usize,

        /// Lowest true ability in the examinee grid
        #[arg(long, default_value = "-2.5", allow_negative_numbers = true)]
        theta_min: f64,

        /// Highest true ability in the examinee grid
        #[arg(long, default_value = "2.5", allow_negative_numbers = true)]
        theta_max: f64,

        /// Competence level every session starts from
        #[arg(long, default_value = "intermediate")]
        start: String,

        /// Random seed for simulated answers
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Max concurrent sessions
        #[arg(long, default_value = "4")]
        parallelism: usize,

        /// Output directory
        #[arg(long, default_value = "./adaptest-results")]
        output: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two simulation reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Relative change that counts as a regression
        #[arg(long, default_value = "0.05")]
        threshold: f64,

        /// Exit code 1 if regressions found
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate item bank TOML files
    Validate {
        /// Path to item bank file or directory
        #[arg(long)]
        item_bank: PathBuf,
    },

    /// List test purpose presets
    Purposes {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example item bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("adaptest=info,adaptest_core=warn")
            }),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate {
            item_bank,
            purpose,
            examinees,
            theta_min,
            theta_max,
            start,
            seed,
            parallelism,
            output,
            config,
        } => {
            commands::simulate::execute(commands::simulate::SimulateArgs {
                item_bank,
                purpose,
                examinees,
                theta_min,
                theta_max,
                start,
                seed,
                parallelism,
                output,
                config,
            })
            .await
        }
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Validate { item_bank } => commands::validate::execute(item_bank),
        Commands::Purposes { config } => commands::purposes::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
