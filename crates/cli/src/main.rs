//! Pipeline simulator CLI.
//!
//! This binary is the single entry point for running programs on the model.
//! It performs:
//! 1. **Configuration:** Loads a JSON config file or falls back to built-in defaults.
//! 2. **Execution:** Loads a raw program image and runs it to termination.
//! 3. **Reporting:** Prints the statistics summary and optionally writes the
//!    full JSON run report (stats, coverage, oracle faults).

use std::path::PathBuf;
use std::{fs, process};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rvnn_core::Config;
use rvnn_core::Simulator;

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "Cycle-accurate simulator for a pipelined 32-bit core with AI accelerator instructions",
    long_about = "Run a raw little-endian program image on the five-stage pipeline model.\n\nEvery committed instruction is cross-checked against a golden functional model;\ndivergences are reported, never panicked on.\n\nExamples:\n  sim run program.bin\n  sim run program.bin --config int8.json --report report.json\n  sim run program.bin --dump-regs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program image to termination.
    Run {
        /// Raw little-endian program image.
        image: PathBuf,

        /// JSON configuration file (built-in defaults when omitted).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the full JSON run report to this path.
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Print the register file after the run.
        #[arg(long)]
        dump_regs: bool,

        /// Suppress the statistics summary.
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            image,
            config,
            report,
            dump_regs,
            quiet,
        } => cmd_run(&image, config.as_deref(), report.as_deref(), dump_regs, quiet),
    }
}

/// Loads the configuration, runs the image, and reports the outcome.
///
/// Exit code 0 means the run halted normally and the oracle stayed clean;
/// anything else exits 1.
fn cmd_run(
    image: &std::path::Path,
    config_path: Option<&std::path::Path>,
    report_path: Option<&std::path::Path>,
    dump_regs: bool,
    quiet: bool,
) {
    let config: Config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("error: cannot read config '{}': {e}", path.display());
                process::exit(1);
            });
            serde_json::from_str(&text).unwrap_or_else(|e| {
                eprintln!("error: invalid config '{}': {e}", path.display());
                process::exit(1);
            })
        }
        None => Config::default(),
    };

    let mut sim = Simulator::new(config).unwrap_or_else(|e| {
        eprintln!("error: invalid configuration: {e}");
        process::exit(1);
    });

    let bytes = fs::read(image).unwrap_or_else(|e| {
        eprintln!("error: cannot read image '{}': {e}", image.display());
        process::exit(1);
    });
    sim.load_image(&bytes).unwrap_or_else(|e| {
        eprintln!("error: cannot load image '{}': {e}", image.display());
        process::exit(1);
    });

    let report = sim.run();

    println!("[*] {}", report.exit);
    if !report.faults.is_empty() {
        eprintln!("[!] {} oracle divergence(s) recorded", report.faults.len());
    }
    if !quiet {
        report.stats.print();
        if !report.coverage.complete {
            println!("coverage incomplete:");
            for hole in sim.cpu().coverage.missing() {
                println!("  missing {hole}");
            }
        }
    }
    if dump_regs {
        println!("{}", sim.cpu().regs.dump());
    }

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
            eprintln!("error: cannot serialize report: {e}");
            process::exit(1);
        });
        if let Err(e) = fs::write(path, json) {
            eprintln!("error: cannot write report '{}': {e}", path.display());
            process::exit(1);
        }
    }

    process::exit(i32::from(!report.passed));
}
