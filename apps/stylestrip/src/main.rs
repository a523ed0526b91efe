use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::time::Instant;
use stylestrip_entries::Config;

#[derive(Parser)]
#[command(name = "stylestrip")]
#[command(about = "Post-process bundler output for style-only entry points", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Remove the script asset of entries that resolve only to stylesheets
    Prune(Config),
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Prune(cfg) => {
            let num_threads = rayon::current_num_threads();
            info!(
                "Pruning style-only entries under {} (using {} threads)",
                cfg.input.display(),
                num_threads
            );
            debug!("Config: extensions={:?}, ignore={:?}", cfg.extensions, cfg.ignore);

            let result = stylestrip_entries::run_style_entry_check(&cfg)?;
            debug!("Found {} removals", result.total_removals());

            let elapsed_ms = start.elapsed().as_millis();

            if result.total_removals() > 0 {
                stylestrip_entries::print_removals_tree(&mut stdout, &result, cfg.write)?;
            } else {
                info!("No style-only entries");
                stylestrip_entries::print_no_style_entries_message(&mut stdout, &result)?;
            }

            writeln!(
                stdout,
                "\n{} Finished in {}ms on {} manifests (using {} threads).",
                "●".bright_blue(),
                elapsed_ms.to_string().cyan(),
                result.manifests_analyzed().to_string().cyan(),
                num_threads.to_string().cyan()
            )?;
            stdout.flush()?;

            // Unreadable manifests fail the run
            if !result.failures.is_empty() {
                std::process::exit(1);
            }

            Ok(())
        }
    }
}
