//! CLI entry point for the contact cleanup pipeline.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tidy_processing::{
    CleaningDirective, CleanupConfig, CleanupReport, CleanupResult, Pipeline, load_sources,
    parse_instructions,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    author = "Tidy Contacts Team",
    version,
    about = "Instruction-driven contact table cleanup",
    long_about = "Clean, merge and deduplicate contact tables from a plain-English instruction.\n\n\
                  EXAMPLES:\n  \
                  # Default cleanup (dedup by email, fill missing with N/A)\n  \
                  tidy-processing -i contacts.csv\n\n  \
                  # Merge two files, dedup by phone and sort by name\n  \
                  tidy-processing -i a.csv b.csv -x \"dedup by phone and sort by name\"\n\n  \
                  # Preview what an instruction will do\n  \
                  tidy-processing -i a.csv -x \"fill missing with Unknown\" --dry-run"
)]
struct Args {
    /// CSV files to clean and merge, in merge order
    #[arg(short, long, num_args = 1.., required = true)]
    input: Vec<PathBuf>,

    /// Free-text cleaning instruction
    ///
    /// e.g. "Remove duplicate phones, sort by name and fill missing with Unknown"
    #[arg(short = 'x', long, default_value = "")]
    instruction: String,

    /// Output directory for results
    #[arg(short, long, default_value = "./outputs")]
    output: PathBuf,

    /// Base name (without extension) for output files
    #[arg(long, default_value = "cleaned_data")]
    output_name: String,

    /// Show the understood actions without processing
    #[arg(long)]
    dry_run: bool,

    /// Keep email values as they are
    #[arg(long)]
    no_email_normalization: bool,

    /// Keep phone values as they are
    #[arg(long)]
    no_phone_normalization: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <output_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let mut directive = parse_instructions(&args.instruction);
    if args.no_email_normalization {
        directive.normalize_email = false;
    }
    if args.no_phone_normalization {
        directive.normalize_phone = false;
    }

    if args.dry_run {
        run_dry_run(&args, &directive);
        return Ok(());
    }

    info!("Loading {} input file(s)", args.input.len());
    let tables = load_sources(&args.input)?;

    let config = CleanupConfig::builder()
        .output_dir(&args.output)
        .output_name(&args.output_name)
        .save_to_disk(true)
        .generate_reports(args.emit_report)
        .build()?;

    let mut builder = Pipeline::builder().config(config);
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }
    let pipeline = builder.build()?;

    let result = pipeline.process_with_directive(&tables, &args.instruction, directive)?;
    handle_pipeline_output(&result, &args)
}

/// Show what the instruction was understood as, without reading any input.
///
/// Uses `println!` intentionally: this output is the purpose of `--dry-run`
/// and must be visible regardless of log level.
fn run_dry_run(args: &Args, directive: &CleaningDirective) {
    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Preview of cleanup actions");
    println!("{}\n", "=".repeat(80));

    println!("INPUT FILES (merge order)");
    println!("{}", "-".repeat(40));
    for (i, path) in args.input.iter().enumerate() {
        let status = if path.is_file() { "" } else { " (not found)" };
        println!("  {}. {}{}", i + 1, path.display(), status);
    }
    println!();

    println!("HERE'S WHAT I UNDERSTOOD");
    println!("{}", "-".repeat(40));
    if args.instruction.trim().is_empty() {
        println!("  (no instruction given, using defaults)");
    }
    for (i, action) in directive.describe().iter().enumerate() {
        println!("  {}. {}", i + 1, action);
    }
    println!();

    println!("OUTPUT FILES (will be created)");
    println!("{}", "-".repeat(40));
    println!(
        "  - {}",
        args.output
            .join(format!("{}_Cleaned_Data.csv", args.output_name))
            .display()
    );
    println!(
        "  - {}",
        args.output
            .join(format!("{}_Summary.csv", args.output_name))
            .display()
    );
    if args.emit_report {
        println!(
            "  - {}",
            args.output
                .join(format!("{}_report.json", args.output_name))
                .display()
        );
    }
    println!();

    println!("{}", "=".repeat(80));
    println!("To execute this cleanup, run without --dry-run");
    println!("{}", "=".repeat(80));
}

/// Handle pipeline output based on CLI flags.
///
/// Output behavior:
/// - Default: Print human-readable summary to stdout
/// - `--json`: Print JSON to stdout only (no logs)
fn handle_pipeline_output(result: &CleanupResult, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.report)?);
        return Ok(());
    }

    print_human_readable_summary(&result.report);
    Ok(())
}

/// Print a human-readable summary of the cleanup results.
fn print_human_readable_summary(report: &CleanupReport) {
    let summary = &report.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANUP COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!("Input:");
    for table in &summary.tables {
        println!(
            "  {} ({} -> {} rows)",
            table.source, table.rows_in, table.rows_out
        );
    }
    if !report.output_files.is_empty() {
        println!("Output:");
        for file in &report.output_files {
            println!("  {}", file);
        }
    }
    println!();

    println!("What was done:");
    for action in &report.understood_actions {
        println!("  - {}", action);
    }
    println!();

    println!("Metrics:");
    for metric in report.metrics.iter() {
        println!("  {:<24} {}", metric.label, metric.value);
    }
    if let Some(count) = report.well_formed_emails {
        println!("  {:<24} {}", "Well-formed Emails", count);
    }
    println!();

    println!("Processing Summary:");
    println!("  Duration: {}ms", summary.duration_ms);
    println!(
        "  Rows: {} -> {} ({} removed, {:.1}%)",
        summary.rows_before,
        summary.rows_after,
        summary.rows_removed,
        summary.rows_removed_percentage()
    );
    println!("  Columns: {}", summary.columns_after);

    if !summary.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &summary.warnings {
            println!("  ! {}", warning);
        }
    }

    println!();
    println!("{}", "=".repeat(80));
}
