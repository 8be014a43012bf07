//! # CLI Module
//!
//! Command-line interface for the duplicate media mover.
//!
//! ## Usage
//! ```bash
//! # Move duplicates under ~/Pictures into ~/Pictures/Duplicates
//! media-dedup ~/Pictures
//!
//! # See what would move, without moving anything
//! media-dedup ~/Pictures --dry-run
//!
//! # JSON report
//! media-dedup ~/Pictures --output json
//! ```
//!
//! ## Exit status
//! - 0: completed, nothing skipped
//! - 1: setup failed (bad root, quarantine folder not creatable)
//! - 2: completed, but some files were skipped

use clap::{Parser, ValueEnum};
use console::{style, Term};
use duplicate_media_mover::core::engine::{
    Deduplicator, RunReport, SkippedFile, DEFAULT_QUARANTINE_NAME,
};
use duplicate_media_mover::error::Result;
use duplicate_media_mover::events::{Event, EventChannel, FileEvent, ScanEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

/// Exit status when the run finished with nothing skipped
const EXIT_CLEAN: u8 = 0;

/// Exit status when the run finished but left some files untouched
const EXIT_SKIPPED: u8 = 2;

/// Duplicate Media Mover - quarantine duplicates instead of deleting them
#[derive(Parser, Debug)]
#[command(name = "media-dedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to deduplicate
    root: PathBuf,

    /// Name of the folder, created under the root, that receives duplicates
    #[arg(long, default_value = DEFAULT_QUARANTINE_NAME)]
    quarantine_name: String,

    /// Ignore hidden files and directories
    #[arg(long)]
    skip_hidden: bool,

    /// Follow symbolic links
    #[arg(long)]
    follow_symlinks: bool,

    /// ffmpeg executable used to read the first frame of videos
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,

    /// Report what would be moved without moving anything
    #[arg(long)]
    dry_run: bool,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON report for scripting
    Json,
    /// Quarantine destinations only
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    duplicate_media_mover::init_tracing(if cli.verbose { "debug" } else { "error" });

    let deduplicator = Deduplicator::builder()
        .root(cli.root.clone())
        .quarantine_name(cli.quarantine_name.clone())
        .include_hidden(!cli.skip_hidden)
        .follow_symlinks(cli.follow_symlinks)
        .ffmpeg(cli.ffmpeg.clone())
        .dry_run(cli.dry_run)
        .build();

    let report = match cli.output {
        OutputFormat::Pretty => run_pretty(&deduplicator)?,
        OutputFormat::Json => {
            let report = deduplicator.run()?;
            print_json_report(&report);
            print_skipped(&report);
            report
        }
        OutputFormat::Minimal => {
            let report = deduplicator.run()?;
            for relocation in &report.relocations {
                println!("{}", relocation.destination.display());
            }
            print_skipped(&report);
            report
        }
    };

    Ok(ExitCode::from(exit_status(&report)))
}

/// 0 when every file was kept or relocated, 2 when any file was skipped
fn exit_status(report: &RunReport) -> u8 {
    if report.is_clean() {
        EXIT_CLEAN
    } else {
        EXIT_SKIPPED
    }
}

/// One stderr line per skipped file; stdout stays machine-readable
fn print_skipped(report: &RunReport) {
    for skipped in &report.skipped {
        eprintln!("{}", skipped_line(skipped));
    }
}

fn skipped_line(skipped: &SkippedFile) -> String {
    format!(
        "skipped [{}] {}: {}",
        skipped.kind,
        skipped.path.display(),
        skipped.reason
    )
}

fn run_pretty(deduplicator: &Deduplicator) -> Result<RunReport> {
    let term = Term::stderr();
    term.write_line(&format!(
        "{} {}",
        style("Duplicate Media Mover").bold().cyan(),
        style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
    ))
    .ok();
    term.write_line("").ok();

    let dry_run = deduplicator.config().dry_run;
    let (sender, receiver) = EventChannel::new();

    let pb = ProgressBar::new(0);
    if let Ok(bar_style) =
        ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(bar_style.progress_chars("█▓░"));
    }
    let progress = pb.clone();

    // One line per relocation and per error, printed above the bar
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Scan(ScanEvent::Completed { total_files }) => {
                    progress.set_length(total_files as u64);
                }
                Event::Scan(ScanEvent::Error { path, message }) => {
                    progress.println(format!(
                        "{} {} ({})",
                        style("✗").red().bold(),
                        path.display(),
                        message
                    ));
                }
                Event::File(FileEvent::Progress(p)) => {
                    progress.set_position(p.completed as u64);
                    progress.set_message(
                        p.current_path
                            .file_name()
                            .unwrap_or_default()
                            .to_string_lossy()
                            .into_owned(),
                    );
                }
                Event::File(FileEvent::Relocated {
                    source,
                    destination,
                    ..
                }) => {
                    progress.println(format!(
                        "{} {} {} {}",
                        style(if dry_run { "would move" } else { "moved" }).yellow(),
                        source.display(),
                        style("→").dim(),
                        destination.display()
                    ));
                }
                Event::File(FileEvent::Skipped { path, kind, message }) => {
                    progress.println(format!(
                        "{} {} [{}] {}",
                        style("✗").red().bold(),
                        path.display(),
                        kind,
                        style(message).dim()
                    ));
                }
                _ => {}
            }
        }
        progress.finish_and_clear();
    });

    let result = deduplicator.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let report = result?;
    print_pretty_summary(&term, &report);
    Ok(report)
}

fn print_pretty_summary(term: &Term, report: &RunReport) {
    term.write_line("").ok();
    term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files scanned in {:.1}s",
        style(report.total_files).cyan(),
        report.duration_ms as f64 / 1000.0
    ))
    .ok();

    term.write_line(&format!(
        "  {} {} ({})",
        style(report.relocations.len()).cyan(),
        if report.dry_run {
            "duplicates would be moved"
        } else {
            "duplicates moved"
        },
        format_bytes(report.relocated_bytes())
    ))
    .ok();

    if !report.is_clean() {
        term.write_line(&format!(
            "  {} files skipped",
            style(report.skipped.len()).red()
        ))
        .ok();
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "{}",
        style(format!(
            "Nothing was deleted. Duplicates are in {}",
            report.quarantine_dir.display()
        ))
        .dim()
    ))
    .ok();
}

fn print_json_report(report: &RunReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize report: {}", e),
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use duplicate_media_mover::error::SkipKind;

    fn report(skipped: Vec<SkippedFile>) -> RunReport {
        RunReport {
            root: PathBuf::from("/photos"),
            quarantine_dir: PathBuf::from("/photos/Duplicates"),
            total_files: 3,
            canonical_count: 2,
            relocations: Vec::new(),
            skipped,
            dry_run: false,
            duration_ms: 1,
        }
    }

    fn decode_failure() -> SkippedFile {
        SkippedFile {
            path: PathBuf::from("/photos/broken.png"),
            kind: SkipKind::Decode,
            reason: "Image is empty or corrupted".to_string(),
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_engine() {
        let cli = Cli::try_parse_from(["media-dedup", "/photos"]).unwrap();
        assert_eq!(cli.quarantine_name, "Duplicates");
        assert!(!cli.skip_hidden);
        assert!(!cli.dry_run);
        assert_eq!(cli.ffmpeg, PathBuf::from("ffmpeg"));
    }

    #[test]
    fn root_is_required() {
        assert!(Cli::try_parse_from(["media-dedup"]).is_err());
    }

    #[test]
    fn clean_run_exits_zero() {
        assert_eq!(exit_status(&report(Vec::new())), 0);
    }

    #[test]
    fn skipped_files_exit_two() {
        assert_eq!(exit_status(&report(vec![decode_failure()])), 2);
    }

    #[test]
    fn skipped_line_names_kind_path_and_reason() {
        let line = skipped_line(&decode_failure());
        assert!(line.contains("[decode]"));
        assert!(line.contains("/photos/broken.png"));
        assert!(line.contains("empty or corrupted"));
    }

    #[test]
    fn format_bytes_picks_units() {
        assert_eq!(format_bytes(512), "512 bytes");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
