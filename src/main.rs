//! # media-dedup CLI
//!
//! Command-line interface for the duplicate media mover.
//!
//! ## Usage
//! ```bash
//! media-dedup ~/Pictures
//! media-dedup ~/Pictures --dry-run --output json
//! ```

mod cli;

use console::style;
use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
