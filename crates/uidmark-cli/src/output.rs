//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use anyhow::{Context, Result};
use serde::Serialize;

use uidmark_core::{ClearReport, ScanReport, UidInfo};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a note's UID details
    pub fn print_uid(&self, info: &UidInfo) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("{:<8}{}", "Note:", info.path);
                println!("{:<8}{}", "Title:", info.title);
                println!(
                    "{:<8}{}",
                    format!("{}:", info.key),
                    info.uid.as_deref().unwrap_or("(none)")
                );
            }
            OutputFormat::Json => print_json(info)?,
            OutputFormat::Quiet => {
                if let Some(ref uid) = info.uid {
                    println!("{}", uid);
                }
            }
        }
        Ok(())
    }

    /// Print the tally of a bulk scan
    pub fn print_scan_report(&self, report: &ScanReport, key: &str) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("Scanned {} note(s)", report.total);
                println!("  {:<18}{}", "added:", report.added);
                println!(
                    "  {:<18}{}",
                    format!("already had {}:", key),
                    report.skipped_existing
                );
                println!("  {:<18}{}", "out of scope:", report.skipped_scope);
                if report.errors > 0 {
                    println!("  {:<18}{}", "errors:", report.errors);
                }
            }
            OutputFormat::Json => print_json(report)?,
            OutputFormat::Quiet => println!("{}", report.added),
        }
        Ok(())
    }

    /// Print the tally of a folder clear
    pub fn print_clear_report(&self, report: &ClearReport, folder: &str) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("Cleared \"{}\" ({} note(s))", folder, report.total);
                println!("  removed:   {}", report.cleared);
                println!("  unchanged: {}", report.unchanged);
                if report.errors > 0 {
                    println!("  errors:    {}", report.errors);
                }
            }
            OutputFormat::Json => print_json(report)?,
            OutputFormat::Quiet => println!("{}", report.cleared),
        }
        Ok(())
    }

    /// Print text produced by a copy command instead of using the clipboard
    pub fn print_copied(&self, text: &str) -> Result<()> {
        match self.format {
            OutputFormat::Json => print_json(&serde_json::json!({ "text": text }))?,
            OutputFormat::Human | OutputFormat::Quiet => println!("{}", text),
        }
        Ok(())
    }

    /// Print a list of folder paths
    pub fn print_folders(&self, folders: &[String]) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                if folders.is_empty() {
                    println!("No excluded folders.");
                    return Ok(());
                }
                for folder in folders {
                    println!("{}", folder);
                }
                println!("\n{} folder(s)", folders.len());
            }
            OutputFormat::Json => print_json(folders)?,
            OutputFormat::Quiet => {
                for folder in folders {
                    println!("{}", folder);
                }
            }
        }
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Pretty-print any serializable value as JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
