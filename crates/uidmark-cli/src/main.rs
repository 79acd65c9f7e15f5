//! uidmark CLI
//!
//! Command-line interface for uidmark - unique identifiers in markdown front
//! matter.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod clipboard;
mod commands;
mod output;
mod prompt;
mod watcher;

use commands::Workspace;
use output::{Output, OutputFormat};

/// Environment variable pointing logs at a file instead of stderr
const LOG_FILE_ENV: &str = "UIDMARK_LOG_FILE";

#[derive(Parser)]
#[command(name = "uidmark")]
#[command(about = "uidmark - Unique identifiers for markdown notes")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Vault directory (defaults to UIDMARK_VAULT, then the current directory)
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    /// Settings file (defaults to <vault>/.uidmark/settings.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new UID, overwriting any existing one
    Generate {
        /// Note path, relative to the vault
        note: String,
    },
    /// Create a UID if the note has none
    Create {
        /// Note path, relative to the vault
        note: String,
    },
    /// Remove the note's UID
    #[command(alias = "rm")]
    Remove {
        /// Note path, relative to the vault
        note: String,
    },
    /// Show the note's UID
    Show {
        /// Note path, relative to the vault
        note: String,
    },
    /// Copy the note's UID to the clipboard
    Copy {
        /// Note path, relative to the vault
        note: String,
        /// Print instead of copying
        #[arg(short, long)]
        print: bool,
    },
    /// Copy the note's title and UID using the copy format
    CopyTitle {
        /// Note path, relative to the vault
        note: String,
        /// Print instead of copying
        #[arg(short, long)]
        print: bool,
    },
    /// Copy titles and UIDs for every note in a folder
    CopyFolder {
        /// Folder path, relative to the vault ("/" for the whole vault)
        folder: String,
        /// Print instead of copying
        #[arg(short, long)]
        print: bool,
    },
    /// Copy titles and UIDs for several notes
    CopySelection {
        /// Note paths, relative to the vault
        #[arg(required = true)]
        notes: Vec<String>,
        /// Print instead of copying
        #[arg(short, long)]
        print: bool,
    },
    /// Add UIDs to every note in scope that lacks one
    Scan,
    /// Remove UIDs from every note in a folder
    Clear {
        /// Folder path (defaults to the folder_to_clear setting)
        folder: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Watch the vault and assign UIDs to new notes
    Watch,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Manage folders excluded from automatic generation
    Exclusions {
        #[command(subcommand)]
        command: Option<ExclusionCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Setting key (uid_key, auto_generate_uid, auto_generation_scope, ...)
        key: String,
        /// Setting value
        value: String,
    },
}

#[derive(Subcommand)]
enum ExclusionCommands {
    /// List excluded folders
    #[command(alias = "ls")]
    List,
    /// Exclude a folder
    Add { folder: String },
    /// Stop excluding a folder
    #[command(alias = "rm")]
    Remove { folder: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let workspace = Workspace::resolve(cli.vault, cli.config, output.is_quiet())?;

    match cli.command {
        Commands::Generate { note } => commands::uid::generate(&workspace, note, &output),
        Commands::Create { note } => commands::uid::create(&workspace, note, &output),
        Commands::Remove { note } => commands::uid::remove(&workspace, note, &output),
        Commands::Show { note } => commands::uid::show(&workspace, note, &output),
        Commands::Copy { note, print } => commands::copy::uid(&workspace, note, print, &output),
        Commands::CopyTitle { note, print } => {
            commands::copy::title(&workspace, note, print, &output)
        }
        Commands::CopyFolder { folder, print } => {
            commands::copy::folder(&workspace, folder, print, &output)
        }
        Commands::CopySelection { notes, print } => {
            commands::copy::selection(&workspace, notes, print, &output)
        }
        Commands::Scan => commands::bulk::scan(&workspace, &output).await,
        Commands::Clear { folder, yes } => {
            commands::bulk::clear(&workspace, folder, yes, &output).await
        }
        Commands::Watch => commands::watch::run(&workspace, &output),
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => commands::config::show(&workspace, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(&workspace, key, value, &output)
            }
        },
        Commands::Exclusions { command } => match command {
            Some(ExclusionCommands::List) | None => {
                commands::exclusions::list(&workspace, &output)
            }
            Some(ExclusionCommands::Add { folder }) => {
                commands::exclusions::add(&workspace, folder, &output)
            }
            Some(ExclusionCommands::Remove { folder }) => {
                commands::exclusions::remove(&workspace, folder, &output)
            }
        },
    }
}

/// Initialize logging
///
/// RUST_LOG wins over -v. Logs go to stderr, or to UIDMARK_LOG_FILE if set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("uidmark_core={},uidmark_cli={}", level, level))
    });

    if let Ok(path) = std::env::var(LOG_FILE_ENV) {
        match File::create(&path) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(file)
                    .try_init();
                return;
            }
            Err(e) => eprintln!("Warning: Could not create log file {:?}: {}", path, e),
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_writer(std::io::stderr)
        .try_init();
}
