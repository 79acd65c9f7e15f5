//! Config command handlers

use anyhow::Result;

use uidmark_core::Settings;

use super::Workspace;
use crate::output::{print_json, Output, OutputFormat};

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

/// Show current settings
pub fn show(workspace: &Workspace, output: &Output) -> Result<()> {
    let settings = workspace.load_settings()?;

    match output.format {
        OutputFormat::Json => print_json(&settings)?,
        OutputFormat::Quiet => println!("{}", settings.uid_key),
        OutputFormat::Human => {
            print_settings(&settings);
            println!();
            println!("Vault:         {}", workspace.vault_dir.display());
            println!("Settings file: {}", workspace.settings_path.display());
        }
    }

    Ok(())
}

fn print_settings(settings: &Settings) {
    let exclusions = settings.auto_generation_exclusions.join(", ");
    println!("Settings:");
    println!("  uid_key:                        {}", settings.uid_key);
    println!("  auto_generate_uid:              {}", settings.auto_generate_uid);
    println!(
        "  auto_generation_scope:          {}",
        settings.auto_generation_scope
    );
    println!(
        "  auto_generation_folder:         {}",
        or_unset(&settings.auto_generation_folder)
    );
    println!("  auto_generation_exclusions:     {}", or_unset(&exclusions));
    println!(
        "  folder_to_clear:                {}",
        or_unset(&settings.folder_to_clear)
    );
    println!(
        "  copy_format_string:             {}",
        settings.copy_format_string
    );
    println!(
        "  copy_format_string_missing_uid: {}",
        settings.copy_format_string_missing_uid
    );
}

/// Set a single setting and persist it
pub fn set(workspace: &Workspace, key: String, value: String, output: &Output) -> Result<()> {
    let mut settings = workspace.load_settings()?;
    settings.set(&key, &value)?;
    workspace.save_settings(&settings)?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}
