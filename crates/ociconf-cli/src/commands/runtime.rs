//! Runtime registration command implementations

use colored::Colorize;
use ociconf_core::RuntimeEntry;

use crate::commands::{Target, persist};
use crate::error::Result;

/// Run the add-runtime command
pub fn run_add_runtime(
    target: &Target,
    name: &str,
    binary_path: &str,
    set_as_default: bool,
    dry_run: bool,
) -> Result<()> {
    println!("{} Adding runtime: {}", "=>".blue().bold(), name.cyan());

    let mut registry = target.load()?;
    let before = registry.to_string();
    registry.add_runtime(name, binary_path, set_as_default)?;
    persist(&target.config, &before, registry.document(), dry_run)
}

/// Run the remove-runtime command
pub fn run_remove_runtime(target: &Target, name: &str, dry_run: bool) -> Result<()> {
    println!("{} Removing runtime: {}", "=>".blue().bold(), name.cyan());

    let mut registry = target.load()?;
    let before = registry.to_string();
    registry.remove_runtime(name)?;
    persist(&target.config, &before, registry.document(), dry_run)
}

/// Run the get-runtime command
///
/// Prints only the binary path so the output can be captured by scripts.
/// An unknown runtime prints an empty line.
pub fn run_get_runtime(target: &Target, name: &str, json: bool) -> Result<()> {
    let registry = target.load()?;
    let entry = registry.get_runtime_config(name)?;

    if json {
        let is_default = registry.default_runtime() == Some(name);
        let output = entry_json(&entry, is_default)?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", entry.binary_path());
    Ok(())
}

/// Run the list-runtimes command
pub fn run_list_runtimes(target: &Target, json: bool) -> Result<()> {
    let registry = target.load()?;
    let default = registry.default_runtime();
    let names = registry.runtime_names();

    if json {
        let mut runtimes = Vec::with_capacity(names.len());
        for name in &names {
            let entry = registry.get_runtime_config(name)?;
            runtimes.push(entry_json(&entry, default == Some(name.as_str()))?);
        }
        let output = serde_json::json!({
            "default_runtime": default,
            "runtimes": runtimes,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if names.is_empty() {
        println!("{}", "(no runtimes)".dimmed());
        return Ok(());
    }

    for name in &names {
        let entry = registry.get_runtime_config(name)?;
        let marker = if default == Some(name.as_str()) {
            "*".green().bold()
        } else {
            " ".normal()
        };
        println!("{} {:<16} {}", marker, name, entry.binary_path().dimmed());
    }
    Ok(())
}

/// JSON view of an entry with typed option values
fn entry_json(entry: &RuntimeEntry<'_>, is_default: bool) -> Result<serde_json::Value> {
    let options = serde_json::to_value(entry.options_table()?)?;

    Ok(serde_json::json!({
        "name": entry.name(),
        "exists": entry.exists(),
        "binary_path": entry.binary_path(),
        "runtime_type": entry.runtime_type(),
        "default": is_default,
        "options": options,
    }))
}
