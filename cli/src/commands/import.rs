use std::path::Path;
use std::process;

use anyhow::{Context, Result};

use super::Service;
use super::helpers::json_error;

pub fn cmd_import(svc: &Service, user: &str, path: &Path, dry_run: bool, json: bool) -> Result<()> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let summary = svc.import_csv(user, &data, dry_run)?;

    if summary.rows_parsed == 0 {
        if json {
            println!("{}", json_error("No rows found in CSV file"));
        } else {
            eprintln!("No rows found in CSV file.");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if dry_run {
        println!("Dry run - no changes made.\n");
        println!("  Rows parsed:      {}", summary.rows_parsed);
        println!("  Weigh-ins to add: {}", summary.samples_imported);
        println!("  Rows skipped:     {}", summary.skipped);
    } else {
        println!("Import complete.\n");
        println!("  Rows parsed:     {}", summary.rows_parsed);
        println!("  Weigh-ins added: {}", summary.samples_imported);
        println!("  Rows skipped:    {}", summary.skipped);
    }

    Ok(())
}
