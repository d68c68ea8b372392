//! Spreadsheet upload tool.

use std::path::Path;

use dialoguer::{Confirm, Input};
use wildguard_api::{AppConfig, Client};

/// Prompts for a spreadsheet path and uploads it to the ingestion
/// endpoint.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the upload fails
/// after retries.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Upload spreadsheet");
    println!();

    let path: String = Input::new()
        .with_prompt("Path to spreadsheet (.xlsx/.xls/.csv)")
        .interact_text()?;
    let path = Path::new(&path);

    if !path.exists() {
        println!("No file at {}.", path.display());
        return Ok(());
    }

    if !Confirm::new()
        .with_prompt(format!("Upload {}?", path.display()))
        .default(true)
        .interact()
        .unwrap_or(false)
    {
        println!("Cancelled.");
        return Ok(());
    }

    let config = AppConfig::load()?;
    let client = Client::new(&config)?;

    let response = client.upload_spreadsheet(path).await?;
    log::info!("upload accepted");
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
