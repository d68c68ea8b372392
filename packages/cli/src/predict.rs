//! Prediction request tool.

use dialoguer::Input;
use wildguard_api::{AppConfig, Client, WeatherQuery};

/// Prompts for the prediction inputs, submits the request, and prints
/// the current prediction rows.
///
/// # Errors
///
/// Returns an error if either upstream call fails after retries.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Request prediction");
    println!();

    let taluka_type: String = Input::new().with_prompt("Taluka").interact_text()?;
    let crop_type: String = Input::new().with_prompt("Crop").interact_text()?;
    let tree_age: u32 = Input::new()
        .with_prompt("Tree age (years)")
        .default(5)
        .interact_text()?;
    let prediction_days: u32 = Input::new()
        .with_prompt("Prediction horizon (days)")
        .default(7)
        .interact_text()?;

    let config = AppConfig::load()?;
    let client = Client::new(&config)?;

    let query = WeatherQuery {
        taluka_type,
        crop_type,
        tree_age,
        prediction_days,
    };
    let response = client.request_prediction(&query).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    println!();
    println!("=== Current prediction rows ===");
    match client.predictions().await {
        Ok(rows) if rows.is_empty() => println!("(none)"),
        Ok(rows) => {
            println!(
                "{:<20} {:<15} {:<15} {:<10} {}",
                "Village", "Taluka", "Species", "Month", "Predicted crop"
            );
            for row in rows {
                println!(
                    "{:<20} {:<15} {:<15} {:<10} {}",
                    row.village, row.taluka, row.species, row.month, row.predicted_crop
                );
            }
        }
        Err(e) => log::error!("failed to list predictions: {e}"),
    }

    Ok(())
}
