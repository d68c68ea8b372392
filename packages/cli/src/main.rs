#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive CLI orchestrator for the wildguard toolchain.
//!
//! Provides a unified entry point that lets users interactively select
//! which tool to run (terminal dashboard report, API server, spreadsheet
//! upload, prediction request) and guides them through the configuration
//! for each.
//!
//! Uses `indicatif-log-bridge` (via [`wildguard_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod predict;
mod report;
mod upload;

use dialoguer::Select;

/// Top-level tool selection for the wildguard toolchain.
enum Tool {
    Report,
    Server,
    Upload,
    Predict,
}

impl Tool {
    const ALL: &[Self] = &[Self::Report, Self::Server, Self::Upload, Self::Predict];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Report => "Dashboard report",
            Self::Server => "Start server",
            Self::Upload => "Upload spreadsheet",
            Self::Predict => "Request prediction",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = wildguard_cli_utils::init_logger();

    println!("WildGuard Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Report => report::run(&multi).await?,
        Tool::Server => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(wildguard_server::interactive::run())
            })
            .await??;
        }
        Tool::Upload => upload::run().await?,
        Tool::Predict => predict::run().await?,
    }

    Ok(())
}
