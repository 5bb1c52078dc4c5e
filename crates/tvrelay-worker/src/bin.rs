/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use tvrelay_utils::config::Settings;
use tvrelay_worker::cli::commands;
use tvrelay_worker::cli::{parse_cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let cli = parse_cli();

    let config = Settings::new(None)?;
    tvrelay_utils::logging::init(&config.log.level, &config.log.format)?;

    match cli.command {
        Commands::Start => commands::start(&config).await?,
        Commands::RunOnce => commands::run_once(&config).await?,
    }

    Ok(())
}
