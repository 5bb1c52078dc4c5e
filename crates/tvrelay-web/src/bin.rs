/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! TradingView relay web service entry point.

use tvrelay_utils::config::Settings;
use tvrelay_web::cli::{commands, parse_cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let cli = parse_cli();

    let config = Settings::new(None)?;
    tvrelay_utils::logging::init(&config.log.level, &config.log.format)?;

    match cli.command {
        Commands::Serve => commands::serve(&config).await?,
        Commands::CheckDescriptor { path } => commands::check_descriptor(&path)?,
        Commands::RotateWebhookKey { id } => commands::rotate_webhook_key(&config, id)?,
    }
    Ok(())
}
