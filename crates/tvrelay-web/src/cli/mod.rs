/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
/// TradingView relay web service
///
/// Receives TradingView webhooks, forwards them to Telegram and serves the
/// configuration API.
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve,

    /// Validate a render.yaml deployment descriptor
    CheckDescriptor {
        /// Path to the descriptor
        #[arg(long, default_value = "render.yaml")]
        path: PathBuf,
    },

    /// Give a webhook alert a new key, invalidating the old URL
    RotateWebhookKey {
        /// UUID of the alert
        #[arg(long)]
        id: Uuid,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
