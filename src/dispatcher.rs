//! Command dispatcher that routes parsed clap commands to their handlers.
//!
//! Each handler opens its own store handle from the resolved configuration,
//! so nothing holds a connection across commands.

mod analysis;
mod records;

use crate::cli::{AddCommands, Commands, DeleteCommands};
use crate::config::Config;
use crate::db;
use anyhow::Result;
use rusqlite::Connection;
use std::path::PathBuf;
use tracing::debug;

/// Resolved settings shared by every handler
pub struct AppContext {
    pub config: Config,
    pub json_output: bool,
}

impl AppContext {
    pub fn new(config: Config, json_output: bool) -> Self {
        Self {
            config,
            json_output,
        }
    }

    /// Create the database if needed and open it
    pub fn open_store(&self) -> Result<Connection> {
        let path = self.config.resolved_db_path()?;
        debug!("Using database {:?}", path);
        db::init_database(Some(path.clone()))?;
        db::open_db(Some(path))
    }

    pub fn archive_root(&self) -> Result<PathBuf> {
        self.config.resolved_archive_dir()
    }
}

/// Route a parsed command to its handler
pub fn dispatch_command(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::Add { action } => match action {
            AddCommands::Funds {
                file,
                date,
                no_archive,
            } => records::dispatch_add_funds(ctx, &file, date.as_deref(), no_archive),
            AddCommands::Assets {
                precious_metals,
                crypto,
                physical_gold,
                date,
                no_archive,
            } => records::dispatch_add_assets(
                ctx,
                [&precious_metals, &crypto, &physical_gold],
                date.as_deref(),
                no_archive,
            ),
        },
        Commands::Import { dir } => records::dispatch_import(ctx, &dir),
        Commands::Delete { action } => match action {
            DeleteCommands::Funds { date } => records::dispatch_delete_funds(ctx, &date),
            DeleteCommands::Assets { date } => records::dispatch_delete_assets(ctx, &date),
            DeleteCommands::Month { month } => records::dispatch_delete_month(ctx, &month),
        },
        Commands::Analyze { range, top } => analysis::dispatch_analyze(ctx, &range, top),
        Commands::Summary { range } => analysis::dispatch_summary(ctx, &range),
    }
}
