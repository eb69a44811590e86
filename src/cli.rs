use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::api;
use crate::application::FinanceService;

/// Fiscus - Personal Finance Tracker
#[derive(Parser)]
#[command(name = "fiscus")]
#[command(about = "A personal finance tracker REST backend")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "fiscus.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Run the HTTP API server
    Serve {
        /// Address to bind (host:port)
        #[arg(short, long, default_value = "127.0.0.1:3000")]
        bind: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                FinanceService::init(&self.database).await?;
                println!("Initialized database at {}", self.database);
                Ok(())
            }
            Commands::Serve { bind } => {
                let addr: SocketAddr = bind.parse().context("Invalid bind address")?;
                let service = FinanceService::init(&self.database).await?;
                api::run_server(Arc::new(service), addr).await
            }
        }
    }
}
