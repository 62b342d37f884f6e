mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing::info;

use shoplist_api::{AppState, AppStateInner, build_router};
use shoplist_db::{CredentialStore, Database};

use crate::config::Config;

/// Shared shopping-list service and its admin tools.
#[derive(Parser)]
#[command(name = "shoplist")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database (overrides SHOPLIST_DB_PATH)
    #[arg(global = true, long)]
    db_path: Option<PathBuf>,

    /// Address to bind (overrides SHOPLIST_HOST)
    #[arg(global = true, long)]
    host: Option<String>,

    /// Port to bind (overrides SHOPLIST_PORT)
    #[arg(global = true, long)]
    port: Option<u16>,

    /// Random bits per issued token (overrides SHOPLIST_TOKEN_BITS)
    #[arg(global = true, long)]
    token_bits: Option<u32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service (default)
    Serve,

    /// Create a user with no token; prints the new user id
    CreateUser {
        /// Display name, at most 32 characters
        name: String,
    },

    /// Issue a fresh token, invalidating the previous one; prints it once
    IssueToken {
        /// User id
        uid: i64,
    },

    /// Delete a user together with their entries
    DeleteUser {
        /// User id
        uid: i64,
    },

    /// List user ids and display names
    ListUsers,
}

impl Cli {
    fn config(&self) -> anyhow::Result<Config> {
        self.merge(Config::from_env()?)
    }

    /// Layers the command-line flags over `config` and validates the result.
    fn merge(&self, mut config: Config) -> anyhow::Result<Config> {
        if let Some(path) = &self.db_path {
            config.db_path = path.clone();
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(bits) = self.token_bits {
            config.token_bits = bits;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shoplist=debug,tower_http=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;

    let db = Arc::new(
        Database::open(&config.db_path)
            .with_context(|| format!("opening database {}", config.db_path.display()))?,
    );

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, db).await,
        Commands::CreateUser { name } => {
            let credentials = CredentialStore::new(db, config.token_bits)?;
            let id = credentials.create_user(&name)?;
            println!("{}", id);
            Ok(())
        }
        Commands::IssueToken { uid } => {
            let credentials = CredentialStore::new(db, config.token_bits)?;
            let token = credentials.issue_token(uid)?;
            // The only place a raw token is ever shown.
            println!("{}", token.as_str());
            Ok(())
        }
        Commands::DeleteUser { uid } => {
            let credentials = CredentialStore::new(db, config.token_bits)?;
            credentials.delete_by_id(uid)?;
            println!("deleted user {}", uid);
            Ok(())
        }
        Commands::ListUsers => {
            let credentials = CredentialStore::new(db, config.token_bits)?;
            for user in credentials.list_users()? {
                if let Some(id) = user.id() {
                    println!("{}\t{}", id, user.display_name);
                }
            }
            Ok(())
        }
    }
}

async fn serve(config: Config, db: Arc<Database>) -> anyhow::Result<()> {
    let state: AppState = Arc::new(AppStateInner::new(db, config.token_bits)?);

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Shoplist listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
