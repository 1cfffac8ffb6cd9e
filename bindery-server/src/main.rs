//! # Bindery Server
//!
//! Bookstore catalog server.
//!
//! ## Overview
//!
//! Bindery Server exposes the public storefront endpoints over the
//! catalog core:
//!
//! - **Home/dashboard**: catalog totals plus featured, new-arrival, and
//!   bestseller shelves
//! - **Listing/search**: available books, alphabetical, with optional
//!   free-text title search
//!
//! ## Architecture
//!
//! The server is built on Axum and uses PostgreSQL for persistent
//! storage; `--demo` boots against a seeded in-memory catalog instead.

use std::sync::Arc;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bindery_core::{
    Catalog, database::PostgresDatabase, demo::seed_demo_catalog,
};
use bindery_server::{
    build_router,
    infra::{app_state::AppState, config::Config},
};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "bindery-server")]
#[command(about = "Bookstore catalog server with storefront and admin tooling")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Serve a seeded in-memory catalog instead of PostgreSQL
    #[arg(long, env = "BINDERY_DEMO_MODE", default_value_t = false)]
    demo: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(Command::Db(DbCommand::Migrate)) = cli.command {
        run_db_migrate(&cli.serve).await?;
        return Ok(());
    }

    run_server(cli.serve).await
}

async fn run_db_migrate(args: &ServeArgs) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let url = config.require_database_url()?;
    let database = PostgresDatabase::connect(url)
        .await
        .context("failed to connect to PostgreSQL for migration")?;
    database.migrate().await.context("migration failed")?;
    info!("database migrations applied");
    Ok(())
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;

    let catalog = if args.demo {
        info!("demo mode: serving a seeded in-memory catalog");
        let catalog = Catalog::memory();
        seed_demo_catalog(&catalog)
            .await
            .context("failed to seed demo catalog")?;
        catalog
    } else {
        let url = config.require_database_url()?;
        let database = PostgresDatabase::connect(url)
            .await
            .context("failed to connect to PostgreSQL")?;
        if config.database.run_migrations {
            database.migrate().await.context("migration failed")?;
        }
        Catalog::postgres(database.pool().clone())
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(catalog, Arc::new(config));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "bindery server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

/// Config defaults and environment, with CLI flags applied on top.
fn load_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let mut config = Config::load().context("failed to load configuration")?;
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = &args.database_url {
        config.database.url = Some(url.clone());
    }
    Ok(config)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = ?err, "failed to listen for shutdown signal");
    }
}
