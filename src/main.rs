mod api;
mod config;
mod store;

use std::error::Error;
use std::sync::Arc;

use anyhow::Context;
use axum::body::Body;
use axum::extract::Request;
use clap::Parser;
use dotenvy::dotenv;
use sentry::integrations::tower::{NewSentryLayer, SentryHttpLayer};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::store::Store;
use crate::store::memory::MemStore;
use crate::store::sqlite::SqliteStore;

#[derive(Parser)]
#[command(name = "promptdeck", about = "Prompt library backend")]
enum Cli {
    /// Start the HTTP server (default when no subcommand is given)
    #[command(alias = "run")]
    Serve {
        /// Keep all data in process memory instead of SQLite (reset on restart)
        #[arg(long)]
        memory: bool,
        /// Skip seeding sample data into an empty store
        #[arg(long)]
        no_seed: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    // Default to Serve when no subcommand is given, but still allow
    // --help and --version to work.
    let args: Vec<String> = std::env::args().collect();
    let cli = if args.len() <= 1 {
        Cli::Serve {
            memory: false,
            no_seed: false,
        }
    } else {
        Cli::parse()
    };

    match cli {
        Cli::Serve { memory, no_seed } => run_server(memory, no_seed).await,
    }
}

async fn run_server(memory: bool, no_seed: bool) -> Result<(), Box<dyn Error>> {
    let config = config::Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("promptdeck=info,tower_http=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(false),
        )
        .with(sentry::integrations::tracing::layer().event_filter(
            |metadata| match *metadata.level() {
                tracing::Level::ERROR => sentry::integrations::tracing::EventFilter::Event,
                tracing::Level::WARN | tracing::Level::INFO => {
                    sentry::integrations::tracing::EventFilter::Breadcrumb
                }
                _ => sentry::integrations::tracing::EventFilter::Ignore,
            },
        ))
        .init();

    let _guard = sentry::init((
        config.sentry_dsn.clone().unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(config.environment.clone().into()),
            traces_sample_rate: 0.2,
            enable_logs: true,
            ..Default::default()
        },
    ));

    let store: Arc<dyn Store> = if memory {
        tracing::info!("using in-memory store (--memory); data is reset on restart");
        Arc::new(MemStore::new())
    } else {
        let db_path = match config.database_path.clone() {
            Some(path) => path,
            None => {
                let base_dir = dirs::home_dir()
                    .unwrap_or_else(|| std::path::PathBuf::from("."))
                    .join(".promptdeck");
                std::fs::create_dir_all(&base_dir).with_context(|| {
                    format!("failed to create data directory: {}", base_dir.display())
                })?;
                base_dir.join("promptdeck.db")
            }
        };
        tracing::info!(path = %db_path.display(), "opening database");
        Arc::new(SqliteStore::open(&db_path).context("failed to open database")?)
    };

    if !no_seed {
        store::seed::seed_initial_data(&store)
            .await
            .context("failed to seed initial data")?;
    }

    let static_dir = config.static_dir.clone().filter(|dir| {
        let exists = dir.is_dir();
        if !exists {
            tracing::warn!(path = %dir.display(), "static dir does not exist, not serving client");
        }
        exists
    });

    let app_state = api::AppState { store, static_dir };

    let app = api::build_router(app_state)
        .layer(SentryHttpLayer::new().enable_transaction())
        .layer(NewSentryLayer::<Request<Body>>::new_from_top());

    let port = config.port;
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("Listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
