use common::clock::SystemClock;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use todo_service::config::Config;
use todo_service::models::Todo;
use todo_service::repositories::memory::{MemoryCollection, MemoryUserCollection};
use todo_service::repositories::postgres::{PgTodoCollection, PgUserCollection};
use todo_service::repositories::{DocumentCollection, UserCollection};
use todo_service::routes::{self, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; real deployments set the environment directly
    let _ = dotenvy::dotenv();

    init_tracing();

    info!("Starting todo service");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(config = ?config, "Configuration loaded successfully");

    let (users, todos): (Arc<dyn UserCollection>, Arc<dyn DocumentCollection<Todo>>) =
        match &config.database_url {
            Some(database_url) => {
                info!("Connecting to database...");
                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(database_url)
                    .await
                    .map_err(|e| {
                        error!("Failed to connect to database: {}", e);
                        e
                    })?;

                sqlx::migrate!("../../migrations")
                    .run(&pool)
                    .await
                    .map_err(|e| {
                        error!("Failed to run migrations: {}", e);
                        e
                    })?;

                info!("Database connection established");
                (
                    Arc::new(PgUserCollection::new(pool.clone())) as Arc<dyn UserCollection>,
                    Arc::new(PgTodoCollection::new(pool)) as Arc<dyn DocumentCollection<Todo>>,
                )
            }
            None => {
                warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
                (
                    Arc::new(MemoryUserCollection::new()) as Arc<dyn UserCollection>,
                    Arc::new(MemoryCollection::<Todo>::new()) as Arc<dyn DocumentCollection<Todo>>,
                )
            }
        };

    let state = Arc::new(
        AppState::new(&config.auth, Arc::new(SystemClock), users, todos).map_err(|e| {
            error!("Failed to initialize application state: {}", e);
            e
        })?,
    );

    let metrics_handle = routes::init_metrics_recorder().map_err(|e| {
        error!("{}", e);
        e
    })?;

    let app = routes::build_routes(state, metrics_handle);

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Todo service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Todo service shutdown complete");

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "todo_service=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
