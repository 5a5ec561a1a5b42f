//! Server runtime
//!
//! [`ServerHandle`] owns the whole process lifecycle: storage selection,
//! migrations, metrics recorder, the REST API listener and graceful
//! shutdown. The binary is a thin wrapper around it.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::{
    init_database, run_migrations, InMemoryStorage, SeaOrmRepositoryProvider,
};
use crate::interfaces::http::modules::health::HealthState;
use crate::interfaces::http::modules::metrics::MetricsState;
use crate::interfaces::http::{create_api_router, AppServices};
use crate::shared::shutdown::{listen_for_shutdown_signals, ShutdownSignal};
use crate::shared::SystemClock;

pub struct ServerOptions {
    pub config: AppConfig,
    /// Apply pending migrations on startup (default: true)
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

/// Handle to a running parking service.
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub config: AppConfig,
    /// Address the REST API is bound to
    pub local_addr: SocketAddr,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownSignal,
    api_task: tokio::task::JoinHandle<()>,
}

/// The global recorder can be installed once per process; later starts
/// reuse the first handle.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Metrics disabled, could not install recorder: {}", e);
                None
            }
        })
        .clone()
}

impl ServerHandle {
    /// Start the service:
    /// 1. install the Prometheus recorder
    /// 2. open the database (or the in-memory store) and migrate
    /// 3. bind and serve the REST API
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let config = opts.config;
        info!("Starting parking service...");

        let metrics_state = prometheus_handle().map(|handle| MetricsState { handle });

        let (repos, db): (Arc<dyn RepositoryProvider>, Option<DatabaseConnection>) =
            if config.database.is_memory() {
                warn!("Using the in-memory store, data is lost on shutdown");
                (Arc::new(InMemoryStorage::new()), None)
            } else {
                let db = init_database(&config.database_config()).await?;
                if opts.auto_migrate {
                    run_migrations(&db).await?;
                }
                (Arc::new(SeaOrmRepositoryProvider::new(db.clone())), Some(db))
            };

        let services = AppServices::new(repos.clone(), Arc::new(SystemClock), config.page_limits());
        let router = create_api_router(services, HealthState::new(db.clone()), metrics_state);

        let listener = tokio::net::TcpListener::bind(config.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let shutdown = ShutdownSignal::new();
        let api_shutdown = shutdown.clone();
        let api_task = tokio::spawn(async move {
            let served = axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    api_shutdown.wait().await;
                    info!("REST API received shutdown signal");
                })
                .await;
            if let Err(e) = served {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Trigger shutdown on SIGTERM / SIGINT.
    pub fn install_signal_handler(&self) {
        tokio::spawn(listen_for_shutdown_signals(self.shutdown.clone()));
    }

    /// Wait for the API task to drain, then close the pool.
    pub async fn wait(self) {
        match self.api_task.await {
            Ok(()) => info!("REST API server stopped"),
            Err(e) => error!("REST API server task panicked: {}", e),
        }

        if let Some(db) = self.db {
            match db.close().await {
                Ok(()) => info!("Database connection closed"),
                Err(e) => warn!("Error closing database connection: {}", e),
            }
        }
        info!("Parking service shutdown complete");
    }

    pub async fn shutdown(self) {
        self.shutdown.trigger();
        self.wait().await;
    }
}

/// Initialise `tracing` from the logging section. `RUST_LOG` wins over
/// `logging.level` when set.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
