use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::header::CONTENT_TYPE,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use clap::Parser;
use dotenvy::dotenv;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub mod directory;
pub mod error;
pub mod handlers;
pub mod logging;

use directory::{Directory, SeedFile};
use error::ApiError;
use handlers::{allocation, config as weights, evaluations, health, listings};
use sasac_core::store::AllocationService;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "sasac-api",
    about = "HTTP API for the candidate selection and allocation engine"
)]
struct Cli {
    /// Server port
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Comma separated list of allowed CORS origins
    #[arg(long, env = "SASAC_CORS_ORIGINS", default_value = "http://localhost:3000")]
    cors_origins: String,

    /// JSON file with advisors, candidates, and weight entries loaded at boot
    #[arg(long, env = "SASAC_SEED_FILE")]
    seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub seed_file: Option<PathBuf>,
}

impl AppConfig {
    fn from_cli(cli: Cli) -> Result<Self, ApiError> {
        let cors_origins = cli
            .cors_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect::<Vec<_>>();

        if cors_origins.is_empty() {
            return Err(ApiError::BadRequest(
                "SASAC_CORS_ORIGINS must list at least one origin".into(),
            ));
        }

        Ok(Self {
            port: cli.port,
            cors_origins,
            seed_file: cli.seed_file,
        })
    }

    pub fn for_tests() -> Self {
        Self {
            port: 8080,
            cors_origins: vec!["http://localhost:3000".into()],
            seed_file: None,
        }
    }
}

pub struct AppState {
    pub directory: Directory,
    pub allocation: AllocationService,
    pub config: AppConfig,
}

pub type SharedState = Arc<AppState>;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
}

pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let api_routes = Router::new()
        .route("/allocation/run", post(allocation::run_allocation))
        .route("/allocation/latest", get(allocation::latest_result))
        .route("/allocation/breakdown", get(allocation::score_breakdown))
        .route(
            "/evaluations",
            post(evaluations::submit_evaluation).delete(evaluations::clear_evaluations),
        )
        .route(
            "/config",
            get(weights::get_weights).put(weights::update_weights),
        )
        .route("/advisors", get(listings::list_advisors))
        .route("/candidates", get(listings::list_candidates));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub fn test_state(seed: SeedFile) -> SharedState {
    Arc::new(AppState {
        directory: Directory::seeded(seed),
        allocation: AllocationService::new(),
        config: AppConfig::for_tests(),
    })
}

pub async fn run() -> Result<(), ApiError> {
    dotenv().ok();
    logging::init_tracing_subscriber("sasac-api");
    logging::install_tracing_panic_hook("sasac-api");

    let cli = Cli::parse();
    let config = AppConfig::from_cli(cli)?;

    let directory = match &config.seed_file {
        Some(path) => Directory::load(path)?,
        None => Directory::new(),
    };

    let state = Arc::new(AppState {
        directory,
        allocation: AllocationService::new(),
        config: config.clone(),
    });

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let app = create_router(state);

    info!(%addr, seed_file = ?config.seed_file, "sasac-api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
