//! NOTAM board web service.
//!
//! Single-page HTTP app for recording GPS NOTAM advisories per UTC day and
//! plotting their footprints on a static map.

use anyhow::Result;
use axum::{
    extract::Extension,
    routing::get,
    Router,
};
use clap::Parser;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use notam_renderer::MapStyle;
use notam_web::{handlers, state::{AppConfig, AppState}};

#[derive(Parser, Debug)]
#[command(name = "notam-web")]
#[command(about = "GPS NOTAM board web server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "NOTAM_LISTEN")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "NOTAM_LOG_LEVEL")]
    log_level: String,

    /// Directory for per-day NOTAM YAML files
    #[arg(long, default_value = "static/data", env = "NOTAM_DATA_DIR")]
    data_dir: PathBuf,

    /// Directory for base maps and rendered plots
    #[arg(long, default_value = "static/images", env = "NOTAM_IMAGE_DIR")]
    image_dir: PathBuf,

    /// Base map style (basic, marble, etopo, shaded)
    #[arg(long, default_value = "shaded", env = "NOTAM_MAP_STYLE")]
    map_style: String,

    /// TrueType font used for plot labels
    #[arg(
        long,
        default_value = "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
        env = "NOTAM_FONT_PATH"
    )]
    font_path: PathBuf,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long, env = "TOKIO_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(args))?;
    Ok(())
}

async fn async_main(args: Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting NOTAM board server");

    let style: MapStyle = args.map_style.parse()?;
    let state = Arc::new(
        AppState::new(AppConfig {
            data_dir: args.data_dir,
            image_dir: args.image_dir,
            style,
            font_path: args.font_path,
        })
        .await?,
    );

    let app = Router::new()
        // The single NOTAM board page and its form actions
        .route("/", get(handlers::home_get).post(handlers::home_post))
        // Rendered plots and base maps
        .route("/images/:file", get(handlers::image_handler))
        // Health check
        .route("/health", get(handlers::health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = args.listen.parse()?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
