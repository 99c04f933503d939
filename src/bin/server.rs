use std::{
    env::{self},
    fs::OpenOptions,
    net::SocketAddr,
    path::PathBuf,
    process::exit,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use wedding_gallery::{
    AppState, GalleryConfig, LocalObjectStorage, SessionConfig, build_router, graceful_shutdown,
    logging_middleware,
};

/// The web server for the wedding photo gallery.
///
/// The server speaks plain HTTP. Put it behind a reverse proxy that
/// terminates HTTPS, since browsers only send the session cookie over HTTPS
/// unless --insecure-cookies is given.
#[derive(Parser, Debug)]
#[command(version, about, long_about)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The folder that uploaded photos are written to and served from.
    #[arg(long, default_value = "media")]
    media_dir: PathBuf,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// How many photos from one upload are compressed and stored at once.
    #[arg(long, default_value_t = wedding_gallery::DEFAULT_MAX_CONCURRENT_UPLOADS)]
    max_concurrent_uploads: usize,

    /// Log the body of each request and response.
    #[arg(long)]
    log_bodies: bool,

    /// Let browsers send the session cookie over plain HTTP, for trying the
    /// server out on a local network without an HTTPS proxy.
    #[arg(long)]
    insecure_cookies: bool,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));

    let Ok(secret) = env::var("SECRET") else {
        tracing::error!("The environment variable 'SECRET' must be set");
        exit(1);
    };

    let conn = match Connection::open(&args.db_path) {
        Ok(conn) => conn,
        Err(error) => {
            tracing::error!("Could not open the database at {}: {error}", args.db_path);
            exit(1);
        }
    };

    let storage = match LocalObjectStorage::new(&args.media_dir) {
        Ok(storage) => storage,
        Err(error) => {
            tracing::error!("Could not use {:?} for media: {error}", args.media_dir);
            exit(1);
        }
    };

    let config = GalleryConfig::default().with_max_concurrent_uploads(args.max_concurrent_uploads);

    let mut sessions = SessionConfig::new(&secret);
    if args.insecure_cookies {
        tracing::warn!("Session cookies will be sent over plain HTTP");
        sessions = sessions.allow_insecure_cookies();
    }

    let state = match AppState::new(conn, sessions, Arc::new(storage), config) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not start the app: {error}");
            exit(1);
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let mut router = build_router(state, &args.media_dir);

    if args.log_bodies {
        router = router.layer(middleware::from_fn(logging_middleware));
    }

    let router = add_tracing_layer(router);

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped with an error: {error}");
        exit(1);
    }
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they are handled.
        .on_failure(());

    router.layer(tracing_layer)
}
