use std::{
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use reimbursement_tracker::{
    AppState, MemberRegistry, StudentIdSync, build_router, get_local_offset, graceful_shutdown,
    load_roster, logging_middleware,
};

/// The web server for the reimbursement tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The address to serve the app from.
    #[arg(short, long, default_value = "127.0.0.1")]
    address: IpAddr,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical name of the timezone used for history dates, e.g. "Asia/Shanghai".
    #[arg(short, long, default_value = "Etc/UTC")]
    timezone: String,

    /// File path to a JSON file with the members to start with, see
    /// roster.example.json for the format. Starts with an empty roster if omitted.
    #[arg(short, long)]
    roster: Option<PathBuf>,

    /// When student ID edits made during a session are saved to the roster.
    #[arg(long, value_enum, default_value_t = StudentIdSync::WriteThrough)]
    student_id_sync: StudentIdSync,

    /// Log the body of every request and response.
    #[arg(long)]
    log_bodies: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    if get_local_offset(&args.timezone).is_none() {
        tracing::error!(
            "Invalid timezone \"{}\", use a canonical timezone name such as \"Asia/Shanghai\"",
            args.timezone
        );
        return ExitCode::FAILURE;
    }

    let registry = match &args.roster {
        Some(path) => match load_roster(path) {
            Ok(members) => {
                tracing::info!("Loaded {} member(s) from {}", members.len(), path.display());
                MemberRegistry::with_members(members)
            }
            Err(error) => {
                tracing::error!("{error}");
                return ExitCode::FAILURE;
            }
        },
        None => MemberRegistry::new(),
    };

    let addr = SocketAddr::from((args.address, args.port));
    let state = AppState::new(registry, args.student_id_sync, &args.timezone);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state);
    let router = if args.log_bodies {
        router.layer(middleware::from_fn(logging_middleware))
    } else {
        router
    };
    let router = add_tracing_layer(router);

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
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
        // Errors are logged by the handlers, so skip the default 5xx logging.
        .on_failure(());

    router.layer(tracing_layer)
}
