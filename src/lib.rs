//! Documentation of the exam-registration intake service.
//!
//!
//!
//! # General Infrastructure
//! - Public frontend talks to this service over JSON
//! - Two surfaces: the public two-step form and the code-gated admin panel
//! - One Redis instance backs everything: submitted records, in-progress
//!   form sessions, admin sessions
//! - Containers talk to each other using internal names, only the service
//!   port is exposed
//!
//!
//!
//! # Intake Flow
//!
//! **Goal**: collect personal/contact data in two steps and only persist a
//! record once the person has seen and confirmed exactly what gets stored.
//!
//! - Step 1 posts the draft, the server validates and parks it
//! - Step 2 shows the parked draft back, confirm finalizes it
//! - Finalizing attaches the short share id and the epoch-millis timestamp,
//!   then appends the record
//! - On success the reply carries the chat invite link plus a 1.5s delay for
//!   the frontend to schedule the redirect
//! - On a store failure the parked draft stays put, confirm can be retried
//!
//!
//!
//! # Admin Panel
//!
//! - One authorization code, compared as-is, nothing fancier on purpose
//! - Valid code mints a session token, delivered as a session cookie
//! - Panel reads the full record set, newest first
//! - Live feed is server-sent events, each append pushes the complete
//!   current set rather than a diff
//! - Any single record exports as a one-page PDF
//!
//!
//!
//! # Setup
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
//!
//! Run against a local Redis.
//! ```sh
//! REDIS_URL=redis://127.0.0.1:6379 cargo run
//! ```
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod pdf;
pub mod routes;
pub mod state;
pub mod submission;
pub mod utils;
pub mod wizard;

use routes::{
    back_handler, confirm_handler, detail_handler, feed_handler, list_handler, login_handler,
    logout_handler, pdf_handler, submit_handler,
};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/form/submit", post(submit_handler))
        .route("/form/back", post(back_handler))
        .route("/form/confirm", post(confirm_handler))
        .route("/admin/login", post(login_handler))
        .route("/admin/logout", post(logout_handler))
        .route("/admin/submissions", get(list_handler))
        .route("/admin/submissions/feed", get(feed_handler))
        .route("/admin/submissions/{id}", get(detail_handler))
        .route("/admin/submissions/{id}/pdf", get(pdf_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
