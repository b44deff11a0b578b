#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else)]

use crate::{
    config::RuntimeConfiguration,
    routes::{
        add_student::{get_add_student, internal_post_add_student},
        api::{
            delete_student, get_all_students, get_student, post_add_student, put_update_student,
        },
        dashboard::{
            get_dashboard, get_index_route, internal_delete_student, internal_get_confirm_delete,
            internal_get_students,
        },
        edit_student::{get_edit_student, internal_get_edit_form, internal_put_edit_student},
        internal_get_empty,
    },
    state::StudentsState,
};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod client;
mod config;
mod data;
mod error;
mod maud_conveniences;
mod routes;
mod service;
mod state;
mod store;

const MAX_BODY_BYTES: usize = 64 * 1024;

async fn shutdown_signal(state: StudentsState) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("signal received, starting graceful shutdown");
    state.sensible_shutdown().await;
}

fn api_routes() -> Router<StudentsState> {
    Router::new()
        .route("/api/students", get(get_all_students))
        .route("/api/students/", get(get_all_students))
        .route("/api/students/add", post(post_add_student))
        .route("/api/students/{id}", get(get_student))
        .route("/api/students/update/{id}", put(put_update_student))
        .route("/api/students/delete/{id}", delete(delete_student))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

fn ui_routes() -> Router<StudentsState> {
    Router::new()
        .route("/", get(get_index_route))
        .route("/dashboard", get(get_dashboard))
        .route("/add-student", get(get_add_student))
        .route("/edit-student/{id}", get(get_edit_student))
        .route("/internal/empty", get(internal_get_empty))
        .route(
            "/internal/students",
            get(internal_get_students).delete(internal_delete_student),
        )
        .route(
            "/internal/students/confirm_delete",
            get(internal_get_confirm_delete),
        )
        .route("/internal/students/add", post(internal_post_add_student))
        .route("/internal/students/edit_form", get(internal_get_edit_form))
        .route("/internal/students/edit", put(internal_put_edit_student))
        .layer(CompressionLayer::new())
}

fn app(state: StudentsState) -> Router {
    Router::new()
        .merge(api_routes())
        .merge(ui_routes())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        //a .env file is optional, everything can come from the real environment
        eprintln!("not loading .env file: {e}");
    }

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");

    let config = RuntimeConfiguration::new().expect("unable to create config");
    let state = StudentsState::new(config)
        .await
        .expect("unable to create state");

    let server_config = state.config().server_config();
    let listener = TcpListener::bind(&server_config.server_ip)
        .await
        .expect("unable to listen on server ip");

    info!(server_ip = ?server_config.server_ip, api = ?server_config.api_base_url, "Listening");
    axum::serve(listener, app(state.clone()))
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .expect("unable to serve app");
}
