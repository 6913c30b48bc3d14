//! Host process: serves the image client with server-side rendering.

mod config;
mod routes;

use leptos::prelude::get_configuration;

use crate::config::Config;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("invalid configuration");
    let leptos = get_configuration(None).expect("leptos configuration").leptos_options;

    let app = routes::app(leptos);
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "imagelens listening");
    axum::serve(listener, app).await.expect("server failed");
}
