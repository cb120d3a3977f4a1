//! Demo upstream server for local runs.
//!
//! Serves a `/health` endpoint for the monitor and echoes request details
//! as JSON everywhere else, so the proxy's annotation is easy to see.

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, Uri},
    routing::get,
    Json, Router,
};
use clap::Parser;
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(name = "mock-backend", about = "Demo upstream server")]
struct Args {
    /// Port to listen on (binds 0.0.0.0).
    #[arg(default_value_t = 9001)]
    port: u16,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let port = args.port;

    let app = Router::new()
        .route("/health", get(health))
        .fallback(echo)
        .with_state(port);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    println!("Mock backend listening on http://{}", addr);
    axum::serve(listener, app).await.unwrap();
}

async fn health(State(port): State<u16>) -> Json<Value> {
    Json(json!({ "status": "healthy", "port": port }))
}

async fn echo(State(port): State<u16>, method: Method, uri: Uri, body: Bytes) -> Json<Value> {
    Json(json!({
        "message": "Hello from backend",
        "port": port,
        "path": uri.path(),
        "method": method.as_str(),
        "body_size": body.len(),
    }))
}
