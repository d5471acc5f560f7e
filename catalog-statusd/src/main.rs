//! Development status tracker: a thin HTTP API over a single JSON file.
//!
//! This is the no-framework companion of the catalog UI. Saves are
//! fire-and-forget from the client's point of view: no auth, no retry, no
//! idempotency key, CORS fully open.

mod store;

use anyhow::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::PathBuf;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{info, warn};

use catalog_core::DevelopmentStatus;

use crate::store::StatusFile;

#[derive(Parser)]
#[clap(author, version, about = "File-backed development status tracker")]
struct Args {
    /// Port to listen on
    #[clap(short, long, default_value = "8990")]
    port: u16,

    /// Path to the status JSON file
    #[clap(short, long, default_value = "data/status-data.json")]
    data: PathBuf,
}

#[derive(Deserialize)]
struct SaveRequest {
    #[serde(rename = "itemId")]
    item_id: String,
    /// Absent and explicit null both clear the entry.
    #[serde(default)]
    status: Option<String>,
}

#[derive(Serialize)]
struct SaveResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<SavedData>,
}

#[derive(Serialize)]
struct SavedData {
    #[serde(rename = "itemId")]
    item_id: String,
    status: Option<String>,
}

fn failure(message: impl Into<String>) -> SaveResponse {
    SaveResponse {
        success: false,
        message: message.into(),
        data: None,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let file = StatusFile::new(&args.data);

    let addr = format!("127.0.0.1:{}", args.port);
    let server = Server::http(&addr)
        .map_err(|e| anyhow::anyhow!("Failed to start server on {}: {}", addr, e))?;

    println!("Status tracker listening on http://{}", addr);
    println!("  Data file: {:?}", file.path());
    println!("  Endpoints:");
    println!("    GET  /api/statuses  - all known statuses");
    println!("    POST /api/status    - save or clear one status");
    println!("  Press Ctrl+C to stop");

    for request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();
        info!(%method, url, "request");

        match (method, url.as_str()) {
            (Method::Options, _) => respond_empty(request, 200),
            (Method::Get, "/api/statuses") => serve_statuses(request, &file),
            (Method::Post, "/api/status") => save_status(request, &file),
            _ => respond_empty(request, 404),
        }
    }

    Ok(())
}

fn serve_statuses(request: Request, file: &StatusFile) {
    match file.statuses() {
        Ok(map) => respond_json(request, 200, &map),
        Err(err) => {
            warn!("failed to read status file: {err:#}");
            respond_json(request, 500, &failure("Erro ao ler dados"));
        }
    }
}

fn save_status(mut request: Request, file: &StatusFile) {
    let mut body = String::new();
    if request.as_reader().read_to_string(&mut body).is_err() {
        respond_json(request, 400, &failure("Dados inválidos"));
        return;
    }

    let Ok(save) = serde_json::from_str::<SaveRequest>(&body) else {
        respond_json(request, 400, &failure("Dados inválidos"));
        return;
    };

    // unknown status strings are rejected rather than persisted
    if let Some(status) = &save.status {
        if status.parse::<DevelopmentStatus>().is_err() {
            respond_json(request, 400, &failure(format!("Status desconhecido: {status}")));
            return;
        }
    }

    let updated_by = request
        .remote_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    match file.apply(&save.item_id, save.status.as_deref(), &updated_by) {
        Ok(_) => respond_json(
            request,
            200,
            &SaveResponse {
                success: true,
                message: "Status salvo com sucesso".to_string(),
                data: Some(SavedData {
                    item_id: save.item_id,
                    status: save.status,
                }),
            },
        ),
        Err(err) => {
            warn!("failed to write status file: {err:#}");
            respond_json(request, 500, &failure("Erro ao salvar dados"));
        }
    }
}

fn cors_headers() -> Vec<Header> {
    vec![
        Header::from_bytes("Access-Control-Allow-Origin", "*").unwrap(),
        Header::from_bytes("Access-Control-Allow-Methods", "GET, POST, OPTIONS").unwrap(),
        Header::from_bytes("Access-Control-Allow-Headers", "Content-Type").unwrap(),
    ]
}

fn respond_empty(request: Request, status: u16) {
    let mut response = Response::empty(status);
    for header in cors_headers() {
        response = response.with_header(header);
    }
    let _ = request.respond(response);
}

fn respond_json<S: serde::Serialize>(request: Request, status: u16, body: &S) {
    let body = serde_json::to_string_pretty(body).unwrap_or_else(|_| "{}".to_string());
    let mut response = Response::from_string(body)
        .with_status_code(status)
        .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
    for header in cors_headers() {
        response = response.with_header(header);
    }
    let _ = request.respond(response);
}
