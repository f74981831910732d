//! Parser service: receives batches, cleans them and persists the result
//!
//! Each `Parse` call takes a permit from a semaphore sized by
//! `server.max_workers` and runs the pipeline on the blocking thread pool.
//! A failed call never touches the output files.

use crate::config::Config;
use crate::output::Sink;
use crate::pipeline::process_batch;
use crate::rpc::wire::{
    ParseRequest, ParseResponse, CODE_INTERNAL, CODE_INVALID_ARGUMENT, HEALTH_PATH, PARSE_PATH,
};
use crate::{HarvestError, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;

/// Shared state of the parser service
#[derive(Clone)]
pub struct ParserService {
    workers: Arc<Semaphore>,
    sink: Arc<Sink>,
}

impl ParserService {
    pub fn new(max_workers: usize, sink: Sink) -> Self {
        Self {
            workers: Arc::new(Semaphore::new(max_workers)),
            sink: Arc::new(sink),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.server.max_workers, Sink::from_config(&config.output))
    }

    /// Cleans and persists one batch, returning the number of rows written
    pub fn handle(&self, data: &str) -> Result<usize> {
        let table = process_batch(data)?;
        self.sink.persist(&table)?;
        Ok(table.len())
    }

    /// Builds the HTTP routes of the service
    pub fn router(self) -> Router {
        Router::new()
            .route(HEALTH_PATH, get(healthz))
            .route(PARSE_PATH, post(parse_handler))
            .with_state(self)
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn parse_handler(
    State(service): State<ParserService>,
    Json(request): Json<ParseRequest>,
) -> (StatusCode, Json<ParseResponse>) {
    tracing::info!("Processing request ({} bytes)", request.data.len());

    let permit = match service.workers.clone().acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => return internal_error(e.to_string()),
    };

    let worker = service.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        worker.handle(&request.data)
    })
    .await;

    match outcome {
        Ok(Ok(rows)) => {
            tracing::info!("Finished: {} rows persisted", rows);
            (StatusCode::OK, Json(ParseResponse::ok()))
        }
        Ok(Err(e)) => {
            tracing::error!("Failed: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(ParseResponse::failed(CODE_INVALID_ARGUMENT, e.to_string())),
            )
        }
        Err(e) => internal_error(e.to_string()),
    }
}

fn internal_error(detail: String) -> (StatusCode, Json<ParseResponse>) {
    tracing::error!("Failed: {}", detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ParseResponse::failed(CODE_INTERNAL, detail)),
    )
}

/// Serves the parser service on an already bound listener until it fails
pub async fn serve_on(listener: TcpListener, service: ParserService) -> Result<()> {
    axum::serve(listener, service.router()).await?;
    Ok(())
}

/// Binds `server.bind-host:rpc.port` and serves until the process is stopped
pub async fn serve(config: &Config) -> Result<()> {
    let addr = format!("{}:{}", config.server.bind_host, config.rpc.port);
    let listener = TcpListener::bind(&addr).await.map_err(HarvestError::Io)?;

    tracing::info!(
        "Parser service started, listening on {} ({} workers)",
        addr,
        config.server.max_workers
    );
    serve_on(listener, ParserService::from_config(config)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputConfig;
    use tempfile::TempDir;

    const BATCH: &str = r#"[{"Name":"A","UPC":"1","Product Type":"Books","Price (excl. tax)":"£10.00","Price (incl. tax)":"£12.00","Tax":"£2.00","Availability":"In stock (3 available)","Number of reviews":"5"}]"#;

    fn service_in(dir: &TempDir) -> (ParserService, OutputConfig) {
        let output = OutputConfig::in_dir(dir.path().to_str().unwrap());
        (ParserService::new(2, Sink::from_config(&output)), output)
    }

    #[test]
    fn test_handle_persists() {
        let dir = TempDir::new().unwrap();
        let (service, output) = service_in(&dir);

        assert_eq!(service.handle(BATCH).unwrap(), 1);
        assert!(std::path::Path::new(&output.csv_path).exists());
        assert!(std::path::Path::new(&output.json_path).exists());
    }

    #[test]
    fn test_handle_rejects_without_writing() {
        let dir = TempDir::new().unwrap();
        let (service, output) = service_in(&dir);

        let bad = BATCH.replace("\"Books\"", "\"Comics\"");
        assert!(matches!(
            service.handle(&bad),
            Err(HarvestError::Validation(_))
        ));
        assert!(!std::path::Path::new(&output.csv_path).exists());
    }
}
