mod processing;

use crate::application::{AddressVerificationUseCase, CsvVerificationUseCase};
use crate::domain::error::PROCESSING_FAILED_MESSAGE;
use actix_cors::Cors;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{
    dev::Server, get, post, web, App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub use processing::ProcessingGuard;

/// Largest CSV body accepted by `/api/verify`
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const MAX_LOG_ENTRIES: usize = 100;

const ACCEPTED_CONTENT_TYPES: [&str; 3] = ["text/csv", "application/vnd.ms-excel", "text/plain"];

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub csv_use_case: Arc<CsvVerificationUseCase>,
    pub verifier: Arc<AddressVerificationUseCase>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
    pub processing: AtomicBool,
}

impl HttpState {
    pub fn new(
        csv_use_case: Arc<CsvVerificationUseCase>,
        verifier: Arc<AddressVerificationUseCase>,
    ) -> Self {
        Self {
            csv_use_case,
            verifier,
            logs: Arc::new(Mutex::new(Vec::new())),
            processing: AtomicBool::new(false),
        }
    }
}

#[derive(Deserialize)]
pub struct VerifyAddressRequest {
    pub address: String,
}

#[derive(Serialize, Deserialize)]
pub struct VerifyAddressResponse {
    pub verified_address: String,
}

#[derive(Serialize, Deserialize)]
pub struct StatusResponse {
    pub processing: bool,
}

/// Missing content type is accepted, as is any parameter such as `charset`.
fn is_csv_upload(req: &HttpRequest) -> bool {
    let Some(value) = req.headers().get(CONTENT_TYPE) else {
        return true;
    };
    let Ok(value) = value.to_str() else {
        return false;
    };
    let mime = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    ACCEPTED_CONTENT_TYPES.contains(&mime.as_str())
}

#[post("/verify")]
async fn verify_csv(
    data: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
) -> impl Responder {
    if !is_csv_upload(&req) {
        add_log(&data.logs, "WARN", "HttpApi", "Rejected non-CSV upload");
        return HttpResponse::UnsupportedMediaType().body("Only CSV files are accepted");
    }

    let Some(_guard) = ProcessingGuard::try_acquire(&data.processing) else {
        add_log(
            &data.logs,
            "WARN",
            "HttpApi",
            "Upload rejected: addresses are already being processed",
        );
        return HttpResponse::Conflict().body("Addresses are already being processed");
    };

    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Processing CSV upload ({} bytes)", body.len()),
    );

    match data.csv_use_case.process_bytes(&body).await {
        Ok(verified) => {
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!(
                    "Verified {} rows ({} lines returned)",
                    verified.row_count, verified.verified_count
                ),
            );
            HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", verified.file_name),
                ))
                .body(verified.content)
        }
        Err(_) => {
            add_log(&data.logs, "ERROR", "HttpApi", PROCESSING_FAILED_MESSAGE);
            HttpResponse::InternalServerError().body(PROCESSING_FAILED_MESSAGE)
        }
    }
}

#[post("/verify-address")]
async fn verify_address(
    data: web::Data<HttpState>,
    req: web::Json<VerifyAddressRequest>,
) -> impl Responder {
    add_log(&data.logs, "INFO", "HttpApi", "Verifying single address");

    match data.verifier.verify_address(&req.address).await {
        Ok(verified_address) => HttpResponse::Ok().json(VerifyAddressResponse { verified_address }),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Single address verification failed: {}", e),
            );
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

#[get("/status")]
async fn status(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(StatusResponse {
        processing: data.processing.load(Ordering::Acquire),
    })
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data.logs.lock().unwrap_or_else(|e| e.into_inner());
    HttpResponse::Ok().json(&*logs)
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    match level {
        "ERROR" => tracing::error!(source, "{}", message),
        "WARN" => tracing::warn!(source, "{}", message),
        _ => tracing::info!(source, "{}", message),
    }

    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(|e| e.into_inner());
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES)).service(
        web::scope("/api")
            .service(verify_csv)
            .service(verify_address)
            .service(status)
            .service(get_logs),
    );
}

pub fn start_server(state: HttpState, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
