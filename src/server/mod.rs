pub mod routes;

use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde::Serialize;
use std::sync::Mutex;

use crate::{
    config::Config, error::EditorError, history::VersionHistory, replicate::ReplicateClient,
    search::SearchClient,
};

/// Shared per-process state. Clients are constructed once here and injected
/// into handlers; no handler builds its own upstream client.
pub struct AppState {
    pub config: Config,
    pub replicate: ReplicateClient,
    pub search: SearchClient,
    pub http: reqwest::Client,
    pub history: Mutex<VersionHistory>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            replicate: ReplicateClient::new(config.replicate.clone()),
            search: SearchClient::new(config.search.clone()),
            http: reqwest::Client::new(),
            history: Mutex::new(VersionHistory::new()),
            config,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl actix_web::ResponseError for EditorError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(EditorError::status_code(self))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let details = match self {
            EditorError::ContentPolicy(_) => {
                Some("Please try a different prompt or image region".to_string())
            }
            EditorError::Generation(detail) | EditorError::UpstreamFetch(detail) => {
                Some(detail.clone())
            }
            _ => None,
        };
        HttpResponse::build(actix_web::ResponseError::status_code(self)).json(ErrorBody {
            error: self.to_string(),
            details,
        })
    }
}

pub async fn run(config: Config) -> std::io::Result<()> {
    let port = config.port.unwrap_or(8080);
    let state = web::Data::new(AppState::new(config));

    log::info!("🌐 Listening on 0.0.0.0:{}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(routes::generate_image)
            .service(routes::edit_image)
            .service(routes::enhance_image)
            .service(routes::proxy_image)
            .service(routes::youtube_search)
            .service(routes::get_history)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
