// src/api/handlers/mod.rs
mod health;
mod gym;
mod mirror;
pub mod ws;

use actix_web::HttpResponse;

use crate::errors::{GymError, WorkflowError};
use crate::models::ApiError;

pub use health::health_check;
pub use gym::{get_gym, start_challenge, upload_image, submit_description, reset, list_difficulties};
pub use mirror::{mirror, highlight};
pub use ws::{ws_handler, WsBroker};

/// Maps a rejected request to its HTTP status.
pub(crate) fn error_response(e: &GymError) -> HttpResponse {
    let body = ApiError { message: e.to_string() };
    match e {
        GymError::Workflow(WorkflowError::Busy | WorkflowError::StaleTicket) => HttpResponse::Conflict().json(body),
        GymError::Workflow(_)
        | GymError::Base64(_)
        | GymError::ImageDecode(_)
        | GymError::UnsupportedMediaType(_) => HttpResponse::BadRequest().json(body),
        _ => {
            log::error!("Request failed: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}
