// src/api/handlers/mirror.rs
use actix_web::{web, HttpResponse, Result};

use super::error_response;
use crate::api::AppState;
use crate::assets::ImageData;
use crate::highlight::render_block;
use crate::models::{HighlightRequest, HighlightResponse, ImageUpload, MirrorReport};
use crate::providers::StudioProvider;

/// Structured description of an uploaded image, with highlighted markup.
pub async fn mirror<P: StudioProvider + 'static>(
    state: web::Data<AppState<P>>,
    req: web::Json<ImageUpload>,
) -> Result<HttpResponse> {
    let upload = req.into_inner();
    let result = match ImageData::from_base64(&upload.image_base64, upload.mime_type) {
        Ok(image) => state.gym.mirror(&image).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(mirror) => Ok(HttpResponse::Ok().json(MirrorReport::from(mirror))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn highlight(req: web::Json<HighlightRequest>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(HighlightResponse {
        markup: render_block(&req.text),
    }))
}
