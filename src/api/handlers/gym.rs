// src/api/handlers/gym.rs
use actix_web::{web, HttpResponse, Result};

use super::error_response;
use crate::api::AppState;
use crate::assets::{Difficulty, ImageData};
use crate::models::{ChallengeRequest, DifficultyView, ImageUpload, SubmitRequest};
use crate::providers::StudioProvider;

pub async fn get_gym<P: StudioProvider + 'static>(state: web::Data<AppState<P>>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.gym.snapshot().await))
}

pub async fn start_challenge<P: StudioProvider + 'static>(
    state: web::Data<AppState<P>>,
    req: web::Json<ChallengeRequest>,
) -> Result<HttpResponse> {
    match state.gym.start_challenge(req.difficulty).await {
        Ok(snapshot) => Ok(HttpResponse::Ok().json(snapshot)),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn upload_image<P: StudioProvider + 'static>(
    state: web::Data<AppState<P>>,
    req: web::Json<ImageUpload>,
) -> Result<HttpResponse> {
    let upload = req.into_inner();
    let image = match ImageData::from_base64(&upload.image_base64, upload.mime_type) {
        Ok(image) => image,
        Err(e) => return Ok(error_response(&e)),
    };

    match state.gym.start_from_upload(image).await {
        Ok(snapshot) => Ok(HttpResponse::Ok().json(snapshot)),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn submit_description<P: StudioProvider + 'static>(
    state: web::Data<AppState<P>>,
    req: web::Json<SubmitRequest>,
) -> Result<HttpResponse> {
    match state.gym.submit_description(&req.description).await {
        Ok(snapshot) => Ok(HttpResponse::Ok().json(snapshot)),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn reset<P: StudioProvider + 'static>(state: web::Data<AppState<P>>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.gym.reset().await))
}

pub async fn list_difficulties() -> Result<HttpResponse> {
    let levels: Vec<DifficultyView> = Difficulty::ALL.into_iter().map(DifficultyView::from).collect();
    Ok(HttpResponse::Ok().json(levels))
}
