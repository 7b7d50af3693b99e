// src/api/routes.rs
use actix_web::web;
use super::handlers;
use crate::providers::StudioProvider;

pub fn configure_routes<P: StudioProvider + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health_check))
            .route("/difficulties", web::get().to(handlers::list_difficulties))
            .route("/highlight", web::post().to(handlers::highlight))
            .route("/mirror", web::post().to(handlers::mirror::<P>))
            .route("/ws", web::get().to(handlers::ws_handler))
            .service(
                web::scope("/gym")
                    .route("", web::get().to(handlers::get_gym::<P>))
                    .route("/challenge", web::post().to(handlers::start_challenge::<P>))
                    .route("/upload", web::post().to(handlers::upload_image::<P>))
                    .route("/submit", web::post().to(handlers::submit_description::<P>))
                    .route("/reset", web::post().to(handlers::reset::<P>))
            )
    );
}
