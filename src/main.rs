use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};

use prompt_gym::api::handlers::WsBroker;
use prompt_gym::api::{configure_routes, AppState};
use prompt_gym::banner;
use prompt_gym::config::AppConfig;
use prompt_gym::providers::gemini::GeminiStudio;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Print the startup banner
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  Warning: Could not load .env file: {}", e);
        eprintln!("   Make sure GEMINI_API_KEY is set in your environment");
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    let provider = GeminiStudio::new(reqwest::Client::new(), app_config.gemini.clone());
    let state = AppState::new(provider);

    let broker = WsBroker::new();
    broker.forward(state.gym.subscribe());

    log::info!("🚀 Starting server on {}", app_config.bind);
    log::info!("🧠 Text model: {}, image model: {}", app_config.gemini.text_model, app_config.gemini.image_model);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(broker.clone()))
            .app_data(web::JsonConfig::default().limit(20 * 1024 * 1024))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes::<GeminiStudio>)
    })
    .bind(app_config.bind.as_str())?
    .run()
    .await
}
