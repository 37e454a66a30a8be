use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use people_service::{
    api::state::AppState,
    infrastructure::{database::mongo_context::MongoContext, mongodb::person_repository::MongoPersonRepository},
    routes::person_routes,
    utils::config::AppConfig,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mongo_context = match MongoContext::init(&config.database_url, &config.database_name).await {
        Ok(context) => context,
        Err(e) => {
            log::error!("Failed to connect to MongoDB: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(Arc::new(MongoPersonRepository::new(&mongo_context)));
    let base_path = config.base_path.clone();

    log::info!("Server running at http://{}{}", config.bind_address, base_path);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(app_state.clone()))
            .service(web::scope(&base_path).configure(person_routes))
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
