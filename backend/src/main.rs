use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use invoice_backend::config::AppConfig;
use invoice_backend::context::AppContext;
use invoice_backend::services;
use log::{error, info};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config_path = AppConfig::path_from_env();
    let config = AppConfig::load_or_create(&config_path).map_err(|e| {
        error!("Error loading config: {}", e);
        io::Error::other(e)
    })?;

    let context = AppContext::from_config(&config).map_err(|e| {
        error!("Error loading data: {}", e);
        io::Error::other(e)
    })?;
    let context = web::Data::new(context);

    let host = config.server.host.clone();
    let port = config.server.port;
    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(context.clone())
            .configure(services::configure)
    })
        .bind((host.as_str(), port))?
        .run()
        .await
}
