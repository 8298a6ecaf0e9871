mod handlers;
mod state;
mod view;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::config::AppConfig;

pub use state::AppState;
pub use view::{render_instance, render_page};

/// Register page, chart and JSON API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Static files
        .route("/", web::get().to(handlers::index))
        .route("/style.css", web::get().to(handlers::style_css))
        // Page actions
        .route("/instances/add", web::post().to(handlers::add_instance_form))
        .route("/instances/remove-last", web::post().to(handlers::remove_last_form))
        .route("/instances/{id}/params", web::post().to(handlers::update_params_form))
        .route("/instances/{id}/run", web::post().to(handlers::run_form))
        .route("/instances/{id}/chart.svg", web::get().to(handlers::chart_svg))
        // API routes
        .route("/api/instances", web::get().to(handlers::list_instances))
        .route("/api/instances", web::post().to(handlers::create_instance))
        .route("/api/instances/{id}", web::get().to(handlers::get_instance))
        .route("/api/instances/{id}", web::delete().to(handlers::delete_instance))
        .route("/api/instances/{id}/params", web::put().to(handlers::put_params))
        .route("/api/instances/{id}/run", web::post().to(handlers::run_instance));
}

pub async fn start_server(config: AppConfig) -> std::io::Result<()> {
    let source = Arc::new(config.endpoint.client());
    let data = web::Data::new(AppState::new(config.defaults, source));

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        endpoint = %config.endpoint.url,
        "starting adoption simulator web server"
    );
    println!(
        "Starting Adoption Simulator web server on http://{}:{}",
        config.server.host, config.server.port
    );

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allow_any_header()
            .max_age(3600);
        App::new()
            .wrap(cors)
            .wrap(TracingLogger::default())
            .app_data(data.clone())
            .configure(configure)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
