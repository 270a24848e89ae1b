mod cors;

use std::sync::Arc;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use api_payments::gateway::{CheckoutGateway, StripeGateway};
use common::env_config::Config;
use notifier::mailer::{HttpMailer, Mailer};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.environment == "production";
    let origin = config.cors_allowed_origin.clone();

    // init logger
    if config.console_logging_enabled {
        logger::setup().expect("Failed to set up logger");
    }

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    // payment provider client
    let gateway: Arc<dyn CheckoutGateway> = Arc::new(StripeGateway::new(
        &config.stripe_secret_key,
        config.gateway_timeout_secs,
    ));

    // background worker for subscriber notifications
    let mailer: Arc<dyn Mailer> = Arc::new(HttpMailer::new(
        &config.mail_relay_url,
        &config.mail_from_address,
    ));
    tokio::spawn(notifier::worker::run(pool.clone(), mailer));

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(web::Data::new(gateway.clone()))
            .wrap(logger::middleware()) // 3rd
            .wrap(extractor::middleware()) // 2nd
            .wrap(cors::middleware(&origin)) // 1st
            .service(
                web::scope("/api")
                    .service(api_auth::mount_users())
                    .service(
                        web::scope("")
                            .wrap(extractor::auth_guard())
                            .service(api_materials::mount_courses())
                            .service(api_materials::mount_lessons())
                            .service(api_payments::mount_payments()),
                    ),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
