use actix_web::{App, HttpServer, middleware, web};
use std::sync::Arc;

use teastall::config::Config;
use teastall::review::ReviewServices;
use teastall::routes::{self, AppState};
use teastall::storage::blob_fs::{FsBlobStore, UPLOADS_MOUNT};
use teastall::storage::postgres::{PgAccountStore, PgDocumentStore};
use teastall::db;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().expect("Invalid configuration");

    let pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    if config.uses_default_admin_password() {
        log::warn!("ADMIN_PASSWORD not set, seeding '{}' with the default password", config.admin_username);
    }
    db::seed_admin(&pool, &config.admin_username, &config.admin_password)
        .await
        .expect("Failed to seed admin account");

    // Ensure upload directory exists
    std::fs::create_dir_all(&config.upload_dir).expect("Failed to create upload directory");

    let blobs = FsBlobStore::new(&config.upload_dir, &config.public_base_url);
    let state = web::Data::new(AppState {
        reviews: ReviewServices::new(
            Arc::new(PgDocumentStore::new(pool.clone())),
            Arc::new(blobs),
            &config.share_base_url,
        ),
        accounts: Arc::new(PgAccountStore::new(pool.clone())),
        app_name: config.app_name.clone(),
    });

    let secret_key = routes::session_key(config.session_key.as_deref());
    let upload_dir = config.upload_dir.clone();
    let cookie_secure = config.cookie_secure;

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(routes::session_middleware(secret_key.clone(), cookie_secure))
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            // Static files and uploaded photos
            .service(actix_files::Files::new("/static", "./static"))
            .service(actix_files::Files::new(UPLOADS_MOUNT, upload_dir.clone()))
            .configure(routes::configure)
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                let html = include_str!("../templates/errors/404.html");
                actix_web::HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
