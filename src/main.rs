use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use custompages::{auth, config::AppConfig, db, handlers, mail};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env();

    let pool = db::init_pool(&config.database_url)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to connect to database: {e}")))?;
    db::run_migrations(&pool)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to run migrations: {e}")))?;

    let mailer = mail::backend_from_config(&config.mail)
        .map_err(|e| std::io::Error::other(format!("Failed to set up mail: {e}")))?;
    let mailer = web::Data::new(mailer);

    std::fs::create_dir_all(&config.files_dir)?;

    // Session encryption key — load from SESSION_KEY for persistent sessions across restarts
    let secret_key = match &config.session_key {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let bind_addr = config.bind_addr.clone();
    let config = web::Data::new(config);

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(config.clone())
            .app_data(mailer.clone())
            // Static files
            .service(actix_files::Files::new("/static", "./static"))
            // Admin routes — /pages/admin/new and /settings BEFORE /pages/admin/{id}
            .service(
                web::scope("/pages/admin")
                    .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                    .route("", web::get().to(handlers::admin_handlers::list))
                    .route("", web::post().to(handlers::admin_handlers::create))
                    .route("/new", web::get().to(handlers::admin_handlers::new_form))
                    .route("/settings", web::get().to(handlers::settings_handlers::list))
                    .route("/settings", web::post().to(handlers::settings_handlers::save))
                    .route("/{id}/edit", web::get().to(handlers::admin_handlers::edit_form))
                    .route("/{id}", web::post().to(handlers::admin_handlers::update))
                    .route("/{id}/delete", web::post().to(handlers::admin_handlers::delete))
            )
            // Public routes
            .route("/pages/api/menu", web::get().to(handlers::page_handlers::menu_json))
            .route(
                "/pages/pluginfile/{context}/{filearea}/{args:.*}",
                web::get().to(handlers::file_handlers::serve),
            )
            .route("/pages/", web::get().to(handlers::page_handlers::view_by_id))
            .route("/pages/", web::post().to(handlers::page_handlers::view_by_id))
            .route("/pages/{slug}", web::get().to(handlers::page_handlers::view_by_slug))
            .route("/pages/{slug}", web::post().to(handlers::page_handlers::view_by_slug))
            // Root redirect
            .route("/", web::get().to(|| async {
                actix_web::HttpResponse::SeeOther()
                    .insert_header(("Location", "/pages/"))
                    .finish()
            }))
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                let html = include_str!("../templates/errors/404.html");
                actix_web::HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
