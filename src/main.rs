use std::env;
use std::str::FromStr;
use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use zlatarna::mailer::ResendMailer;
use zlatarna::state::AppState;
use zlatarna::{db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = run().await {
        eprintln!("Startup error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let db_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://./data/zlatarna.db".to_string());
    db::ensure_sqlite_dir(&db_url)?;

    let connect_options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;

    db::run_migrations(&pool).await?;
    db::seed_gallery(&pool).await?;

    let admin_token = env::var("ADMIN_TOKEN").unwrap_or_default();
    if admin_token.trim().is_empty() {
        log::warn!("ADMIN_TOKEN not set. The admin API is disabled.");
    }
    let contact_email =
        env::var("CONTACT_EMAIL").unwrap_or_else(|_| "info@zlatarna-popovic.ba".to_string());

    let state = AppState {
        db: pool.clone(),
        mailer: Arc::new(ResendMailer::from_env()),
        contact_email,
        admin_token,
    };

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8080);

    let address = format!("0.0.0.0:{port}");
    log::info!("Starting Zlatarna on http://{address}");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .configure(routes::public::configure)
            .configure(routes::admin::configure)
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
