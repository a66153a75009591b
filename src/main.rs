use actix_web::{middleware, web, App, HttpServer};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use vibecheck::api::{self, AppState};
use vibecheck::config::Config;
use vibecheck::db::Database;
use vibecheck::scorer::Scorer;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::load().map_err(to_io)?;
    let scorer = Scorer::new(config.lexicon().map_err(to_io)?);

    // Initialize the database
    let db = Database::new(&config.database_path).map_err(to_io)?;
    db.create_schema().await.map_err(to_io)?; // Ensure the schema is created
    info!("Schema created successfully!");

    let state = web::Data::new(AppState {
        db,
        scorer,
        missing_business: config.missing_business,
    });

    let addr = config.address();
    info!(
        "listening on http://{} (missing business policy: {})",
        addr, config.missing_business
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(api::configure)
    })
    .bind(&addr)?
    .run()
    .await
}

fn to_io<E: std::fmt::Display>(err: E) -> std::io::Error {
    error!("Startup failed: {}", err);
    std::io::Error::other(err.to_string())
}
