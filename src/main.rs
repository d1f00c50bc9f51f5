use actix_web::{middleware, web, App, HttpServer};
use log::{error, info};
use std::sync::Arc;

use workon_server::config::{Config, StorageConfig};
use workon_server::db::{self, DocumentStore, MemoryStore, PgDocumentStore};
use workon_server::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let store: Arc<dyn DocumentStore> = match &config.storage {
        StorageConfig::Postgres(database) => {
            let pool = db::create_pool(database).await.map_err(|err| {
                error!("Failed to connect to the database: {}", err);
                std::io::Error::new(std::io::ErrorKind::Other, err)
            })?;
            let store = PgDocumentStore::new(pool);
            store.migrate().await.map_err(|err| {
                error!("Failed to apply migrations: {}", err);
                std::io::Error::new(std::io::ErrorKind::Other, err)
            })?;
            Arc::new(store)
        }
        StorageConfig::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let store = web::Data::from(store);
    let employee_lookup = web::Data::new(config.employee_lookup);
    let (host, port) = config.bind_address();

    info!("Workon server is running on port {}", port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(store.clone())
            .app_data(employee_lookup.clone())
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
