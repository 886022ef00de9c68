use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use cc_coin::api::{self, AppState};
use cc_coin::config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    info!(
        "⛓️ Starting ledger API at http://{}:{} (difficulty={}, reward={})",
        config.host, config.port, config.difficulty, config.miner_reward
    );

    let state = web::Data::new(AppState::new(&config));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
