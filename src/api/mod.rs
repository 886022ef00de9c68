mod chain;
mod health;
mod mining;
pub mod models;
mod tx;
mod wallet;

use actix_web::HttpResponse;
use actix_web::web::{self, ServiceConfig};

use crate::error::{Error, MiningAborted};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::validate_chain)
            .service(mining::mine_block)
            .service(tx::post_transaction)
            .service(tx::get_pool)
            .service(wallet::create_wallet),
    );
}

/// Translate a ledger error into the response the caller sees.
fn error_response(err: &Error) -> HttpResponse {
    match err {
        Error::MalformedKeyOrSignature(_) => HttpResponse::BadRequest().body(err.to_string()),
        Error::UnauthorizedTransaction => HttpResponse::BadRequest().body("invalid transaction"),
        Error::MiningFailed(MiningAborted::Cancelled) => {
            HttpResponse::ServiceUnavailable().body("mining cancelled")
        }
        Error::MiningFailed(MiningAborted::InvalidTransactions) => {
            HttpResponse::BadRequest().body("mining failed: pool holds invalid transactions")
        }
        Error::StaleBlock { .. } => HttpResponse::Conflict().body(err.to_string()),
        Error::InvalidBlock(_) => HttpResponse::InternalServerError().body(err.to_string()),
    }
}
