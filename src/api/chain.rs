use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, ChainResponse, ValidateResponse};

/// Get the full blockchain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.chain();
    let resp = ChainResponse {
        length: bc.len(),
        difficulty: bc.difficulty(),
        chain: bc.blocks(),
    };
    HttpResponse::Ok().json(resp)
}

/// Validate the whole chain under the ledger lock.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.chain();
    let tamper = bc.verify().err();
    HttpResponse::Ok().json(ValidateResponse {
        valid: tamper.is_none(),
        length: bc.len(),
        difficulty: bc.difficulty(),
        tamper,
    })
}
