use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};
use std::time::Instant;

use super::error_response;
use super::models::{AppState, MessageResponse, NewTxRequest, PoolResponse};
use crate::transaction::Transaction;

/// Sign a transfer with the sender's key and submit it to the pool.
#[post("/transactions/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let t0 = Instant::now();
    let req = body.into_inner();

    if req.has_missing_fields() {
        warn!("POST /transactions/ - rejected: missing fields");
        return HttpResponse::BadRequest().body("missing required transaction fields");
    }

    let tx = match Transaction::new_signed(
        req.sender_public_key.trim(),
        req.sender_private_key.trim(),
        req.receiver_public_key.trim(),
        req.amount,
    ) {
        Ok(tx) => tx,
        Err(e) => {
            warn!("POST /transactions/ - signing failed: {e}");
            return error_response(&e);
        }
    };
    debug!(
        "POST /transactions/ - built transfer {} -> {} ({})",
        tx.from, tx.to, tx.amount
    );

    let submitted = state.chain().submit_transaction(tx);
    if let Err(e) = submitted {
        warn!("POST /transactions/ - rejected: {e}");
        return error_response(&e);
    }

    info!(
        "POST /transactions/ - accepted ({} ms)",
        t0.elapsed().as_millis()
    );
    HttpResponse::Created().json(MessageResponse {
        message: "Transaction added successfully".to_string(),
    })
}

/// List the transactions waiting for the next block.
#[get("/pool/")]
pub async fn get_pool(state: web::Data<AppState>) -> impl Responder {
    let transactions = state.chain().pool().to_vec();
    HttpResponse::Ok().json(PoolResponse {
        size: transactions.len(),
        transactions,
    })
}
