use actix_web::{HttpResponse, Responder, post};

use super::models::NewWalletResponse;
use crate::wallet::generate_keypair_hex;

/// Dev helper: hand out a fresh key pair for manual testing.
#[post("/wallet/new/")]
pub async fn create_wallet() -> impl Responder {
    let (sk, pk) = generate_keypair_hex();
    HttpResponse::Ok().json(NewWalletResponse {
        private_key: sk,
        public_key: pk,
    })
}
