use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::rt::time;
use actix_web::{HttpResponse, Responder, post, web};
use log::{debug, error, info, warn};

use super::error_response;
use super::models::{AppState, MineRequest, MineResponse};
use crate::error::Error;

/// Holds the single mining slot; released on drop.
struct MiningSlot<'a>(&'a AtomicBool);

impl<'a> MiningSlot<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for MiningSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Stops the nonce search once the request is finished, timed out or dropped
/// by a disconnecting client.
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Mine the current pool into a new block paying the reward to the miner:
/// - Stage pool + reward under a short ledger lock
/// - Run the nonce search on the blocking pool, without the lock
/// - Re-lock and commit; transactions submitted meanwhile wait for the next block
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>, req: web::Json<MineRequest>) -> impl Responder {
    let miner = req.miner_public_key.trim().to_string();
    if miner.is_empty() {
        return HttpResponse::BadRequest().body("miner_public_key required");
    }

    let Some(_slot) = MiningSlot::acquire(&state.mining) else {
        warn!("MINER - request for {miner} refused: mining already in progress");
        return HttpResponse::Conflict().body("mining already in progress");
    };

    let (candidate, difficulty) = {
        let bc = state.chain();
        (bc.prepare_block(&miner), bc.difficulty())
    };
    debug!(
        "MINER - staged {} txs on top of {} (difficulty={})",
        candidate.transactions.len(),
        candidate.prev_hash,
        difficulty
    );

    let cancel = CancelOnDrop(Arc::new(AtomicBool::new(false)));
    let job = {
        let cancel = Arc::clone(&cancel.0);
        web::block(move || {
            let mut block = candidate;
            block.mine_cancellable(difficulty, &cancel).map(|()| block)
        })
    };

    let outcome = if state.mining_timeout.is_zero() {
        Ok(job.await)
    } else {
        time::timeout(state.mining_timeout, job).await
    };

    let block = match outcome {
        Err(_elapsed) => {
            drop(cancel);
            warn!(
                "MINER - nonce search exceeded {:?}, cancelled",
                state.mining_timeout
            );
            return HttpResponse::ServiceUnavailable().body("mining timed out");
        }
        Ok(Err(e)) => {
            error!("MINER - blocking task failed: {e}");
            return HttpResponse::InternalServerError().body("mining task failed");
        }
        Ok(Ok(Err(aborted))) => {
            warn!("MINER - {aborted}");
            return error_response(&Error::MiningFailed(aborted));
        }
        Ok(Ok(Ok(block))) => block,
    };

    let mut bc = state.chain();
    let mined_index = bc.len();
    let resp = match bc.commit_block(block) {
        Ok(b) => MineResponse {
            mined_index,
            hash: b.hash.clone(),
            nonce: b.nonce,
            difficulty,
            transactions: b.transactions.len(),
        },
        Err(e) => {
            warn!("MINER - block not committed: {e}");
            return error_response(&e);
        }
    };
    info!(
        "MINER - block #{} for {} (hash={}, nonce={})",
        resp.mined_index, miner, resp.hash, resp.nonce
    );
    HttpResponse::Created().json(resp)
}
