use actix_web::{HttpResponse, Responder, get, post, web};
use log::info;

use super::models::{AppState, ChainResponse, MineRequest, MineResponse, ValidateResponse};

/// Get the full chain. The snapshot is copied out under the lock so the
/// response cannot observe a later in-place mutation.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let resp = ChainResponse {
        length: ledger.len(),
        chain: ledger.chain.clone(),
    };
    HttpResponse::Ok().json(resp)
}

/// Validate the node's own chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let resp = ValidateResponse {
        valid: ledger.valid_chain(&ledger.chain),
        length: ledger.len(),
    };
    HttpResponse::Ok().json(resp)
}

/// Mine the pending queue into a new block, crediting `miner_address`
/// with the reward. The ledger lock is held for the whole pass, so a
/// consensus replacement can never interleave with an in-flight append.
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>, req: web::Json<MineRequest>) -> impl Responder {
    let miner_address = req.miner_address.trim().to_string();
    if miner_address.is_empty() {
        return HttpResponse::BadRequest().body("miner_address required");
    }

    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    match ledger.mine_pending_transactions(&miner_address) {
        Some(block) => {
            let resp = MineResponse {
                mined_index: block.index,
                hash: block.hash.clone(),
                nonce: block.nonce,
                transactions: block.transactions.len(),
            };
            info!(
                "MINER - block #{} sealed for {} ({} txs)",
                resp.mined_index,
                miner_address,
                resp.transactions
            );
            HttpResponse::Ok().json(resp)
        }
        None => HttpResponse::Ok().body("no pending transactions to mine"),
    }
}
