use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{AppState, NewTxRequest, NewTxResponse, PendingResponse};
use crate::transaction::Transaction;

/// Submit a new transaction into the pending queue. A request missing any
/// of the four fields is rejected by deserialization (400) before any
/// state is touched; a sender outside the allow-list gets 403.
#[post("/transactions/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let tx = Transaction::new(&body.sender, &body.recipient, body.amount, &body.label);

    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    match ledger.add_transaction(tx) {
        Ok(()) => {
            info!(
                "TX - queued {} -> {} ({} Tamag), pending={}",
                body.sender,
                body.recipient,
                body.amount,
                ledger.pending_transactions.len()
            );
            HttpResponse::Created().json(NewTxResponse {
                queued: ledger.pending_transactions.len(),
            })
        }
        Err(msg) => {
            warn!("TX - rejected sender {}: {}", body.sender, msg);
            HttpResponse::Forbidden().body(msg)
        }
    }
}

/// List the current pending queue.
#[get("/transactions/pending/")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(PendingResponse {
        size: ledger.pending_transactions.len(),
        transactions: ledger.pending_transactions.clone(),
    })
}
