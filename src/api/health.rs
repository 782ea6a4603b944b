use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, InfoResponse};

#[get("/health/")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("node is up and running 🦀")
}

/// Node constants: the allow-list, difficulty, reward and registered peers.
#[get("/info/")]
pub async fn get_info(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(InfoResponse {
        allowed_entities: ledger.allowed_entities.clone(),
        difficulty: ledger.difficulty,
        miner_reward: ledger.miner_reward,
        peers: ledger.nodes.iter().cloned().collect(),
    })
}
