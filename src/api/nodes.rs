use std::time::Duration;

use actix_web::{HttpResponse, Responder, get, post, web};
use futures_util::future::join_all;
use log::{debug, info, warn};

use super::models::{
    AppState, ChainSnapshot, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse,
};
use crate::blockchain::Block;

/// Per-peer budget for one chain fetch during consensus resolution.
const PEER_TIMEOUT: Duration = Duration::from_secs(3);

/// Register peer addresses. The set only grows; re-registering is a no-op.
#[post("/nodes/register/")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> impl Responder {
    if body.nodes.is_empty() {
        return HttpResponse::BadRequest().body("at least one node address required");
    }

    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    for address in &body.nodes {
        ledger.add_node(address);
    }
    info!("NODES - peer set now has {} entries", ledger.nodes.len());

    HttpResponse::Created().json(RegisterNodesResponse {
        nodes: ledger.nodes.iter().cloned().collect(),
    })
}

/// Longest-chain consensus: fetch every registered peer's chain
/// concurrently, then adopt the longest valid one if it is strictly
/// longer than ours. A peer that fails, times out or returns a malformed
/// snapshot is skipped; all peers are awaited before the decision.
#[get("/nodes/resolve/")]
pub async fn resolve_conflicts(state: web::Data<AppState>) -> impl Responder {
    let peers: Vec<String> = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.nodes.iter().cloned().collect()
    };

    let client = awc::Client::default();
    let fetches = peers.iter().map(|addr| fetch_peer_chain(&client, addr));
    let results = join_all(fetches).await;

    let mut candidates = Vec::new();
    for (addr, result) in peers.iter().zip(results) {
        match result {
            Ok(chain) => {
                debug!("CONSENSUS - peer {addr} offered a chain of length {}", chain.len());
                candidates.push(chain);
            }
            Err(err) => warn!("CONSENSUS - peer {addr} skipped: {err}"),
        }
    }

    let (replaced, length) = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        let replaced = ledger.resolve_conflicts(candidates);
        (replaced, ledger.len())
    };
    info!("CONSENSUS - replaced={replaced}, length={length}");

    HttpResponse::Ok().json(ResolveResponse { replaced, length })
}

/// Fetch one peer's chain snapshot with a bounded timeout and strict
/// deserialization.
async fn fetch_peer_chain(client: &awc::Client, address: &str) -> Result<Vec<Block>, String> {
    let url = format!("http://{address}/api/v1/chain/");

    let mut response = client
        .get(url.as_str())
        .timeout(PEER_TIMEOUT)
        .send()
        .await
        .map_err(|e| format!("request failed: {e}"))?;

    if !response.status().is_success() {
        return Err(format!("unexpected status {}", response.status()));
    }

    let snapshot: ChainSnapshot = response
        .json()
        .await
        .map_err(|e| format!("malformed snapshot: {e}"))?;

    if snapshot.length != snapshot.chain.len() {
        return Err(format!(
            "declared length {} does not match {} blocks",
            snapshot.length,
            snapshot.chain.len()
        ));
    }
    Ok(snapshot.chain)
}
