//! HTTP surface of the node.
//!
//! | Method | Path                          | Operation          |
//! |--------|-------------------------------|--------------------|
//! | GET    | `/api/v1/blockchain/list`     | list all blocks    |
//! | GET    | `/api/v1/blockchain/{index}`  | one block by index |
//! | POST   | `/api/v1/blockchain`          | append a block     |
//! | POST   | `/api/v1/genesis`             | create genesis     |
//! | GET    | `/api/v2/sys/info/isalive`    | liveness           |
//!
//! Chain endpoints answer with the same envelope, success or not.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{
        header::{ACCEPT, ACCEPT_ENCODING, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE},
        HeaderName, Method, StatusCode,
    },
    routing::{get, post},
    Json, Router,
};
use chain_core::{
    chain::{Chain, Genesis, MemStore},
    Block, ChainError, Payload,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, error, warn};

use crate::constants::{
    ROUTE_APPEND, ROUTE_BLOCK, ROUTE_GENESIS, ROUTE_IS_ALIVE, ROUTE_LIST, VERSION,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub name: String,
    pub chain: Chain<MemStore>,
}

/// Envelope returned by every chain endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ChainResponse {
    pub name: String,
    pub statuscode: String,
    pub status: String,
    pub message: String,
    pub blockchain: Vec<Block>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Alive {
    pub version: String,
    pub name: String,
}

type Reply = (StatusCode, Json<ChainResponse>);

fn reply(state: &AppState, code: StatusCode, message: impl Into<String>, blockchain: Vec<Block>) -> Reply {
    let status = if code.is_success() { "OK" } else { "KO" };
    let body = ChainResponse {
        name: state.name.clone(),
        statuscode: code.as_u16().to_string(),
        status: status.to_string(),
        message: message.into(),
        blockchain,
    };
    (code, Json(body))
}

fn status_for(err: &ChainError) -> StatusCode {
    match err {
        ChainError::Validation => StatusCode::BAD_REQUEST,
        ChainError::Integrity { .. } => StatusCode::CONFLICT,
        ChainError::NotFound { .. } => StatusCode::NOT_FOUND,
        ChainError::EmptyChain => StatusCode::CONFLICT,
        ChainError::SwapRefused { .. } => StatusCode::CONFLICT,
        ChainError::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error reply carrying whatever chain can still be read.
fn failure(state: &AppState, err: ChainError) -> Reply {
    let code = status_for(&err);
    if err.is_client_error() {
        warn!(error = %err, "request rejected");
    } else {
        error!(error = %err, "chain store failure");
    }
    let blocks = state
        .chain
        .blocks()
        .map(|b| b.to_vec())
        .unwrap_or_default();
    reply(state, code, err.to_string(), blocks)
}

pub(crate) fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::POST,
            Method::GET,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            CONTENT_LENGTH,
            ACCEPT_ENCODING,
            HeaderName::from_static("x-csrf-token"),
            AUTHORIZATION,
        ])
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route(ROUTE_LIST, get(list_blocks))
        .route(ROUTE_BLOCK, get(get_block))
        .route(ROUTE_APPEND, post(append_block))
        .route(ROUTE_GENESIS, post(init_genesis))
        .route(ROUTE_IS_ALIVE, get(is_alive))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn list_blocks(State(state): State<AppState>) -> Reply {
    match state.chain.blocks() {
        Ok(blocks) => {
            debug!(len = blocks.len(), "list blocks");
            reply(
                &state,
                StatusCode::OK,
                "Blockchain list processed successfully",
                blocks.to_vec(),
            )
        }
        Err(e) => failure(&state, e),
    }
}

async fn get_block(State(state): State<AppState>, Path(index): Path<String>) -> Reply {
    let Ok(index) = index.parse::<u64>() else {
        let blocks = state.chain.blocks().map(|b| b.to_vec()).unwrap_or_default();
        return reply(
            &state,
            StatusCode::BAD_REQUEST,
            format!("invalid block index {index:?}"),
            blocks,
        );
    };
    match state.chain.get(index) {
        Ok(block) => reply(
            &state,
            StatusCode::OK,
            "Blockchain list processed successfully",
            vec![block],
        ),
        Err(e) => failure(&state, e),
    }
}

async fn append_block(
    State(state): State<AppState>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Reply {
    let payload = match payload {
        Ok(Json(p)) => p,
        Err(rejection) => {
            warn!(error = %rejection, "could not parse payload");
            let blocks = state.chain.blocks().map(|b| b.to_vec()).unwrap_or_default();
            return reply(
                &state,
                StatusCode::BAD_REQUEST,
                format!("Could not unmarshal json input data: {}", rejection.body_text()),
                blocks,
            );
        }
    };
    match state.chain.append(&payload) {
        Ok(blocks) => reply(
            &state,
            StatusCode::OK,
            "Data processed successfully",
            blocks.to_vec(),
        ),
        Err(e) => failure(&state, e),
    }
}

async fn init_genesis(State(state): State<AppState>) -> Reply {
    match state.chain.ensure_genesis() {
        Ok(Genesis::Created(block)) => reply(
            &state,
            StatusCode::CREATED,
            "created genesis block",
            vec![block],
        ),
        Ok(Genesis::AlreadyExists) => {
            let blocks = state.chain.blocks().map(|b| b.to_vec()).unwrap_or_default();
            reply(&state, StatusCode::OK, "NOP genesis block created", blocks)
        }
        Err(e) => failure(&state, e),
    }
}

async fn is_alive(State(state): State<AppState>) -> Json<Alive> {
    Json(Alive {
        version: VERSION.to_string(),
        name: state.name.clone(),
    })
}
