use axum::{
    Router,
    routing::{get, post},
};

pub mod invoke;
pub mod records;
pub mod system;

/// Router for ledger endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/invoke", post(invoke::invoke))
        .route("/query", post(invoke::query))
        .route("/everything", get(records::everything))
        .route("/listings/:id", get(records::listing))
        .route("/history/:key", get(records::history))
        .route("/history/:kind/:id", get(records::history_of))
}
