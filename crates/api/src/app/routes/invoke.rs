use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};

use crate::app::dto::{InvokeRequest, InvokeResponse};
use crate::app::errors;
use crate::app::services::AppServices;

pub async fn invoke(
    Extension(services): Extension<Arc<AppServices>>,
    Json(req): Json<InvokeRequest>,
) -> axum::response::Response {
    match services.dispatcher.invoke(&req.function, &req.args) {
        Ok(payload) => Json(InvokeResponse::from_payload(&payload)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn query(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.dispatcher.query() {
        Ok(payload) => Json(InvokeResponse::from_payload(&payload)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
