use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    response::IntoResponse,
};

use foodtrace_core::{EntityKind, ListingId};
use foodtrace_infra::LedgerError;

use crate::app::errors;
use crate::app::services::AppServices;

pub async fn everything(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.dispatcher.ledger().read_everything() {
        Ok(everything) => Json(everything).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn listing(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.dispatcher.ledger().get_listing(&ListingId::new(id)) {
        Ok(listing) => Json(listing).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn history(
    Extension(services): Extension<Arc<AppServices>>,
    Path(key): Path<String>,
) -> axum::response::Response {
    match services.dispatcher.ledger().history(&key) {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn history_of(
    Extension(services): Extension<Arc<AppServices>>,
    Path((kind, id)): Path<(String, String)>,
) -> axum::response::Response {
    let kind = match kind.parse::<EntityKind>() {
        Ok(kind) => kind,
        Err(e) => return errors::ledger_error_to_response(LedgerError::from(e)),
    };
    match services.dispatcher.ledger().history_of(kind, &id) {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
