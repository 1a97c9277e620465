use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use foodtrace_core::DomainError;
use foodtrace_infra::{LedgerError, StoreError};

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        LedgerError::Domain(domain) => match domain {
            DomainError::Validation(_) => {
                json_error(StatusCode::BAD_REQUEST, "validation_error", message)
            }
            DomainError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", message),
            DomainError::InvalidState(_) => {
                json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_state", message)
            }
            DomainError::InvalidRole(_) => {
                json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_role", message)
            }
            DomainError::InvariantViolation(_) => {
                json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", message)
            }
            DomainError::Conflict(_) => json_error(StatusCode::CONFLICT, "conflict", message),
        },
        LedgerError::Store(store) => match store {
            StoreError::Concurrency(_) => json_error(StatusCode::CONFLICT, "conflict", message),
            StoreError::InvalidBatch(_) => {
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", message)
            }
            StoreError::InvalidRange(_) => {
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "invalid_range", message)
            }
            StoreError::Unavailable(_) => {
                json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", message)
            }
        },
        LedgerError::Serialization(_) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "serialization_error", message)
        }
        LedgerError::UnknownFunction(_) => {
            json_error(StatusCode::BAD_REQUEST, "unknown_function", message)
        }
        LedgerError::QueryUnsupported => {
            json_error(StatusCode::BAD_REQUEST, "unsupported_call", message)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_distinct_statuses() {
        let cases = [
            (LedgerError::validation("bad"), StatusCode::BAD_REQUEST),
            (LedgerError::not_found("gone"), StatusCode::NOT_FOUND),
            (
                DomainError::invalid_state("wait").into(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (DomainError::conflict("dup").into(), StatusCode::CONFLICT),
            (
                StoreError::Concurrency("stale".into()).into(),
                StatusCode::CONFLICT,
            ),
            (
                StoreError::InvalidRange("inverted".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                LedgerError::UnknownFunction("x".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ledger_error_to_response(err).status(), status);
        }
    }
}
