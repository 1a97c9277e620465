use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// -------------------------
// Request DTOs
// -------------------------

/// One ledger invocation: function name plus positional string arguments.
#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct InvokeResponse {
    pub status: &'static str,
    /// `null` for writes, the decoded document for JSON reads, a string otherwise.
    pub payload: JsonValue,
}

impl InvokeResponse {
    pub fn from_payload(bytes: &[u8]) -> Self {
        let payload = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(bytes).unwrap_or_else(|_| {
                JsonValue::String(String::from_utf8_lossy(bytes).into_owned())
            })
        };
        Self {
            status: "ok",
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_decoding() {
        assert_eq!(InvokeResponse::from_payload(b"").payload, JsonValue::Null);
        assert_eq!(InvokeResponse::from_payload(b"4.0.1").payload, "4.0.1");
        assert_eq!(
            InvokeResponse::from_payload(br#"{"a":1}"#).payload["a"],
            serde_json::json!(1)
        );
    }
}
