//! Packet acknowledgements.
//!
//! On the wire an acknowledgement is JSON: `{"result":"<base64>"}` for
//! success or `{"error":"<message>"}` for failure. An error acknowledgement
//! makes the sending chain roll back its side of the transfer.

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WithdrawError};

/// Result bytes written by the transfer application on success.
pub const SUCCESS_RESULT: &[u8] = &[0x01];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acknowledgement {
    Result(Vec<u8>),
    Error(String),
}

#[derive(Serialize, Deserialize)]
struct AcknowledgementJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Acknowledgement {
    pub fn success() -> Self {
        Acknowledgement::Result(SUCCESS_RESULT.to_vec())
    }

    /// Error acknowledgement carrying the error's stable message.
    pub fn error(err: &WithdrawError) -> Self {
        Acknowledgement::Error(err.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Acknowledgement::Result(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Acknowledgement::Error(message) => Some(message),
            Acknowledgement::Result(_) => None,
        }
    }

    pub fn to_json_bytes(&self) -> Vec<u8> {
        let json = match self {
            Acknowledgement::Result(bytes) => AcknowledgementJson {
                result: Some(general_purpose::STANDARD.encode(bytes)),
                error: None,
            },
            Acknowledgement::Error(message) => AcknowledgementJson {
                result: None,
                error: Some(message.clone()),
            },
        };
        serde_json::to_vec(&json).unwrap_or_default()
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        let json: AcknowledgementJson = serde_json::from_slice(bytes)
            .map_err(|e| WithdrawError::UnknownRequest(format!("invalid acknowledgement: {}", e)))?;

        match (json.result, json.error) {
            (Some(result), None) => general_purpose::STANDARD
                .decode(result)
                .map(Acknowledgement::Result)
                .map_err(|e| WithdrawError::UnknownRequest(format!("invalid acknowledgement result: {}", e))),
            (None, Some(error)) => Ok(Acknowledgement::Error(error)),
            _ => Err(WithdrawError::UnknownRequest(
                "acknowledgement must carry exactly one of result or error".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_json_matches_transfer_app() {
        let ack = Acknowledgement::success();
        assert_eq!(ack.to_json_bytes(), br#"{"result":"AQ=="}"#.to_vec());
        assert_eq!(Acknowledgement::from_json_bytes(br#"{"result":"AQ=="}"#).unwrap(), ack);
    }

    #[test]
    fn test_error_json_carries_message() {
        let ack = Acknowledgement::error(&WithdrawError::InvalidAddress("bad".to_string()));
        assert_eq!(ack.error_message(), Some("invalid address: bad"));
        assert_eq!(
            String::from_utf8(ack.to_json_bytes()).unwrap(),
            r#"{"error":"invalid address: bad"}"#
        );
    }

    #[test]
    fn test_from_json_rejects_ambiguous_ack() {
        assert!(Acknowledgement::from_json_bytes(b"{}").is_err());
        assert!(Acknowledgement::from_json_bytes(br#"{"result":"AQ==","error":"x"}"#).is_err());
    }
}
