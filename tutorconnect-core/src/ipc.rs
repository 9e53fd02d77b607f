use serde::{Deserialize, Serialize};

use crate::error::{MarketplaceError, TutorConnectError};
use crate::models::ConnectKind;

pub const PROTOCOL_VERSION: &str = "tutorconnect/1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TutorConnectRequest {
    Ping,
    Health,
    Landing,
    ListTutors {
        #[serde(default)]
        query: Option<String>,
        #[serde(default)]
        subject: Option<String>,
    },
    Subjects,
    Connect {
        tutor_id: String,
        #[serde(default)]
        kind: ConnectKind,
    },
    SendMessage {
        content: String,
    },
    EndSession,
    Session,
    StartVideoCall,
    Wallet,
    TopUp,
    History,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TutorConnectResponse {
    pub status: String,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    /// Machine-readable rejection kind, e.g. `tutor_unavailable`.
    #[serde(default)]
    pub code: Option<String>,
    pub version: String,
}

impl TutorConnectResponse {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            status: "ok".to_string(),
            data: Some(data),
            error: None,
            code: None,
            version: PROTOCOL_VERSION.to_string(),
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            error: Some(msg.into()),
            code: None,
            version: PROTOCOL_VERSION.to_string(),
        }
    }

    pub fn rejected(error: &MarketplaceError) -> Self {
        Self {
            code: Some(error.code().to_string()),
            ..Self::err(error.to_string())
        }
    }

    pub fn pong() -> Self {
        Self::ok(serde_json::json!({"pong": true}))
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Decode one MessagePack request frame.
pub fn decode_request(frame: &[u8]) -> Result<TutorConnectRequest, TutorConnectError> {
    rmp_serde::from_slice(frame)
        .map_err(|e| TutorConnectError::Ipc(format!("Deserialization error: {}", e)))
}

/// Encode a response as named-field MessagePack.
pub fn encode_response(response: &TutorConnectResponse) -> Result<Vec<u8>, TutorConnectError> {
    rmp_serde::to_vec_named(response)
        .map_err(|e| TutorConnectError::Ipc(format!("Serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_tagged_by_action() {
        let req: TutorConnectRequest =
            serde_json::from_value(serde_json::json!({"action": "connect", "tutor_id": "1", "kind": "video"}))
                .unwrap();
        match req {
            TutorConnectRequest::Connect { tutor_id, kind } => {
                assert_eq!(tutor_id, "1");
                assert_eq!(kind, ConnectKind::Video);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_connect_kind_defaults_to_chat() {
        let req: TutorConnectRequest =
            serde_json::from_value(serde_json::json!({"action": "connect", "tutor_id": "3"})).unwrap();
        assert!(matches!(req, TutorConnectRequest::Connect { kind: ConnectKind::Chat, .. }));
    }

    #[test]
    fn test_rejected_carries_code() {
        let resp = TutorConnectResponse::rejected(&MarketplaceError::EmptyMessage);
        assert!(!resp.is_ok());
        assert_eq!(resp.code.as_deref(), Some("empty_message"));
        assert_eq!(resp.error.as_deref(), Some("Message is empty"));
    }

    #[test]
    fn test_decode_msgpack_request() {
        let req = TutorConnectRequest::ListTutors {
            query: Some("chen".to_string()),
            subject: None,
        };
        let bytes = rmp_serde::to_vec_named(&req).unwrap();
        let back = decode_request(&bytes).unwrap();
        assert!(matches!(back, TutorConnectRequest::ListTutors { query: Some(q), .. } if q == "chen"));
    }

    #[test]
    fn test_decode_garbage_is_ipc_error() {
        let err = decode_request(&[0xc1, 0x00]).unwrap_err();
        assert!(matches!(err, TutorConnectError::Ipc(_)));
    }
}
