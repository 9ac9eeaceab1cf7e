//! Wire format of the Apps Script web app
//!
//! Every request is a JSON `POST` carrying the shared secret:
//!
//! ```text
//! → {"action":"next","token":"…"}
//! ← {"ok":true,"record":{"row":42,"fields":[{"name":"Name","value":"Ada","inline":true}]}}
//! ← {"ok":true,"record":null}
//!
//! → {"action":"report","token":"…","row":42,"decision":"Accepted"}
//! ← {"ok":true}
//! ← {"ok":false,"error":"unauthorized"}
//! ```

use serde::{Deserialize, Serialize};
use votegate_application::RecordSourceError;
use votegate_domain::{ApplicationRecord, RecordStatus, RowId};

/// Error string the web app returns for a wrong token
pub const UNAUTHORIZED: &str = "unauthorized";

/// Request body
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptRequest<'a> {
    Next {
        token: &'a str,
    },
    Report {
        token: &'a str,
        row: RowId,
        decision: RecordStatus,
    },
}

/// Response body
#[derive(Debug, Deserialize)]
pub struct ScriptResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub record: Option<ApplicationRecord>,
}

impl ScriptResponse {
    /// Turn an `ok:false` body into the matching error
    pub fn into_result(self) -> Result<Option<ApplicationRecord>, RecordSourceError> {
        if self.ok {
            return Ok(self.record);
        }
        match self.error.as_deref() {
            Some(UNAUTHORIZED) => Err(RecordSourceError::Unauthorized),
            Some(other) => Err(RecordSourceError::Rejected(other.to_string())),
            None => Err(RecordSourceError::Rejected("no reason given".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_bodies() {
        let next = serde_json::to_value(ScriptRequest::Next { token: "t" }).unwrap();
        assert_eq!(next, serde_json::json!({"action": "next", "token": "t"}));

        let report = serde_json::to_value(ScriptRequest::Report {
            token: "t",
            row: RowId::new(42),
            decision: RecordStatus::Accepted,
        })
        .unwrap();
        assert_eq!(
            report,
            serde_json::json!({"action": "report", "token": "t", "row": 42, "decision": "Accepted"})
        );
    }

    #[test]
    fn test_record_response() {
        let body = r#"{"ok":true,"record":{"row":42,"fields":[{"name":"Name","value":"Ada","inline":true},{"name":"Why","value":"Fun"}]}}"#;
        let response: ScriptResponse = serde_json::from_str(body).unwrap();
        let record = response.into_result().unwrap().unwrap();

        assert_eq!(record.row, RowId::new(42));
        assert_eq!(record.fields.len(), 2);
        assert!(record.fields[0].inline);
        assert!(!record.fields[1].inline);
    }

    #[test]
    fn test_empty_and_ack_responses() {
        let empty: ScriptResponse = serde_json::from_str(r#"{"ok":true,"record":null}"#).unwrap();
        assert!(empty.into_result().unwrap().is_none());

        let ack: ScriptResponse = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert!(ack.into_result().unwrap().is_none());
    }

    #[test]
    fn test_error_responses() {
        let denied: ScriptResponse =
            serde_json::from_str(r#"{"ok":false,"error":"unauthorized"}"#).unwrap();
        assert!(denied.into_result().unwrap_err().is_unauthorized());

        let rejected: ScriptResponse =
            serde_json::from_str(r#"{"ok":false,"error":"row not found"}"#).unwrap();
        assert!(matches!(
            rejected.into_result(),
            Err(RecordSourceError::Rejected(msg)) if msg == "row not found"
        ));
    }
}
