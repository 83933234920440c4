use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;

/// Raw trigger body as sent by the CRM workflow callout.
#[derive(Debug, Deserialize)]
struct RawNotification {
    #[serde(rename = "recordId", default)]
    record_id: Option<Value>,
}

/// Inbound trigger payload naming the changed CRM record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundNotification {
    pub record_id: String,
}

impl InboundNotification {
    /// Parse a raw trigger body of the form `{"recordId": "<id>"}`.
    ///
    /// Classifies instead of panicking on any input: non-JSON and non-object
    /// bodies are `MalformedPayload`; an absent, non-string, or empty
    /// `recordId` is `MissingField`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse(body: &[u8]) -> Result<Self, ParseError> {
        let raw: RawNotification = serde_json::from_slice(body)
            .map_err(|e| ParseError::MalformedPayload(e.to_string()))?;
        let record_id = raw
            .record_id
            .as_ref()
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or(ParseError::MissingField("recordId"))?;
        tracing::debug!(record_id = %record_id, "parsed trigger notification");
        Ok(Self {
            record_id: record_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_record_id_exactly() {
        let body = br#"{"recordId": "001xx000003DHPGAA4"}"#;
        let n = InboundNotification::parse(body).unwrap();
        assert_eq!(n.record_id, "001xx000003DHPGAA4");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let body = br#"{"recordId": "abc", "objectType": "Account", "attempt": 2}"#;
        let n = InboundNotification::parse(body).unwrap();
        assert_eq!(n.record_id, "abc");
    }

    #[test]
    fn missing_record_id_is_classified() {
        let err = InboundNotification::parse(br#"{"id": "abc"}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingField("recordId")));
    }

    #[test]
    fn empty_record_id_is_classified_as_missing() {
        let err = InboundNotification::parse(br#"{"recordId": ""}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingField("recordId")));
    }

    #[test]
    fn non_string_record_id_is_classified_as_missing() {
        let err = InboundNotification::parse(br#"{"recordId": 42}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingField("recordId")));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = InboundNotification::parse(b"<xml>nope</xml>").unwrap_err();
        assert!(matches!(err, ParseError::MalformedPayload(_)));
    }

    #[test]
    fn non_object_json_is_malformed() {
        let err = InboundNotification::parse(br#"["recordId"]"#).unwrap_err();
        assert!(matches!(err, ParseError::MalformedPayload(_)));
    }
}
