use axum::http::StatusCode;
use salesbridge_core::error::PipelineError;

pub const SUCCESS_BODY: &str = "Successfully processed Salesforce notification.";

/// Map a terminal pipeline failure to the trigger response contract:
/// parse failures are the caller's fault (400), secret and fetch failures
/// are ours (500), and the body names the failed stage.
pub fn failure_response(err: &PipelineError) -> (StatusCode, String) {
    match err {
        PipelineError::Parse(_) => (
            StatusCode::BAD_REQUEST,
            "Error: Could not parse record ID from notification.".to_string(),
        ),
        PipelineError::Secrets(source) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error: Could not resolve credentials for the sync pipeline. ({source})"),
        ),
        PipelineError::Fetch { record_id, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error: Could not retrieve data for record {record_id} from Salesforce."),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesbridge_core::error::{CrmError, ParseError, SecretError};

    #[test]
    fn parse_failure_maps_to_400() {
        let err = PipelineError::Parse(ParseError::MissingField("recordId"));
        let (status, body) = failure_response(&err);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Error: Could not parse record ID from notification.");
    }

    #[test]
    fn secret_failure_maps_to_500_naming_the_stage() {
        let err = PipelineError::Secrets(SecretError::Missing("sendgrid-api-key".to_string()));
        let (status, body) = failure_response(&err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("Could not resolve credentials"));
        assert!(body.contains("sendgrid-api-key"));
    }

    #[test]
    fn fetch_failure_maps_to_500_with_the_record_id() {
        let err = PipelineError::Fetch {
            record_id: "001xx000003DHPGAA4".to_string(),
            source: CrmError::NotFound("001xx000003DHPGAA4".to_string()),
        };
        let (status, body) = failure_response(&err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            "Error: Could not retrieve data for record 001xx000003DHPGAA4 from Salesforce."
        );
    }
}
