use crate::record::CrmRecord;

/// A rendered confirmation message, backend-independent.
///
/// The sender address is deployment configuration held by the notifier, not
/// part of the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub html_body: String,
    pub recipients: Vec<String>,
}

/// Render the confirmation email for a processed record.
///
/// Absent optional fields render as the literal `N/A`.
pub fn render_message(record: &CrmRecord, recipients: &[String]) -> NotificationMessage {
    let subject = format!(
        "New Salesforce Record Created/Updated: {}",
        record.text_or_na("Name")
    );
    let html_body = format!(
        "<h3>A Salesforce record has been processed and added to BigQuery.</h3>\n\
         <p><strong>Record Name:</strong> {}</p>\n\
         <p><strong>Record ID:</strong> {}</p>\n\
         <p><strong>Industry:</strong> {}</p>\n\
         <p><strong>Phone:</strong> {}</p>",
        record.text_or_na("Name"),
        record.text_or_na("Id"),
        record.text_or_na("Industry"),
        record.text_or_na("Phone"),
    );
    NotificationMessage {
        subject,
        html_body,
        recipients: recipients.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> CrmRecord {
        let serde_json::Value::Object(fields) = value else {
            panic!("test record must be an object");
        };
        CrmRecord::new(fields)
    }

    #[test]
    fn subject_carries_the_record_name() {
        let r = record(json!({"Id": "001", "Name": "Acme Corp"}));
        let msg = render_message(&r, &["ops@example.com".to_string()]);
        assert_eq!(msg.subject, "New Salesforce Record Created/Updated: Acme Corp");
    }

    #[test]
    fn absent_fields_render_as_na() {
        let r = record(json!({"Id": "001", "Name": "Acme Corp"}));
        let msg = render_message(&r, &[]);
        assert!(msg.html_body.contains("<p><strong>Industry:</strong> N/A</p>"));
        assert!(msg.html_body.contains("<p><strong>Phone:</strong> N/A</p>"));
    }

    #[test]
    fn absent_name_renders_na_in_the_subject() {
        let r = record(json!({"Id": "001"}));
        let msg = render_message(&r, &[]);
        assert_eq!(msg.subject, "New Salesforce Record Created/Updated: N/A");
    }

    #[test]
    fn recipients_keep_their_order() {
        let r = record(json!({"Name": "Acme Corp"}));
        let recipients = vec![
            "a@example.com".to_string(),
            "b@example.com".to_string(),
            "c@example.com".to_string(),
        ];
        let msg = render_message(&r, &recipients);
        assert_eq!(msg.recipients, recipients);
    }

    #[test]
    fn body_lists_all_four_rendered_fields() {
        let r = record(json!({
            "Id": "001xx000003DHPGAA4",
            "Name": "Acme Corp",
            "Industry": "Tech",
            "Phone": "555-1234",
        }));
        let msg = render_message(&r, &[]);
        assert!(msg.html_body.contains("Acme Corp"));
        assert!(msg.html_body.contains("001xx000003DHPGAA4"));
        assert!(msg.html_body.contains("Tech"));
        assert!(msg.html_body.contains("555-1234"));
    }
}
