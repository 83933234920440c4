use serde_json::{Map, Value};

/// A CRM record as an open field mapping.
///
/// The schema is owned by the CRM; the pipeline only reads the handful of
/// fields it renders (`Id`, `Name`, `Industry`, `Phone`) and passes the rest
/// through untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CrmRecord {
    fields: Map<String, Value>,
}

impl CrmRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// String form of a scalar field, `None` when absent or non-scalar.
    pub fn text(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Rendered form of a field: its value, or the `N/A` placeholder.
    pub fn text_or_na(&self, name: &str) -> String {
        self.text(name).unwrap_or_else(|| "N/A".to_string())
    }

    pub fn id(&self) -> Option<String> {
        self.text("Id")
    }

    pub fn name(&self) -> Option<String> {
        self.text("Name")
    }

    /// Business fields only. The CRM REST `attributes` envelope is transport
    /// metadata, not part of the record.
    pub fn business_fields(&self) -> Map<String, Value> {
        let mut out = self.fields.clone();
        out.remove("attributes");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> CrmRecord {
        let Value::Object(fields) = value else {
            panic!("test record must be an object");
        };
        CrmRecord::new(fields)
    }

    #[test]
    fn text_reads_scalars() {
        let r = record(json!({"Name": "Acme Corp", "Employees": 250, "Active": true}));
        assert_eq!(r.text("Name").as_deref(), Some("Acme Corp"));
        assert_eq!(r.text("Employees").as_deref(), Some("250"));
        assert_eq!(r.text("Active").as_deref(), Some("true"));
    }

    #[test]
    fn absent_field_renders_as_na() {
        let r = record(json!({"Name": "Acme Corp"}));
        assert_eq!(r.text_or_na("Industry"), "N/A");
    }

    #[test]
    fn null_field_renders_as_na() {
        let r = record(json!({"Industry": null}));
        assert_eq!(r.text_or_na("Industry"), "N/A");
    }

    #[test]
    fn business_fields_strip_the_attributes_envelope() {
        let r = record(json!({
            "attributes": {"type": "Account", "url": "/services/data/v59.0/sobjects/Account/001"},
            "Id": "001",
            "Name": "Acme Corp",
        }));
        let fields = r.business_fields();
        assert!(!fields.contains_key("attributes"));
        assert_eq!(fields.len(), 2);
    }
}
