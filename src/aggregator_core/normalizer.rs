//! Login event normalization from JSON and JSONL records

use super::error::IngestError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One login/location record as supplied by the collecting backend.
///
/// Only `category` and `timestamp` take part in aggregation. Everything the
/// record carries besides the three named fields (user id, GPS accuracy,
/// coordinates) is kept verbatim in `payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginEvent {
    #[serde(rename = "company", alias = "category")]
    pub category: String,
    #[serde(rename = "employeeNo", alias = "subjectId")]
    pub subject_id: String,
    pub timestamp: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// A record the ingestion layer could not turn into a `LoginEvent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    /// 1-based line number for JSONL input, 1-based element position for arrays
    pub position: usize,
    pub reason: String,
}

/// Events decoded from one dataset plus the records that were dropped.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub events: Vec<LoginEvent>,
    pub rejected: Vec<RejectedRecord>,
}

impl LoginEvent {
    pub fn new(
        category: impl Into<String>,
        subject_id: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            subject_id: subject_id.into(),
            timestamp: timestamp.into(),
            payload: Map::new(),
        }
    }

    /// Attach an opaque passthrough attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Parse a LoginEvent from a JSONL line
    pub fn from_jsonl(line: &str) -> Result<Self, IngestError> {
        let event: LoginEvent = serde_json::from_str(line)?;
        event.validated()
    }

    fn from_value(value: Value) -> Result<Self, IngestError> {
        let event: LoginEvent = serde_json::from_value(value)?;
        event.validated()
    }

    fn validated(self) -> Result<Self, IngestError> {
        if self.category.trim().is_empty() {
            return Err(IngestError::EmptyCategory {
                subject_id: self.subject_id,
            });
        }
        Ok(self)
    }
}

/// Decode a dataset that is either a JSON array of events or JSONL.
///
/// Individual records that fail to decode are rejected and reported; only a
/// top-level array that is not valid JSON fails the whole call.
pub fn parse_events(contents: &str) -> Result<IngestReport, IngestError> {
    let mut report = IngestReport::default();

    if contents.trim_start().starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(contents)?;
        for (idx, value) in values.into_iter().enumerate() {
            match LoginEvent::from_value(value) {
                Ok(event) => report.events.push(event),
                Err(e) => report.rejected.push(RejectedRecord {
                    position: idx + 1,
                    reason: e.to_string(),
                }),
            }
        }
        return Ok(report);
    }

    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match LoginEvent::from_jsonl(line) {
            Ok(event) => report.events.push(event),
            Err(e) => report.rejected.push(RejectedRecord {
                position: idx + 1,
                reason: e.to_string(),
            }),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dashboard_record() {
        let line = r#"{"accuracy":20,"company":"0999","employeeNo":"67217","latitude":13.7091284,"longitude":100.8615894,"timestamp":"July 8, 2025 at 7:03:02 AM UTC+7","userId":"1250101530974"}"#;

        let event = LoginEvent::from_jsonl(line).unwrap();
        assert_eq!(event.category, "0999");
        assert_eq!(event.subject_id, "67217");
        assert_eq!(event.timestamp, "July 8, 2025 at 7:03:02 AM UTC+7");
        assert_eq!(event.payload.get("userId"), Some(&Value::from("1250101530974")));
        assert_eq!(event.payload.get("accuracy"), Some(&Value::from(20)));
        assert!(!event.payload.contains_key("company"));
    }

    #[test]
    fn test_parse_generic_field_names() {
        let line = r#"{"category":"A","subjectId":"s1","timestamp":"2025-07-08T07:03:02+07:00"}"#;

        let event = LoginEvent::from_jsonl(line).unwrap();
        assert_eq!(event.category, "A");
        assert_eq!(event.subject_id, "s1");
        assert!(event.payload.is_empty());
    }

    #[test]
    fn test_serialize_keeps_wire_names() {
        let event = LoginEvent::new("1234", "80001", "2025-07-08T07:06:10+07:00")
            .with_attribute("accuracy", 20);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["company"], "1234");
        assert_eq!(json["employeeNo"], "80001");
        assert_eq!(json["accuracy"], 20);
    }

    #[test]
    fn test_empty_category_rejected() {
        let line = r#"{"company":"  ","employeeNo":"1","timestamp":"x"}"#;
        assert!(matches!(
            LoginEvent::from_jsonl(line),
            Err(IngestError::EmptyCategory { .. })
        ));
    }

    #[test]
    fn test_malformed_jsonl() {
        let line = r#"{"invalid": "json"#;
        assert!(LoginEvent::from_jsonl(line).is_err());
    }

    #[test]
    fn test_parse_events_jsonl_skips_bad_lines() {
        let contents = concat!(
            r#"{"company":"A","employeeNo":"1","timestamp":"t1"}"#,
            "\n\n",
            r#"{"company":"B""#,
            "\n",
            r#"{"company":"B","employeeNo":"2","timestamp":"t2"}"#,
            "\n",
        );

        let report = parse_events(contents).unwrap();
        assert_eq!(report.events.len(), 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].position, 3);
    }

    #[test]
    fn test_parse_events_array() {
        let contents = r#"[
            {"company":"A","employeeNo":"1","timestamp":"t1"},
            {"employeeNo":"2","timestamp":"t2"}
        ]"#;

        let report = parse_events(contents).unwrap();
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.rejected[0].position, 2);
    }

    #[test]
    fn test_parse_events_broken_array_fails() {
        assert!(matches!(
            parse_events("[{\"company\":"),
            Err(IngestError::Json(_))
        ));
    }
}
