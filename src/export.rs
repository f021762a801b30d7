//! Contact collection export rendering.

use crate::entities::contact;
use crate::errors::Result;

/// Supported export encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values with a header row
    Csv,
    /// Pretty-printed JSON array, identical to the fallback file shape
    Json,
}

impl ExportFormat {
    /// Parses the wire form (`"csv"` or `"json"`, case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// MIME type for download responses.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
        }
    }

    /// The wire form of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

const CSV_HEADERS: [&str; 10] = [
    "id",
    "name",
    "email",
    "subject",
    "message",
    "ip_address",
    "user_agent",
    "status",
    "created_at",
    "updated_at",
];

/// Renders the collection in the requested format.
///
/// # Errors
/// JSON serialization errors only; CSV rendering cannot fail.
pub fn render(contacts: &[contact::Model], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Csv => Ok(to_csv(contacts)),
        ExportFormat::Json => to_json(contacts),
    }
}

/// CSV with a header row. Fields containing commas, quotes or newlines are
/// wrapped in quotes with embedded quotes doubled.
#[must_use]
pub fn to_csv(contacts: &[contact::Model]) -> String {
    let mut lines = Vec::with_capacity(contacts.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for c in contacts {
        let fields = [
            c.id.to_string(),
            c.name.clone(),
            c.email.clone(),
            c.subject.clone(),
            c.message.clone(),
            c.ip_address.clone().unwrap_or_default(),
            c.user_agent.clone().unwrap_or_default(),
            c.status.as_str().to_string(),
            c.created_at.to_rfc3339(),
            c.updated_at.to_rfc3339(),
        ];
        let row: Vec<String> = fields.iter().map(|f| escape_csv_field(f)).collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

fn escape_csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Pretty-printed JSON array of contacts.
///
/// # Errors
/// Propagates serializer failures.
pub fn to_json(contacts: &[contact::Model]) -> Result<String> {
    serde_json::to_string_pretty(contacts).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::ContactStatus;
    use crate::test_utils::contact_with_status;

    #[test]
    fn format_parsing_is_case_insensitive_and_closed() {
        assert_eq!(ExportFormat::parse("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse(" JSON "), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::parse("xml"), None);
    }

    #[test]
    fn csv_has_a_header_and_one_row_per_contact() {
        let contacts = vec![
            contact_with_status(1, ContactStatus::New),
            contact_with_status(2, ContactStatus::Replied),
        ];
        let csv = to_csv(&contacts);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,name,email"));
        assert!(lines[1].starts_with("1,"));
        assert!(lines[2].contains(",replied,"));
    }

    #[test]
    fn csv_quotes_fields_with_commas_and_doubles_quotes() {
        let mut contact = contact_with_status(1, ContactStatus::New);
        contact.subject = "Prices, please".to_string();
        contact.message = "She said \"hello\"".to_string();

        let csv = to_csv(&[contact]);
        assert!(csv.contains("\"Prices, please\""));
        assert!(csv.contains("\"She said \"\"hello\"\"\""));
    }

    #[test]
    fn json_round_trips_the_collection() {
        let contacts = vec![contact_with_status(7, ContactStatus::Archived)];
        let json = to_json(&contacts).unwrap();
        let parsed: Vec<crate::entities::ContactModel> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, contacts);
    }
}
