//! Per-document row transformation
//!
//! Flattens a BSON document onto a fixed, ordered list of requested fields:
//! - missing fields and BSON nulls become a placeholder string
//! - fields whose name carries the date marker and whose value is a
//!   datetime are converted to the local time zone
//! - a synthetic identifier column is appended to every row
//! - rows whose skip field equals the configured sentinel are dropped

use chrono::{Local, LocalResult, TimeZone};
use mongodb::bson::{Bson, DateTime, Document};
use tracing::warn;

use crate::config::ExportConfig;

/// Projects documents onto fixed-order CSV rows
#[derive(Debug, Clone)]
pub struct RowProjector {
    /// Requested fields, in output column order
    fields: Vec<String>,
    /// Rendered for absent fields and BSON nulls
    placeholder: String,
    /// Name of the appended identifier column
    id_column: String,
    /// Field deciding whether a row is excluded
    skip_field: Option<String>,
    /// Rows whose skip field equals this string are excluded
    skip_value: String,
    /// Substring marking a field name as a date column
    date_marker: Option<String>,
}

impl RowProjector {
    /// Build a projector from the export configuration
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            fields: config.fields.clone(),
            placeholder: config.placeholder.clone(),
            id_column: config.id_column.clone(),
            skip_field: config.skip_field.clone(),
            skip_value: config.skip_value.clone(),
            date_marker: config.date_marker.clone(),
        }
    }

    /// Column names for the header row: requested fields plus id column
    pub fn headers(&self) -> Vec<String> {
        let mut headers = self.fields.clone();
        headers.push(self.id_column.clone());
        headers
    }

    /// Project a document onto a row
    ///
    /// # Arguments
    /// * `id` - The document's `_id`
    /// * `doc` - The document itself
    ///
    /// # Returns
    /// * `Option<Vec<String>>` - Row values in column order, or None if the
    ///   document matched the skip rule
    pub fn project(&self, id: &Bson, doc: &Document) -> Option<Vec<String>> {
        if self.should_skip(doc) {
            return None;
        }

        let mut row = Vec::with_capacity(self.fields.len() + 1);
        for field in &self.fields {
            row.push(self.render(field, doc.get(field)));
        }
        row.push(id_text(id));
        Some(row)
    }

    /// A row is excluded only when the skip field is present and its string
    /// value equals the sentinel. Absent fields and every other value,
    /// null included, pass through.
    fn should_skip(&self, doc: &Document) -> bool {
        let Some(skip_field) = &self.skip_field else {
            return false;
        };
        matches!(doc.get(skip_field), Some(Bson::String(v)) if v == &self.skip_value)
    }

    /// Render one field value
    fn render(&self, field: &str, value: Option<&Bson>) -> String {
        match value {
            None | Some(Bson::Null) => self.placeholder.clone(),
            Some(Bson::DateTime(dt)) if self.is_date_field(field) => {
                self.render_local_datetime(field, dt)
            }
            Some(other) => self.scalar_text(other),
        }
    }

    fn is_date_field(&self, field: &str) -> bool {
        self.date_marker
            .as_deref()
            .is_some_and(|marker| field.contains(marker))
    }

    /// Convert a datetime to the local time zone
    ///
    /// A value the local calendar cannot represent is logged and rendered
    /// in UTC instead; the row is never aborted over one field.
    fn render_local_datetime(&self, field: &str, dt: &DateTime) -> String {
        match Local.timestamp_millis_opt(dt.timestamp_millis()) {
            LocalResult::Single(local) | LocalResult::Ambiguous(local, _) => {
                local.format("%Y-%m-%d %H:%M:%S%.3f %z").to_string()
            }
            LocalResult::None => {
                warn!(field, millis = dt.timestamp_millis(), "Timestamp not representable in local time zone, keeping UTC");
                utc_text(dt)
            }
        }
    }

    /// Plain-text rendering of a scalar BSON value
    ///
    /// Strings are bare (CSV escaping happens in the writer), numbers and
    /// booleans use their canonical text forms, ObjectIds their hex form.
    /// Arrays and documents fall back to the relaxed JSON rendering.
    fn scalar_text(&self, value: &Bson) -> String {
        match value {
            Bson::String(s) => s.clone(),
            Bson::Int32(n) => n.to_string(),
            Bson::Int64(n) => n.to_string(),
            Bson::Double(f) => f.to_string(),
            Bson::Boolean(b) => b.to_string(),
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::DateTime(dt) => utc_text(dt),
            Bson::Decimal128(d) => d.to_string(),
            other => other.to_string(),
        }
    }
}

/// Text form of a document identifier
fn id_text(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// UTC rendering used wherever local conversion does not apply
fn utc_text(dt: &DateTime) -> String {
    dt.try_to_rfc3339_string()
        .unwrap_or_else(|_| format!("{}ms", dt.timestamp_millis()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use mongodb::bson::oid::ObjectId;

    fn projector() -> RowProjector {
        let mut config = ExportConfig::default();
        config.fields = vec!["DATE1".into(), "COL1".into(), "COL2".into()];
        config.skip_field = Some("TO_SKIP".into());
        RowProjector::from_config(&config)
    }

    #[test]
    fn test_headers_append_id_column() {
        assert_eq!(
            projector().headers(),
            vec!["DATE1", "COL1", "COL2", "MONGO_ID"]
        );
    }

    #[test]
    fn test_missing_fields_use_placeholder() {
        let p = projector();
        let doc = doc! { "COL1": "hello" };
        let row = p.project(&Bson::String("id-1".into()), &doc).unwrap();
        assert_eq!(row, vec!["Null", "hello", "Null", "id-1"]);
    }

    #[test]
    fn test_null_fields_use_placeholder() {
        let p = projector();
        let doc = doc! { "COL1": Bson::Null, "COL2": 7 };
        let row = p.project(&Bson::String("id-2".into()), &doc).unwrap();
        assert_eq!(row, vec!["Null", "Null", "7", "id-2"]);
    }

    #[test]
    fn test_unrequested_fields_are_ignored() {
        let p = projector();
        let doc = doc! { "COL1": "kept", "EXTRA": "dropped" };
        let row = p.project(&Bson::String("id-3".into()), &doc).unwrap();
        assert_eq!(row.len(), 4);
        assert!(!row.contains(&"dropped".to_string()));
    }

    #[test]
    fn test_skip_sentinel_excludes_row() {
        let p = projector();
        let doc = doc! { "COL1": "x", "TO_SKIP": "VALUE_TO_SKIP" };
        assert!(p.project(&Bson::String("id-4".into()), &doc).is_none());
    }

    #[test]
    fn test_other_skip_values_are_included() {
        let p = projector();
        for doc in [
            doc! { "COL1": "x" },
            doc! { "COL1": "x", "TO_SKIP": "keep me" },
            doc! { "COL1": "x", "TO_SKIP": Bson::Null },
        ] {
            assert!(p.project(&Bson::String("id-5".into()), &doc).is_some());
        }
    }

    #[test]
    fn test_no_skip_field_configured() {
        let mut config = ExportConfig::default();
        config.fields = vec!["COL1".into()];
        let p = RowProjector::from_config(&config);
        let doc = doc! { "COL1": "x", "TO_SKIP": "VALUE_TO_SKIP" };
        assert!(p.project(&Bson::String("id-6".into()), &doc).is_some());
    }

    #[test]
    fn test_date_field_converted_to_local_time() {
        let p = projector();
        // 2021-06-15T12:00:00Z
        let doc = doc! { "DATE1": Bson::DateTime(DateTime::from_millis(1_623_758_400_000)) };
        let row = p.project(&Bson::String("id-7".into()), &doc).unwrap();
        assert!(row[0].contains("2021"));
        // Local rendering carries a UTC offset suffix
        assert!(row[0].contains('+') || row[0].contains('-'));
    }

    #[test]
    fn test_datetime_outside_date_fields_stays_utc() {
        let p = projector();
        let doc = doc! { "COL1": Bson::DateTime(DateTime::from_millis(1_623_758_400_000)) };
        let row = p.project(&Bson::String("id-8".into()), &doc).unwrap();
        assert_eq!(row[1], "2021-06-15T12:00:00Z");
    }

    #[test]
    fn test_string_in_date_field_untouched() {
        let p = projector();
        let doc = doc! { "DATE1": "2021-02-13" };
        let row = p.project(&Bson::String("id-9".into()), &doc).unwrap();
        assert_eq!(row[0], "2021-02-13");
    }

    #[test]
    fn test_object_id_rendered_as_hex() {
        let p = projector();
        let oid = ObjectId::new();
        let doc = doc! { "COL1": 1 };
        let row = p.project(&Bson::ObjectId(oid), &doc).unwrap();
        assert_eq!(row[3], oid.to_hex());
    }

    #[test]
    fn test_scalar_renderings() {
        let p = projector();
        let doc = doc! { "COL1": 3.5_f64, "COL2": true };
        let row = p.project(&Bson::String("id-10".into()), &doc).unwrap();
        assert_eq!(row[1], "3.5");
        assert_eq!(row[2], "true");
    }
}
