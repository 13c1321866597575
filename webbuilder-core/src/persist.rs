//! Saved project format.
//!
//! A project blob is a JSON object `{ version, timestamp, elements?, html? }`.
//! Current writers always emit `elements`; the `html` form is what older
//! builds stored and is still accepted on load.

use std::collections::HashSet;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PersistError, PersistResult};
use crate::{CanvasElement, ElementTag};

/// Format version written by [`save`].
pub const FORMAT_VERSION: &str = "1.0";

/// Class given to the container a legacy `html` payload is wrapped in.
pub const LEGACY_IMPORT_CLASS: &str = "legacy-import";

/// On-disk representation of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Format version, `major.minor`.
    #[serde(deserialize_with = "version_string")]
    pub version: String,
    /// Save time in Unix milliseconds; `0` if unknown.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: u64,
    /// Structured document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<CanvasElement>>,
    /// Legacy markup snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl ProjectDocument {
    /// Wrap a document for saving, stamped with the current time.
    #[must_use]
    pub fn from_elements(elements: &[CanvasElement]) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            timestamp: current_timestamp_ms(),
            elements: Some(elements.to_vec()),
            html: None,
        }
    }

    /// Validate and extract the element list.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::UnsupportedVersion`] for a major version other
    /// than 1, [`PersistError::MissingPayload`] when there is nothing to load
    /// and [`PersistError::DuplicateId`] when ids collide.
    pub fn into_elements(self) -> PersistResult<Vec<CanvasElement>> {
        let major = self.version.split('.').next().unwrap_or_default().trim();
        if major != "1" {
            return Err(PersistError::UnsupportedVersion(self.version));
        }

        let elements = match (self.elements, self.html) {
            (Some(elements), _) => elements,
            (None, Some(html)) if !html.trim().is_empty() => {
                tracing::debug!("Wrapping legacy html payload in a container");
                vec![CanvasElement::new(ElementTag::Container)
                    .with_class(LEGACY_IMPORT_CLASS)
                    .with_markup(html)]
            }
            _ => return Err(PersistError::MissingPayload),
        };

        let mut seen = HashSet::with_capacity(elements.len());
        for element in &elements {
            if !seen.insert(element.id) {
                return Err(PersistError::DuplicateId(element.id));
            }
        }
        Ok(elements)
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> PersistResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON without validating the payload.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Malformed`] if the blob is not a project
    /// object.
    pub fn from_json(json: &str) -> PersistResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Serialize a document to a project blob.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn save(elements: &[CanvasElement]) -> PersistResult<String> {
    ProjectDocument::from_elements(elements).to_json()
}

/// Parse and validate a project blob.
///
/// # Errors
///
/// See [`ProjectDocument::from_json`] and [`ProjectDocument::into_elements`].
pub fn load(json: &str) -> PersistResult<Vec<CanvasElement>> {
    ProjectDocument::from_json(json)?.into_elements()
}

/// Read and validate a project file.
///
/// # Errors
///
/// Returns [`PersistError::Io`] if the file cannot be read, otherwise as
/// [`load`].
pub fn read_file(path: &Path) -> PersistResult<Vec<CanvasElement>> {
    let json = std::fs::read_to_string(path)?;
    load(&json)
}

/// Write a document to a project file.
///
/// # Errors
///
/// Returns [`PersistError::Io`] if the file cannot be written.
pub fn write_file(path: &Path, elements: &[CanvasElement]) -> PersistResult<()> {
    std::fs::write(path, save(elements)?)?;
    tracing::debug!("Saved {} elements to {}", elements.len(), path.display());
    Ok(())
}

/// Current Unix timestamp in milliseconds.
#[must_use]
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Timestamp will not exceed u64 max for millennia
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawVersion {
    Text(String),
    Number(serde_json::Number),
}

fn version_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawVersion::deserialize(deserializer)? {
        RawVersion::Text(text) => text,
        RawVersion::Number(number) => number.to_string(),
    })
}

// Older builds stored an ISO date string here.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_u64().unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_round_trip_and_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("site.json");
        let elements = vec![CanvasElement::new("p").with_content("Saved")];
        write_file(&path, &elements).expect("write");
        assert_eq!(read_file(&path).expect("read"), elements);

        let missing = read_file(&dir.path().join("absent.json"));
        assert!(matches!(missing, Err(PersistError::Io(_))));
    }

    #[test]
    fn test_save_then_load_preserves_document() {
        let elements = vec![
            CanvasElement::new("h1").with_content("Title"),
            CanvasElement::new("p")
                .with_content("Body")
                .with_style("color", "#333")
                .with_animation("fadeIn"),
        ];
        let json = save(&elements).expect("save");
        let loaded = load(&json).expect("load");
        assert_eq!(loaded, elements);
    }

    #[test]
    fn test_elements_win_over_html() {
        let json = r#"{"version":"1.0","timestamp":1,"elements":[],"html":"<p>x</p>"}"#;
        assert!(load(json).expect("load").is_empty());
    }

    #[test]
    fn test_legacy_html_becomes_container() {
        let json = r#"{"version":"1.0","timestamp":"2024-01-01T00:00:00Z","html":"<h1>Hi</h1>"}"#;
        let loaded = load(json).expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].tag, ElementTag::Container);
        assert_eq!(loaded[0].markup.as_deref(), Some("<h1>Hi</h1>"));
        assert!(loaded[0].classes.contains(LEGACY_IMPORT_CLASS));
    }

    #[test]
    fn test_numeric_version_accepted() {
        let json = r#"{"version":1,"elements":[]}"#;
        assert!(load(json).is_ok());
    }

    #[test]
    fn test_rejects_unknown_major_version() {
        let json = r#"{"version":"2.0","timestamp":1,"elements":[]}"#;
        assert!(matches!(
            load(json),
            Err(PersistError::UnsupportedVersion(v)) if v == "2.0"
        ));
    }

    #[test]
    fn test_rejects_missing_payload() {
        let json = r#"{"version":"1.0","timestamp":1}"#;
        assert!(matches!(load(json), Err(PersistError::MissingPayload)));
        let json = r#"{"version":"1.0","timestamp":1,"html":"  "}"#;
        assert!(matches!(load(json), Err(PersistError::MissingPayload)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let element = CanvasElement::new("p");
        let doc = ProjectDocument {
            version: FORMAT_VERSION.into(),
            timestamp: 0,
            elements: Some(vec![element.clone(), element.clone()]),
            html: None,
        };
        let json = doc.to_json().expect("serialize");
        assert!(matches!(
            load(&json),
            Err(PersistError::DuplicateId(id)) if id == element.id
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(load("not json"), Err(PersistError::Malformed(_))));
        assert!(matches!(load("[]"), Err(PersistError::Malformed(_))));
    }
}
