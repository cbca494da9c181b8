//! Labeled reference templates for event matching.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a template table.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template '{label}' has dimension {got}, expected {expected}")]
    DimensionMismatch {
        label: String,
        expected: usize,
        got: usize,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid template json: {0}")]
    Json(#[from] serde_json::Error),
}

/// A known event class: label, prototypical feature vector, and the maximum
/// distance at which a candidate still counts as a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventTemplate {
    pub label: String,
    pub reference: Vec<f32>,
    pub threshold: f32,
}

impl EventTemplate {
    /// A template with a non-positive threshold can never match.
    pub fn is_enabled(&self) -> bool {
        self.threshold > 0.0
    }
}

/// Immutable table of event templates with a consistent vector dimension.
///
/// Loaded once before detection; the pipeline never mutates it.
#[derive(Debug, Clone)]
pub struct TemplateTable {
    templates: Vec<EventTemplate>,
    dim: usize,
}

impl TemplateTable {
    /// Builds a table, validating that every reference vector has the same
    /// dimension. Non-positive thresholds are kept but warned about: such
    /// templates are effectively disabled, not invalid.
    pub fn new(templates: Vec<EventTemplate>) -> Result<Self, TemplateError> {
        let dim = templates.first().map_or(0, |t| t.reference.len());
        for t in &templates {
            if t.reference.len() != dim {
                return Err(TemplateError::DimensionMismatch {
                    label: t.label.clone(),
                    expected: dim,
                    got: t.reference.len(),
                });
            }
            if !t.is_enabled() {
                tracing::warn!(
                    label = %t.label,
                    threshold = t.threshold,
                    "template threshold is non-positive; it will never match"
                );
            }
        }
        Ok(Self { templates, dim })
    }

    /// Reads a JSON array of templates.
    pub fn from_json_reader(reader: impl Read) -> Result<Self, TemplateError> {
        let templates: Vec<EventTemplate> = serde_json::from_reader(reader)?;
        Self::new(templates)
    }

    /// Loads a JSON template file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        Self::from_json_reader(BufReader::new(File::open(path)?))
    }

    /// Shared dimension of all reference vectors (0 for an empty table).
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Iterates over the templates in load order.
    pub fn iter(&self) -> impl Iterator<Item = &EventTemplate> {
        self.templates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(label: &str, reference: Vec<f32>, threshold: f32) -> EventTemplate {
        EventTemplate {
            label: label.to_string(),
            reference,
            threshold,
        }
    }

    #[test]
    fn consistent_dimensions_accepted() {
        let table = TemplateTable::new(vec![
            template("dog_bark", vec![0.0; 80], 5.0),
            template("gunshot", vec![1.0; 80], 3.0),
        ])
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.dim(), 80);
    }

    #[test]
    fn mismatched_dimension_rejected() {
        let err = TemplateTable::new(vec![
            template("dog_bark", vec![0.0; 80], 5.0),
            template("gunshot", vec![1.0; 40], 3.0),
        ])
        .unwrap_err();
        match err {
            TemplateError::DimensionMismatch {
                label,
                expected,
                got,
            } => {
                assert_eq!(label, "gunshot");
                assert_eq!(expected, 80);
                assert_eq!(got, 40);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_table_is_valid() {
        let table = TemplateTable::new(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.dim(), 0);
    }

    #[test]
    fn non_positive_threshold_is_kept_but_disabled() {
        let table = TemplateTable::new(vec![template("dog_bark", vec![0.0; 4], -1.0)]).unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.iter().next().unwrap().is_enabled());
    }

    #[test]
    fn loads_from_json() {
        let json = r#"[
            {"label": "dog_bark", "reference": [0.1, 0.2, 0.3], "threshold": 5.0}
        ]"#;
        let table = TemplateTable::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.dim(), 3);
        let t = table.iter().next().unwrap();
        assert_eq!(t.label, "dog_bark");
        assert!((t.threshold - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let json = r#"{"not": "an array"}"#;
        assert!(matches!(
            TemplateTable::from_json_reader(json.as_bytes()),
            Err(TemplateError::Json(_))
        ));
    }
}
