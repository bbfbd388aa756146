//! Ground-truth incident distribution.
//!
//! The file is a JSON object mapping each label to its expected count. Labels
//! are kept in file order, which is the order they are estimated in.

use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruthEntry {
    pub label: String,
    pub count: u64,
}

/// Ordered `label -> count` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundTruth(Vec<GroundTruthEntry>);

impl GroundTruth {
    /// Read and validate a distribution file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Distribution`] if it is not a `label -> count` object and
    /// [`ConfigError::InvalidValue`] for empty labels or labels with line
    /// breaks.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let truth: Self =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Distribution {
                path: path.to_path_buf(),
                source,
            })?;
        truth.validate()?;
        Ok(truth)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for entry in &self.0 {
            if entry.label.trim().is_empty() {
                return Err(invalid_label("labels must not be empty".into()));
            }
            // one label per report line
            if entry.label.contains(['\n', '\r']) {
                return Err(invalid_label(format!(
                    "label {:?} contains a line break",
                    entry.label
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn entries(&self) -> &[GroundTruthEntry] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn invalid_label(reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        field: "distribution".into(),
        reason,
    }
}

impl FromIterator<(String, u64)> for GroundTruth {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(label, count)| GroundTruthEntry { label, count })
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for GroundTruth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = GroundTruth;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping incident labels to counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<GroundTruth, A::Error> {
                let mut entries: Vec<GroundTruthEntry> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((label, count)) = map.next_entry::<String, u64>()? {
                    if entries.iter().any(|entry| entry.label == label) {
                        return Err(de::Error::custom(format!("duplicate label '{label}'")));
                    }
                    entries.push(GroundTruthEntry { label, count });
                }
                Ok(GroundTruth(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn keeps_file_order() {
        let truth: GroundTruth =
            serde_json::from_str(r#"{"slip and fall": 4, "fire": 9, "burn": 1}"#).unwrap();
        let pairs: Vec<(&str, u64)> = truth
            .entries()
            .iter()
            .map(|entry| (entry.label.as_str(), entry.count))
            .collect();
        assert_eq!(pairs, [("slip and fall", 4), ("fire", 9), ("burn", 1)]);
    }

    #[test]
    fn rejects_negative_counts() {
        assert!(serde_json::from_str::<GroundTruth>(r#"{"fire": -1}"#).is_err());
    }

    #[test]
    fn rejects_duplicate_labels() {
        assert!(serde_json::from_str::<GroundTruth>(r#"{"fire": 1, "fire": 2}"#).is_err());
    }

    #[test]
    fn rejects_non_object() {
        assert!(serde_json::from_str::<GroundTruth>(r#"["fire"]"#).is_err());
    }

    #[test]
    fn load_reports_empty_label() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dist.json");
        std::fs::write(&path, r#"{"": 3}"#).unwrap();

        let err = GroundTruth::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn load_rejects_multi_line_label() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dist.json");
        std::fs::write(&path, r#"{"fire": 1, "slip\nand fall": 3}"#).unwrap();

        let err = GroundTruth::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref reason, .. } if reason.contains("line break")));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GroundTruth::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn collects_from_pairs() {
        let truth: GroundTruth = vec![("fire".to_string(), 2)].into_iter().collect();
        assert_eq!(truth.len(), 1);
        assert_eq!(truth.entries()[0].count, 2);
    }
}
