// Diagnostic containers attached to histograms and samples
//
// Both containers keep insertion order so serialized output is stable
// across runs over the same input.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Ordered name -> value mapping (e.g., stage title -> histogram average)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breakdown {
    values: Vec<(String, f64)>,
}

impl Breakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value for `name`
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Ordered key -> histogram name mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelatedNameMap {
    names: Vec<(String, String)>,
}

impl RelatedNameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the histogram name for `key`
    pub fn set(&mut self, key: impl Into<String>, histogram_name: impl Into<String>) {
        let key = key.into();
        let histogram_name = histogram_name.into();
        match self.names.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = histogram_name,
            None => self.names.push((key, histogram_name)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, name)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(k, n)| (k.as_str(), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Serialize for RelatedNameMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.names.len()))?;
        for (key, name) in &self.names {
            map.serialize_entry(key, name)?;
        }
        map.end()
    }
}

/// A diagnostic value attached to a histogram or a sample
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Diagnostic {
    Breakdown { values: Breakdown },
    RelatedNameMap { names: RelatedNameMap },
}

impl From<Breakdown> for Diagnostic {
    fn from(values: Breakdown) -> Self {
        Diagnostic::Breakdown { values }
    }
}

impl From<RelatedNameMap> for Diagnostic {
    fn from(names: RelatedNameMap) -> Self {
        Diagnostic::RelatedNameMap { names }
    }
}

/// Diagnostics keyed by diagnostic name
pub type DiagnosticMap = BTreeMap<String, Diagnostic>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_preserves_insertion_order() {
        let mut breakdown = Breakdown::new();
        breakdown.set("Response", 2.0);
        breakdown.set("Load", 1.0);
        breakdown.set("Animation", 3.0);

        let names: Vec<&str> = breakdown.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Response", "Load", "Animation"]);
    }

    #[test]
    fn test_breakdown_set_overwrites() {
        let mut breakdown = Breakdown::new();
        breakdown.set("Load", 1.0);
        breakdown.set("Load", 4.0);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown.get("Load"), Some(4.0));
    }

    #[test]
    fn test_related_name_map_lookup() {
        let mut names = RelatedNameMap::new();
        names.set("Load", "Load_Parse:duration");
        assert_eq!(names.get("Load"), Some("Load_Parse:duration"));
        assert_eq!(names.get("Idle"), None);
    }

    #[test]
    fn test_diagnostic_serialization() {
        let mut breakdown = Breakdown::new();
        breakdown.set("Load", 0.5);
        let diagnostic = Diagnostic::from(breakdown);

        let json = serde_json::to_string(&diagnostic).unwrap();
        assert_eq!(json, r#"{"type":"Breakdown","values":{"Load":0.5}}"#);
    }

    #[test]
    fn test_related_name_map_serialization() {
        let mut names = RelatedNameMap::new();
        names.set("Load", "Load_GC:count");
        let json = serde_json::to_string(&Diagnostic::from(names)).unwrap();
        assert_eq!(
            json,
            r#"{"type":"RelatedNameMap","names":{"Load":"Load_GC:count"}}"#
        );
    }
}
