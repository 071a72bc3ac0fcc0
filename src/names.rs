//! Histogram name registry threaded from the per-stage pass to the total pass
//!
//! The per-stage pass returns a [`StageHistogramNames`] value recording, for
//! every category, which histogram each stage emitted. The total pass reads it
//! to build breakdowns; nothing is shared beyond that explicit hand-off.

use crate::histogram::RelatedNameMap;
use std::collections::HashMap;

/// Category -> (stage title -> histogram name), in category insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameRegistry {
    categories: Vec<(String, RelatedNameMap)>,
    by_category: HashMap<String, usize>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `stage` emitted `histogram_name` for `category`
    pub fn record(&mut self, category: &str, stage: &str, histogram_name: &str) {
        let index = match self.by_category.get(category) {
            Some(&index) => index,
            None => {
                self.categories
                    .push((category.to_string(), RelatedNameMap::new()));
                self.by_category
                    .insert(category.to_string(), self.categories.len() - 1);
                self.categories.len() - 1
            }
        };
        self.categories[index].1.set(stage, histogram_name);
    }

    /// Stage -> histogram name for a category; empty if never recorded
    pub fn stages_for(&self, category: &str) -> RelatedNameMap {
        self.by_category
            .get(category)
            .map(|&index| self.categories[index].1.clone())
            .unwrap_or_default()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(category, _)| category.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Names emitted by the per-stage pass, one registry per metric kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageHistogramNames {
    pub duration: NameRegistry,
    pub count: NameRegistry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_lookup() {
        let mut registry = NameRegistry::new();
        registry.record("Parse", "Load", "Load_Parse:duration");
        registry.record("Parse", "Response", "Response_Parse:duration");
        registry.record("GC", "Load", "Load_GC:duration");

        let parse = registry.stages_for("Parse");
        assert_eq!(parse.len(), 2);
        assert_eq!(parse.get("Response"), Some("Response_Parse:duration"));

        let categories: Vec<&str> = registry.categories().collect();
        assert_eq!(categories, vec!["Parse", "GC"]);
    }

    #[test]
    fn test_missing_category_is_empty() {
        let registry = NameRegistry::new();
        assert!(registry.stages_for("V8-Only").is_empty());
    }
}
