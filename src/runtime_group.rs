//! Runtime groups: per-category accumulation of runtime call stats slices
//!
//! A [`RuntimeGroupCollection`] folds a slice list into one group per
//! distinct category label, in order of first appearance, and keeps a nested
//! collection breaking down "Blink RCS" slices by their sub-label.

use crate::error::{MetricError, Result};
use crate::trace::Slice;
use std::collections::HashMap;

/// Category whose slices are additionally broken down by sub-label
pub const BLINK_RCS_CATEGORY: &str = "Blink RCS";

/// Sub-label used for Blink RCS slices that carry none
pub const UNCLASSIFIED_SUBCATEGORY: &str = "Unclassified";

/// Accumulated time and call count for one category
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeGroup {
    pub name: String,
    /// Total time (microseconds)
    pub time: f64,
    pub count: u64,
}

impl RuntimeGroup {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            time: 0.0,
            count: 0,
        }
    }
}

/// Runtime groups built from one slice list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeGroupCollection {
    groups: Vec<RuntimeGroup>,
    by_name: HashMap<String, usize>,
    total_time: f64,
    total_count: u64,
    blink_rcs: Option<Box<RuntimeGroupCollection>>,
}

impl RuntimeGroupCollection {
    /// Build the collection for a slice list
    ///
    /// # Errors
    /// Fails with [`MetricError::CountOverflow`] if call counts sum past `u64::MAX`.
    ///
    /// # Example
    /// ```
    /// use runtime_stats::runtime_group::RuntimeGroupCollection;
    /// use runtime_stats::trace::Slice;
    ///
    /// let slices = vec![
    ///     Slice::new(0.0, 5.0, "Parse", 1),
    ///     Slice::new(6.0, 3.0, "GC", 2),
    ///     Slice::new(9.0, 1.0, "Parse", 1),
    /// ];
    /// let collection = RuntimeGroupCollection::from_slices(&slices).unwrap();
    ///
    /// assert_eq!(collection.total_time(), 9.0);
    /// assert_eq!(collection.group("Parse").unwrap().count, 2);
    /// ```
    pub fn from_slices<'a, I>(slices: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Slice>,
    {
        let mut collection = Self::default();
        let mut blink_rcs = Self::default();

        for slice in slices {
            collection.add(&slice.category, slice.duration, slice.count)?;

            if slice.category == BLINK_RCS_CATEGORY {
                let label = slice
                    .subcategory
                    .as_deref()
                    .unwrap_or(UNCLASSIFIED_SUBCATEGORY);
                blink_rcs.add(label, slice.duration, slice.count)?;
            }
        }

        if !blink_rcs.groups.is_empty() {
            collection.blink_rcs = Some(Box::new(blink_rcs));
        }
        Ok(collection)
    }

    fn add(&mut self, category: &str, time: f64, count: u64) -> Result<()> {
        let overflow = || MetricError::CountOverflow {
            category: category.to_string(),
        };
        self.total_count = self.total_count.checked_add(count).ok_or_else(overflow)?;
        self.total_time += time;

        let index = match self.by_name.get(category) {
            Some(&index) => index,
            None => {
                self.groups.push(RuntimeGroup::new(category));
                self.by_name
                    .insert(category.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        let group = &mut self.groups[index];
        group.count = group.count.checked_add(count).ok_or_else(overflow)?;
        group.time += time;
        Ok(())
    }

    /// Groups in order of first appearance
    pub fn groups(&self) -> &[RuntimeGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&RuntimeGroup> {
        self.by_name.get(name).map(|&index| &self.groups[index])
    }

    /// Sum of all slice durations (microseconds)
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Blink RCS breakdown, if any Blink RCS slices were seen
    pub fn blink_rcs(&self) -> Option<&RuntimeGroupCollection> {
        self.blink_rcs.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
