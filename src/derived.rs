//! Derived categories computed by subtraction from collection totals
//!
//! - `V8-Only` = total - Blink C++
//! - `Total-Main-Thread` = total - sum(background categories)
//! - `V8-Only-Main-Thread` = V8-Only - sum(background categories)
//!
//! Only top-level runtime groups take part; the Blink RCS breakdown never
//! subtracts from anything.

use crate::runtime_group::RuntimeGroupCollection;

/// Category subtracted to isolate engine-only time
pub const BLINK_CPP_CATEGORY: &str = "Blink C++";

/// Substring marking off-main-thread categories
pub const BACKGROUND_MARKER: &str = "Background";

pub const V8_ONLY: &str = "V8-Only";
pub const TOTAL_MAIN_THREAD: &str = "Total-Main-Thread";
pub const V8_ONLY_MAIN_THREAD: &str = "V8-Only-Main-Thread";

/// How a category participates in the derived subtraction rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryClass {
    /// Exactly "Blink C++"
    BlinkCpp,
    /// Name contains "Background"
    Background,
    Other,
}

impl CategoryClass {
    pub fn of(category: &str) -> Self {
        if category == BLINK_CPP_CATEGORY {
            CategoryClass::BlinkCpp
        } else if category.contains(BACKGROUND_MARKER) {
            CategoryClass::Background
        } else {
            CategoryClass::Other
        }
    }
}

/// Time (microseconds) and count for one derived category
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedValue {
    pub time: f64,
    pub count: u64,
}

/// The three derived categories of one collection
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedMetrics {
    pub v8_only: DerivedValue,
    pub total_main_thread: DerivedValue,
    pub v8_only_main_thread: DerivedValue,
}

impl DerivedMetrics {
    /// Compute derived categories from a collection's top-level groups
    ///
    /// # Example
    /// ```
    /// use runtime_stats::derived::DerivedMetrics;
    /// use runtime_stats::runtime_group::RuntimeGroupCollection;
    /// use runtime_stats::trace::Slice;
    ///
    /// let slices = vec![
    ///     Slice::new(0.0, 5.0, "Parse", 1),
    ///     Slice::new(10.0, 3.0, "Blink C++", 1),
    /// ];
    /// let derived = DerivedMetrics::compute(&RuntimeGroupCollection::from_slices(&slices).unwrap());
    /// assert_eq!(derived.v8_only.time, 5.0);
    /// assert_eq!(derived.total_main_thread.time, 8.0);
    /// ```
    pub fn compute(collection: &RuntimeGroupCollection) -> Self {
        let total = DerivedValue {
            time: collection.total_time(),
            count: collection.total_count(),
        };
        let mut v8_only = total;
        let mut background = DerivedValue::default();

        for group in collection.groups() {
            match CategoryClass::of(&group.name) {
                CategoryClass::BlinkCpp => {
                    v8_only.time -= group.time;
                    v8_only.count -= group.count;
                }
                CategoryClass::Background => {
                    background.time += group.time;
                    background.count += group.count;
                }
                CategoryClass::Other => {}
            }
        }

        Self {
            v8_only,
            total_main_thread: DerivedValue {
                time: total.time - background.time,
                count: total.count - background.count,
            },
            v8_only_main_thread: DerivedValue {
                time: v8_only.time - background.time,
                count: v8_only.count - background.count,
            },
        }
    }

    /// Derived categories as (name, value) pairs in emission order
    pub fn entries(&self) -> [(&'static str, DerivedValue); 3] {
        [
            (V8_ONLY, self.v8_only),
            (TOTAL_MAIN_THREAD, self.total_main_thread),
            (V8_ONLY_MAIN_THREAD, self.v8_only_main_thread),
        ]
    }
}
