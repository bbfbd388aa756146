//! Order-stable frequency tally for discovered categories.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A discovered label and how many times it was reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

/// Counts labels by exact string equality, remembering first-encounter order.
///
/// [`CategoryTally::top`] breaks count ties by that order.
#[derive(Debug, Clone, Default)]
pub struct CategoryTally {
    counts: Vec<CategoryCount>,
    positions: HashMap<String, usize>,
}

impl CategoryTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: &str) {
        if let Some(&idx) = self.positions.get(label) {
            self.counts[idx].count += 1;
            return;
        }
        self.positions.insert(label.to_string(), self.counts.len());
        self.counts.push(CategoryCount {
            label: label.to_string(),
            count: 1,
        });
    }

    pub fn extend<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for label in labels {
            self.add(label.as_ref());
        }
    }

    #[must_use]
    pub fn count(&self, label: &str) -> u64 {
        self.positions
            .get(label)
            .map_or(0, |&idx| self.counts[idx].count)
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `n` most frequent labels, most frequent first.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<CategoryCount> {
        let mut ranked = self.counts.clone();
        // stable: equal counts keep first-encounter order
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(n);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn pair(label: &str, count: u64) -> CategoryCount {
        CategoryCount {
            label: label.to_string(),
            count,
        }
    }

    #[test]
    fn aggregates_across_batches() {
        let mut tally = CategoryTally::new();
        tally.extend(["a", "b"]);
        tally.extend(["a", "c"]);

        assert_eq!(tally.count("a"), 2);
        assert_eq!(tally.count("b"), 1);
        assert_eq!(tally.count("c"), 1);
        assert_eq!(tally.len(), 3);
        assert_eq!(tally.top(2), vec![pair("a", 2), pair("b", 1)]);
    }

    #[test]
    fn ties_follow_first_encounter() {
        let mut tally = CategoryTally::new();
        tally.extend(["c", "b", "a", "b", "c", "a"]);
        assert_eq!(tally.top(3), vec![pair("c", 2), pair("b", 2), pair("a", 2)]);
    }

    #[test]
    fn equality_is_exact() {
        let mut tally = CategoryTally::new();
        tally.extend(["Fire", "fire", "fire "]);
        assert_eq!(tally.len(), 3);
    }

    #[test]
    fn top_of_empty_is_empty() {
        let tally = CategoryTally::new();
        assert!(tally.is_empty());
        assert!(tally.top(20).is_empty());
        assert_eq!(tally.count("missing"), 0);
    }
}
