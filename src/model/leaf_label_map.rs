//! Leaf label module for phylogenetic tree representation.
//!
//! - `LeafLabelMap`: Joined storage and lookup for leaf labels of trees on
//!   (possibly overlapping) label sets.

use crate::model::label_storage::LabelStorage;
use std::collections::HashMap;
use std::fmt;

/// Index of a label in a [LeafLabelMap].
pub type LabelIndex = usize;

// =#========================================================================#=
// LEAF LABEL MAP
// =#========================================================================#=
/// Maps leaf labels (strings) to compact indices for efficient storage.
///
/// This bidirectional mapping allows multiple trees on the same taxa to share
/// a single label storage, with each leaf referencing labels by [LabelIndex].
/// Labels are deduplicated automatically - inserting the same label twice returns
/// the same index. Indices follow insertion order, not label order; the
/// sorted universe used for encoding is a [TaxonSet](crate::model::TaxonSet).
///
/// # Example
/// ```
/// use phylovec::model::leaf_label_map::LeafLabelMap;
///
/// let mut labels = LeafLabelMap::new(3);
///
/// let idx_a = labels.get_or_insert("A");  // idx_a = 0
/// let idx_b = labels.get_or_insert("B");  // idx_b = 1
/// let idx_a2 = labels.get_or_insert("A"); // idx_a2 = 0 (deduplicated)
///
/// assert_eq!(idx_a, idx_a2);
/// assert_eq!(labels.get_label(idx_a), Some("A"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LeafLabelMap {
    /// List of unique labels
    labels: Vec<String>,
    /// Map from label to its index
    map: HashMap<String, LabelIndex>,
}

impl LeafLabelMap {
    /// Creates a new LeafLabelMap with pre-allocated capacity.
    ///
    /// # Arguments
    /// * `num_leaves` - Expected number of unique leaf labels
    pub fn new(num_leaves: usize) -> Self {
        LeafLabelMap {
            labels: Vec::with_capacity(num_leaves),
            map: HashMap::with_capacity(num_leaves),
        }
    }

    /// Gets the index for a label, inserting it if it doesn't exist.
    ///
    /// If the label already exists, returns its existing index.
    /// If the label is new, assigns it the next available index.
    ///
    /// # Arguments
    /// * `label` - The label string to look up or insert
    ///
    /// # Returns
    /// The index associated with this label
    pub fn get_or_insert(&mut self, label: &str) -> LabelIndex {
        if let Some(&index) = self.map.get(label) {
            index
        } else {
            let index = self.labels.len();
            self.labels.push(label.to_string());
            self.map.insert(label.to_string(), index);
            index
        }
    }

    /// Retrieves the index for a given label.
    ///
    /// # Returns
    /// `Some(index)` if the label exists, `None` otherwise
    pub fn get_index(&self, label: &str) -> Option<LabelIndex> {
        self.map.get(label).copied()
    }

    /// Retrieves the leaf label for a given index.
    ///
    /// # Returns
    /// `Some(&str)` if the index is valid, `None` otherwise
    pub fn get_label(&self, index: LabelIndex) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Checks if a label exists in the map.
    pub fn contains_label(&self, label: &str) -> bool {
        self.map.contains_key(label)
    }

    /// Returns the number of labels currently stored.
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// Returns the labels in this map in insertion order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl LabelStorage for LeafLabelMap {
    type LabelRef = LabelIndex;

    fn with_capacity(num_labels: usize) -> Self {
        LeafLabelMap::new(num_labels)
    }

    fn store_and_ref(&mut self, label: &str) -> LabelIndex {
        self.get_or_insert(label)
    }

    fn check_and_ref(&self, label: &str) -> Option<LabelIndex> {
        self.get_index(label)
    }

    fn num_labels(&self) -> usize {
        self.labels.len()
    }
}

impl fmt::Display for LeafLabelMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "LeafLabelMap ({} labels):", self.labels.len())?;
        for (idx, label) in self.labels.iter().enumerate() {
            writeln!(f, "  [{}] {}", idx, label)?;
        }
        Ok(())
    }
}

impl std::ops::Index<LabelIndex> for LeafLabelMap {
    type Output = str;

    fn index(&self, index: LabelIndex) -> &Self::Output {
        &self.labels[index]
    }
}
