//! Sorted taxon universe shared by encoding and decoding.

use crate::codec::CodecError;
use crate::model::leaf_label_map::LeafLabelMap;
use std::fmt;

// =#========================================================================#=
// TAXON SET
// =#========================================================================#=
/// The sorted, duplicate-free set of taxon labels a vector is defined over.
///
/// Labels are ordered byte-wise lexicographically (the order of [str]).
/// The position of a taxon in this order is its leaf entry in a vector, and
/// bit positions of split signatures refer to it as well.
///
/// # Example
/// ```
/// use phylovec::model::TaxonSet;
///
/// let taxa = TaxonSet::new(["Kea", "Kaka", "Kakapo"])?;
/// assert_eq!(taxa.labels(), ["Kaka", "Kakapo", "Kea"]);
/// assert_eq!(taxa.position("Kea"), Some(2));
/// # Ok::<(), phylovec::codec::CodecError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TaxonSet {
    labels: Vec<String>,
}

impl TaxonSet {
    /// Creates a taxon set from the given labels, sorting them.
    ///
    /// # Errors
    /// * [CodecError::DuplicateLabel] if a label occurs twice
    /// * [CodecError::EmptyLabel] if a label is empty
    pub fn new<I, S>(labels: I) -> Result<Self, CodecError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        labels.sort_unstable();

        if labels.first().is_some_and(String::is_empty) {
            return Err(CodecError::EmptyLabel);
        }
        if let Some(pair) = labels.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(CodecError::DuplicateLabel(pair[0].clone()));
        }

        Ok(Self { labels })
    }

    /// Creates the taxon set of all labels stored in a [LeafLabelMap],
    /// e.g. the union of the taxa of all trees parsed from one file.
    ///
    /// # Errors
    /// [CodecError::EmptyLabel] if the map contains an empty label.
    pub fn from_label_map(map: &LeafLabelMap) -> Result<Self, CodecError> {
        Self::new(map.labels().iter().map(String::as_str))
    }

    /// Returns the number of taxa.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns whether the set has no taxa.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the sorted labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the label at `position`, if in range.
    pub fn get(&self, position: usize) -> Option<&str> {
        self.labels.get(position).map(String::as_str)
    }

    /// Returns the position of `label` in the sorted order, if present.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels
            .binary_search_by(|probe| probe.as_str().cmp(label))
            .ok()
    }

    /// Returns whether `label` is part of this set.
    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    /// Returns an iterator over the sorted labels.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Returns a [LeafLabelMap] whose label indices equal the positions
    /// in this set.
    pub fn to_label_map(&self) -> LeafLabelMap {
        let mut map = LeafLabelMap::new(self.len());
        for label in &self.labels {
            map.get_or_insert(label);
        }
        map
    }
}

impl fmt::Display for TaxonSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.labels.join(","))
    }
}
