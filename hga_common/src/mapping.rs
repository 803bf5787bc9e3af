//! Partial injective node mappings from graph A to graph B.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

/// An injective partial function from A-nodes to B-nodes.
///
/// Pairs keep insertion order, so scoring and reporting walk them the same way
/// every time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Mapping {
    // A node -> B node
    #[serde(flatten)]
    forward: IndexMap<String, String>,
    // B node -> A node
    #[serde(skip)]
    used_b: HashMap<String, String>,
}

impl Mapping {
    /// An empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `a` already has an image.
    #[must_use]
    pub fn is_mapped(&self, a: &str) -> bool {
        self.forward.contains_key(a)
    }

    /// Whether `b` is already somebody's image.
    #[must_use]
    pub fn is_used(&self, b: &str) -> bool {
        self.used_b.contains_key(b)
    }

    /// Image of `a`.
    #[must_use]
    pub fn get(&self, a: &str) -> Option<&str> {
        self.forward.get(a).map(String::as_str)
    }

    /// Preimage of `b`.
    #[must_use]
    pub fn preimage(&self, b: &str) -> Option<&str> {
        self.used_b.get(b).map(String::as_str)
    }

    /// Records `a -> b`. Both sides must be free.
    #[contracts::debug_requires(!self.is_mapped(&a))]
    #[contracts::debug_requires(!self.is_used(&b))]
    #[contracts::debug_ensures(self.len() == old(self.len()) + 1)]
    pub fn map(&mut self, a: String, b: String) {
        self.used_b.insert(b.clone(), a.clone());
        self.forward.insert(a, b);
    }

    /// Records `a -> b` unless either side is taken; returns whether it did.
    pub fn try_map(&mut self, a: impl Into<String>, b: impl Into<String>) -> bool {
        let (a, b) = (a.into(), b.into());
        if self.is_mapped(&a) || self.is_used(&b) {
            return false;
        }
        self.map(a, b);
        true
    }

    /// Drops the pair rooted at `a`, returning its image.
    #[contracts::debug_ensures(!self.is_mapped(a))]
    pub fn unmap(&mut self, a: &str) -> Option<String> {
        let b = self.forward.shift_remove(a)?;
        self.used_b.remove(&b);
        Some(b)
    }

    /// Adds every pair of `other` whose endpoints are still free here.
    ///
    /// Returns the number of pairs skipped because of a collision.
    pub fn merge(&mut self, other: &Self) -> usize {
        other
            .iter()
            .filter(|(a, b)| !self.try_map(*a, *b))
            .count()
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// True when nothing is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Pairs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + '_ {
        self.forward.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// Both directions agree and no B node is used twice.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.forward.len() == self.used_b.len()
            && self
                .forward
                .iter()
                .all(|(a, b)| self.used_b.get(b).is_some_and(|back| back == a))
    }
}

impl<A: Into<String>, B: Into<String>> FromIterator<(A, B)> for Mapping {
    /// Collects pairs, keeping the first claim on each node.
    fn from_iter<T: IntoIterator<Item = (A, B)>>(iter: T) -> Self {
        let mut mapping = Self::new();
        for (a, b) in iter {
            mapping.try_map(a, b);
        }
        mapping
    }
}
