//! The selection set: objects picked with `select` and cleared with `clrsel`.

use std::collections::BTreeMap;

/// One selected mesh object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecifiedObject {
    pub class: String,
    /// 0-based internal index.
    pub ident: usize,
    /// 1-based user-facing label.
    pub label: i64,
}

/// Selected objects keyed by `(class, ident)`.
///
/// Membership is a toggle: selecting a present object removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    entries: BTreeMap<(String, usize), i64>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of an object. Returns `true` when it is now selected.
    pub fn toggle(&mut self, class: &str, ident: usize, label: i64) -> bool {
        let key = (class.to_string(), ident);
        if self.entries.remove(&key).is_some() {
            false
        } else {
            self.entries.insert(key, label);
            true
        }
    }

    pub fn contains(&self, class: &str, ident: usize) -> bool {
        self.entries.contains_key(&(class.to_string(), ident))
    }

    /// Remove one object. Returns `false` when it was not selected.
    pub fn remove(&mut self, class: &str, ident: usize) -> bool {
        self.entries.remove(&(class.to_string(), ident)).is_some()
    }

    /// Drop every selected object of a class, returning how many were removed.
    pub fn clear_class(&mut self, class: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(c, _), _| c != class);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_in_class(&self, class: &str) -> usize {
        self.entries.keys().filter(|(c, _)| c == class).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = SpecifiedObject> + '_ {
        self.entries.iter().map(|((class, ident), &label)| SpecifiedObject {
            class: class.clone(),
            ident: *ident,
            label,
        })
    }
}
