//! Mesh object classes and their label indirection.

use std::collections::BTreeMap;

use crate::error::{ModelError, Result};

/// Category a mesh object class belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Superclass {
    Node,
    Brick,
    Shell,
    Truss,
    Beam,
    Surface,
    Material,
}

impl Superclass {
    /// Keyword accepted on the command line for the superclass.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Brick => "brick",
            Self::Shell => "shell",
            Self::Truss => "truss",
            Self::Beam => "beam",
            Self::Surface => "surface",
            Self::Material => "mat",
        }
    }

    /// Parse the class keywords used by `vis`/`invis`/`enable`/`disable`.
    ///
    /// Matching is case-insensitive so `BRICK` and `brick` are equivalent.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "node" | "n" => Some(Self::Node),
            "brick" | "h" | "hex" => Some(Self::Brick),
            "shell" | "s" => Some(Self::Shell),
            "truss" | "t" => Some(Self::Truss),
            "beam" | "b" => Some(Self::Beam),
            "surface" | "surf" => Some(Self::Surface),
            "mat" | "part" => Some(Self::Material),
            _ => None,
        }
    }
}

/// A named category of mesh objects with a contiguous identifier space.
///
/// Identifiers are 0-based internally. Labels are what the user types. When a
/// class carries no label table the label of ident `i` is `i + 1`.
#[derive(Debug, Clone)]
pub struct MeshClass {
    name: String,
    long_name: String,
    superclass: Superclass,
    qty: usize,
    labels: Option<Vec<i64>>,
    label_index: BTreeMap<i64, usize>,
}

impl MeshClass {
    pub fn new(name: impl Into<String>, long_name: impl Into<String>, superclass: Superclass, qty: usize) -> Self {
        Self {
            name: name.into(),
            long_name: long_name.into(),
            superclass,
            qty,
            labels: None,
            label_index: BTreeMap::new(),
        }
    }

    /// Attach a label table. One label per object, no duplicates.
    pub fn with_labels(mut self, labels: Vec<i64>) -> Result<Self> {
        if labels.len() != self.qty {
            return Err(ModelError::InvalidBlock(format!(
                "class {} has {} objects but {} labels",
                self.name,
                self.qty,
                labels.len()
            )));
        }
        let mut index = BTreeMap::new();
        for (ident, &label) in labels.iter().enumerate() {
            if index.insert(label, ident).is_some() {
                return Err(ModelError::InvalidBlock(format!(
                    "duplicate label {label} in class {}",
                    self.name
                )));
            }
        }
        self.labels = Some(labels);
        self.label_index = index;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn superclass(&self) -> Superclass {
        self.superclass
    }

    pub fn qty(&self) -> usize {
        self.qty
    }

    pub fn has_labels(&self) -> bool {
        self.labels.is_some()
    }

    /// User-facing label of an internal identifier.
    pub fn label_of(&self, ident: usize) -> Option<i64> {
        match &self.labels {
            Some(labels) => labels.get(ident).copied(),
            None if ident < self.qty => i64::try_from(ident).ok().map(|i| i + 1),
            None => None,
        }
    }

    /// Internal identifier of a user label, `None` when the label is unknown.
    pub fn index_of_label(&self, label: i64) -> Option<usize> {
        if self.labels.is_some() {
            return self.label_index.get(&label).copied();
        }
        let ident = usize::try_from(label.checked_sub(1)?).ok()?;
        (ident < self.qty).then_some(ident)
    }

    /// Iterate over every label of the class in ident order.
    pub fn labels(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.qty).filter_map(|ident| self.label_of(ident))
    }
}
