//! Command handlers, grouped by concern.
//!
//! Every handler has the [`Handler`](crate::dispatch::Handler) signature and
//! is reached only through the command table.

pub mod display;
pub mod info;
pub mod objects;
pub mod replay;
pub mod results;
pub mod traction;
pub mod view;

use femview_model::{MeshClass, ModelError};

use crate::numeric::IdentSpec;

/// Objects named by identifier tokens, plus the problems met on the way.
#[derive(Debug, Default)]
pub(crate) struct Resolved {
    /// `(ident, label)` pairs in token order.
    pub idents: Vec<(usize, i64)>,
    pub warnings: Vec<String>,
}

/// Map `all`, ranges and single labels of `class` to internal identifiers.
///
/// Unknown labels and bad tokens are reported and skipped; the remaining
/// tokens still apply.
pub(crate) fn resolve_idents(class: &MeshClass, tokens: &[String]) -> Resolved {
    let mut resolved = Resolved::default();
    for token in tokens {
        match IdentSpec::parse(token) {
            None => resolved.warnings.push(format!("Invalid identifier \"{token}\"")),
            Some(IdentSpec::All) => {
                resolved
                    .idents
                    .extend((0..class.qty()).filter_map(|ident| Some((ident, class.label_of(ident)?))));
            }
            Some(IdentSpec::Range(lo, hi)) => {
                let before = resolved.idents.len();
                if class.has_labels() {
                    let found = class
                        .labels()
                        .filter(|label| (lo..=hi).contains(label))
                        .filter_map(|label| Some((class.index_of_label(label)?, label)));
                    resolved.idents.extend(found);
                } else {
                    let last = i64::try_from(class.qty()).unwrap_or(i64::MAX);
                    for label in lo.max(1)..=hi.min(last) {
                        if let Some(ident) = class.index_of_label(label) {
                            resolved.idents.push((ident, label));
                        }
                    }
                }
                let found = resolved.idents.len() - before;
                let missing = (hi - lo + 1).saturating_sub(i64::try_from(found).unwrap_or(i64::MAX));
                if missing > 0 {
                    resolved.warnings.push(format!(
                        "{missing} of {} {lo}-{hi} are not valid labels; skipped.",
                        class.name()
                    ));
                }
            }
            Some(IdentSpec::Single(label)) => match class.index_of_label(label) {
                Some(ident) => resolved.idents.push((ident, label)),
                None => resolved.warnings.push(
                    ModelError::InvalidLabel {
                        class: class.name().to_string(),
                        label,
                    }
                    .to_string(),
                ),
            },
        }
    }
    resolved
}

/// Tokens after the keyword joined back into text.
pub(crate) fn rest_text(tokens: &[String]) -> String {
    tokens[1..].join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use femview_model::Superclass;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn ranges_clip_to_unlabeled_class() {
        let class = MeshClass::new("brick", "Bricks", Superclass::Brick, 5);
        let resolved = resolve_idents(&class, &words(&["4-8"]));
        assert_eq!(resolved.idents, vec![(3, 4), (4, 5)]);
        assert_eq!(resolved.warnings, vec!["3 of brick 4-8 are not valid labels; skipped."]);
    }

    #[test]
    fn labeled_class_maps_through_table() {
        let class = MeshClass::new("brick", "Bricks", Superclass::Brick, 3)
            .with_labels(vec![10, 11, 20])
            .unwrap();
        let resolved = resolve_idents(&class, &words(&["10:12", "20", "7", "x"]));
        assert_eq!(resolved.idents, vec![(0, 10), (1, 11), (2, 20)]);
        assert_eq!(
            resolved.warnings,
            vec![
                "1 of brick 10-12 are not valid labels; skipped.".to_string(),
                "brick 7 is not a valid label".to_string(),
                "Invalid identifier \"x\"".to_string(),
            ]
        );
    }

    #[test]
    fn all_covers_every_object() {
        let class = MeshClass::new("node", "Nodes", Superclass::Node, 3);
        let resolved = resolve_idents(&class, &words(&["all"]));
        assert_eq!(resolved.idents, vec![(0, 1), (1, 2), (2, 3)]);
        assert!(resolved.warnings.is_empty());
    }
}
