//! Resumable sub-parser behind the `mtl` and `surf` commands.
//!
//! Tokens are consumed one at a time into an accumulator that outlives the
//! command. A command ending in `continue` leaves the accumulator as it is,
//! and the next command of the same kind picks up where it stopped. Without
//! `continue` the pending operations are flushed and the accumulator resets.

use std::collections::BTreeMap;

use femview_model::{ColorProperty, PropertySnapshot, PropertyTable};

use crate::numeric::is_numeric_token;

/// Which object family a parser edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Material,
    Surface,
}

impl PropertyKind {
    fn manager(self) -> &'static str {
        match self {
            Self::Material => "Mtl Mgr",
            Self::Surface => "Surf Mgr",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Self::Material => "Material",
            Self::Surface => "Surface",
        }
    }
}

/// The live arrays a parser writes into.
pub struct PropertyTargets<'a> {
    pub table: &'a mut PropertyTable,
    pub hide: &'a mut [bool],
    pub disable: &'a mut [bool],
}

/// Effects of one command on the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyOutcome {
    pub redraw: bool,
    pub renorm: bool,
    pub result_mod: bool,
    /// The command ended with `continue`.
    pub suspended: bool,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Pending {
    visible: bool,
    invisible: bool,
    enable: bool,
    disable: bool,
    mat: bool,
    defaults: bool,
    modify_all: bool,
    reading_targets: bool,
    /// 1-based object numbers as typed.
    targets: Vec<i64>,
    property: Option<ColorProperty>,
    values: Vec<f32>,
}

/// Accumulator of one property sub-parser.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyParser {
    kind: PropertyKind,
    preview: bool,
    snapshots: BTreeMap<ColorProperty, PropertySnapshot>,
    pending: Pending,
}

impl PropertyParser {
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            preview: false,
            snapshots: BTreeMap::new(),
            pending: Pending::default(),
        }
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn is_previewing(&self) -> bool {
        self.preview
    }

    /// True between a `continue` and the command that completes it.
    pub fn is_suspended(&self) -> bool {
        self.pending != Pending::default()
    }

    /// Parse the operands of one `mtl`/`surf` command.
    pub fn parse(&mut self, tokens: &[String], targets: &mut PropertyTargets<'_>) -> PropertyOutcome {
        let mut outcome = PropertyOutcome::default();
        for (i, token) in tokens.iter().enumerate() {
            match token.as_str() {
                "preview" => self.preview = true,
                "apply" => {
                    self.flush(targets, &mut outcome);
                    self.snapshots.clear();
                    self.preview = false;
                    self.ignore_rest(&tokens[i + 1..], &mut outcome);
                    outcome.redraw = false;
                    return outcome;
                }
                "cancel" => {
                    self.pending = Pending::default();
                    for (property, snapshot) in std::mem::take(&mut self.snapshots) {
                        targets.table.restore(property, snapshot);
                    }
                    self.preview = false;
                    self.ignore_rest(&tokens[i + 1..], &mut outcome);
                    outcome.redraw = true;
                    return outcome;
                }
                "continue" => {
                    outcome.suspended = true;
                    return outcome;
                }
                word if is_numeric_token(word) => self.numeric(word, &mut outcome),
                word => self.keyword(word, targets, &mut outcome),
            }
        }
        self.flush(targets, &mut outcome);
        outcome.redraw = true;
        outcome
    }

    fn ignore_rest(&self, rest: &[String], outcome: &mut PropertyOutcome) {
        if !rest.is_empty() {
            outcome
                .warnings
                .push(format!("{}: ignoring tokens after transaction keyword: {}", self.kind.manager(), rest.join(" ")));
        }
    }

    fn numeric(&mut self, word: &str, outcome: &mut PropertyOutcome) {
        let pending = &mut self.pending;
        if pending.targets.is_empty() {
            pending.reading_targets = true;
        }
        if pending.reading_targets {
            // Whole part only, as the numbers name objects.
            let whole = word.split('.').next().unwrap_or_default();
            pending.targets.push(whole.parse().unwrap_or(0));
        } else if pending.mat
            && let Some(property) = pending.property
            && pending.values.len() < property.value_count()
        {
            pending.values.push(word.parse().unwrap_or(0.0));
        } else {
            outcome
                .warnings
                .push(format!("Bad {} numeric token parse.", self.kind.manager()));
        }
    }

    fn keyword(&mut self, word: &str, targets: &mut PropertyTargets<'_>, outcome: &mut PropertyOutcome) {
        if self.pending.mat
            && let Some(property) = ColorProperty::from_keyword(word)
        {
            self.pending.reading_targets = false;
            if self.preview {
                self.snapshots
                    .entry(property)
                    .or_insert_with(|| targets.table.snapshot(property));
            }
            self.flush_property(targets, outcome);
            self.pending.property = Some(property);
            return;
        }

        let pending = &mut self.pending;
        match word {
            "vis" => pending.visible = true,
            "invis" => pending.invisible = true,
            "enable" => pending.enable = true,
            "disable" => pending.disable = true,
            "mat" => pending.mat = true,
            "default" => pending.defaults = true,
            "all" if pending.visible || pending.invisible || pending.enable || pending.disable => {
                pending.modify_all = true;
            }
            _ => outcome.warnings.push(format!("Bad {} parse.", self.kind.manager())),
        }
    }

    /// 0-based indices of the typed targets, reporting those out of range.
    fn target_indices(&self, qty: usize, outcome: &mut PropertyOutcome) -> Vec<usize> {
        let mut indices = Vec::with_capacity(self.pending.targets.len());
        for &number in &self.pending.targets {
            match usize::try_from(number - 1) {
                Ok(index) if index < qty => indices.push(index),
                _ => outcome
                    .warnings
                    .push(format!("{} {number} out of range 1..{qty}; skipped.", self.kind.noun())),
            }
        }
        indices
    }

    /// Write the property being read. A property short of values is
    /// reported and left unchanged.
    fn flush_property(&mut self, targets: &mut PropertyTargets<'_>, outcome: &mut PropertyOutcome) {
        let Some(property) = self.pending.property.take() else {
            return;
        };
        let read = std::mem::take(&mut self.pending.values);
        if read.len() < property.value_count() {
            outcome
                .warnings
                .push(format!("Bad {} color property parse.", self.kind.manager()));
            return;
        }
        let mut values = [0.0f32; 3];
        for (slot, v) in values.iter_mut().zip(&read) {
            *slot = *v;
        }
        if self.preview {
            self.snapshots
                .entry(property)
                .or_insert_with(|| targets.table.snapshot(property));
        }
        for index in self.target_indices(targets.table.len(), outcome) {
            targets.table.set(property, index, values);
        }
    }

    fn flush(&mut self, targets: &mut PropertyTargets<'_>, outcome: &mut PropertyOutcome) {
        if self.pending.mat {
            self.flush_property(targets, outcome);
        } else if self.pending.defaults {
            for index in self.target_indices(targets.table.len(), outcome) {
                targets.table.reset_to_default(index);
            }
        } else {
            let p = &self.pending;
            let all = p.modify_all;
            if p.visible || p.invisible {
                let hide = p.invisible;
                let indices = if all {
                    (0..targets.hide.len()).collect()
                } else {
                    self.target_indices(targets.hide.len(), outcome)
                };
                for index in indices {
                    targets.hide[index] = hide;
                }
                outcome.renorm = true;
                outcome.result_mod = true;
            }
            let p = &self.pending;
            if p.enable || p.disable {
                let disable = p.disable;
                let indices = if all {
                    (0..targets.disable.len()).collect()
                } else {
                    self.target_indices(targets.disable.len(), outcome)
                };
                for index in indices {
                    targets.disable[index] = disable;
                }
                outcome.result_mod = true;
            }
        }
        self.pending = Pending::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Arrays {
        table: PropertyTable,
        hide: Vec<bool>,
        disable: Vec<bool>,
    }

    impl Arrays {
        fn new(qty: usize) -> Self {
            Self {
                table: PropertyTable::with_defaults(qty),
                hide: vec![false; qty],
                disable: vec![false; qty],
            }
        }

        fn run(&mut self, parser: &mut PropertyParser, line: &str) -> PropertyOutcome {
            let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
            let mut targets = PropertyTargets {
                table: &mut self.table,
                hide: &mut self.hide,
                disable: &mut self.disable,
            };
            parser.parse(&tokens, &mut targets)
        }
    }

    #[test]
    fn invis_targets_and_all() {
        let mut arrays = Arrays::new(4);
        let mut parser = PropertyParser::new(PropertyKind::Material);
        let out = arrays.run(&mut parser, "invis 2 4");
        assert_eq!(arrays.hide, vec![false, true, false, true]);
        assert!(out.renorm && out.result_mod && out.redraw);

        arrays.run(&mut parser, "vis all");
        assert_eq!(arrays.hide, vec![false; 4]);
        assert!(!parser.is_suspended());
    }

    #[test]
    fn combined_visibility_and_enable() {
        let mut arrays = Arrays::new(3);
        let mut parser = PropertyParser::new(PropertyKind::Material);
        let out = arrays.run(&mut parser, "invis disable 1 3");
        assert_eq!(arrays.hide, vec![true, false, true]);
        assert_eq!(arrays.disable, vec![true, false, true]);
        assert!(out.result_mod);
    }

    #[test]
    fn color_property_sets_alpha() {
        let mut arrays = Arrays::new(3);
        let mut parser = PropertyParser::new(PropertyKind::Material);
        arrays.run(&mut parser, "mat 1 3 diff 0.5 0.25 1 shine 12");
        assert_eq!(arrays.table.rgba(ColorProperty::Diffuse, 0), Some([0.5, 0.25, 1.0, 1.0]));
        assert_eq!(arrays.table.rgba(ColorProperty::Diffuse, 2), Some([0.5, 0.25, 1.0, 1.0]));
        assert_eq!(arrays.table.shininess(2), Some(12.0));
        assert_ne!(arrays.table.rgba(ColorProperty::Diffuse, 1), Some([0.5, 0.25, 1.0, 1.0]));
    }

    #[test]
    fn continuation_resumes_mid_values() {
        let mut arrays = Arrays::new(2);
        let mut parser = PropertyParser::new(PropertyKind::Material);
        let first = arrays.run(&mut parser, "mat 2 amb 0.1 continue");
        assert!(first.suspended && !first.redraw);
        assert!(parser.is_suspended());
        arrays.run(&mut parser, "0.2 0.3");
        assert_eq!(arrays.table.rgba(ColorProperty::Ambient, 1), Some([0.1, 0.2, 0.3, 1.0]));
    }

    #[test]
    fn preview_cancel_restores() {
        let mut arrays = Arrays::new(2);
        let before = arrays.table.clone();
        let mut parser = PropertyParser::new(PropertyKind::Surface);
        arrays.run(&mut parser, "preview mat 1 2 spec 1 1 1");
        assert!(parser.is_previewing());
        assert_ne!(arrays.table, before);
        let out = arrays.run(&mut parser, "cancel");
        assert!(out.redraw);
        assert_eq!(arrays.table, before);
        assert!(!parser.is_previewing());
    }

    #[test]
    fn preview_apply_keeps_changes() {
        let mut arrays = Arrays::new(2);
        let mut parser = PropertyParser::new(PropertyKind::Material);
        arrays.run(&mut parser, "preview mat 1 emis 0.5 0.5 0.5");
        let out = arrays.run(&mut parser, "apply");
        assert!(!out.redraw);
        arrays.run(&mut parser, "cancel");
        assert_eq!(arrays.table.rgba(ColorProperty::Emissive, 0), Some([0.5, 0.5, 0.5, 1.0]));
    }

    #[test]
    fn bad_tokens_are_reported() {
        let mut arrays = Arrays::new(2);
        let mut parser = PropertyParser::new(PropertyKind::Material);
        let out = arrays.run(&mut parser, "invis 1 bogus 9");
        assert_eq!(arrays.hide, vec![true, false]);
        assert_eq!(
            out.warnings,
            vec!["Bad Mtl Mgr parse.".to_string(), "Material 9 out of range 1..2; skipped.".to_string()]
        );

        // Targets keep reading after a keyword, so the fraction names object 0.
        let out = arrays.run(&mut parser, "vis 1 enable 2 0.5");
        assert_eq!(arrays.hide, vec![false, false]);
        assert_eq!(out.warnings, vec!["Material 0 out of range 1..2; skipped.".to_string(); 2]);
    }

    #[test]
    fn short_property_is_not_written() {
        let mut arrays = Arrays::new(2);
        let before = arrays.table.rgba(ColorProperty::Ambient, 0);
        let mut parser = PropertyParser::new(PropertyKind::Material);
        let out = arrays.run(&mut parser, "mat 1 amb 0.5 diff 1 1 1");
        assert_eq!(arrays.table.rgba(ColorProperty::Ambient, 0), before);
        assert_eq!(arrays.table.rgba(ColorProperty::Diffuse, 0), Some([1.0, 1.0, 1.0, 1.0]));
        assert_eq!(out.warnings, vec!["Bad Mtl Mgr color property parse.".to_string()]);
    }

    #[test]
    fn short_final_property_is_not_written() {
        let mut arrays = Arrays::new(2);
        let before = arrays.table.rgba(ColorProperty::Specular, 1);
        let mut parser = PropertyParser::new(PropertyKind::Surface);
        let out = arrays.run(&mut parser, "mat 2 spec 0.5 0.5");
        assert_eq!(arrays.table.rgba(ColorProperty::Specular, 1), before);
        assert_eq!(out.warnings, vec!["Bad Surf Mgr color property parse.".to_string()]);
        assert!(!parser.is_suspended());
    }

    #[test]
    fn surplus_values_are_rejected() {
        let mut arrays = Arrays::new(2);
        let mut parser = PropertyParser::new(PropertyKind::Material);
        let out = arrays.run(&mut parser, "mat 1 shine 1 2");
        assert_eq!(arrays.table.shininess(0), Some(1.0));
        assert_eq!(out.warnings, vec!["Bad Mtl Mgr numeric token parse.".to_string()]);

        let out = arrays.run(&mut parser, "mat 2 diff 0.1 0.2 0.3 0.4");
        assert_eq!(arrays.table.rgba(ColorProperty::Diffuse, 1), Some([0.1, 0.2, 0.3, 1.0]));
        assert_eq!(out.warnings, vec!["Bad Mtl Mgr numeric token parse.".to_string()]);
    }

    #[test]
    fn defaults_reset_targets() {
        let mut arrays = Arrays::new(2);
        let fresh = arrays.table.clone();
        let mut parser = PropertyParser::new(PropertyKind::Material);
        arrays.run(&mut parser, "mat 1 2 diff 0 0 0");
        arrays.run(&mut parser, "default 1 2");
        assert_eq!(arrays.table, fresh);
    }
}
