//! Resolution of redraw directives against the active render mode.

use femview_model::{RedrawDirective, RenderMode, ViewCenter};

/// Concrete redraw work for the session to carry out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedrawAction {
    /// Mode to force on screen before refreshing.
    pub switch_to: Option<RenderMode>,
    pub refresh: bool,
    /// Re-center the mesh view before refreshing.
    pub center_view: bool,
}

/// Map a directive and the active mode to an action.
///
/// | directive | mesh mode | plot mode |
/// |---|---|---|
/// | BindingMeshVisual | force mesh, refresh | force mesh, refresh |
/// | NonbindingMeshVisual | refresh | no-op |
/// | BindingPlotVisual | force plot, refresh | force plot, refresh |
/// | NonbindingPlotVisual | no-op | refresh |
/// | NoVisualChange | no-op | no-op |
pub fn resolve(directive: RedrawDirective, mode: RenderMode) -> RedrawAction {
    let refresh = |switch_to| RedrawAction {
        switch_to,
        refresh: true,
        center_view: false,
    };
    match (directive, mode) {
        (RedrawDirective::BindingMeshVisual, _) => refresh(Some(RenderMode::Mesh)),
        (RedrawDirective::BindingPlotVisual, _) => refresh(Some(RenderMode::Plot)),
        (RedrawDirective::NonbindingMeshVisual, RenderMode::Mesh)
        | (RedrawDirective::NonbindingPlotVisual, RenderMode::Plot) => refresh(None),
        _ => RedrawAction::default(),
    }
}

impl RedrawAction {
    /// Apply the `refresh` gate and view centering.
    ///
    /// A mode switch survives a closed gate; the refresh does not. Centering
    /// only happens on a mesh refresh with centering active.
    pub fn gated(self, mode: RenderMode, refresh_enabled: bool, vcent: ViewCenter) -> Self {
        let target = self.switch_to.unwrap_or(mode);
        let refresh = self.refresh && refresh_enabled;
        Self {
            switch_to: self.switch_to,
            refresh,
            center_view: refresh && target == RenderMode::Mesh && vcent != ViewCenter::Off,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_gate_keeps_switch() {
        let action = resolve(RedrawDirective::BindingPlotVisual, RenderMode::Mesh).gated(
            RenderMode::Mesh,
            false,
            ViewCenter::Off,
        );
        assert_eq!(action.switch_to, Some(RenderMode::Plot));
        assert!(!action.refresh);
    }

    #[test]
    fn centering_only_for_mesh() {
        let mesh = resolve(RedrawDirective::NonbindingMeshVisual, RenderMode::Mesh).gated(
            RenderMode::Mesh,
            true,
            ViewCenter::Hilite,
        );
        assert!(mesh.center_view);
        let plot = resolve(RedrawDirective::BindingPlotVisual, RenderMode::Mesh).gated(
            RenderMode::Mesh,
            true,
            ViewCenter::Hilite,
        );
        assert!(!plot.center_view);
    }
}
