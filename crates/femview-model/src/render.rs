//! Render modes and the redraw intents commands declare.

/// Which view is on screen. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    #[default]
    Mesh,
    Plot,
}

/// What a command needs redrawn, resolved later against the active mode.
///
/// A *binding* directive forces its mode on screen; a *nonbinding* one only
/// refreshes when its mode is already active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RedrawDirective {
    #[default]
    NoVisualChange,
    BindingMeshVisual,
    NonbindingMeshVisual,
    BindingPlotVisual,
    NonbindingPlotVisual,
}

impl RedrawDirective {
    pub const ALL: [RedrawDirective; 5] = [
        Self::NoVisualChange,
        Self::BindingMeshVisual,
        Self::NonbindingMeshVisual,
        Self::BindingPlotVisual,
        Self::NonbindingPlotVisual,
    ];
}
