//! The frontend: where diagnostics, text and redraw requests go.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use femview_model::{RenderMode, ViewCenter};

/// Kind of a popup diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Usage,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Usage => "usage",
            Self::Error => "error",
        })
    }
}

/// Services the interpreter calls back into. Implementations must not block.
///
/// Only text output is mandatory. The visual callbacks default to no-ops for
/// frontends without a display.
pub trait Frontend {
    fn popup(&mut self, severity: Severity, message: &str);

    fn write_text(&mut self, text: &str);

    /// Redraw the given view.
    fn refresh(&mut self, _mode: RenderMode) {}

    fn recompute_normals(&mut self) {}

    fn center_view(&mut self, _center: &ViewCenter) {}

    /// Reload the displayed result after a result-affecting change.
    fn load_result(&mut self, _result: Option<&str>) {}
}

/// One call received by a [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum FrontendEvent {
    Popup(Severity, String),
    Text(String),
    Refresh(RenderMode),
    RecomputeNormals,
    CenterView(ViewCenter),
    LoadResult(Option<String>),
}

/// Frontend that records every call. Clones share one event log, so a
/// caller can keep a handle after moving a clone into a session.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Rc<RefCell<Vec<FrontendEvent>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FrontendEvent> {
        self.events.borrow().clone()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<FrontendEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// All text written so far, concatenated.
    pub fn text(&self) -> String {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                FrontendEvent::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn popups(&self) -> Vec<(Severity, String)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                FrontendEvent::Popup(s, m) => Some((*s, m.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn refreshes(&self) -> Vec<RenderMode> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                FrontendEvent::Refresh(mode) => Some(*mode),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: FrontendEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl Frontend for Recorder {
    fn popup(&mut self, severity: Severity, message: &str) {
        self.push(FrontendEvent::Popup(severity, message.to_string()));
    }

    fn write_text(&mut self, text: &str) {
        self.push(FrontendEvent::Text(text.to_string()));
    }

    fn refresh(&mut self, mode: RenderMode) {
        self.push(FrontendEvent::Refresh(mode));
    }

    fn recompute_normals(&mut self) {
        self.push(FrontendEvent::RecomputeNormals);
    }

    fn center_view(&mut self, center: &ViewCenter) {
        self.push(FrontendEvent::CenterView(*center));
    }

    fn load_result(&mut self, result: Option<&str>) {
        self.push(FrontendEvent::LoadResult(result.map(str::to_string)));
    }
}
