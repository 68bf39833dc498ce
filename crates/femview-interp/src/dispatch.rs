//! The static command table and handler outcomes.
//!
//! Every command keyword maps to one [`CommandSpec`]. Lookup is an exact,
//! case-sensitive match on the first token; there is no prefix matching.
//! The table is built once and cached in a [`OnceLock`].

use std::collections::HashMap;
use std::sync::OnceLock;

use femview_model::RedrawDirective;

use crate::commands::{display, info, objects, replay, results, traction, view};
use crate::error::Result;
use crate::session::Session;

/// What a successful handler asks the session to do next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub redraw: RedrawDirective,
    /// Recompute normals before redrawing.
    pub renorm: bool,
    /// Reload the displayed result after redrawing.
    pub result_mod: bool,
    /// Keep the command out of the history log.
    pub unlogged: bool,
}

impl Outcome {
    pub fn new(redraw: RedrawDirective) -> Self {
        Self {
            redraw,
            ..Self::default()
        }
    }

    /// No visual change.
    pub fn quiet() -> Self {
        Self::default()
    }

    /// Refresh the mesh view if it is on screen.
    pub fn mesh() -> Self {
        Self::new(RedrawDirective::NonbindingMeshVisual)
    }

    pub fn with_renorm(mut self) -> Self {
        self.renorm = true;
        self
    }

    pub fn with_result_mod(mut self) -> Self {
        self.result_mod = true;
        self
    }

    pub fn not_logged(mut self) -> Self {
        self.unlogged = true;
        self
    }
}

pub type Handler = fn(&mut Session, &[String]) -> Result<Outcome>;

/// One entry of the command table.
pub struct CommandSpec {
    pub name: &'static str,
    /// Fewest tokens accepted, the keyword included.
    pub min_tokens: usize,
    pub usage: &'static str,
    pub summary: &'static str,
    pub handler: Handler,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("min_tokens", &self.min_tokens)
            .finish_non_exhaustive()
    }
}

macro_rules! command {
    ($name:literal, $min:literal, $usage:literal, $summary:literal, $handler:path) => {
        CommandSpec {
            name: $name,
            min_tokens: $min,
            usage: $usage,
            summary: $summary,
            handler: $handler,
        }
    };
}

/// Every command, in help order.
pub static COMMANDS: &[CommandSpec] = &[
    command!("rx", 2, "rx <degrees>", "rotate view about x", view::rotate),
    command!("ry", 2, "ry <degrees>", "rotate view about y", view::rotate),
    command!("rz", 2, "rz <degrees>", "rotate view about z", view::rotate),
    command!("tx", 2, "tx <distance>", "translate view along x", view::translate),
    command!("ty", 2, "ty <distance>", "translate view along y", view::translate),
    command!("tz", 2, "tz <distance>", "translate view along z", view::translate),
    command!("scale", 2, "scale <factor>", "scale view uniformly", view::scale),
    command!("scalax", 4, "scalax <sx> <sy> <sz>", "scale view per axis", view::scale_axes),
    command!("rview", 1, "rview", "reset the view", view::reset_view),
    command!("vcent", 2, "vcent off | hi | n <node> | <x> <y> <z>", "set the view center", view::view_center),
    command!("on", 2, "on <flag> ...", "turn display flags on", display::on_off),
    command!("off", 2, "off <flag> ...", "turn display flags off", display::on_off),
    command!("switch", 2, "switch <option> ...", "set render switches", display::switch),
    command!("sw", 2, "sw <option> ...", "set render switches", display::switch),
    command!("title", 2, "title <text>", "set the title", display::title),
    command!("resttl", 1, "resttl", "reset the title", display::reset_title),
    command!("conv", 3, "conv <scale> <offset>", "convert result values", display::conversion),
    command!("clrconv", 1, "clrconv", "clear result conversion", display::clear_conversion),
    command!("vis", 2, "vis [result] [<class>] <ids>", "make objects visible", objects::visibility),
    command!("invis", 2, "invis [result] [<class>] <ids>", "make objects invisible", objects::visibility),
    command!("enable", 2, "enable [<class>] <ids>", "enable objects", objects::enable),
    command!("disable", 2, "disable [<class>] <ids>", "disable objects", objects::enable),
    command!("include", 3, "include <class> <ids>", "include objects in results", objects::include),
    command!("exclude", 3, "exclude <class> <ids>", "exclude objects from results", objects::include),
    command!("mtl", 1, "mtl <operations> [continue]", "edit material properties", objects::material_props),
    command!("surf", 1, "surf <operations> [continue]", "edit surface properties", objects::surface_props),
    command!("select", 2, "select <class> <ids> | select <file>", "toggle selected objects", objects::select),
    command!("clrsel", 1, "clrsel [<class> [<ids>]]", "clear selected objects", objects::clear_selection),
    command!("tellsel", 1, "tellsel", "list selected objects", objects::tell_selection),
    command!("hilite", 3, "hilite <class> <label>", "highlight one object", objects::hilite),
    command!("clrhil", 1, "clrhil", "clear the highlight", objects::clear_hilite),
    command!("show", 2, "show <result>", "display a result", results::show),
    command!("plot", 1, "plot [<result> ...]", "time-history plot", results::plot),
    command!("clrplot", 1, "clrplot", "clear plot results", results::clear_plot),
    command!("state", 2, "state <n>", "go to a state", results::state),
    command!("n", 1, "n", "next state", results::step_state),
    command!("p", 1, "p", "previous state", results::step_state),
    command!("f", 1, "f", "first state", results::step_state),
    command!("l", 1, "l", "last state", results::step_state),
    command!("time", 2, "time <t>", "go to a time", results::time),
    command!("echo", 1, "echo <text>", "print text", replay::echo),
    command!("alias", 1, "alias [<name> [<tokens> ...]]", "define or list aliases", replay::alias),
    command!("r", 1, "r", "repeat the last command", replay::repeat),
    command!("savhis", 2, "savhis <file>", "start saving history", replay::save_history),
    command!("endhis", 1, "endhis", "stop saving history", replay::end_history),
    command!("outhis", 2, "outhis <file>", "write the history list", replay::output_history),
    command!("rdhis", 2, "rdhis <file> [<line>]", "replay a command file", replay::read_history),
    command!("h", 2, "h <file> [<line>]", "replay a command file", replay::read_history),
    command!("loop", 2, "loop <file>", "replay a command file repeatedly", replay::loop_file),
    command!("pause", 1, "pause", "pause command file replay", replay::pause),
    command!("resume", 1, "resume", "resume a paused replay", replay::resume),
    command!(
        "surface",
        3,
        "surface rect|ring|spot|tube n px py pz vx vy vz <shape args> | surface poly <file>",
        "define a traction surface",
        traction::surface
    ),
    command!("traction", 2, "traction all | traction <qty> <m1> ... <mqty>", "integrate traction", traction::traction),
    command!("tellpos", 2, "tellpos <node>", "print a node position", info::tell_position),
    command!("info", 1, "info", "print a session summary", info::info),
    command!("help", 1, "help", "list commands", info::help),
    command!("?", 1, "?", "list commands", info::help),
    command!("quit", 1, "quit", "end the session", replay::quit),
    command!("exit", 1, "exit", "end the session", replay::quit),
    command!("end", 1, "end", "end the session", replay::quit),
    command!("done", 1, "done", "end the session", replay::quit),
];

/// Command specs indexed by keyword.
#[derive(Debug)]
pub struct CommandTable {
    by_name: HashMap<&'static str, &'static CommandSpec>,
}

impl CommandTable {
    fn build(specs: &'static [CommandSpec]) -> Self {
        Self {
            by_name: specs.iter().map(|spec| (spec.name, spec)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&'static CommandSpec> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Specs in help order.
    pub fn iter(&self) -> impl Iterator<Item = &'static CommandSpec> {
        COMMANDS.iter()
    }
}

/// The shared command table.
pub fn command_table() -> &'static CommandTable {
    static TABLE: OnceLock<CommandTable> = OnceLock::new();
    TABLE.get_or_init(|| CommandTable::build(COMMANDS))
}
