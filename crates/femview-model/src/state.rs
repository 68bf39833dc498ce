//! Analysis state shared by every command of a session.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use nalgebra::{Rotation3, Vector3};

use crate::mesh::MeshDb;
use crate::property::PropertyTable;
use crate::render::RenderMode;
use crate::selection::{SelectionSet, SpecifiedObject};

/// Coordinate axis addressed by the view commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    fn unit(self) -> nalgebra::Unit<Vector3<f64>> {
        match self {
            Self::X => Vector3::x_axis(),
            Self::Y => Vector3::y_axis(),
            Self::Z => Vector3::z_axis(),
        }
    }
}

/// Accumulated mesh view transform.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransform {
    pub rotation: Rotation3<f64>,
    pub translation: Vector3<f64>,
    pub scale: Vector3<f64>,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            rotation: Rotation3::identity(),
            translation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl ViewTransform {
    /// Rotate about a global axis, in degrees.
    pub fn rotate(&mut self, axis: Axis, degrees: f64) {
        let step = Rotation3::from_axis_angle(&axis.unit(), degrees.to_radians());
        self.rotation = step * self.rotation;
    }

    pub fn translate(&mut self, axis: Axis, distance: f64) {
        self.translation[axis.index()] += distance;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Where the view is kept centered between redraws.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ViewCenter {
    #[default]
    Off,
    /// Follow the highlighted object.
    Hilite,
    /// Follow a node (0-based index).
    Node(usize),
    Point(Vector3<f64>),
}

/// Boolean display flags toggled by `on`/`off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DisplayFlag {
    Box,
    Coord,
    Time,
    Title,
    Cmap,
    Minmax,
    Cscale,
    Edges,
    Safe,
    Ndnum,
    Elnum,
    Rough,
    Cut,
    Con,
    Iso,
    Vec,
    Sym,
}

impl DisplayFlag {
    /// Members of the `all` group.
    pub const ALL_GROUP: [DisplayFlag; 5] = [Self::Coord, Self::Time, Self::Title, Self::Cmap, Self::Minmax];

    pub const EVERY: [DisplayFlag; 17] = [
        Self::Box,
        Self::Coord,
        Self::Time,
        Self::Title,
        Self::Cmap,
        Self::Minmax,
        Self::Cscale,
        Self::Edges,
        Self::Safe,
        Self::Ndnum,
        Self::Elnum,
        Self::Rough,
        Self::Cut,
        Self::Con,
        Self::Iso,
        Self::Vec,
        Self::Sym,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Coord => "coord",
            Self::Time => "time",
            Self::Title => "title",
            Self::Cmap => "cmap",
            Self::Minmax => "minmax",
            Self::Cscale => "cscale",
            Self::Edges => "edges",
            Self::Safe => "safe",
            Self::Ndnum => "ndnum",
            Self::Elnum => "elnum",
            Self::Rough => "rough",
            Self::Cut => "cut",
            Self::Con => "con",
            Self::Iso => "iso",
            Self::Vec => "vec",
            Self::Sym => "sym",
        }
    }
}

impl FromStr for DisplayFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::EVERY
            .iter()
            .copied()
            .find(|flag| flag.keyword() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for DisplayFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Shading {
    Flat,
    #[default]
    Smooth,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderStyle {
    Hidden,
    #[default]
    Solid,
    Cloud,
    None,
}

/// How element-centered results reach sample points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InterpMode {
    /// Per-element constant value.
    NoInterp,
    /// Nodal averaging then shape-function blending.
    #[default]
    RegInterp,
    GoodInterp,
}

impl InterpMode {
    pub fn is_nodal(self) -> bool {
        !matches!(self, Self::NoInterp)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MinMaxScope {
    #[default]
    State,
    Global,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefFrame {
    #[default]
    Global,
    Local,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShellSurface {
    #[default]
    Middle,
    Inner,
    Outer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StrainVariety {
    #[default]
    Infinitesimal,
    GreenLagrange,
    Almansi,
    Rate,
}

/// Render options set by `switch`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSwitches {
    pub projection: Projection,
    pub shading: Shading,
    pub style: RenderStyle,
    pub interp: InterpMode,
    pub minmax: MinMaxScope,
    pub frame: RefFrame,
    pub shell_surface: ShellSurface,
    pub strain: StrainVariety,
}

/// Linear conversion applied to displayed results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub scale: f64,
    pub offset: f64,
}

impl Default for Conversion {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: 0.0,
        }
    }
}

/// Per-class boolean flags, allocated lazily per class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectFlags {
    classes: BTreeMap<String, Vec<bool>>,
}

impl ObjectFlags {
    /// Set one flag, growing the class column to `qty` entries.
    pub fn set(&mut self, class: &str, qty: usize, ident: usize, value: bool) {
        let column = self.classes.entry(class.to_string()).or_default();
        if column.len() < qty {
            column.resize(qty, false);
        }
        if let Some(slot) = column.get_mut(ident) {
            *slot = value;
        }
    }

    pub fn get(&self, class: &str, ident: usize) -> bool {
        self.classes
            .get(class)
            .and_then(|column| column.get(ident).copied())
            .unwrap_or(false)
    }

    pub fn count(&self, class: &str) -> usize {
        self.classes
            .get(class)
            .map_or(0, |column| column.iter().filter(|&&v| v).count())
    }

    pub fn total(&self) -> usize {
        self.classes.values().map(|c| c.iter().filter(|&&v| v).count()).sum()
    }
}

/// Everything a command can read or change, apart from session bookkeeping.
#[derive(Debug, Clone)]
pub struct AnalysisState {
    pub render_mode: RenderMode,
    /// Gate for every redraw callback (`on/off refresh`).
    pub refresh_enabled: bool,
    pub view: ViewTransform,
    pub vcent: ViewCenter,
    pub flags: BTreeSet<DisplayFlag>,
    pub switches: RenderSwitches,
    pub hide_material: Vec<bool>,
    pub disable_material: Vec<bool>,
    pub hide_surface: Vec<bool>,
    pub disable_surface: Vec<bool>,
    /// Element visibility for `vis/invis <class>`.
    pub hidden_objects: ObjectFlags,
    /// Result visibility for `vis/invis result <class>`.
    pub hidden_results: ObjectFlags,
    pub disabled_objects: ObjectFlags,
    pub excluded_objects: ObjectFlags,
    pub materials: PropertyTable,
    pub surfaces: PropertyTable,
    pub selection: SelectionSet,
    pub hilite: Option<SpecifiedObject>,
    pub state_index: usize,
    pub state_qty: usize,
    pub result: Option<String>,
    pub plot_results: Vec<String>,
    pub title: Option<String>,
    pub conversion: Conversion,
}

impl AnalysisState {
    pub fn new(material_qty: usize, surface_qty: usize, state_qty: usize) -> Self {
        Self {
            render_mode: RenderMode::Mesh,
            refresh_enabled: true,
            view: ViewTransform::default(),
            vcent: ViewCenter::Off,
            flags: DisplayFlag::ALL_GROUP.into_iter().collect(),
            switches: RenderSwitches::default(),
            hide_material: vec![false; material_qty],
            disable_material: vec![false; material_qty],
            hide_surface: vec![false; surface_qty],
            disable_surface: vec![false; surface_qty],
            hidden_objects: ObjectFlags::default(),
            hidden_results: ObjectFlags::default(),
            disabled_objects: ObjectFlags::default(),
            excluded_objects: ObjectFlags::default(),
            materials: PropertyTable::with_defaults(material_qty),
            surfaces: PropertyTable::with_defaults(surface_qty),
            selection: SelectionSet::new(),
            hilite: None,
            state_index: 0,
            state_qty,
            result: None,
            plot_results: Vec::new(),
            title: None,
            conversion: Conversion::default(),
        }
    }

    /// Fresh state sized for a database.
    pub fn for_mesh(db: &dyn MeshDb) -> Self {
        Self::new(db.material_qty(), db.surface_qty(), db.state_qty())
    }

    pub fn material_qty(&self) -> usize {
        self.hide_material.len()
    }

    pub fn surface_qty(&self) -> usize {
        self.hide_surface.len()
    }

    pub fn flag(&self, flag: DisplayFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn set_flag(&mut self, flag: DisplayFlag, on: bool) {
        if on {
            self.flags.insert(flag);
        } else {
            self.flags.remove(&flag);
        }
    }
}
