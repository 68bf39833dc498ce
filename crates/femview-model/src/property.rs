//! Per-object lighting properties for materials and surfaces.

/// A color property addressed by the `mtl`/`surf` sub-parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorProperty {
    Ambient,
    Diffuse,
    Specular,
    Emissive,
    Shininess,
}

impl ColorProperty {
    pub const ALL: [ColorProperty; 5] = [
        Self::Ambient,
        Self::Diffuse,
        Self::Specular,
        Self::Emissive,
        Self::Shininess,
    ];

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "amb" => Some(Self::Ambient),
            "diff" => Some(Self::Diffuse),
            "spec" => Some(Self::Specular),
            "emis" => Some(Self::Emissive),
            "shine" => Some(Self::Shininess),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Ambient => "amb",
            Self::Diffuse => "diff",
            Self::Specular => "spec",
            Self::Emissive => "emis",
            Self::Shininess => "shine",
        }
    }

    /// Number of values the property consumes.
    pub fn value_count(self) -> usize {
        match self {
            Self::Shininess => 1,
            _ => 3,
        }
    }
}

/// Saved copy of one property column, restored by `cancel`.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertySnapshot {
    Rgba(Vec<[f32; 4]>),
    Scalar(Vec<f32>),
}

const PALETTE: [[f32; 3]; 8] = [
    [0.8, 0.2, 0.2],
    [0.2, 0.7, 0.2],
    [0.2, 0.3, 0.9],
    [0.9, 0.8, 0.1],
    [0.7, 0.2, 0.8],
    [0.1, 0.8, 0.8],
    [0.9, 0.5, 0.1],
    [0.6, 0.6, 0.6],
];

const DEFAULT_SHININESS: f32 = 30.0;

/// Lighting columns indexed by 0-based object number.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyTable {
    ambient: Vec<[f32; 4]>,
    diffuse: Vec<[f32; 4]>,
    specular: Vec<[f32; 4]>,
    emission: Vec<[f32; 4]>,
    shininess: Vec<f32>,
}

impl PropertyTable {
    /// Table of `qty` objects with palette defaults.
    pub fn with_defaults(qty: usize) -> Self {
        let mut table = Self {
            ambient: vec![[0.0; 4]; qty],
            diffuse: vec![[0.0; 4]; qty],
            specular: vec![[0.0; 4]; qty],
            emission: vec![[0.0; 4]; qty],
            shininess: vec![0.0; qty],
        };
        for index in 0..qty {
            table.reset_to_default(index);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.shininess.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shininess.is_empty()
    }

    /// Restore the palette defaults of one object.
    pub fn reset_to_default(&mut self, index: usize) {
        if index >= self.len() {
            return;
        }
        let [r, g, b] = PALETTE[index % PALETTE.len()];
        self.diffuse[index] = [r, g, b, 1.0];
        self.ambient[index] = [0.2 * r, 0.2 * g, 0.2 * b, 1.0];
        self.specular[index] = [0.3, 0.3, 0.3, 1.0];
        self.emission[index] = [0.0, 0.0, 0.0, 1.0];
        self.shininess[index] = DEFAULT_SHININESS;
    }

    fn column_mut(&mut self, property: ColorProperty) -> Option<&mut Vec<[f32; 4]>> {
        match property {
            ColorProperty::Ambient => Some(&mut self.ambient),
            ColorProperty::Diffuse => Some(&mut self.diffuse),
            ColorProperty::Specular => Some(&mut self.specular),
            ColorProperty::Emissive => Some(&mut self.emission),
            ColorProperty::Shininess => None,
        }
    }

    fn column(&self, property: ColorProperty) -> Option<&Vec<[f32; 4]>> {
        match property {
            ColorProperty::Ambient => Some(&self.ambient),
            ColorProperty::Diffuse => Some(&self.diffuse),
            ColorProperty::Specular => Some(&self.specular),
            ColorProperty::Emissive => Some(&self.emission),
            ColorProperty::Shininess => None,
        }
    }

    /// Write a property value. Colors get alpha 1.0; shininess reads `values[0]`.
    ///
    /// Returns `false` when `index` is out of range.
    pub fn set(&mut self, property: ColorProperty, index: usize, values: [f32; 3]) -> bool {
        if index >= self.len() {
            return false;
        }
        match self.column_mut(property) {
            Some(column) => column[index] = [values[0], values[1], values[2], 1.0],
            None => self.shininess[index] = values[0],
        }
        true
    }

    pub fn rgba(&self, property: ColorProperty, index: usize) -> Option<[f32; 4]> {
        self.column(property)?.get(index).copied()
    }

    pub fn shininess(&self, index: usize) -> Option<f32> {
        self.shininess.get(index).copied()
    }

    pub fn snapshot(&self, property: ColorProperty) -> PropertySnapshot {
        match self.column(property) {
            Some(column) => PropertySnapshot::Rgba(column.clone()),
            None => PropertySnapshot::Scalar(self.shininess.clone()),
        }
    }

    pub fn restore(&mut self, property: ColorProperty, snapshot: PropertySnapshot) {
        match (self.column_mut(property), snapshot) {
            (Some(column), PropertySnapshot::Rgba(saved)) => *column = saved,
            (None, PropertySnapshot::Scalar(saved)) => self.shininess = saved,
            _ => tracing::warn!(property = property.keyword(), "snapshot kind mismatch ignored"),
        }
    }
}
