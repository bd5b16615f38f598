//! Library module - the authored shape set of a session
//!
//! Shapes are authored as ASCII rows (`#` occupied, `.` empty), either built in via
//! [`ShapeLibrary::standard`] or loaded from JSON:
//!
//! ```json
//! [
//!   { "name": "corner", "rows": ["##", "#."], "color": 4, "rotations": true },
//!   { "name": "dot", "rows": ["#"], "easy": true }
//! ]
//! ```
//!
//! With `rotations` set, every distinct orientation becomes its own library entry.
//! The easy pool holds the shapes flagged `easy`; if none are flagged it falls back to
//! every shape of mass at most `easy_max_mass`.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::shape::ShapeMatrix;
use crate::types::{ColorTag, ShapeId, EASY_MAX_MASS};

/// Authoring format of a shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeSpec {
    pub name: String,
    pub rows: Vec<String>,
    #[serde(default)]
    pub color: Option<u8>,
    #[serde(default)]
    pub easy: bool,
    #[serde(default)]
    pub rotations: bool,
}

impl ShapeSpec {
    fn new(name: &str, rows: &[&str], rotations: bool) -> Self {
        Self {
            name: name.to_string(),
            rows: rows.iter().map(|r| r.to_string()).collect(),
            color: None,
            easy: false,
            rotations,
        }
    }
}

/// A loaded shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeDef {
    pub name: String,
    pub matrix: ShapeMatrix,
    pub color: ColorTag,
}

/// Palette cycled through for shapes authored without a color
const DEFAULT_COLORS: [u8; 7] = [1, 2, 3, 4, 5, 6, 7];

#[derive(Debug, Clone)]
pub struct ShapeLibrary {
    shapes: Vec<ShapeDef>,
    all: Vec<ShapeId>,
    easy: Vec<ShapeId>,
}

/// The classic block-blast set: name, rows, whether every orientation is offered
const STANDARD_SHAPES: [(&str, &[&str], bool); 15] = [
    ("dot", &["#"], false),
    ("domino", &["##"], true),
    ("line3", &["###"], true),
    ("corner3", &["##", "#."], true),
    ("line4", &["####"], true),
    ("line5", &["#####"], true),
    ("square2", &["##", "##"], false),
    ("square3", &["###", "###", "###"], false),
    ("rect2x3", &["###", "###"], true),
    ("t4", &["###", ".#."], true),
    ("s4", &[".##", "##."], true),
    ("z4", &["##.", ".##"], true),
    ("l4", &["#.", "#.", "##"], true),
    ("j4", &[".#", ".#", "##"], true),
    ("corner5", &["#..", "#..", "###"], true),
];

impl ShapeLibrary {
    /// The classic block-blast set: lines, squares, rectangles, corners and tetrominoes.
    pub fn standard() -> Self {
        let mut shapes = Vec::new();
        for (i, (name, rows, rotations)) in STANDARD_SHAPES.iter().enumerate() {
            let spec = ShapeSpec::new(name, rows, *rotations);
            if let Ok(defs) = expand(&spec, i) {
                shapes.extend(defs);
            }
        }
        Self::index(shapes, Vec::new(), EASY_MAX_MASS)
    }

    /// Build from authored specs, expanding rotations and deriving the easy pool.
    pub fn from_specs(specs: &[ShapeSpec], easy_max_mass: usize) -> Result<Self, ConfigError> {
        let mut shapes = Vec::new();
        let mut flagged_easy = Vec::new();

        for (i, spec) in specs.iter().enumerate() {
            let defs = expand(spec, i)?;
            if spec.easy {
                flagged_easy.extend(shapes.len()..shapes.len() + defs.len());
            }
            shapes.extend(defs);
        }

        if shapes.is_empty() {
            return Err(ConfigError::EmptyLibrary);
        }
        if shapes.len() > u16::MAX as usize {
            return Err(ConfigError::TooManyShapes(shapes.len()));
        }

        let library = Self::index(shapes, flagged_easy, easy_max_mass);
        if library.easy.is_empty() {
            return Err(ConfigError::EmptyEasyPool);
        }
        Ok(library)
    }

    /// Assign ids and derive the easy pool. Callers check the size limits.
    fn index(shapes: Vec<ShapeDef>, flagged_easy: Vec<usize>, easy_max_mass: usize) -> Self {
        let all: Vec<ShapeId> = (0..shapes.len()).map(|i| ShapeId(i as u16)).collect();
        let easy: Vec<ShapeId> = if flagged_easy.is_empty() {
            all.iter()
                .copied()
                .filter(|id| shapes[id.index()].matrix.cell_mass() <= easy_max_mass)
                .collect()
        } else {
            flagged_easy.into_iter().map(|i| ShapeId(i as u16)).collect()
        };
        Self { shapes, all, easy }
    }

    /// Parse a JSON array of [`ShapeSpec`]
    pub fn from_json_str(json: &str, easy_max_mass: usize) -> Result<Self, ConfigError> {
        let specs: Vec<ShapeSpec> = serde_json::from_str(json)?;
        Self::from_specs(&specs, easy_max_mass)
    }

    pub fn get(&self, id: ShapeId) -> Option<&ShapeDef> {
        self.shapes.get(id.index())
    }

    pub fn matrix(&self, id: ShapeId) -> Option<&ShapeMatrix> {
        self.get(id).map(|def| &def.matrix)
    }

    /// Look a shape up by name (rotated variants are named `name@90` etc.)
    pub fn find(&self, name: &str) -> Option<ShapeId> {
        self.shapes
            .iter()
            .position(|def| def.name == name)
            .map(|i| ShapeId(i as u16))
    }

    /// Every shape id, in library order
    pub fn all(&self) -> &[ShapeId] {
        &self.all
    }

    /// The small-shape pool used in danger and as the last fallback
    pub fn easy(&self) -> &[ShapeId] {
        &self.easy
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Parse one spec into its library entries. `index` picks the default palette color.
fn expand(spec: &ShapeSpec, index: usize) -> Result<Vec<ShapeDef>, ConfigError> {
    let matrix = ShapeMatrix::from_rows(&spec.rows).map_err(|source| ConfigError::Shape {
        name: spec.name.clone(),
        source,
    })?;
    if matrix.is_empty() {
        return Err(ConfigError::DegenerateShape {
            name: spec.name.clone(),
        });
    }
    let color = match spec.color {
        Some(0) => {
            return Err(ConfigError::ReservedColor {
                name: spec.name.clone(),
            })
        }
        Some(tag) => ColorTag(tag),
        None => ColorTag(DEFAULT_COLORS[index % DEFAULT_COLORS.len()]),
    };

    let variants = if spec.rotations {
        matrix.orientations()
    } else {
        vec![matrix.trim()]
    };
    Ok(variants
        .into_iter()
        .enumerate()
        .map(|(turn, matrix)| ShapeDef {
            name: if turn == 0 {
                spec.name.clone()
            } else {
                format!("{}@{}", spec.name, turn * 90)
            },
            matrix,
            color,
        })
        .collect())
}

impl Default for ShapeLibrary {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_library() {
        let lib = ShapeLibrary::standard();
        assert!(!lib.is_empty());
        assert_eq!(lib.all().len(), lib.len());

        // dot(1) + domino(2) + line3(2) + corner3(4)
        assert_eq!(lib.easy().len(), 9);
        for &id in lib.easy() {
            assert!(lib.matrix(id).unwrap().cell_mass() <= EASY_MAX_MASS);
        }

        assert!(lib.find("line5@90").is_some());
        assert!(lib.find("square2@90").is_none());

        // Every built-in entry parses; 15 shapes expand to 37 orientations.
        assert_eq!(lib.len(), 37);
        for (name, _, _) in STANDARD_SHAPES {
            assert!(lib.find(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_rejects_color_zero() {
        let err = ShapeLibrary::from_json_str(
            r###"[{ "name": "ghost", "rows": ["##"], "color": 0, "easy": true }]"###,
            3,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ReservedColor { ref name } if name == "ghost"));

        let lib = ShapeLibrary::from_json_str(
            r###"[{ "name": "ok", "rows": ["##"], "color": 255, "easy": true }]"###,
            3,
        )
        .unwrap();
        assert_eq!(lib.get(ShapeId(0)).unwrap().color, ColorTag(255));
    }

    #[test]
    fn test_json_library() {
        let json = r####"[
            { "name": "bar", "rows": ["###"], "color": 9, "rotations": true },
            { "name": "dot", "rows": ["#"], "easy": true }
        ]"####;
        let lib = ShapeLibrary::from_json_str(json, 3).unwrap();
        assert_eq!(lib.len(), 3);
        assert_eq!(lib.get(ShapeId(1)).unwrap().name, "bar@90");
        assert_eq!(lib.get(ShapeId(0)).unwrap().color, ColorTag(9));
        // Flagged shapes win over the mass rule.
        assert_eq!(lib.easy(), &[ShapeId(2)]);
    }

    #[test]
    fn test_rejects_degenerate_shape() {
        let err = ShapeLibrary::from_specs(&[ShapeSpec::new("blank", &["..", ".."], false)], 3)
            .unwrap_err();
        assert!(matches!(err, ConfigError::DegenerateShape { .. }));
    }

    #[test]
    fn test_rejects_empty_easy_pool() {
        let err = ShapeLibrary::from_specs(&[ShapeSpec::new("big", &["####"], false)], 3)
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyEasyPool));
    }

    #[test]
    fn test_rejects_bad_rows() {
        let err = ShapeLibrary::from_json_str(r###"[{ "name": "x", "rows": ["#", "##"] }]"###, 3)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Shape { .. }));
        assert!(ShapeLibrary::from_json_str("[]", 3).is_err());
        assert!(ShapeLibrary::from_json_str("not json", 3).is_err());
    }
}
