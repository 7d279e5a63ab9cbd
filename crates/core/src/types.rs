//! Core geometry types and table-extraction settings.

use ordered_float::OrderedFloat;

use crate::error::{Result, SettingsError};

// Default tolerances, in page units
pub(crate) const DEFAULT_SNAP_TOLERANCE: f64 = 3.0;
pub(crate) const DEFAULT_JOIN_TOLERANCE: f64 = 3.0;
pub(crate) const DEFAULT_INTERSECTION_TOLERANCE: f64 = 3.0;
pub(crate) const DEFAULT_TEXT_TOLERANCE: f64 = 3.0;
pub(crate) const DEFAULT_EDGE_MIN_LENGTH: f64 = 3.0;
pub(crate) const DEFAULT_MIN_WORDS_VERTICAL: usize = 3;
pub(crate) const DEFAULT_MIN_WORDS_HORIZONTAL: usize = 1;

// Key types for ordered float maps
pub(crate) type KeyF64 = OrderedFloat<f64>;
pub(crate) type KeyPoint = (KeyF64, KeyF64);

pub(crate) fn key_f64(v: f64) -> KeyF64 {
    OrderedFloat(v)
}

pub(crate) fn key_point(x: f64, y: f64) -> KeyPoint {
    (OrderedFloat(x), OrderedFloat(y))
}

/// An (x, y) coordinate in page space (top-left origin, y growing downward).
pub type Point = (f64, f64);

/// Tolerance-based scalar equality, used wherever two coordinates are
/// compared for "sameness" in place of raw float equality.
pub fn within(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Where an edge came from. Only `lines_strict` filtering branches on
/// this; every other stage treats all sources identically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeSource {
    Line,
    RectBorder,
    CurveBorder,
    TextInferred,
    Explicit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// An axis-aligned line-segment candidate for bounding a table cell.
///
/// Segments that are not axis-aligned carry `orientation: None` and are
/// skipped by every stage that needs an axis.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub x0: f64,
    pub x1: f64,
    pub top: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
    pub orientation: Option<Orientation>,
    pub source: EdgeSource,
}

impl Edge {
    pub fn vertical(x: f64, top: f64, bottom: f64, source: EdgeSource) -> Self {
        Edge {
            x0: x,
            x1: x,
            top,
            bottom,
            width: 0.0,
            height: bottom - top,
            orientation: Some(Orientation::Vertical),
            source,
        }
    }

    pub fn horizontal(y: f64, x0: f64, x1: f64, source: EdgeSource) -> Self {
        Edge {
            x0,
            x1,
            top: y,
            bottom: y,
            width: x1 - x0,
            height: 0.0,
            orientation: Some(Orientation::Horizontal),
            source,
        }
    }

    pub fn bbox(&self) -> BBox {
        BBox {
            x0: self.x0,
            top: self.top,
            x1: self.x1,
            bottom: self.bottom,
        }
    }
}

/// A positioned text fragment supplied by the upstream page model.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    pub text: String,
    pub x0: f64,
    pub x1: f64,
    pub top: f64,
    pub bottom: f64,
}

/// Per-page input contract: vector geometry and text fragments in one
/// consistent coordinate system.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageObjects {
    pub bbox: BBox,
    pub lines: Vec<(Point, Point)>,
    pub rects: Vec<BBox>,
    pub curves: Vec<Vec<Point>>,
    pub words: Vec<Word>,
}

/// A caller-mandated boundary for the `explicit` strategy (also appended
/// under every other strategy). A bare coordinate spans the full page.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExplicitLine {
    Coord(f64),
    Edge(Edge),
    Rect(BBox),
    Curve(Vec<Point>),
}

/// Edge-detection strategy for one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Lines,
    LinesStrict,
    Text,
    Explicit,
}

impl Strategy {
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "lines" => Ok(Strategy::Lines),
            "lines_strict" => Ok(Strategy::LinesStrict),
            "text" => Ok(Strategy::Text),
            "explicit" => Ok(Strategy::Explicit),
            other => Err(SettingsError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Configuration bundle threaded immutably through every pipeline stage.
///
/// The `*_x_tolerance` / `*_y_tolerance` options override their base
/// option for that axis when set.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableSettings {
    pub vertical_strategy: String,
    pub horizontal_strategy: String,
    pub explicit_vertical_lines: Vec<ExplicitLine>,
    pub explicit_horizontal_lines: Vec<ExplicitLine>,
    pub snap_tolerance: f64,
    pub snap_x_tolerance: Option<f64>,
    pub snap_y_tolerance: Option<f64>,
    pub join_tolerance: f64,
    pub join_x_tolerance: Option<f64>,
    pub join_y_tolerance: Option<f64>,
    pub edge_min_length: f64,
    pub min_words_vertical: usize,
    pub min_words_horizontal: usize,
    pub intersection_tolerance: f64,
    pub intersection_x_tolerance: Option<f64>,
    pub intersection_y_tolerance: Option<f64>,
    pub text_tolerance: f64,
    pub text_x_tolerance: Option<f64>,
    pub text_y_tolerance: Option<f64>,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            vertical_strategy: "lines".to_string(),
            horizontal_strategy: "lines".to_string(),
            explicit_vertical_lines: Vec::new(),
            explicit_horizontal_lines: Vec::new(),
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
            snap_x_tolerance: None,
            snap_y_tolerance: None,
            join_tolerance: DEFAULT_JOIN_TOLERANCE,
            join_x_tolerance: None,
            join_y_tolerance: None,
            edge_min_length: DEFAULT_EDGE_MIN_LENGTH,
            min_words_vertical: DEFAULT_MIN_WORDS_VERTICAL,
            min_words_horizontal: DEFAULT_MIN_WORDS_HORIZONTAL,
            intersection_tolerance: DEFAULT_INTERSECTION_TOLERANCE,
            intersection_x_tolerance: None,
            intersection_y_tolerance: None,
            text_tolerance: DEFAULT_TEXT_TOLERANCE,
            text_x_tolerance: None,
            text_y_tolerance: None,
        }
    }
}

impl TableSettings {
    pub fn snap_x(&self) -> f64 {
        self.snap_x_tolerance.unwrap_or(self.snap_tolerance)
    }

    pub fn snap_y(&self) -> f64 {
        self.snap_y_tolerance.unwrap_or(self.snap_tolerance)
    }

    pub fn join_x(&self) -> f64 {
        self.join_x_tolerance.unwrap_or(self.join_tolerance)
    }

    pub fn join_y(&self) -> f64 {
        self.join_y_tolerance.unwrap_or(self.join_tolerance)
    }

    pub fn intersection_x(&self) -> f64 {
        self.intersection_x_tolerance
            .unwrap_or(self.intersection_tolerance)
    }

    pub fn intersection_y(&self) -> f64 {
        self.intersection_y_tolerance
            .unwrap_or(self.intersection_tolerance)
    }

    pub fn text_x(&self) -> f64 {
        self.text_x_tolerance.unwrap_or(self.text_tolerance)
    }

    pub fn text_y(&self) -> f64 {
        self.text_y_tolerance.unwrap_or(self.text_tolerance)
    }

    /// Fail-fast validation: both strategy names must parse and every
    /// tolerance must be a non-negative finite number.
    pub fn validate(&self) -> Result<()> {
        Strategy::parse(&self.vertical_strategy)?;
        Strategy::parse(&self.horizontal_strategy)?;

        let checks: [(&'static str, f64); 13] = [
            ("snap_tolerance", self.snap_tolerance),
            ("snap_x_tolerance", self.snap_x()),
            ("snap_y_tolerance", self.snap_y()),
            ("join_tolerance", self.join_tolerance),
            ("join_x_tolerance", self.join_x()),
            ("join_y_tolerance", self.join_y()),
            ("edge_min_length", self.edge_min_length),
            ("intersection_tolerance", self.intersection_tolerance),
            ("intersection_x_tolerance", self.intersection_x()),
            ("intersection_y_tolerance", self.intersection_y()),
            ("text_tolerance", self.text_tolerance),
            ("text_x_tolerance", self.text_x()),
            ("text_y_tolerance", self.text_y()),
        ];
        for (option, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::Tolerance { option, value });
            }
        }
        Ok(())
    }
}

// Internal ID types for efficient indexing
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub(crate) struct VEdgeId(pub usize);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub(crate) struct HEdgeId(pub usize);

// BBox key for hashing edge identity by exact bit pattern
#[derive(Hash, Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Debug)]
pub(crate) struct BBoxKey(pub u64, pub u64, pub u64, pub u64);

pub(crate) fn bbox_key(b: &BBox) -> BBoxKey {
    BBoxKey(
        b.x0.to_bits(),
        b.top.to_bits(),
        b.x1.to_bits(),
        b.bottom.to_bits(),
    )
}
