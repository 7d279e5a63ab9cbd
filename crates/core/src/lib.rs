//! Geometric table reconstruction.
//!
//! Rebuilds tabular structure from an unstructured page of line
//! segments, rectangle borders, curve borders, and positioned text —
//! purely from vector geometry, with no a-priori grid model. The
//! pipeline collects candidate edges per strategy, snaps and joins them,
//! finds vertical/horizontal intersections, tiles the most granular
//! rectangular cells, groups connected cells into tables, and assigns
//! text fragments into the resulting grid.
//!
//! The upstream page model supplies [`PageObjects`]; [`TableFinder`]
//! runs the pipeline for one page, and [`extract_tables_batch`]
//! processes independent pages in parallel.

mod clustering;
mod edges;
mod error;
mod finder;
mod grid;
mod intersections;
mod text;
mod types;

pub use error::{Result, SettingsError};
pub use finder::{TableFinder, extract_table, extract_tables, extract_tables_batch};
pub use grid::{CellGroup, Table};
pub use types::{
    BBox, Edge, EdgeSource, ExplicitLine, Orientation, PageObjects, Point, Strategy,
    TableSettings, Word, within,
};
