//! TableFinder orchestrator and public entry points.
//!
//! Resolves the per-axis edge strategies, runs the pipeline
//! (collect → normalize → intersect → tile → group) once per page, and
//! retains every intermediate for debug inspection.

use rayon::prelude::*;

use crate::edges::{
    curve_to_edges, drop_degenerate, filter_edges, line_to_edge, merge_edges, rect_to_edges,
    words_to_edges_h, words_to_edges_v,
};
use crate::error::Result;
use crate::grid::{Table, cells_to_tables, intersections_to_cells};
use crate::intersections::edges_to_intersections;
use crate::types::{
    BBox, Edge, EdgeSource, ExplicitLine, Orientation, PageObjects, Point, Strategy,
    TableSettings, Word,
};

/// Convert a page's lines, rectangles, and curves into raw edges.
fn collect_page_edges(page: &PageObjects) -> Vec<Edge> {
    let mut edges: Vec<Edge> = Vec::new();
    for &(p0, p1) in &page.lines {
        edges.push(line_to_edge(p0, p1));
    }
    for rect in &page.rects {
        edges.extend(rect_to_edges(*rect, EdgeSource::RectBorder));
    }
    for curve in &page.curves {
        edges.extend(curve_to_edges(curve, EdgeSource::CurveBorder));
    }
    drop_degenerate(edges)
}

/// Expand caller-mandated boundaries into edges of the requested
/// orientation. Bare coordinates span the full page extent.
fn explicit_edges(
    descriptors: &[ExplicitLine],
    orientation: Orientation,
    page_bbox: &BBox,
) -> Vec<Edge> {
    let mut out: Vec<Edge> = Vec::new();
    for desc in descriptors {
        match desc {
            ExplicitLine::Coord(c) => out.push(match orientation {
                Orientation::Vertical => {
                    Edge::vertical(*c, page_bbox.top, page_bbox.bottom, EdgeSource::Explicit)
                }
                Orientation::Horizontal => {
                    Edge::horizontal(*c, page_bbox.x0, page_bbox.x1, EdgeSource::Explicit)
                }
            }),
            ExplicitLine::Edge(e) => {
                if e.orientation == Some(orientation) {
                    out.push(e.clone());
                }
            }
            ExplicitLine::Rect(b) => {
                out.extend(
                    rect_to_edges(*b, EdgeSource::Explicit)
                        .into_iter()
                        .filter(|e| e.orientation == Some(orientation)),
                );
            }
            ExplicitLine::Curve(pts) => {
                out.extend(
                    curve_to_edges(pts, EdgeSource::Explicit)
                        .into_iter()
                        .filter(|e| e.orientation == Some(orientation)),
                );
            }
        }
    }
    out
}

/// Runs the table-reconstruction pipeline for one page and holds the
/// results, including the intermediate edge/intersection/cell sets.
#[derive(Debug)]
pub struct TableFinder {
    settings: TableSettings,
    words: Vec<Word>,
    edges: Vec<Edge>,
    intersections: Vec<Point>,
    cells: Vec<BBox>,
    tables: Vec<Table>,
}

impl TableFinder {
    /// Validate the settings, then run the full pipeline over the page.
    /// Empty geometry is not an error; the finder simply holds no
    /// tables.
    pub fn new(page: &PageObjects, settings: TableSettings) -> Result<Self> {
        settings.validate()?;
        let v_strategy = Strategy::parse(&settings.vertical_strategy)?;
        let h_strategy = Strategy::parse(&settings.horizontal_strategy)?;

        let raw = collect_page_edges(page);

        let axis_base = |strategy: Strategy, orientation: Orientation| -> Vec<Edge> {
            match strategy {
                Strategy::Lines => filter_edges(raw.clone(), Some(orientation), None, 0.0),
                Strategy::LinesStrict => {
                    filter_edges(raw.clone(), Some(orientation), Some(EdgeSource::Line), 0.0)
                }
                Strategy::Text => match orientation {
                    Orientation::Vertical => words_to_edges_v(
                        &page.words,
                        settings.min_words_vertical,
                        settings.text_x(),
                    ),
                    Orientation::Horizontal => words_to_edges_h(
                        &page.words,
                        settings.min_words_horizontal,
                        settings.text_y(),
                    ),
                },
                Strategy::Explicit => Vec::new(),
            }
        };

        let mut candidate = axis_base(v_strategy, Orientation::Vertical);
        candidate.extend(explicit_edges(
            &settings.explicit_vertical_lines,
            Orientation::Vertical,
            &page.bbox,
        ));
        candidate.extend(axis_base(h_strategy, Orientation::Horizontal));
        candidate.extend(explicit_edges(
            &settings.explicit_horizontal_lines,
            Orientation::Horizontal,
            &page.bbox,
        ));

        let candidate = drop_degenerate(candidate);
        let merged = merge_edges(
            candidate,
            settings.snap_x(),
            settings.snap_y(),
            settings.join_x(),
            settings.join_y(),
        );
        let edges = filter_edges(merged, None, None, settings.edge_min_length);
        let v_count = edges
            .iter()
            .filter(|e| e.orientation == Some(Orientation::Vertical))
            .count();
        log::debug!(
            "normalized {} edges ({} vertical, {} horizontal)",
            edges.len(),
            v_count,
            edges.len() - v_count
        );

        let (store, intersection_map) = edges_to_intersections(
            &edges,
            settings.intersection_x(),
            settings.intersection_y(),
        );
        log::debug!("found {} intersection points", intersection_map.len());

        let cells = intersections_to_cells(&store, &intersection_map);
        let groups = cells_to_tables(cells.clone());
        log::debug!("tiled {} cells into {} tables", cells.len(), groups.len());

        let tables = groups
            .into_iter()
            .map(|group| Table::new(group, settings.snap_y(), settings.snap_x()))
            .collect();

        let mut intersections: Vec<Point> = intersection_map
            .keys()
            .map(|(x, y)| (x.into_inner(), y.into_inner()))
            .collect();
        intersections.sort_by(|a, b| {
            (a.1, a.0)
                .partial_cmp(&(b.1, b.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(Self {
            settings,
            words: page.words.clone(),
            edges,
            intersections,
            cells,
            tables,
        })
    }

    /// Detected tables, top-most first.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Normalized edges that fed intersection finding.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Intersection points, sorted top-to-bottom then left-to-right.
    pub fn intersections(&self) -> &[Point] {
        &self.intersections
    }

    /// Tiled cells across all tables, in scan order.
    pub fn cells(&self) -> &[BBox] {
        &self.cells
    }

    /// The table with the most cells. Ties go to the table whose
    /// bounding box starts higher on the page, then further left, then
    /// to the first one discovered.
    pub fn largest_table(&self) -> Option<&Table> {
        let mut best: Option<&Table> = None;
        for table in &self.tables {
            let Some(current) = best else {
                best = Some(table);
                continue;
            };
            if table.cells.len() > current.cells.len() {
                best = Some(table);
                continue;
            }
            if table.cells.len() == current.cells.len() {
                let (tb, cb) = (table.bbox(), current.bbox());
                if tb.top < cb.top || (tb.top == cb.top && tb.x0 < cb.x0) {
                    best = Some(table);
                }
            }
        }
        best
    }

    /// Extract the text grid of every table.
    pub fn extract_tables(&self) -> Vec<Vec<Vec<Option<String>>>> {
        self.tables
            .iter()
            .map(|t| t.extract(&self.words, &self.settings))
            .collect()
    }

    /// Extract the text grid of the largest table, if any.
    pub fn extract_largest(&self) -> Option<Vec<Vec<Option<String>>>> {
        self.largest_table()
            .map(|t| t.extract(&self.words, &self.settings))
    }
}

/// Extract every table on a page as a row-major text grid.
pub fn extract_tables(
    page: &PageObjects,
    settings: &TableSettings,
) -> Result<Vec<Vec<Vec<Option<String>>>>> {
    Ok(TableFinder::new(page, settings.clone())?.extract_tables())
}

/// Extract the largest table on a page, if any.
pub fn extract_table(
    page: &PageObjects,
    settings: &TableSettings,
) -> Result<Option<Vec<Vec<Option<String>>>>> {
    Ok(TableFinder::new(page, settings.clone())?.extract_largest())
}

/// Extract tables from many pages in parallel. Pages are independent,
/// so each runs the full pipeline on its own worker; output order
/// matches input order. Settings are validated once up front.
pub fn extract_tables_batch(
    pages: &[PageObjects],
    settings: &TableSettings,
) -> Result<Vec<Vec<Vec<Vec<Option<String>>>>>> {
    settings.validate()?;
    pages
        .par_iter()
        .map(|page| extract_tables(page, settings))
        .collect()
}
