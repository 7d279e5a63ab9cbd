//! Edge collection and normalization.
//!
//! Converts the collaborator's lines, rectangle borders, curve borders,
//! and word alignments into axis-aligned edges, then snaps near-equal
//! positions together, joins collinear near-touching segments, and drops
//! edges below the minimum length.

use std::collections::BTreeMap;

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::clustering::{bbox_from_words, bbox_overlap, cluster_objects};
use crate::types::{BBox, Edge, EdgeSource, Orientation, Point, Word, within};

/// Drop zero-length (single-point) and non-axis-aligned edges. Runs
/// before snapping so degenerate input never influences cluster means.
pub fn drop_degenerate(edges: Vec<Edge>) -> Vec<Edge> {
    edges
        .into_iter()
        .filter(|e| match e.orientation {
            Some(Orientation::Vertical) => e.height > 0.0,
            Some(Orientation::Horizontal) => e.width > 0.0,
            None => false,
        })
        .collect()
}

/// Snap edges of the same orientation to their cluster's mean coordinate.
/// The mean is assigned directly, so every member of a cluster carries the
/// bit-identical coordinate and later exact-key grouping sees one group.
pub fn snap_edges(edges: &[Edge], x_tolerance: f64, y_tolerance: f64) -> Vec<Edge> {
    let mut v_edges: Vec<Edge> = edges
        .iter()
        .filter(|e| e.orientation == Some(Orientation::Vertical))
        .cloned()
        .collect();
    let mut h_edges: Vec<Edge> = edges
        .iter()
        .filter(|e| e.orientation == Some(Orientation::Horizontal))
        .cloned()
        .collect();

    if x_tolerance > 0.0 {
        let clusters = cluster_objects(&v_edges, |e| e.x0, x_tolerance, false);
        let mut snapped: Vec<Edge> = Vec::new();
        for cluster in clusters {
            let avg = cluster.iter().map(|e| e.x0).sum::<f64>() / (cluster.len() as f64);
            for mut e in cluster {
                e.x1 = avg + e.width;
                e.x0 = avg;
                snapped.push(e);
            }
        }
        v_edges = snapped;
    }

    if y_tolerance > 0.0 {
        let clusters = cluster_objects(&h_edges, |e| e.top, y_tolerance, false);
        let mut snapped: Vec<Edge> = Vec::new();
        for cluster in clusters {
            let avg = cluster.iter().map(|e| e.top).sum::<f64>() / (cluster.len() as f64);
            for mut e in cluster {
                e.bottom = avg + e.height;
                e.top = avg;
                snapped.push(e);
            }
        }
        h_edges = snapped;
    }

    v_edges.into_iter().chain(h_edges).collect()
}

/// Join collinear edges whose along-axis gap is within tolerance.
///
/// A single pass over span-sorted edges reaches the fixpoint: each merge
/// only extends the running edge's far end.
pub fn join_edge_group(edges: &[Edge], orientation: Orientation, tolerance: f64) -> Vec<Edge> {
    let span = |e: &Edge| match orientation {
        Orientation::Horizontal => (e.x0, e.x1),
        Orientation::Vertical => (e.top, e.bottom),
    };

    let sorted: Vec<Edge> = edges
        .iter()
        .cloned()
        .sorted_by(|a, b| {
            span(a)
                .0
                .partial_cmp(&span(b).0)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .collect();

    let mut iter = sorted.into_iter();
    let Some(mut current) = iter.next() else {
        return Vec::new();
    };

    let mut joined: Vec<Edge> = Vec::new();
    for e in iter {
        let (e_min, e_max) = span(&e);
        let (_, cur_max) = span(&current);
        if e_min <= cur_max + tolerance {
            if e_max > cur_max {
                match orientation {
                    Orientation::Horizontal => {
                        current.x1 = e.x1;
                        current.width = current.x1 - current.x0;
                    }
                    Orientation::Vertical => {
                        current.bottom = e.bottom;
                        current.height = current.bottom - current.top;
                    }
                }
            }
        } else {
            joined.push(current);
            current = e;
        }
    }
    joined.push(current);
    joined
}

/// Normalize edges by snapping then joining. Output is deterministically
/// ordered by orientation, perpendicular position, then span.
pub fn merge_edges(
    edges: Vec<Edge>,
    snap_x_tolerance: f64,
    snap_y_tolerance: f64,
    join_x_tolerance: f64,
    join_y_tolerance: f64,
) -> Vec<Edge> {
    let mut edges = edges;
    if snap_x_tolerance > 0.0 || snap_y_tolerance > 0.0 {
        edges = snap_edges(&edges, snap_x_tolerance, snap_y_tolerance);
    }

    // Group by orientation and snapped perpendicular coordinate
    let mut grouped: BTreeMap<(Orientation, OrderedFloat<f64>), Vec<Edge>> = BTreeMap::new();
    for e in &edges {
        let orientation = match e.orientation {
            Some(o) => o,
            None => continue,
        };
        let key_val = match orientation {
            Orientation::Horizontal => e.top,
            Orientation::Vertical => e.x0,
        };
        grouped.entry((orientation, OrderedFloat(key_val))).or_default().push(e.clone());
    }

    let mut merged: Vec<Edge> = Vec::new();
    for ((orientation, _), group) in grouped {
        let tol = match orientation {
            Orientation::Horizontal => join_x_tolerance,
            Orientation::Vertical => join_y_tolerance,
        };
        merged.extend(join_edge_group(&group, orientation, tol));
    }

    merged
}

/// Filter edges by orientation, source, and minimum along-axis length.
pub fn filter_edges(
    edges: Vec<Edge>,
    orientation: Option<Orientation>,
    source: Option<EdgeSource>,
    min_length: f64,
) -> Vec<Edge> {
    edges
        .into_iter()
        .filter(|e| {
            let dim = if e.orientation == Some(Orientation::Vertical) {
                e.height
            } else {
                e.width
            };
            let source_ok = match source {
                Some(s) => e.source == s,
                None => true,
            };
            let orient_ok = match orientation {
                Some(o) => e.orientation == Some(o),
                None => true,
            };
            source_ok && orient_ok && dim >= min_length
        })
        .collect()
}

/// Convert a line segment to an edge. Slanted segments get no
/// orientation and fall out of the pipeline at the degeneracy filter.
pub fn line_to_edge(p0: Point, p1: Point) -> Edge {
    let x0 = p0.0.min(p1.0);
    let x1 = p0.0.max(p1.0);
    let top = p0.1.min(p1.1);
    let bottom = p0.1.max(p1.1);
    let orientation = if within(p0.1, p1.1, f64::EPSILON) {
        Some(Orientation::Horizontal)
    } else if within(p0.0, p1.0, f64::EPSILON) {
        Some(Orientation::Vertical)
    } else {
        None
    };
    Edge {
        x0,
        x1,
        top,
        bottom,
        width: x1 - x0,
        height: bottom - top,
        orientation,
        source: EdgeSource::Line,
    }
}

/// Convert a rectangle to its four border edges.
pub fn rect_to_edges(rect: BBox, source: EdgeSource) -> Vec<Edge> {
    vec![
        Edge::horizontal(rect.top, rect.x0, rect.x1, source),
        Edge::horizontal(rect.bottom, rect.x0, rect.x1, source),
        Edge::vertical(rect.x0, rect.top, rect.bottom, source),
        Edge::vertical(rect.x1, rect.top, rect.bottom, source),
    ]
}

/// Convert a curve (polyline) to one edge per consecutive point pair.
pub fn curve_to_edges(points: &[Point], source: EdgeSource) -> Vec<Edge> {
    let mut edges = Vec::new();
    for pair in points.windows(2) {
        let (p0, p1) = (pair[0], pair[1]);
        let x0 = p0.0.min(p1.0);
        let x1 = p0.0.max(p1.0);
        let top = p0.1.min(p1.1);
        let bottom = p0.1.max(p1.1);
        let orientation = if within(p0.0, p1.0, f64::EPSILON) {
            Some(Orientation::Vertical)
        } else if within(p0.1, p1.1, f64::EPSILON) {
            Some(Orientation::Horizontal)
        } else {
            None
        };
        edges.push(Edge {
            x0,
            x1,
            top,
            bottom,
            width: x1 - x0,
            height: bottom - top,
            orientation,
            source,
        });
    }
    edges
}

/// Infer horizontal edges from rows of words sharing a top coordinate.
///
/// Each sufficiently large row cluster contributes an edge at its top and
/// its bottom, both spanning the joint horizontal extent of all clusters.
pub fn words_to_edges_h(words: &[Word], word_threshold: usize, tolerance: f64) -> Vec<Edge> {
    let clusters = cluster_objects(words, |w| w.top, tolerance, false);
    let rects: Vec<BBox> = clusters
        .into_iter()
        .filter(|c| c.len() >= word_threshold)
        .map(|c| bbox_from_words(&c))
        .collect();
    if rects.is_empty() {
        return Vec::new();
    }
    let min_x0 = rects.iter().map(|r| r.x0).fold(f64::INFINITY, f64::min);
    let max_x1 = rects.iter().map(|r| r.x1).fold(f64::NEG_INFINITY, f64::max);

    let mut edges = Vec::new();
    for r in rects {
        edges.push(Edge::horizontal(
            r.top,
            min_x0,
            max_x1,
            EdgeSource::TextInferred,
        ));
        edges.push(Edge::horizontal(
            r.bottom,
            min_x0,
            max_x1,
            EdgeSource::TextInferred,
        ));
    }
    edges
}

/// Infer vertical edges from columns of words aligned on their left,
/// right, or center coordinate.
pub fn words_to_edges_v(words: &[Word], word_threshold: usize, tolerance: f64) -> Vec<Edge> {
    let by_x0 = cluster_objects(words, |w| w.x0, tolerance, false);
    let by_x1 = cluster_objects(words, |w| w.x1, tolerance, false);
    let by_center = cluster_objects(words, |w| (w.x0 + w.x1) / 2.0, tolerance, false);

    let mut clusters = Vec::new();
    clusters.extend(by_x0);
    clusters.extend(by_x1);
    clusters.extend(by_center);

    // Larger alignment groups win; overlapping smaller ones are dropped
    clusters.sort_by(|a, b| b.len().cmp(&a.len()));
    let bboxes: Vec<BBox> = clusters
        .into_iter()
        .filter(|c| c.len() >= word_threshold)
        .map(|c| bbox_from_words(&c))
        .collect();

    let mut condensed: Vec<BBox> = Vec::new();
    'outer: for bbox in bboxes {
        for c in &condensed {
            if bbox_overlap(bbox, *c).is_some() {
                continue 'outer;
            }
        }
        condensed.push(bbox);
    }

    if condensed.is_empty() {
        return Vec::new();
    }

    condensed.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal));

    let max_x1 = condensed
        .iter()
        .map(|r| r.x1)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_top = condensed
        .iter()
        .map(|r| r.top)
        .fold(f64::INFINITY, f64::min);
    let max_bottom = condensed
        .iter()
        .map(|r| r.bottom)
        .fold(f64::NEG_INFINITY, f64::max);

    let mut edges: Vec<Edge> = condensed
        .iter()
        .map(|r| Edge::vertical(r.x0, min_top, max_bottom, EdgeSource::TextInferred))
        .collect();
    edges.push(Edge::vertical(
        max_x1,
        min_top,
        max_bottom,
        EdgeSource::TextInferred,
    ));
    edges
}
