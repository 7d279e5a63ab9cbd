//! Cell tiling and table grouping.
//!
//! Derives the most granular set of rectangular cells whose corners are
//! valid intersections and whose sides are fully covered by edge
//! material, then groups corner-sharing cells into tables with a derived
//! row/column structure.

use std::collections::{HashMap, VecDeque};

use crate::clustering::make_cluster_dict;
use crate::intersections::{EdgeStore, IntersectionIdx};
use crate::text::{cell_text, word_in_cell};
use crate::types::{BBox, BBoxKey, KeyPoint, TableSettings, Word, bbox_key, key_f64, key_point};

fn edge_lists_intersect(a: &[BBoxKey], b: &[BBoxKey]) -> bool {
    let mut i = 0usize;
    let mut j = 0usize;
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            return true;
        }
        if a[i] < b[j] {
            i += 1;
        } else {
            j += 1;
        }
    }
    false
}

/// Derive cells from the intersection set.
///
/// Each intersection point is tried as a top-left corner: candidate
/// bottom-left corners are the points further down the same vertical
/// edges, candidate top-right corners the points further right along the
/// same horizontal edges (both via binary search over per-edge sorted
/// point lists). A rectangle becomes a cell only when its bottom-right
/// corner is also an intersection and all four sides run along a shared
/// edge; a corner-only touch does not qualify. Only the smallest valid
/// rectangle per top-left corner is kept, so larger regions are
/// reassembled later by grouping rather than tiled coarsely here.
pub fn intersections_to_cells(
    store: &EdgeStore,
    intersections: &HashMap<KeyPoint, IntersectionIdx>,
) -> Vec<BBox> {
    let mut entries: Vec<(&KeyPoint, &IntersectionIdx)> = intersections.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    let points: Vec<KeyPoint> = entries.iter().map(|(p, _)| **p).collect();

    let mut point_index: HashMap<KeyPoint, usize> = HashMap::with_capacity(points.len());
    for (idx, point) in points.iter().enumerate() {
        point_index.insert(*point, idx);
    }

    // Per point: sorted, deduped identities of the edges through it
    let mut point_v_edges: Vec<Vec<BBoxKey>> = Vec::with_capacity(points.len());
    let mut point_h_edges: Vec<Vec<BBoxKey>> = Vec::with_capacity(points.len());
    for (_, inter) in &entries {
        let mut v_ids: Vec<BBoxKey> = inter.v.iter().map(|id| bbox_key(&store.v(*id).bbox())).collect();
        let mut h_ids: Vec<BBoxKey> = inter.h.iter().map(|id| bbox_key(&store.h(*id).bbox())).collect();
        v_ids.sort();
        v_ids.dedup();
        h_ids.sort();
        h_ids.dedup();
        point_v_edges.push(v_ids);
        point_h_edges.push(h_ids);
    }

    // Per edge: point ids along it, sorted by the along-axis coordinate
    let mut edge_points_v: HashMap<BBoxKey, Vec<usize>> = HashMap::new();
    let mut edge_points_h: HashMap<BBoxKey, Vec<usize>> = HashMap::new();
    for (pid, edge_ids) in point_v_edges.iter().enumerate() {
        for edge_id in edge_ids {
            edge_points_v.entry(*edge_id).or_default().push(pid);
        }
    }
    for (pid, edge_ids) in point_h_edges.iter().enumerate() {
        for edge_id in edge_ids {
            edge_points_h.entry(*edge_id).or_default().push(pid);
        }
    }
    for point_ids in edge_points_v.values_mut() {
        point_ids.sort_by(|a, b| points[*a].1.cmp(&points[*b].1));
        point_ids.dedup();
    }
    for point_ids in edge_points_h.values_mut() {
        point_ids.sort_by(|a, b| points[*a].0.cmp(&points[*b].0));
        point_ids.dedup();
    }

    // Two corners connect when a single edge runs through both
    let edge_connects = |p1: usize, p2: usize| -> bool {
        if points[p1].0 == points[p2].0 {
            return edge_lists_intersect(&point_v_edges[p1], &point_v_edges[p2]);
        }
        if points[p1].1 == points[p2].1 {
            return edge_lists_intersect(&point_h_edges[p1], &point_h_edges[p2]);
        }
        false
    };

    let mut cells = Vec::new();
    for (idx, point) in points.iter().enumerate() {
        let mut below_candidates: Vec<usize> = Vec::new();
        for edge_id in &point_v_edges[idx] {
            if let Some(point_ids) = edge_points_v.get(edge_id)
                && let Ok(pos) = point_ids.binary_search_by(|pid| points[*pid].1.cmp(&point.1))
            {
                below_candidates.extend(point_ids[pos + 1..].iter().copied());
            }
        }
        below_candidates.sort_by(|a, b| points[*a].1.cmp(&points[*b].1));
        below_candidates.dedup();

        let mut right_candidates: Vec<usize> = Vec::new();
        for edge_id in &point_h_edges[idx] {
            if let Some(point_ids) = edge_points_h.get(edge_id)
                && let Ok(pos) = point_ids.binary_search_by(|pid| points[*pid].0.cmp(&point.0))
            {
                right_candidates.extend(point_ids[pos + 1..].iter().copied());
            }
        }
        right_candidates.sort_by(|a, b| points[*a].0.cmp(&points[*b].0));
        right_candidates.dedup();

        'below: for below_id in below_candidates {
            if !edge_connects(idx, below_id) {
                continue;
            }
            for right_id in &right_candidates {
                if !edge_connects(idx, *right_id) {
                    continue;
                }
                let bottom_right = (points[*right_id].0, points[below_id].1);
                if let Some(&br_id) = point_index.get(&bottom_right)
                    && edge_connects(br_id, *right_id)
                    && edge_connects(br_id, below_id)
                {
                    cells.push(BBox {
                        x0: point.0.into_inner(),
                        top: point.1.into_inner(),
                        x1: points[*right_id].0.into_inner(),
                        bottom: points[below_id].1.into_inner(),
                    });
                    break 'below;
                }
            }
        }
    }

    cells.sort_by(|a, b| {
        (key_f64(a.top), key_f64(a.x0)).cmp(&(key_f64(b.top), key_f64(b.x0)))
    });
    cells
}

/// Group cells into connected components. The adjacency relation is
/// corner-sharing: two cells belong to the same table when they share at
/// least one corner point, so cells that overlap along part of a side
/// without a common corner land in separate tables. Components are
/// ordered by their top-most, then left-most cell; a lone cell is a
/// valid single-cell table.
pub fn cells_to_tables(cells: Vec<BBox>) -> Vec<Vec<BBox>> {
    fn bbox_corners(b: &BBox) -> [KeyPoint; 4] {
        [
            key_point(b.x0, b.top),
            key_point(b.x0, b.bottom),
            key_point(b.x1, b.top),
            key_point(b.x1, b.bottom),
        ]
    }

    if cells.is_empty() {
        return Vec::new();
    }

    let mut corner_map: HashMap<KeyPoint, Vec<usize>> = HashMap::new();
    for (idx, cell) in cells.iter().enumerate() {
        for corner in bbox_corners(cell) {
            corner_map.entry(corner).or_default().push(idx);
        }
    }

    let mut visited = vec![false; cells.len()];
    let mut tables: Vec<Vec<BBox>> = Vec::new();
    let mut queue: VecDeque<usize> = VecDeque::new();

    for start in 0..cells.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        queue.clear();
        queue.push_back(start);
        let mut group: Vec<BBox> = Vec::new();
        while let Some(idx) = queue.pop_front() {
            group.push(cells[idx]);
            for corner in bbox_corners(&cells[idx]) {
                if let Some(neighbors) = corner_map.get(&corner) {
                    for &neighbor in neighbors {
                        if !visited[neighbor] {
                            visited[neighbor] = true;
                            queue.push_back(neighbor);
                        }
                    }
                }
            }
        }
        tables.push(group);
    }

    let group_key = |group: &[BBox]| {
        group
            .iter()
            .map(|c| (key_f64(c.top), key_f64(c.x0)))
            .min()
            .unwrap_or((key_f64(0.0), key_f64(0.0)))
    };
    tables.sort_by(|a, b| group_key(a).cmp(&group_key(b)));
    tables
}

/// A detected table: a connected group of cells plus the clustering
/// tolerances used to derive its row/column grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub cells: Vec<BBox>,
    row_tolerance: f64,
    column_tolerance: f64,
}

impl Table {
    pub(crate) fn new(cells: Vec<BBox>, row_tolerance: f64, column_tolerance: f64) -> Self {
        Table {
            cells,
            row_tolerance,
            column_tolerance,
        }
    }

    /// Union bounding box of all member cells.
    pub fn bbox(&self) -> BBox {
        let mut x0 = f64::INFINITY;
        let mut top = f64::INFINITY;
        let mut x1 = f64::NEG_INFINITY;
        let mut bottom = f64::NEG_INFINITY;
        for c in &self.cells {
            x0 = x0.min(c.x0);
            top = top.min(c.top);
            x1 = x1.max(c.x1);
            bottom = bottom.max(c.bottom);
        }
        BBox {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Rows of the table, top to bottom. Each row holds one slot per
    /// column; `None` marks a slot subsumed by a spanning cell.
    pub fn rows(&self) -> Vec<CellGroup> {
        let grid = self.grid();
        grid.into_iter().map(|cells| CellGroup { cells }).collect()
    }

    /// Columns of the table, left to right.
    pub fn columns(&self) -> Vec<CellGroup> {
        let grid = self.grid();
        if grid.is_empty() {
            return Vec::new();
        }
        let n_cols = grid[0].len();
        (0..n_cols)
            .map(|col| CellGroup {
                cells: grid.iter().map(|row| row[col]).collect(),
            })
            .collect()
    }

    /// Row-major cell grid: rows cluster cell tops, columns cluster cell
    /// lefts, both within the snap tolerance the cells were built with.
    fn grid(&self) -> Vec<Vec<Option<BBox>>> {
        if self.cells.is_empty() {
            return Vec::new();
        }
        let row_dict = make_cluster_dict(
            self.cells.iter().map(|c| c.top).collect(),
            self.row_tolerance,
        );
        let col_dict = make_cluster_dict(
            self.cells.iter().map(|c| c.x0).collect(),
            self.column_tolerance,
        );
        let n_rows = row_dict.values().max().map_or(0, |m| m + 1);
        let n_cols = col_dict.values().max().map_or(0, |m| m + 1);

        let mut grid: Vec<Vec<Option<BBox>>> = vec![vec![None; n_cols]; n_rows];
        for cell in &self.cells {
            if let (Some(&row), Some(&col)) = (
                row_dict.get(&key_f64(cell.top)),
                col_dict.get(&key_f64(cell.x0)),
            ) {
                grid[row][col] = Some(*cell);
            }
        }
        grid
    }

    /// Extract the row-major text grid. `None` marks a grid slot with no
    /// cell; a cell with no words yields `Some("")`.
    pub fn extract(&self, words: &[Word], settings: &TableSettings) -> Vec<Vec<Option<String>>> {
        let x_tolerance = settings.text_x();
        let y_tolerance = settings.text_y();
        self.rows()
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|slot| {
                        slot.map(|cell| {
                            let members: Vec<&Word> = words
                                .iter()
                                .filter(|w| word_in_cell(w, &cell, x_tolerance, y_tolerance))
                                .collect();
                            cell_text(&members, y_tolerance)
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

/// One row or column of a table's grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CellGroup {
    pub cells: Vec<Option<BBox>>,
}

impl CellGroup {
    /// Union bounding box of the present cells, or `None` when every
    /// slot is empty.
    pub fn bbox(&self) -> Option<BBox> {
        let mut cells = self.cells.iter().flatten();
        let mut bbox = *cells.next()?;
        for c in cells {
            bbox.x0 = bbox.x0.min(c.x0);
            bbox.top = bbox.top.min(c.top);
            bbox.x1 = bbox.x1.max(c.x1);
            bbox.bottom = bbox.bottom.max(c.bottom);
        }
        Some(bbox)
    }
}
