//! Sweep-line search for vertical/horizontal edge intersections.
//!
//! A vertical edge V and horizontal edge H intersect when V's x falls
//! within H's horizontal span (± x tolerance) and H's y falls within V's
//! vertical span (± y tolerance). The intersection point is (V.x, H.top)
//! — the snapped coordinates, not an interpolated crossing.

use std::collections::{BTreeMap, HashMap};

use crate::types::{Edge, HEdgeId, KeyF64, KeyPoint, Orientation, VEdgeId, key_f64, key_point};

/// Sorted vertical and horizontal edges, indexable by id.
pub(crate) struct EdgeStore {
    pub v: Vec<Edge>,
    pub h: Vec<Edge>,
}

impl EdgeStore {
    pub fn v(&self, id: VEdgeId) -> &Edge {
        &self.v[id.0]
    }

    pub fn h(&self, id: HEdgeId) -> &Edge {
        &self.h[id.0]
    }
}

/// Ids of the edges meeting at one intersection point.
#[derive(Clone, Debug)]
pub(crate) struct IntersectionIdx {
    pub v: Vec<VEdgeId>,
    pub h: Vec<HEdgeId>,
}

/// Find all intersections between edges using a sweep over y.
///
/// Vertical edges enter the active set at `top - y_tol` and leave at
/// `bottom + y_tol`; each horizontal edge queries the active set once at
/// its own y. Event ordering is fully deterministic so identical input
/// yields identical output.
pub(crate) fn edges_to_intersections(
    edges: &[Edge],
    x_tol: f64,
    y_tol: f64,
) -> (EdgeStore, HashMap<KeyPoint, IntersectionIdx>) {
    enum EventKind {
        AddV,
        QueryH,
        RemoveV,
    }

    struct Event {
        y: f64,
        kind: EventKind,
        idx: usize,
    }

    let mut v_sorted: Vec<Edge> = edges
        .iter()
        .filter(|e| e.orientation == Some(Orientation::Vertical))
        .cloned()
        .collect();
    let mut h_sorted: Vec<Edge> = edges
        .iter()
        .filter(|e| e.orientation == Some(Orientation::Horizontal))
        .cloned()
        .collect();

    v_sorted.sort_by(|a, b| {
        (key_f64(a.x0), key_f64(a.top)).cmp(&(key_f64(b.x0), key_f64(b.top)))
    });
    h_sorted.sort_by(|a, b| {
        (key_f64(a.top), key_f64(a.x0)).cmp(&(key_f64(b.top), key_f64(b.x0)))
    });

    let mut events = Vec::with_capacity(v_sorted.len() * 2 + h_sorted.len());
    for (idx, v) in v_sorted.iter().enumerate() {
        events.push(Event {
            y: v.top - y_tol,
            kind: EventKind::AddV,
            idx,
        });
        events.push(Event {
            y: v.bottom + y_tol,
            kind: EventKind::RemoveV,
            idx,
        });
    }
    for (idx, h) in h_sorted.iter().enumerate() {
        events.push(Event {
            y: h.top,
            kind: EventKind::QueryH,
            idx,
        });
    }

    let kind_order = |kind: &EventKind| match kind {
        EventKind::AddV => 0,
        EventKind::QueryH => 1,
        EventKind::RemoveV => 2,
    };
    let event_pos = |e: &Event| match e.kind {
        EventKind::AddV | EventKind::RemoveV => {
            let v = &v_sorted[e.idx];
            (key_f64(v.x0), key_f64(v.top))
        }
        EventKind::QueryH => {
            let h = &h_sorted[e.idx];
            (key_f64(h.x0), key_f64(h.top))
        }
    };

    events.sort_by(|a, b| {
        key_f64(a.y)
            .cmp(&key_f64(b.y))
            .then(kind_order(&a.kind).cmp(&kind_order(&b.kind)))
            .then(event_pos(a).cmp(&event_pos(b)))
            .then(a.idx.cmp(&b.idx))
    });

    let mut active: BTreeMap<KeyF64, Vec<usize>> = BTreeMap::new();
    let mut pairs: HashMap<KeyPoint, Vec<(VEdgeId, HEdgeId)>> = HashMap::new();

    for event in events {
        match event.kind {
            EventKind::AddV => {
                let v = &v_sorted[event.idx];
                active.entry(key_f64(v.x0)).or_default().push(event.idx);
            }
            EventKind::RemoveV => {
                let v = &v_sorted[event.idx];
                let key = key_f64(v.x0);
                if let Some(bucket) = active.get_mut(&key) {
                    bucket.retain(|&idx| idx != event.idx);
                    if bucket.is_empty() {
                        active.remove(&key);
                    }
                }
            }
            EventKind::QueryH => {
                let h = &h_sorted[event.idx];
                let x_min = key_f64(h.x0 - x_tol);
                let x_max = key_f64(h.x1 + x_tol);
                for (_x0, v_indices) in active.range(x_min..=x_max) {
                    for &v_idx in v_indices {
                        let v = &v_sorted[v_idx];
                        if v.top <= h.top + y_tol && v.bottom >= h.top - y_tol {
                            let vertex = key_point(v.x0, h.top);
                            pairs
                                .entry(vertex)
                                .or_default()
                                .push((VEdgeId(v_idx), HEdgeId(event.idx)));
                        }
                    }
                }
            }
        }
    }

    let mut intersections: HashMap<KeyPoint, IntersectionIdx> = HashMap::with_capacity(pairs.len());
    for (vertex, mut pair_list) in pairs {
        pair_list.sort_by(|a, b| a.0.0.cmp(&b.0.0).then(a.1.0.cmp(&b.1.0)));
        let mut v = Vec::with_capacity(pair_list.len());
        let mut h = Vec::with_capacity(pair_list.len());
        for (v_idx, h_idx) in pair_list {
            v.push(v_idx);
            h.push(h_idx);
        }
        intersections.insert(vertex, IntersectionIdx { v, h });
    }
    (
        EdgeStore {
            v: v_sorted,
            h: h_sorted,
        },
        intersections,
    )
}
