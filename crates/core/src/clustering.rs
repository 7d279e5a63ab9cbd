//! Tolerance-based spatial clustering.
//!
//! Groups coordinates (and the objects that carry them) by chaining:
//! values belong to one cluster while each consecutive sorted gap stays
//! within tolerance.

use std::collections::HashMap;

use crate::types::{BBox, KeyF64, Word, key_f64};

/// Cluster a list of f64 values based on tolerance.
pub fn cluster_list(mut xs: Vec<f64>, tolerance: f64) -> Vec<Vec<f64>> {
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if tolerance == 0.0 || xs.len() < 2 {
        return xs.into_iter().map(|x| vec![x]).collect();
    }
    let mut groups: Vec<Vec<f64>> = Vec::new();
    let mut current: Vec<f64> = Vec::new();
    let mut last = xs[0];
    current.push(xs[0]);
    for x in xs.into_iter().skip(1) {
        if x <= last + tolerance {
            current.push(x);
        } else {
            groups.push(current);
            current = vec![x];
        }
        last = x;
    }
    groups.push(current);
    groups
}

/// Map each distinct value to the index of its cluster. Cluster indices
/// ascend with coordinate order.
pub fn make_cluster_dict(values: Vec<f64>, tolerance: f64) -> HashMap<KeyF64, usize> {
    let mut unique: Vec<f64> = values;
    unique.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    unique.dedup_by(|a, b| (*a - *b).abs() == 0.0);
    let clusters = cluster_list(unique, tolerance);
    let mut dict = HashMap::new();
    for (i, cluster) in clusters.into_iter().enumerate() {
        for val in cluster {
            dict.insert(key_f64(val), i);
        }
    }
    dict
}

/// Cluster objects by a key function and tolerance.
pub fn cluster_objects<T: Clone, F: Fn(&T) -> f64>(
    xs: &[T],
    key_fn: F,
    tolerance: f64,
    preserve_order: bool,
) -> Vec<Vec<T>> {
    let values: Vec<f64> = xs.iter().map(&key_fn).collect();
    let cluster_dict = make_cluster_dict(values, tolerance);

    let mut cluster_tuples: Vec<(T, usize)> = xs
        .iter()
        .map(|x| {
            (
                x.clone(),
                *cluster_dict.get(&key_f64(key_fn(x))).unwrap_or(&0),
            )
        })
        .collect();
    if !preserve_order {
        cluster_tuples.sort_by(|a, b| a.1.cmp(&b.1));
    }

    let mut groups: Vec<Vec<T>> = Vec::new();
    let mut current: Vec<T> = Vec::new();
    let mut last_idx: Option<usize> = None;
    for (item, idx) in cluster_tuples.drain(..) {
        if last_idx.is_none() || last_idx == Some(idx) {
            current.push(item);
        } else {
            groups.push(current);
            current = vec![item];
        }
        last_idx = Some(idx);
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

/// Compute a bounding box from a slice of words.
pub fn bbox_from_words(words: &[Word]) -> BBox {
    let mut x0 = f64::INFINITY;
    let mut top = f64::INFINITY;
    let mut x1 = f64::NEG_INFINITY;
    let mut bottom = f64::NEG_INFINITY;
    for w in words {
        x0 = x0.min(w.x0);
        top = top.min(w.top);
        x1 = x1.max(w.x1);
        bottom = bottom.max(w.bottom);
    }
    BBox {
        x0,
        top,
        x1,
        bottom,
    }
}

/// Compute the overlap between two bounding boxes, if any.
pub fn bbox_overlap(a: BBox, b: BBox) -> Option<BBox> {
    let o_left = a.x0.max(b.x0);
    let o_right = a.x1.min(b.x1);
    let o_top = a.top.max(b.top);
    let o_bottom = a.bottom.min(b.bottom);
    let o_width = o_right - o_left;
    let o_height = o_bottom - o_top;
    if o_height >= 0.0 && o_width >= 0.0 && (o_height + o_width) > 0.0 {
        Some(BBox {
            x0: o_left,
            top: o_top,
            x1: o_right,
            bottom: o_bottom,
        })
    } else {
        None
    }
}
