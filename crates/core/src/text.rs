//! Per-cell text assembly.
//!
//! Words whose center falls inside a cell (expanded by the text
//! tolerances) belong to that cell; members are clustered into lines,
//! ordered in reading order, and joined with spaces within a line and
//! newlines between lines.

use itertools::Itertools;

use crate::clustering::cluster_objects;
use crate::types::{BBox, Word};

/// Center-point membership test against a tolerance-expanded cell.
pub fn word_in_cell(word: &Word, cell: &BBox, x_tolerance: f64, y_tolerance: f64) -> bool {
    let h_mid = (word.x0 + word.x1) / 2.0;
    let v_mid = (word.top + word.bottom) / 2.0;
    h_mid >= cell.x0 - x_tolerance
        && h_mid < cell.x1 + x_tolerance
        && v_mid >= cell.top - y_tolerance
        && v_mid < cell.bottom + y_tolerance
}

/// Join a cell's words into its text: lines cluster by top within the y
/// tolerance, words order left to right within a line.
pub fn cell_text(words: &[&Word], y_tolerance: f64) -> String {
    if words.is_empty() {
        return String::new();
    }
    let lines = cluster_objects(words, |w| w.top, y_tolerance, false);
    lines
        .into_iter()
        .map(|mut line| {
            line.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal));
            line.iter().map(|w| w.text.as_str()).join(" ")
        })
        .join("\n")
}
