#![cfg(feature = "serde")]

use trellis_core::{BBox, ExplicitLine, TableSettings};

#[test]
fn settings_round_trip() {
    let settings = TableSettings {
        vertical_strategy: "text".to_string(),
        snap_x_tolerance: Some(1.5),
        explicit_horizontal_lines: vec![
            ExplicitLine::Coord(12.0),
            ExplicitLine::Rect(BBox {
                x0: 0.0,
                top: 0.0,
                x1: 10.0,
                bottom: 10.0,
            }),
        ],
        ..TableSettings::default()
    };

    let json = serde_json::to_string(&settings).unwrap();
    let back: TableSettings = serde_json::from_str(&json).unwrap();
    assert_eq!(back.vertical_strategy, "text");
    assert_eq!(back.snap_x_tolerance, Some(1.5));
    assert_eq!(back.explicit_horizontal_lines.len(), 2);
}

#[test]
fn bbox_serializes_flat() {
    let bbox = BBox {
        x0: 1.0,
        top: 2.0,
        x1: 3.0,
        bottom: 4.0,
    };
    let json = serde_json::to_value(bbox).unwrap();
    assert_eq!(json["x0"], 1.0);
    assert_eq!(json["bottom"], 4.0);
}
