use trellis_core::{BBox, PageObjects, TableFinder, TableSettings, extract_tables};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn page_with_lines(lines: Vec<((f64, f64), (f64, f64))>) -> PageObjects {
    PageObjects {
        bbox: BBox {
            x0: 0.0,
            top: 0.0,
            x1: 200.0,
            bottom: 200.0,
        },
        lines,
        ..PageObjects::default()
    }
}

fn grid_lines() -> Vec<((f64, f64), (f64, f64))> {
    vec![
        ((0.0, 0.0), (0.0, 10.0)),
        ((10.0, 0.0), (10.0, 10.0)),
        ((0.0, 0.0), (10.0, 0.0)),
        ((0.0, 10.0), (10.0, 10.0)),
    ]
}

#[test]
fn four_lines_form_one_cell() {
    init_logs();
    let page = page_with_lines(grid_lines());
    let finder = TableFinder::new(&page, TableSettings::default()).unwrap();

    assert_eq!(
        finder.cells(),
        &[BBox {
            x0: 0.0,
            top: 0.0,
            x1: 10.0,
            bottom: 10.0,
        }]
    );
    assert_eq!(finder.tables().len(), 1);
    let table = &finder.tables()[0];
    assert_eq!(table.rows().len(), 1);
    assert_eq!(table.columns().len(), 1);
}

#[test]
fn middle_line_splits_the_cell() {
    let mut lines = grid_lines();
    lines.push(((5.0, 0.0), (5.0, 10.0)));
    let page = page_with_lines(lines);
    let finder = TableFinder::new(&page, TableSettings::default()).unwrap();

    assert_eq!(finder.cells().len(), 2);
    assert_eq!(finder.tables().len(), 1);
    let table = &finder.tables()[0];
    assert_eq!(table.rows().len(), 1);
    assert_eq!(table.columns().len(), 2);
    assert_eq!(table.cells[0].x1, 5.0);
}

#[test]
fn rects_sharing_a_border_group_into_one_table() {
    let page = PageObjects {
        rects: vec![
            BBox {
                x0: 0.0,
                top: 0.0,
                x1: 10.0,
                bottom: 10.0,
            },
            BBox {
                x0: 10.0,
                top: 0.0,
                x1: 20.0,
                bottom: 10.0,
            },
        ],
        ..PageObjects::default()
    };
    let finder = TableFinder::new(&page, TableSettings::default()).unwrap();

    assert_eq!(finder.tables().len(), 1);
    assert_eq!(finder.tables()[0].cells.len(), 2);
}

#[test]
fn disjoint_rects_form_separate_single_cell_tables() {
    let page = PageObjects {
        rects: vec![
            BBox {
                x0: 0.0,
                top: 0.0,
                x1: 10.0,
                bottom: 10.0,
            },
            BBox {
                x0: 50.0,
                top: 50.0,
                x1: 60.0,
                bottom: 60.0,
            },
        ],
        ..PageObjects::default()
    };
    let finder = TableFinder::new(&page, TableSettings::default()).unwrap();

    assert_eq!(finder.tables().len(), 2);
    assert_eq!(finder.tables()[0].cells.len(), 1);
    assert_eq!(finder.tables()[1].cells.len(), 1);
    // Top-most table first
    assert_eq!(finder.tables()[0].bbox().top, 0.0);
}

#[test]
fn rectilinear_curve_borders_form_a_cell() {
    // A closed rectilinear polyline plus one slanted tail segment; the
    // tail has no orientation and drops out of the pipeline.
    let page = PageObjects {
        curves: vec![vec![
            (0.0, 0.0),
            (60.0, 0.0),
            (60.0, 40.0),
            (0.0, 40.0),
            (0.0, 0.0),
            (30.0, 70.0),
        ]],
        ..PageObjects::default()
    };
    let finder = TableFinder::new(&page, TableSettings::default()).unwrap();

    assert_eq!(
        finder.cells(),
        &[BBox {
            x0: 0.0,
            top: 0.0,
            x1: 60.0,
            bottom: 40.0,
        }]
    );
    assert_eq!(finder.tables().len(), 1);
}

#[test]
fn lines_strict_ignores_curve_and_rect_borders() {
    let page = PageObjects {
        curves: vec![vec![
            (0.0, 0.0),
            (60.0, 0.0),
            (60.0, 40.0),
            (0.0, 40.0),
            (0.0, 0.0),
        ]],
        rects: vec![BBox {
            x0: 100.0,
            top: 100.0,
            x1: 160.0,
            bottom: 140.0,
        }],
        ..PageObjects::default()
    };
    let settings = TableSettings {
        vertical_strategy: "lines_strict".to_string(),
        horizontal_strategy: "lines_strict".to_string(),
        ..TableSettings::default()
    };
    let finder = TableFinder::new(&page, settings).unwrap();

    assert!(finder.edges().is_empty());
    assert!(finder.tables().is_empty());
}

#[test]
fn short_edge_is_discarded_entirely() {
    let mut lines = grid_lines();
    // Length 2 < edge_min_length 3: contributes nothing downstream
    lines.push(((0.0, 5.0), (2.0, 5.0)));
    let page = page_with_lines(lines);
    let finder = TableFinder::new(&page, TableSettings::default()).unwrap();

    assert!(
        finder
            .edges()
            .iter()
            .all(|e| e.top != 5.0 || e.bottom != 5.0)
    );
    assert!(finder.intersections().iter().all(|p| p.1 != 5.0));
    assert_eq!(finder.cells().len(), 1);
}

#[test]
fn empty_page_yields_no_tables() {
    let page = PageObjects::default();
    let finder = TableFinder::new(&page, TableSettings::default()).unwrap();

    assert!(finder.edges().is_empty());
    assert!(finder.intersections().is_empty());
    assert!(finder.cells().is_empty());
    assert!(finder.tables().is_empty());
    assert!(finder.extract_tables().is_empty());
    assert!(finder.largest_table().is_none());
}

#[test]
fn cells_partition_the_table_bbox() {
    let mut lines = Vec::new();
    for c in [0.0, 10.0, 20.0, 30.0] {
        lines.push(((c, 0.0), (c, 30.0)));
        lines.push(((0.0, c), (30.0, c)));
    }
    let page = page_with_lines(lines);
    let finder = TableFinder::new(&page, TableSettings::default()).unwrap();

    assert_eq!(finder.tables().len(), 1);
    let table = &finder.tables()[0];
    assert_eq!(table.cells.len(), 9);
    let cell_area: f64 = table.cells.iter().map(|c| c.width() * c.height()).sum();
    let bbox = table.bbox();
    assert!((cell_area - bbox.width() * bbox.height()).abs() < 1e-9);
}

#[test]
fn repeated_runs_are_deterministic() {
    init_logs();
    let mut lines = Vec::new();
    for c in [0.0, 10.0, 20.0, 30.0] {
        lines.push(((c, 0.0), (c, 30.0)));
        lines.push(((0.0, c), (30.0, c)));
    }
    // Near-duplicate line that snapping must fold in
    lines.push(((11.0, 0.0), (11.0, 30.0)));
    let page = page_with_lines(lines);
    let settings = TableSettings::default();

    let first = TableFinder::new(&page, settings.clone()).unwrap();
    let second = TableFinder::new(&page, settings.clone()).unwrap();
    assert_eq!(first.edges(), second.edges());
    assert_eq!(first.intersections(), second.intersections());
    assert_eq!(first.cells(), second.cells());
    assert_eq!(
        extract_tables(&page, &settings).unwrap(),
        extract_tables(&page, &settings).unwrap()
    );
}

#[test]
fn largest_table_prefers_cell_count_then_top() {
    // A 2-cell table below a 1-cell table: cell count wins over position
    let page = PageObjects {
        rects: vec![
            BBox {
                x0: 0.0,
                top: 0.0,
                x1: 10.0,
                bottom: 10.0,
            },
            BBox {
                x0: 0.0,
                top: 100.0,
                x1: 10.0,
                bottom: 110.0,
            },
            BBox {
                x0: 10.0,
                top: 100.0,
                x1: 20.0,
                bottom: 110.0,
            },
        ],
        ..PageObjects::default()
    };
    let finder = TableFinder::new(&page, TableSettings::default()).unwrap();
    let largest = finder.largest_table().unwrap();
    assert_eq!(largest.cells.len(), 2);
    assert_eq!(largest.bbox().top, 100.0);

    // Equal cell counts: the higher table wins
    let page = PageObjects {
        rects: vec![
            BBox {
                x0: 40.0,
                top: 50.0,
                x1: 50.0,
                bottom: 60.0,
            },
            BBox {
                x0: 0.0,
                top: 0.0,
                x1: 10.0,
                bottom: 10.0,
            },
        ],
        ..PageObjects::default()
    };
    let finder = TableFinder::new(&page, TableSettings::default()).unwrap();
    assert_eq!(finder.largest_table().unwrap().bbox().top, 0.0);
}
