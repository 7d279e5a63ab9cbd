use trellis_core::{BBox, PageObjects, TableSettings, extract_tables, extract_tables_batch};

fn grid_page(origin: f64, n: usize) -> PageObjects {
    let mut lines = Vec::new();
    let size = (n as f64) * 10.0;
    for i in 0..=n {
        let c = origin + (i as f64) * 10.0;
        lines.push(((c, origin), (c, origin + size)));
        lines.push(((origin, c), (origin + size, c)));
    }
    PageObjects {
        bbox: BBox {
            x0: 0.0,
            top: 0.0,
            x1: 500.0,
            bottom: 500.0,
        },
        lines,
        ..PageObjects::default()
    }
}

#[test]
fn batch_matches_serial_in_order() {
    let pages: Vec<PageObjects> = (1..=6).map(|n| grid_page(10.0 * n as f64, n)).collect();
    let settings = TableSettings::default();

    let batch = extract_tables_batch(&pages, &settings).unwrap();
    assert_eq!(batch.len(), pages.len());
    for (page, got) in pages.iter().zip(&batch) {
        assert_eq!(got, &extract_tables(page, &settings).unwrap());
    }
    // Page n holds one n x n table
    for (n, got) in (1..=6).zip(&batch) {
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].len(), n);
        assert_eq!(got[0][0].len(), n);
    }
}

#[test]
fn batch_validates_settings_once() {
    let settings = TableSettings {
        edge_min_length: f64::NEG_INFINITY,
        ..TableSettings::default()
    };
    assert!(extract_tables_batch(&[], &settings).is_err());
}
