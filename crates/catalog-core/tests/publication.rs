use std::fs;

use catalog_core::{
    CacheBustOutcome, CacheBuster, Clock, FixedClock, SecureEncoder, assemble, version_token,
    write_publication,
};
use catalog_model::{ProductRecord, Snapshot, SourceInfo};
use chrono::{TimeZone, Utc};
use tempfile::tempdir;

fn sample_snapshot() -> Snapshot {
    Snapshot::new(
        SourceInfo {
            file_name: "lista.xlsx".to_string(),
            path: "lista.xlsx".into(),
            modified: None,
        },
        vec![ProductRecord {
            code: "A1".to_string(),
            description: "Tornillo".to_string(),
            unit: "UN".to_string(),
            price: "5".to_string(),
            stock: "10".to_string(),
            unit_price: "5".to_string(),
        }],
    )
}

#[test]
fn wire_format_is_stable() {
    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap());
    let doc = assemble(sample_snapshot(), None, clock.now());
    insta::assert_json_snapshot!(doc, @r#"
    {
      "metadata": {
        "last_updated": "2026-01-05T10:00:00Z",
        "total_productos": 1
      },
      "changes": null,
      "products": [
        {
          "codigo": "A1",
          "descripcion": "Tornillo",
          "unidad": "UN",
          "precio": "5",
          "stock": "10",
          "precio_unit": "5"
        }
      ]
    }
    "#);
}

#[test]
fn frozen_clock_cache_bust_is_idempotent() {
    let temp = tempdir().unwrap();
    let page = temp.path().join("index.html");
    fs::write(
        &page,
        "<script>fetch('productos.json?v=20250101000000')</script>\n<link href=\"app.css?v=1\">\n",
    )
    .unwrap();

    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap());
    let buster = CacheBuster::new(&page, "v").unwrap();

    let first = buster.apply(&version_token(clock.now())).unwrap();
    assert_eq!(first, CacheBustOutcome::Rewritten { replacements: 2 });
    let modified = fs::metadata(&page).unwrap().modified().unwrap();

    let second = buster.apply(&version_token(clock.now())).unwrap();
    assert_eq!(second, CacheBustOutcome::Unchanged);
    assert_eq!(fs::metadata(&page).unwrap().modified().unwrap(), modified);
    assert_eq!(
        fs::read_to_string(&page).unwrap(),
        "<script>fetch('productos.json?v=20260105100000')</script>\n<link href=\"app.css?v=20260105100000\">\n"
    );
}

#[test]
fn published_file_decodes() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("productos.json");
    let encoder = SecureEncoder::new("clave");
    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap());
    let doc = assemble(sample_snapshot(), None, clock.now());

    write_publication(&out, &encoder.encode(&doc).unwrap()).unwrap();

    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(encoder.decode(&text).unwrap(), doc);
}
