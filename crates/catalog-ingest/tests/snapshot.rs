//! End-to-end tests: source file to normalized snapshot.

use std::fs;

use catalog_ingest::{ColumnMap, IngestError, read_snapshot};

#[test]
fn csv_source_becomes_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("precios_0105.csv");
    fs::write(
        &path,
        "Código,Descripcion,Unidad,Precio,StActual,Pr.Unit\n\
         A1,Cuaderno A4,UN,5.50,12,5.50\n\
         A1,Cuaderno A4,DOC,60,3,5.00\n\
         B2, Lapicero azul ,UN,,40,\n",
    )
    .unwrap();

    let snapshot = read_snapshot(&path, &ColumnMap::default()).unwrap();

    assert_eq!(snapshot.source.file_name, "precios_0105.csv");
    assert!(snapshot.source.modified.is_some());
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot.records[1].unit, "DOC");
    assert_eq!(snapshot.records[2].description, "Lapicero azul");
    assert_eq!(snapshot.records[2].price, "0");
    assert_eq!(snapshot.records[2].unit_price, "0");
    // Same code under two units stays two entries.
    assert_eq!(snapshot.index().len(), 3);
}

#[test]
fn missing_columns_default_instead_of_failing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("minimal.csv");
    fs::write(&path, "Código,Otro\nA1,x\n").unwrap();

    let snapshot = read_snapshot(&path, &ColumnMap::default()).unwrap();
    let record = &snapshot.records[0];
    assert_eq!(record.code, "A1");
    assert_eq!(record.description, "");
    assert_eq!(record.price, "0");
    assert_eq!(record.stock, "0");
}

#[test]
fn unreadable_source_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_snapshot(&dir.path().join("gone.xlsx"), &ColumnMap::default());
    assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
}
