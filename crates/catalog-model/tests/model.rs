//! Wire-format tests for catalog-model types.

use catalog_model::{
    ChangeKind, ChangeSet, DocumentMetadata, NewItem, PriceChange, PriceDirection,
    ProductRecord, PublicationDocument,
};
use chrono::{TimeZone, Utc};
use serde_json::json;

fn sample_record() -> ProductRecord {
    ProductRecord {
        code: "A1".to_string(),
        description: "Cuaderno A4".to_string(),
        unit: "UN".to_string(),
        price: "5.50".to_string(),
        stock: "12".to_string(),
        unit_price: "5.50".to_string(),
    }
}

#[test]
fn product_record_uses_front_end_names() {
    let value = serde_json::to_value(sample_record()).unwrap();
    assert_eq!(
        value,
        json!({
            "codigo": "A1",
            "descripcion": "Cuaderno A4",
            "unidad": "UN",
            "precio": "5.50",
            "stock": "12",
            "precio_unit": "5.50"
        })
    );
}

#[test]
fn change_entries_serialize_kind_and_direction() {
    let set = ChangeSet {
        new_items: vec![NewItem {
            code: "A1".to_string(),
            description: "Cuaderno A4".to_string(),
            price: "50".to_string(),
            unit: "DOC".to_string(),
            is_new_product: false,
            kind: ChangeKind::NewVariant,
        }],
        price_changes: vec![PriceChange {
            code: "B2".to_string(),
            description: "Lapicero".to_string(),
            price_old: "1.00".to_string(),
            price_new: "1.20".to_string(),
            unit: "UN".to_string(),
            direction: PriceDirection::Up,
        }],
    };
    let value = serde_json::to_value(&set).unwrap();
    assert_eq!(value["nuevos"][0]["codigo"], "A1");
    assert_eq!(value["nuevos"][0]["precio"], "50");
    assert_eq!(value["nuevos"][0]["tipo_cambio"], "nueva_unidad");
    assert_eq!(value["nuevos"][0]["es_producto_nuevo"], false);
    assert_eq!(value["precios"][0]["tipo"], "subio");
    assert_eq!(value["precios"][0]["precio_antiguo"], "1.00");
    assert_eq!(value["precios"][0]["precio_nuevo"], "1.20");
    assert_eq!(value["precios"][0]["unidad"], "UN");
}

#[test]
fn document_without_changes_serializes_null() {
    let document = PublicationDocument {
        metadata: DocumentMetadata {
            timestamp: Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap(),
            total_products: 1,
        },
        changes: None,
        products: vec![sample_record()],
    };
    let value = serde_json::to_value(&document).unwrap();
    assert!(value["changes"].is_null());
    assert_eq!(value["metadata"]["total_productos"], 1);
    assert_eq!(value["metadata"]["last_updated"], "2026-01-05T10:00:00Z");

    let back: PublicationDocument = serde_json::from_value(value).unwrap();
    assert_eq!(back, document);
}

#[test]
fn catalog_page_fields_are_present() {
    let document = PublicationDocument {
        metadata: DocumentMetadata {
            timestamp: Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap(),
            total_products: 1,
        },
        changes: Some(ChangeSet {
            new_items: vec![NewItem {
                code: "B2".to_string(),
                description: "Lapicero".to_string(),
                price: "1.20".to_string(),
                unit: "UN".to_string(),
                is_new_product: true,
                kind: ChangeKind::NewProduct,
            }],
            price_changes: Vec::new(),
        }),
        products: vec![sample_record()],
    };
    let value = serde_json::to_value(&document).unwrap();

    let product = &value["products"][0];
    for field in ["codigo", "descripcion", "unidad", "precio", "stock", "precio_unit"] {
        assert!(product.get(field).is_some(), "missing product field {field}");
    }
    assert!(value["metadata"].get("last_updated").is_some());
    assert!(value["changes"]["nuevos"].is_array());
    assert!(value["changes"]["precios"].is_array());
    assert_eq!(value["changes"]["nuevos"][0]["es_producto_nuevo"], true);
    assert_eq!(value["changes"]["nuevos"][0]["tipo_cambio"], "producto_nuevo");
}

#[test]
fn price_decrease_is_bajo() {
    let value = serde_json::to_value(PriceDirection::Down).unwrap();
    assert_eq!(value, "bajo");
    assert_eq!(PriceDirection::Down.to_string(), "bajo");
}
