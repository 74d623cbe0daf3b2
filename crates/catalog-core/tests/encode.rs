use catalog_core::{SecureEncoder, assemble};
use catalog_model::{
    ChangeKind, ChangeSet, NewItem, ProductRecord, PublicationDocument, Snapshot, SourceInfo,
};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

fn document(products: Vec<ProductRecord>, changes: Option<ChangeSet>) -> PublicationDocument {
    let snapshot = Snapshot::new(
        SourceInfo {
            file_name: "lista.xlsx".to_string(),
            path: "lista.xlsx".into(),
            modified: None,
        },
        products,
    );
    let at = Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap();
    assemble(snapshot, changes, at)
}

fn record() -> impl Strategy<Value = ProductRecord> {
    (
        "[A-Z0-9]{1,6}",
        "\\PC{0,24}",
        "(UN|DOC|KG|)",
        "[0-9]{1,5}(\\.[0-9]{1,2})?",
        "[0-9]{0,4}",
        "[0-9]{1,4}\\.[0-9]{2}",
    )
        .prop_map(|(code, description, unit, price, stock, unit_price)| ProductRecord {
            code,
            description,
            unit,
            price,
            stock,
            unit_price,
        })
}

#[test]
fn empty_document_round_trips() {
    let encoder = SecureEncoder::new("clave");
    let doc = document(Vec::new(), None);
    let payload = encoder.encode(&doc).unwrap();
    let decoded = encoder.decode(&payload).unwrap();
    assert_eq!(decoded, doc);
    assert!(decoded.changes.is_none());
    assert_eq!(decoded.metadata.total_products, 0);
}

#[test]
fn null_changes_are_serialized() {
    let encoder = SecureEncoder::new("clave");
    let payload = encoder.encode(&document(Vec::new(), None)).unwrap();
    let decoded = encoder.decode(&payload).unwrap();
    let value = serde_json::to_value(&decoded).unwrap();
    assert!(value.as_object().unwrap().contains_key("changes"));
    assert!(value["changes"].is_null());
}

#[test]
fn payload_is_base64_only() {
    let encoder = SecureEncoder::new("clave");
    let payload = encoder.encode(&document(Vec::new(), None)).unwrap();
    assert!(
        payload
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=')
    );
}

#[test]
fn decode_with_other_secret_is_rejected() {
    let payload = SecureEncoder::new("primera")
        .encode(&document(Vec::new(), None))
        .unwrap();
    assert!(SecureEncoder::new("segunda").decode(&payload).is_err());
}

proptest! {
    #[test]
    fn documents_round_trip(
        secret in "\\PC{1,48}",
        products in proptest::collection::vec(record(), 0..12),
        with_changes in any::<bool>(),
    ) {
        let changes = (with_changes && !products.is_empty()).then(|| ChangeSet {
            new_items: vec![NewItem {
                code: products[0].code.clone(),
                description: products[0].description.clone(),
                price: products[0].price.clone(),
                unit: products[0].unit.clone(),
                is_new_product: true,
                kind: ChangeKind::NewProduct,
            }],
            price_changes: Vec::new(),
        });
        let doc = document(products, changes);
        let encoder = SecureEncoder::new(&secret);

        let payload = encoder.encode(&doc).unwrap();
        prop_assert_eq!(encoder.decode(&payload).unwrap(), doc);
    }
}
