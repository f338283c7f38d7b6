mod common;

use catalog_core::{Category, Product, ProductValidationError};
use rust_decimal::Decimal;
use serde_json::json;

#[test]
fn new_product_keeps_supplied_fields_and_has_no_id() {
    let product = common::fedora();

    assert_eq!(product.to_string(), "<Product Fedora id=[None]>");
    assert_eq!(product.id, None);
    assert!(!product.is_persisted());
    assert_eq!(product.name, "Fedora");
    assert_eq!(product.description, "A red hat");
    assert!(product.available);
    assert_eq!(product.price, Decimal::new(125, 1));
    assert_eq!(product.category, Category::Cloths);
}

#[test]
fn display_includes_assigned_id() {
    let mut product = common::fedora();
    product.id = Some(42);
    assert_eq!(product.to_string(), "<Product Fedora id=[42]>");
}

#[test]
fn default_product_is_transient_and_unclassified() {
    let product = Product::default();
    assert_eq!(product.id, None);
    assert!(product.available);
    assert_eq!(product.price, Decimal::ZERO);
    assert_eq!(product.category, Category::Unknown);
    assert_eq!(product.validate(), Err(ProductValidationError::EmptyName));
}

#[test]
fn validate_rejects_out_of_range_fields() {
    let mut product = common::fedora();
    product.name = "x".repeat(101);
    assert_eq!(
        product.validate(),
        Err(ProductValidationError::NameTooLong { chars: 101 })
    );

    let mut product = common::fedora();
    product.description = "y".repeat(251);
    assert_eq!(
        product.validate(),
        Err(ProductValidationError::DescriptionTooLong { chars: 251 })
    );

    let mut product = common::fedora();
    product.price = Decimal::new(-1, 0);
    assert!(matches!(
        product.validate(),
        Err(ProductValidationError::NegativePrice(_))
    ));

    let mut product = common::fedora();
    product.price = Decimal::new(1_001, 3);
    assert!(matches!(
        product.validate(),
        Err(ProductValidationError::PriceScale(_))
    ));
}

#[test]
fn lifecycle_preconditions() {
    let mut product = common::fedora();
    assert_eq!(product.ensure_transient(), Ok(()));
    assert_eq!(product.require_id(), Err(ProductValidationError::MissingId));

    product.id = Some(7);
    assert_eq!(
        product.ensure_transient(),
        Err(ProductValidationError::AlreadyPersisted(7))
    );
    assert_eq!(product.require_id(), Ok(7));
}

#[test]
fn json_document_uses_string_price_and_category_tag() {
    let mut product = common::fedora();
    product.id = Some(3);

    let doc = product.to_json().unwrap();
    assert_eq!(doc["id"], 3);
    assert_eq!(doc["name"], "Fedora");
    assert_eq!(doc["price"], "12.50");
    assert_eq!(doc["available"], true);
    assert_eq!(doc["category"], "CLOTHS");

    let serialized = serde_json::to_value(&product).unwrap();
    assert_eq!(serialized, doc);
}

#[test]
fn json_document_deserializes_into_equal_transient_product() {
    let mut product = common::fedora();
    product.id = Some(3);

    let doc = product.to_json().unwrap();
    let decoded: Product = serde_json::from_value(doc.clone()).unwrap();
    assert_eq!(decoded, Product { id: None, ..product.clone() });
    assert_eq!(Product::from_json(&doc).unwrap(), decoded);
}

#[test]
fn from_json_builds_transient_product() {
    let doc = json!({
        "id": 99,
        "name": "Hammer",
        "description": "Claw hammer",
        "price": "19.99",
        "available": false,
        "category": "TOOLS"
    });

    let product = Product::from_json(&doc).unwrap();
    assert_eq!(product.id, None);
    assert_eq!(product.name, "Hammer");
    assert_eq!(product.description, "Claw hammer");
    assert_eq!(product.price, Decimal::new(1999, 2));
    assert!(!product.available);
    assert_eq!(product.category, Category::Tools);
}

#[test]
fn from_json_accepts_numeric_price() {
    let doc = json!({
        "name": "Apple",
        "description": "",
        "price": 2.5,
        "available": true,
        "category": "food"
    });

    let product = Product::from_json(&doc).unwrap();
    assert_eq!(product.price, Decimal::new(25, 1));
    assert_eq!(product.category, Category::Food);
}

#[test]
fn from_json_rejects_bad_documents() {
    let base = json!({
        "name": "Hat",
        "description": "",
        "price": "1.00",
        "available": true,
        "category": "CLOTHS"
    });

    let cases = [
        ("available", json!("yes")),
        ("category", json!("GADGETS")),
        ("price", json!("cheap")),
        ("name", json!(12)),
    ];
    for (field, value) in cases {
        let mut doc = base.clone();
        doc[field] = value;
        let err = Product::from_json(&doc).unwrap_err();
        assert!(
            matches!(err, ProductValidationError::InvalidField { field: f, .. } if f == field),
            "unexpected error for {field}: {err}"
        );
    }

    let mut missing = base.clone();
    missing.as_object_mut().unwrap().remove("description");
    assert!(matches!(
        Product::from_json(&missing),
        Err(ProductValidationError::InvalidField {
            field: "description",
            ..
        })
    ));

    assert!(matches!(
        Product::from_json(&json!(["not", "an", "object"])),
        Err(ProductValidationError::InvalidField { field: "body", .. })
    ));
}
