use uuid::Uuid;
use vitrine_core::{Product, ProductValidationError};

#[test]
fn product_new_sets_defaults() {
    let product = Product::new("Mug", "Ceramic mug", 999, "img/mug.png");

    assert!(!product.uuid.is_nil());
    assert_eq!(product.name, "Mug");
    assert_eq!(product.description, "Ceramic mug");
    assert_eq!(product.price_cents, 999);
    assert_eq!(product.image_ref, "img/mug.png");
    assert_eq!(product.model_ref, None);
    assert!(product.is_active());
    assert!(product.validate().is_ok());
}

#[test]
fn validate_rejects_empty_name() {
    let product = Product::new("   ", "", 100, "img/x.png");
    assert_eq!(product.validate(), Err(ProductValidationError::EmptyName));
}

#[test]
fn validate_rejects_negative_price() {
    let product = Product::new("Lamp", "", -1, "img/lamp.png");
    assert_eq!(
        product.validate(),
        Err(ProductValidationError::NegativePrice(-1))
    );
}

#[test]
fn validate_rejects_nil_uuid() {
    let product = Product::with_id(Uuid::nil(), "Lamp", "", 100, "img/lamp.png");
    assert_eq!(product.validate(), Err(ProductValidationError::NilUuid));
}

#[test]
fn validate_rejects_empty_image_ref() {
    let product = Product::new("Lamp", "", 100, "");
    assert_eq!(product.validate(), Err(ProductValidationError::EmptyImageRef));
}

#[test]
fn zero_price_is_allowed() {
    let product = Product::new("Sticker", "Free promo", 0, "img/sticker.png");
    assert!(product.validate().is_ok());
}

#[test]
fn soft_delete_and_restore_work() {
    let mut product = Product::new("Vase", "", 4_500, "img/vase.png");

    product.soft_delete();
    assert!(product.is_deleted);
    assert!(!product.is_active());

    product.restore();
    assert!(!product.is_deleted);
    assert!(product.is_active());
}

#[test]
fn product_serialization_uses_expected_wire_fields() {
    let product_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut product = Product::with_id(product_id, "Bust", "Marble bust", 129_900, "img/bust.png");
    product.model_ref = Some("assets/bust.glb".to_string());

    let json = serde_json::to_value(&product).unwrap();
    assert_eq!(json["uuid"], product_id.to_string());
    assert_eq!(json["name"], "Bust");
    assert_eq!(json["description"], "Marble bust");
    assert_eq!(json["price_cents"], 129_900_i64);
    assert_eq!(json["image_ref"], "img/bust.png");
    assert_eq!(json["model_ref"], "assets/bust.glb");
    assert_eq!(json["is_deleted"], false);

    let decoded: Product = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, product);
}
