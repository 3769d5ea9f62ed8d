//! # Cart Snapshot
//!
//! The persisted form of a cart: a JSON array of line items.
//!
//! ```json
//! [
//!   { "id": "p1", "title": "Mug", "image_url": "mug.png", "price": 12.5, "quantity": 2 },
//!   { "id": "p7", "title": "Tee", "image_url": "tee.png", "price": 30, "quantity": 1 }
//! ]
//! ```
//!
//! Array order is insertion order and is preserved both ways. Unknown
//! object fields are ignored on decode; missing or mistyped fields are not.

use crate::error::CoreResult;
use crate::types::{Cart, LineItem};
use crate::validation::validate_items;

/// Serializes a cart to its snapshot string.
///
/// Runs the same checks as [`decode`] first. JSON has no NaN or infinity,
/// so a non-finite price would be written as `null` and the snapshot
/// could never be read back.
pub fn encode(cart: &Cart) -> CoreResult<String> {
    validate_items(cart.items())?;

    Ok(serde_json::to_string(cart)?)
}

/// Parses and validates a snapshot string.
///
/// A literal `null` decodes to an empty cart.
pub fn decode(raw: &str) -> CoreResult<Cart> {
    let items: Option<Vec<LineItem>> = serde_json::from_str(raw)?;
    let items = items.unwrap_or_default();

    validate_items(&items)?;

    Ok(Cart::from_validated(items))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};
    use crate::types::CatalogItem;

    fn sample_cart() -> Cart {
        Cart::new()
            .with_added(CatalogItem::new("p1", "Mug", "mug.png", 12.5))
            .with_added(CatalogItem::new("p7", "Tee", "tee.png", 30.0))
            .with_incremented("p1")
    }

    #[test]
    fn test_encode_wire_shape() {
        let raw = encode(&sample_cart()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        let first = &value[0];
        assert_eq!(first["id"], "p1");
        assert_eq!(first["image_url"], "mug.png");
        assert_eq!(first["quantity"], 2);
        assert_eq!(value[1]["id"], "p7");
    }

    #[test]
    fn test_encode_rejects_non_finite_price() {
        for price in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let cart = Cart::new()
                .with_added(CatalogItem::new("p1", "Mug", "mug.png", 12.5))
                .with_added(CatalogItem::new("p2", "Tee", "tee.png", price));

            assert!(matches!(
                encode(&cart),
                Err(CoreError::Validation(ValidationError::NonFinitePrice { .. }))
            ));
        }
    }

    #[test]
    fn test_decode_restores_same_cart() {
        let cart = sample_cart();
        let decoded = decode(&encode(&cart).unwrap()).unwrap();
        assert_eq!(decoded, cart);
    }

    #[test]
    fn test_decode_empty_and_null() {
        assert!(decode("[]").unwrap().is_empty());
        assert!(decode("null").unwrap().is_empty());
    }

    #[test]
    fn test_decode_ignores_field_order_and_extras() {
        let raw = r#"[{"quantity":1,"price":3,"image_url":"","title":"T","id":"x","color":"red"}]"#;
        let cart = decode(raw).unwrap();
        assert_eq!(cart.get("x").map(|i| i.quantity), Some(1));
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        for raw in [
            "{}",
            "\"products\"",
            r#"[{"id":"p1"}]"#,
            r#"[{"id":"p1","title":"A","image_url":"","price":1,"quantity":-1}]"#,
            r#"[{"id":"p1","title":"A","image_url":"","price":"1","quantity":1}]"#,
            "[{",
        ] {
            assert!(
                matches!(decode(raw), Err(CoreError::MalformedSnapshot(_))),
                "expected malformed: {}",
                raw
            );
        }
    }

    #[test]
    fn test_decode_rejects_invariant_violations() {
        let dup = r#"[
            {"id":"p1","title":"A","image_url":"","price":1,"quantity":1},
            {"id":"p1","title":"B","image_url":"","price":2,"quantity":1}
        ]"#;
        assert!(matches!(
            decode(dup),
            Err(CoreError::Validation(ValidationError::DuplicateId { .. }))
        ));

        let zero = r#"[{"id":"p1","title":"A","image_url":"","price":1,"quantity":0}]"#;
        assert!(matches!(
            decode(zero),
            Err(CoreError::Validation(ValidationError::ZeroQuantity { .. }))
        ));
    }
}
