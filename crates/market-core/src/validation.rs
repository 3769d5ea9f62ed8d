//! # Validation Module
//!
//! Invariant checks for cart snapshots read back from storage.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Snapshot Validation Layers                         │
//! │                                                                         │
//! │  Layer 1: serde (snapshot::decode)                                     │
//! │  ├── JSON array of objects                                             │
//! │  └── Field types: string/string/string/number/unsigned int             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Non-empty ids                                                     │
//! │  ├── Unique ids                                                        │
//! │  ├── Quantity >= 1                                                     │
//! │  └── Finite price                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items produced by `Cart` transitions always pass; this only guards
//! against storage content the store did not write itself.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::LineItem;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a single line item.
///
/// ## Rules
/// - `id` must not be empty or whitespace
/// - `quantity` must be at least 1
/// - `price` must be finite
///
/// ## Example
/// ```rust
/// use market_core::validation::validate_line_item;
/// use market_core::LineItem;
///
/// let item = LineItem {
///     id: "p1".into(),
///     title: "Mug".into(),
///     image_url: "mug.png".into(),
///     price: 12.5,
///     quantity: 1,
/// };
/// assert!(validate_line_item(0, &item).is_ok());
/// ```
pub fn validate_line_item(index: usize, item: &LineItem) -> ValidationResult<()> {
    if item.id.trim().is_empty() {
        return Err(ValidationError::EmptyId { index });
    }

    if item.quantity < 1 {
        return Err(ValidationError::ZeroQuantity {
            id: item.id.clone(),
        });
    }

    if !item.price.is_finite() {
        return Err(ValidationError::NonFinitePrice {
            id: item.id.clone(),
        });
    }

    Ok(())
}

/// Validates a whole decoded snapshot.
///
/// Checks every item, then id uniqueness. The first violation wins.
pub fn validate_items(items: &[LineItem]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        validate_line_item(index, item)?;

        if !seen.insert(item.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: item.id.clone(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, quantity: u32) -> LineItem {
        LineItem {
            id: id.to_string(),
            title: format!("Product {}", id),
            image_url: String::new(),
            price: 4.2,
            quantity,
        }
    }

    #[test]
    fn test_validate_line_item() {
        assert!(validate_line_item(0, &item("p1", 1)).is_ok());
        assert!(validate_line_item(0, &item("p1", 250)).is_ok());

        assert_eq!(
            validate_line_item(2, &item("  ", 1)),
            Err(ValidationError::EmptyId { index: 2 })
        );
        assert_eq!(
            validate_line_item(0, &item("p1", 0)),
            Err(ValidationError::ZeroQuantity { id: "p1".into() })
        );

        let mut nan = item("p2", 1);
        nan.price = f64::NAN;
        assert!(matches!(
            validate_line_item(0, &nan),
            Err(ValidationError::NonFinitePrice { .. })
        ));
    }

    #[test]
    fn test_validate_items_rejects_duplicates() {
        let items = vec![item("p1", 1), item("p2", 3), item("p1", 2)];
        assert_eq!(
            validate_items(&items),
            Err(ValidationError::DuplicateId { id: "p1".into() })
        );
    }

    #[test]
    fn test_validate_items_accepts_empty_and_unique() {
        assert!(validate_items(&[]).is_ok());
        assert!(validate_items(&[item("a", 1), item("b", 2)]).is_ok());
    }
}
