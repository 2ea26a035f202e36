use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Catalog Value Objects
// ============================================================================

/// A cataloged product. Orders keep a copy of it, never a live reference.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub category: String,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category: category.into(),
        }
    }
}

/// One page of a listing plus the total number of entries.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Page<T> {
    /// Number of the last non-empty page (1 when there are no entries).
    pub fn last_page(&self) -> u32 {
        if self.total == 0 || self.per_page == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(self.per_page as u64);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_product_serializes_price_as_string() {
        let product = Product::new("p-1", "Chicken Waffle", dec!(9.99), "mains");
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["id"], "p-1");
        assert_eq!(json["price"], "9.99");
        assert_eq!(json["category"], "mains");
    }

    #[test]
    fn test_last_page() {
        let page = |total| Page::<()> { items: vec![], page: 1, per_page: 10, total };

        assert_eq!(page(0).last_page(), 1);
        assert_eq!(page(10).last_page(), 1);
        assert_eq!(page(11).last_page(), 2);
        assert_eq!(page(95).last_page(), 10);
    }
}
