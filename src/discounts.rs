//! Discounts

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

/// Code accepted by the storefront out of the box.
pub const DEFAULT_DISCOUNT_CODE: &str = "organic10";

/// Allow-list of discount codes, each worth a flat amount off the order.
///
/// Codes are stored normalised (trimmed, lowercase) so lookups are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscountTable {
    codes: FxHashMap<String, Decimal>,
}

impl DiscountTable {
    /// An empty table; every code resolves to no discount.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add or replace a code.
    #[must_use]
    pub fn with_code(mut self, code: &str, amount: Decimal) -> Self {
        self.insert(code, amount);
        self
    }

    /// Add or replace a code.
    pub fn insert(&mut self, code: &str, amount: Decimal) {
        self.codes.insert(normalise(code), amount);
    }

    /// Resolve a user-entered code to its flat amount.
    ///
    /// Returns `None` for empty input and unknown codes.
    pub fn resolve(&self, code: &str) -> Option<(String, Decimal)> {
        let normalised = normalise(code);

        if normalised.is_empty() {
            return None;
        }

        self.codes
            .get(&normalised)
            .map(|amount| (normalised, *amount))
    }

    /// Number of codes in the table.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the table has no codes.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Storefront defaults: `organic10` takes 5.00 off.
pub fn default_discounts() -> DiscountTable {
    DiscountTable::empty().with_code(DEFAULT_DISCOUNT_CODE, Decimal::new(500, 2))
}

fn normalise(code: &str) -> String {
    code.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_case_insensitive() {
        let table = default_discounts();

        for code in ["organic10", "ORGANIC10", "Organic10", "  organic10 "] {
            assert_eq!(
                table.resolve(code),
                Some(("organic10".to_string(), Decimal::new(500, 2))),
                "code {code:?} should resolve"
            );
        }
    }

    #[test]
    fn resolve_empty_and_unknown_is_none() {
        let table = default_discounts();

        assert_eq!(table.resolve(""), None);
        assert_eq!(table.resolve("   "), None);
        assert_eq!(table.resolve("organic20"), None);
    }

    #[test]
    fn insert_replaces_existing_code() {
        let table = default_discounts().with_code("Organic10", Decimal::new(750, 2));

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.resolve("organic10").map(|(_, amount)| amount),
            Some(Decimal::new(750, 2))
        );
    }
}
