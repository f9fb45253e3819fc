use std::fmt;

/// Product catalog item.
///
/// The id is supplied by the caller on create rather than generated, and
/// price/quantity carry no sign constraint. Both are long-standing properties
/// of the catalog's data and are kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
}

/// Product unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
