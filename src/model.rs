//! Transaction state passed between flow steps. Plain values, never shared
//! mutably.
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
}

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingCart {
    pub products: Vec<Product>,
}

impl ShoppingCart {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            products: names.into_iter().map(Product::new).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub text: String,
    pub date: DateTime<Utc>,
}

impl Receipt {
    /// Lists the cart's product names, comma separated, stamped with the
    /// current time.
    pub fn from_cart(cart: &ShoppingCart) -> Self {
        let text = cart
            .products
            .iter()
            .map(|product| product.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self { text, date: Utc::now() }
    }
}
