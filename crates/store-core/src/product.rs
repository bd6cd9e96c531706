//! # Product Types
//!
//! Product catalog types for the storefront.
//! The catalog is baked into the binary from `catalog.toml` and is read-only
//! after startup.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use std::str::FromStr;

/// ISO 4217 code used for every order. The storefront is single-currency.
pub const CURRENCY_CODE: &str = "USD";

const CURRENCY_SYMBOL: &str = "$";

/// Product catalog compiled into the binary
pub const BAKED_CATALOG: &str = include_str!("../catalog.toml");

/// Unique positive product identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

impl ProductId {
    /// Create an id, rejecting zero
    pub fn new(id: u32) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(ProductId::new)
            .ok_or_else(|| StoreError::InvalidTrigger(format!("bad product id {:?}", s)))
    }
}

/// Price with amount in cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price {
    cents: i64,
}

impl Price {
    pub const ZERO: Price = Price { cents: 0 };

    /// Create a price from a decimal amount, rounded to the nearest cent
    pub fn new(amount: f64) -> StoreResult<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(StoreError::InvalidPrice {
                message: format!("{} is not a non-negative amount", amount),
            });
        }
        Ok(Self {
            cents: (amount * 100.0).round() as i64,
        })
    }

    /// Create a price from cents
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Amount with exactly two decimals and no symbol (e.g., "20.00")
    pub fn to_decimal_string(&self) -> String {
        format!("{}.{:02}", self.cents / 100, self.cents % 100)
    }

    /// Format for display (e.g., "$20.00")
    pub fn display(&self) -> String {
        format!("{}{}", CURRENCY_SYMBOL, self.to_decimal_string())
    }
}

impl TryFrom<f64> for Price {
    type Error = StoreError;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        Price::new(amount)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.as_decimal()
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price::from_cents(self.cents + rhs.cents)
    }
}

impl Mul<u32> for Price {
    type Output = Price;

    fn mul(self, quantity: u32) -> Price {
        Price::from_cents(self.cents * i64::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    /// Display name
    pub name: String,

    pub price: Price,

    /// Image URI
    pub image: String,

    /// Short description
    #[serde(default)]
    pub description: String,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: String::new(),
            description: String::new(),
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set image URI
    pub fn with_image(mut self, uri: impl Into<String>) -> Self {
        self.image = uri.into();
        self
    }
}

/// Fixed product catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from products, enforcing unique ids
    pub fn new(products: Vec<Product>) -> StoreResult<Self> {
        let catalog = Self { products };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog compiled into the binary
    pub fn builtin() -> StoreResult<Self> {
        Self::from_toml(BAKED_CATALOG)
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> StoreResult<Self> {
        let catalog: Catalog =
            toml::from_str(toml_str).map_err(|e| StoreError::InvalidCatalog(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> StoreResult<()> {
        if self.products.is_empty() {
            return Err(StoreError::InvalidCatalog("catalog has no products".into()));
        }
        let mut seen = HashSet::new();
        for product in &self.products {
            if product.id.get() == 0 {
                return Err(StoreError::InvalidCatalog(format!(
                    "product {:?} has id 0",
                    product.name
                )));
            }
            if !seen.insert(product.id) {
                return Err(StoreError::InvalidCatalog(format!(
                    "duplicate product id {}",
                    product.id
                )));
            }
        }
        Ok(())
    }

    /// Find a product by ID
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Find a product by ID, as an error on miss
    pub fn require(&self, id: ProductId) -> StoreResult<&Product> {
        self.get(id).ok_or(StoreError::ProductNotFound {
            product_id: id.get(),
        })
    }

    /// Products in catalog order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::pid;

    #[test]
    fn test_price_rounding_and_display() {
        let price = Price::new(199.99).unwrap();
        assert_eq!(price.cents(), 19999);
        assert_eq!(price.display(), "$199.99");
        assert_eq!(Price::new(0.1 + 0.2).unwrap().cents(), 30);
        assert_eq!(Price::from_cents(2000).to_decimal_string(), "20.00");
        assert_eq!(Price::from_cents(5).to_decimal_string(), "0.05");
    }

    #[test]
    fn test_price_rejects_negative_and_nan() {
        assert!(Price::new(-0.01).is_err());
        assert!(Price::new(f64::NAN).is_err());
        assert!(Price::new(0.0).unwrap().is_zero());
    }

    #[test]
    fn test_price_arithmetic() {
        let ten = Price::new(10.0).unwrap();
        let five = Price::new(5.0).unwrap();
        let total: Price = vec![ten * 1, five * 2].into_iter().sum();
        assert_eq!(total, Price::new(20.0).unwrap());
    }

    #[test]
    fn test_product_id_parsing() {
        assert_eq!("3".parse::<ProductId>().unwrap(), pid(3));
        assert!("0".parse::<ProductId>().is_err());
        assert!("".parse::<ProductId>().is_err());
        assert!("abc".parse::<ProductId>().is_err());
        assert!("-2".parse::<ProductId>().is_err());
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 6);

        let headphones = catalog.get(pid(1)).unwrap();
        assert_eq!(headphones.name, "Premium Wireless Headphones");
        assert_eq!(headphones.price.display(), "$199.99");
        assert!(headphones.image.starts_with("https://"));

        assert!(catalog.get(pid(42)).is_none());
        assert!(matches!(
            catalog.require(pid(42)),
            Err(StoreError::ProductNotFound { product_id: 42 })
        ));
    }

    #[test]
    fn test_catalog_rejects_duplicate_ids() {
        let toml = r#"
            [[products]]
            id = 1
            name = "A"
            price = 1.0
            image = "a.png"

            [[products]]
            id = 1
            name = "B"
            price = 2.0
            image = "b.png"
        "#;
        assert!(matches!(
            Catalog::from_toml(toml),
            Err(StoreError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_catalog_rejects_negative_price_and_zero_id() {
        let negative = r#"
            [[products]]
            id = 1
            name = "A"
            price = -1.0
            image = "a.png"
        "#;
        assert!(Catalog::from_toml(negative).is_err());

        let zero = r#"
            [[products]]
            id = 0
            name = "A"
            price = 1.0
            image = "a.png"
        "#;
        assert!(Catalog::from_toml(zero).is_err());
    }

    #[test]
    fn test_product_builder() {
        let product = Product::new(pid(7), "Test Product", Price::new(9.99).unwrap())
            .with_description("A test product")
            .with_image("https://example.com/p.png");

        assert_eq!(product.description, "A test product");
        assert_eq!(product.image, "https://example.com/p.png");
        assert!(Catalog::new(vec![product]).is_ok());
        assert!(Catalog::new(Vec::new()).is_err());
    }
}
