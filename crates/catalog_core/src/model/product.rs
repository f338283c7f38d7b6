//! Product domain model.
//!
//! # Responsibility
//! - Define the sellable item record persisted in `products`.
//! - Validate field values before they reach the store.
//! - Convert between the record and its JSON document form.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one; never set by callers.
//! - `price` carries at most `PRICE_SCALE` fractional digits.
//! - Deletion is a hard delete; there is no tombstone field.

use crate::model::category::Category;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned product identifier.
pub type ProductId = i64;

/// Maximum characters accepted for `Product::name`.
pub const MAX_NAME_CHARS: usize = 100;
/// Maximum characters accepted for `Product::description`.
pub const MAX_DESCRIPTION_CHARS: usize = 250;
/// Fractional digits kept by the fixed-point price column.
pub const PRICE_SCALE: u32 = 2;
/// Integer digits kept by the fixed-point price column.
pub const PRICE_INTEGER_DIGITS: u32 = 12;

/// Validation failures for product values and lifecycle preconditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    EmptyName,
    NameTooLong { chars: usize },
    DescriptionTooLong { chars: usize },
    NegativePrice(Decimal),
    PriceScale(Decimal),
    PriceOutOfRange(Decimal),
    /// `create` was called on a value that already has an id.
    AlreadyPersisted(ProductId),
    /// `update`/`delete` was called on a value without an id.
    MissingId,
    /// An untyped document field is missing or has the wrong shape.
    InvalidField { field: &'static str, reason: String },
}

impl Display for ProductValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "product name must not be empty"),
            Self::NameTooLong { chars } => write!(
                f,
                "product name has {chars} characters; at most {MAX_NAME_CHARS} allowed"
            ),
            Self::DescriptionTooLong { chars } => write!(
                f,
                "product description has {chars} characters; at most {MAX_DESCRIPTION_CHARS} allowed"
            ),
            Self::NegativePrice(price) => write!(f, "product price {price} must not be negative"),
            Self::PriceScale(price) => write!(
                f,
                "product price {price} has more than {PRICE_SCALE} fractional digits"
            ),
            Self::PriceOutOfRange(price) => write!(
                f,
                "product price {price} exceeds {PRICE_INTEGER_DIGITS} integer digits"
            ),
            Self::AlreadyPersisted(id) => {
                write!(f, "product already persisted with id {id}")
            }
            Self::MissingId => write!(f, "product id not set"),
            Self::InvalidField { field, reason } => {
                write!(f, "invalid product field `{field}`: {reason}")
            }
        }
    }
}

impl Error for ProductValidationError {}

/// Sellable item record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Assigned by the store on create; `None` while transient.
    /// Documents never carry an id back in.
    #[serde(skip_deserializing)]
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    /// Serialized as a string so the document never goes through `f64`.
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            price: Decimal::ZERO,
            available: true,
            category: Category::Unknown,
        }
    }
}

impl Product {
    /// Creates a transient product from caller-supplied field values.
    ///
    /// No validation happens here; the repository validates on write.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            available,
            category,
        }
    }

    /// Returns whether the store has assigned an id to this value.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Validates field values against column constraints.
    ///
    /// Does not look at `id`; lifecycle preconditions are checked by
    /// `ensure_transient` and `require_id`.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProductValidationError::EmptyName);
        }

        let name_chars = self.name.chars().count();
        if name_chars > MAX_NAME_CHARS {
            return Err(ProductValidationError::NameTooLong { chars: name_chars });
        }

        let description_chars = self.description.chars().count();
        if description_chars > MAX_DESCRIPTION_CHARS {
            return Err(ProductValidationError::DescriptionTooLong {
                chars: description_chars,
            });
        }

        validate_price(self.price)
    }

    /// Fails with `AlreadyPersisted` when the value already has an id.
    pub fn ensure_transient(&self) -> Result<(), ProductValidationError> {
        match self.id {
            Some(id) => Err(ProductValidationError::AlreadyPersisted(id)),
            None => Ok(()),
        }
    }

    /// Returns the id or fails with `MissingId`.
    pub fn require_id(&self) -> Result<ProductId, ProductValidationError> {
        self.id.ok_or(ProductValidationError::MissingId)
    }

    /// Serializes this product into its JSON document form.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Builds a transient product from an untyped JSON document.
    ///
    /// Any `id` in the document is ignored; ids are store-assigned only.
    /// `price` may be a decimal string or a JSON number, and `category`
    /// matches tags case-insensitively.
    ///
    /// # Errors
    /// - `InvalidField` when a field is missing or has the wrong type.
    /// - Any `validate()` failure for well-typed but out-of-range values.
    pub fn from_json(doc: &Value) -> Result<Self, ProductValidationError> {
        let fields = doc
            .as_object()
            .ok_or_else(|| invalid_field("body", "expected a JSON object"))?;

        required_str(fields, "name")?;
        required_str(fields, "description")?;

        let price = match fields.get("price") {
            Some(Value::String(text)) => parse_price(text)?,
            Some(Value::Number(number)) => parse_price(&number.to_string())?,
            Some(_) => return Err(invalid_field("price", "expected a decimal string")),
            None => return Err(invalid_field("price", "missing")),
        };

        match fields.get("available") {
            Some(Value::Bool(_)) => {}
            Some(other) => {
                return Err(invalid_field(
                    "available",
                    format!("expected a boolean, got {other}"),
                ))
            }
            None => return Err(invalid_field("available", "missing")),
        }

        let category_tag = required_str(fields, "category")?;
        let category = Category::parse(category_tag)
            .map_err(|err| invalid_field("category", err.to_string()))?;

        // Hand the derived impl the canonical spellings it expects.
        let mut canonical = fields.clone();
        canonical.insert("price".to_string(), Value::from(price.to_string()));
        canonical.insert("category".to_string(), Value::from(category.as_str()));

        let product: Self = serde_json::from_value(Value::Object(canonical))
            .map_err(|err| invalid_field("body", err.to_string()))?;
        product.validate()?;
        Ok(product)
    }
}

impl Display for Product {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{id}]>", self.name),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}

/// Parses caller-supplied text into a price.
///
/// Rejects text that is not a plain decimal number. Range and scale are
/// checked by `Product::validate`, not here.
pub fn parse_price(text: &str) -> Result<Decimal, ProductValidationError> {
    text.trim()
        .parse::<Decimal>()
        .map_err(|err| invalid_field("price", format!("`{text}` is not a decimal: {err}")))
}

fn validate_price(price: Decimal) -> Result<(), ProductValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ProductValidationError::NegativePrice(price));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(ProductValidationError::PriceScale(price));
    }
    if price.trunc() >= Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS)) {
        return Err(ProductValidationError::PriceOutOfRange(price));
    }
    Ok(())
}

fn required_str<'doc>(
    fields: &'doc Map<String, Value>,
    field: &'static str,
) -> Result<&'doc str, ProductValidationError> {
    match fields.get(field) {
        Some(Value::String(text)) => Ok(text.as_str()),
        Some(other) => Err(invalid_field(field, format!("expected a string, got {other}"))),
        None => Err(invalid_field(field, "missing")),
    }
}

fn invalid_field(field: &'static str, reason: impl Into<String>) -> ProductValidationError {
    ProductValidationError::InvalidField {
        field,
        reason: reason.into(),
    }
}
