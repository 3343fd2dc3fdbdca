//! Normalization of raw backend payloads into canonical entities.
//!
//! The backend is inconsistent about key casing: the same field may arrive as
//! `createdAt`, `created_at`, or `CreatedAt`, and ids as `id` or `ID`. Every
//! normalizer resolves each canonical field through one ordered list of key
//! variants (camelCase, then snake_case, then PascalCase) using
//! [`first_defined`], so the casing rules live in exactly one place.
//!
//! # Presence
//!
//! A key counts as present when it exists and is not JSON `null`. Presence is
//! never confused with truthiness: `"Stock": 0` is a present zero, not a
//! missing value.
//!
//! # Defaults
//!
//! Only these fields are defaulted when absent:
//! - `visible` is `true`
//! - `items` and `sections` are empty (also when the value is not an array)
//! - `order` is the first numeric variant, else `0`
//! - `companyName` is the empty string
//!
//! Absent optional fields stay `None`. Absent required fields are a
//! [`NormalizeError::MissingField`].

mod catalog;
mod landing;
mod sales;
mod user;

use core::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use vitrina_core::Price;

pub use catalog::{normalize_category, normalize_product};
pub use landing::{normalize_landing_page, normalize_landing_section};
pub use sales::{normalize_sale, normalize_sale_item};
pub use user::{AuthPayload, normalize_auth_payload, normalize_user};

/// Errors produced while normalizing a backend payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The payload for an entity was not a JSON object.
    #[error("{entity}: expected a JSON object, got {found}")]
    NotAnObject {
        entity: &'static str,
        found: &'static str,
    },

    /// A required field is absent under every key variant.
    #[error("{entity}: missing field `{field}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// A field is present but has the wrong type or an invalid value.
    #[error("{entity}: invalid `{field}`: {reason}")]
    InvalidField {
        entity: &'static str,
        field: &'static str,
        reason: String,
    },
}

/// A canonical entity that can be built from a raw backend payload.
pub trait Normalize: Sized {
    /// Entity name used in error messages and logs.
    const ENTITY: &'static str;

    /// Normalize one raw payload.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError`] if the payload is not an object, a required
    /// field is missing, or a field value is invalid.
    fn normalize(raw: &Value) -> Result<Self, NormalizeError>;
}

/// Return the first present value among `keys`, in order.
///
/// A key is present when it exists in `obj` and its value is not `null`.
#[must_use]
pub fn first_defined<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

/// Normalize a collection payload.
///
/// A payload that is not an array yields an empty list. Elements that fail to
/// normalize are skipped with a warning so one malformed row does not empty
/// the whole listing.
#[must_use]
pub fn normalize_list<T: Normalize>(raw: &Value) -> Vec<T> {
    let Some(elements) = raw.as_array() else {
        debug!(
            entity = T::ENTITY,
            found = json_type(raw),
            "Collection payload is not an array, using empty list"
        );
        return Vec::new();
    };

    elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| match T::normalize(element) {
            Ok(entity) => Some(entity),
            Err(error) => {
                warn!(
                    entity = T::ENTITY,
                    index,
                    error = %error,
                    "Skipping malformed collection element"
                );
                None
            }
        })
        .collect()
}

/// Name of a JSON value's type, for error messages.
const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Key variants
// =============================================================================

/// Ordered key variants for every canonical field.
///
/// The first entry is always the canonical camelCase name and is used in
/// error messages.
pub mod keys {
    pub const ID: &[&str] = &["id", "ID", "Id"];
    pub const NAME: &[&str] = &["name", "Name"];
    pub const DESCRIPTION: &[&str] = &["description", "Description"];
    pub const IMAGE: &[&str] = &["image", "Image"];
    pub const CREATED_AT: &[&str] = &["createdAt", "created_at", "CreatedAt"];
    pub const UPDATED_AT: &[&str] = &["updatedAt", "updated_at", "UpdatedAt"];

    pub const PRICE: &[&str] = &["price", "Price"];
    pub const CATEGORY_ID: &[&str] = &["categoryId", "category_id", "CategoryID", "CategoryId"];
    pub const STOCK: &[&str] = &["stock", "Stock"];
    pub const CATEGORY: &[&str] = &["category", "Category"];

    pub const USER_ID: &[&str] = &["userId", "user_id", "UserID", "UserId"];
    pub const STATUS: &[&str] = &["status", "Status"];
    pub const TOTAL: &[&str] = &["total", "Total"];
    pub const ITEMS: &[&str] = &["items", "Items"];
    pub const USER: &[&str] = &["user", "User"];

    pub const SALE_ID: &[&str] = &["saleId", "sale_id", "SaleID", "SaleId"];
    pub const PRODUCT_ID: &[&str] = &["productId", "product_id", "ProductID", "ProductId"];
    pub const QUANTITY: &[&str] = &["quantity", "Quantity"];
    pub const PRODUCT: &[&str] = &["product", "Product"];

    pub const EMAIL: &[&str] = &["email", "Email"];
    pub const ROLE: &[&str] = &["role", "Role"];
    pub const TOKEN: &[&str] = &["token", "Token"];

    pub const TYPE: &[&str] = &["type", "Type"];
    pub const TITLE: &[&str] = &["title", "Title"];
    pub const CONTENT: &[&str] = &["content", "Content"];
    pub const ORDER: &[&str] = &["order", "Order", "ORDER"];
    pub const VISIBLE: &[&str] = &["visible", "Visible"];

    pub const COMPANY_NAME: &[&str] = &["companyName", "company_name", "CompanyName"];
    pub const COMPANY_DESCRIPTION: &[&str] =
        &["companyDescription", "company_description", "CompanyDescription"];
    pub const LOGO: &[&str] = &["logo", "Logo"];
    pub const SECTIONS: &[&str] = &["sections", "Sections"];
}

// =============================================================================
// Field reader
// =============================================================================

/// Typed accessors over one raw entity object.
///
/// Each accessor takes the key variants for a canonical field and applies
/// [`first_defined`] before converting the value.
pub(crate) struct Fields<'a> {
    entity: &'static str,
    obj: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(entity: &'static str, raw: &'a Value) -> Result<Self, NormalizeError> {
        raw.as_object()
            .map(|obj| Self { entity, obj })
            .ok_or(NormalizeError::NotAnObject {
                entity,
                found: json_type(raw),
            })
    }

    pub(crate) fn get(&self, keys: &[&str]) -> Option<&'a Value> {
        first_defined(self.obj, keys)
    }

    fn missing(&self, keys: &[&'static str]) -> NormalizeError {
        NormalizeError::MissingField {
            entity: self.entity,
            field: canonical(keys),
        }
    }

    fn invalid(&self, keys: &[&'static str], reason: impl Into<String>) -> NormalizeError {
        NormalizeError::InvalidField {
            entity: self.entity,
            field: canonical(keys),
            reason: reason.into(),
        }
    }

    fn required(&self, keys: &[&'static str]) -> Result<&'a Value, NormalizeError> {
        self.get(keys).ok_or_else(|| self.missing(keys))
    }

    /// An identifier; numeric ids are rendered as strings.
    pub(crate) fn id<T: From<String>>(&self, keys: &[&'static str]) -> Result<T, NormalizeError> {
        match self.required(keys)? {
            Value::String(s) if !s.is_empty() => Ok(T::from(s.clone())),
            Value::String(_) => Err(self.invalid(keys, "empty identifier")),
            Value::Number(n) => Ok(T::from(n.to_string())),
            other => Err(self.invalid(keys, format!("expected string or number, got {}", json_type(other)))),
        }
    }

    pub(crate) fn string(&self, keys: &[&'static str]) -> Result<String, NormalizeError> {
        self.optional_string(keys)?.ok_or_else(|| self.missing(keys))
    }

    pub(crate) fn optional_string(
        &self,
        keys: &[&'static str],
    ) -> Result<Option<String>, NormalizeError> {
        match self.get(keys) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.invalid(keys, format!("expected string, got {}", json_type(other)))),
        }
    }

    pub(crate) fn price(&self, keys: &[&'static str]) -> Result<Price, NormalizeError> {
        let amount = match self.required(keys)? {
            Value::Number(n) => parse_decimal(&n.to_string()),
            Value::String(s) => parse_decimal(s.trim()),
            other => return Err(self.invalid(keys, format!("expected number, got {}", json_type(other)))),
        }
        .ok_or_else(|| self.invalid(keys, "not a decimal number"))?;

        Price::new(amount).map_err(|e| self.invalid(keys, e.to_string()))
    }

    /// A non-negative integer, or `None` when absent.
    pub(crate) fn optional_count(
        &self,
        keys: &[&'static str],
    ) -> Result<Option<u32>, NormalizeError> {
        let Some(value) = self.get(keys) else {
            return Ok(None);
        };
        value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| self.invalid(keys, format!("expected non-negative integer, got {value}")))
    }

    /// A strictly positive integer.
    pub(crate) fn positive_count(&self, keys: &[&'static str]) -> Result<u32, NormalizeError> {
        match self.optional_count(keys)? {
            Some(0) => Err(self.invalid(keys, "must be greater than zero")),
            Some(n) => Ok(n),
            None => Err(self.missing(keys)),
        }
    }

    pub(crate) fn timestamp(&self, keys: &[&'static str]) -> Result<DateTime<Utc>, NormalizeError> {
        self.optional_timestamp(keys)?.ok_or_else(|| self.missing(keys))
    }

    pub(crate) fn optional_timestamp(
        &self,
        keys: &[&'static str],
    ) -> Result<Option<DateTime<Utc>>, NormalizeError> {
        match self.get(keys) {
            None => Ok(None),
            Some(Value::String(s)) => parse_timestamp(s)
                .map(Some)
                .ok_or_else(|| self.invalid(keys, format!("unrecognized timestamp `{s}`"))),
            Some(other) => Err(self.invalid(keys, format!("expected string, got {}", json_type(other)))),
        }
    }

    /// A string-encoded enum such as a status or role.
    pub(crate) fn parsed<T>(&self, keys: &[&'static str]) -> Result<T, NormalizeError>
    where
        T: FromStr,
        T::Err: ToString,
    {
        let raw = self.string(keys)?;
        raw.parse().map_err(|e: T::Err| self.invalid(keys, e.to_string()))
    }

    pub(crate) fn bool_or(&self, keys: &[&'static str], default: bool) -> Result<bool, NormalizeError> {
        match self.get(keys) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(self.invalid(keys, format!("expected boolean, got {}", json_type(other)))),
        }
    }

    /// The first variant holding a number, truncated to an integer; `0` if none does.
    ///
    /// Unlike the other accessors this skips over present-but-non-numeric
    /// variants instead of stopping at the first present key.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn first_integer_or_zero(&self, keys: &[&str]) -> i64 {
        keys.iter()
            .filter_map(|key| self.obj.get(*key))
            .find_map(|value| {
                value.as_i64().or_else(|| {
                    value
                        .as_f64()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                })
            })
            .unwrap_or(0)
    }

    /// A nested entity, normalized only if present.
    pub(crate) fn nested<T: Normalize>(
        &self,
        keys: &[&'static str],
    ) -> Result<Option<T>, NormalizeError> {
        self.get(keys).map(T::normalize).transpose()
    }

    /// A nested list; absent or non-array values yield an empty list.
    ///
    /// Unlike [`normalize_list`], an invalid element fails the whole entity:
    /// the list is part of the parent's identity (e.g. a sale's lines).
    pub(crate) fn nested_list<T: Normalize>(
        &self,
        keys: &[&'static str],
    ) -> Result<Vec<T>, NormalizeError> {
        match self.get(keys) {
            Some(Value::Array(elements)) => elements.iter().map(T::normalize).collect(),
            _ => Ok(Vec::new()),
        }
    }
}

fn canonical(keys: &[&'static str]) -> &'static str {
    keys.first().copied().unwrap_or("<unknown>")
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Parse RFC 3339 timestamps, falling back to offset-less ISO 8601 read as UTC.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}
