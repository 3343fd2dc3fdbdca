//! Status enums for various entities.
//!
//! Wire values follow the backend's Spanish vocabulary (`pendiente`,
//! `cliente`, ...). Parsing also accepts the English names, case-insensitively,
//! so payloads produced by other tooling normalize to the same value.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a status, role, or section kind string is unknown.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

// =============================================================================
// SaleStatus
// =============================================================================

/// Lifecycle status of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SaleStatus {
    /// Placed by the customer, not yet handled.
    #[default]
    #[serde(rename = "pendiente")]
    Pending,
    /// Delivery or pickup has been scheduled.
    #[serde(rename = "planificada")]
    Scheduled,
    /// Delivered and paid.
    #[serde(rename = "realizada")]
    Fulfilled,
    /// Cancelled by the customer or an admin. Terminal.
    #[serde(rename = "cancelada")]
    Cancelled,
}

/// Attempted sale status change that the workflow does not allow.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// Cancelled sales can no longer be modified.
    #[error("sale is cancelled and can no longer be modified")]
    Terminal,
    /// The sale already has the requested status.
    #[error("sale is already {0}")]
    Unchanged(SaleStatus),
    /// Customers may only cancel pending sales.
    #[error("only pending sales can be cancelled by the customer (sale is {0})")]
    NotCancellable(SaleStatus),
}

impl SaleStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Scheduled,
        Self::Fulfilled,
        Self::Cancelled,
    ];

    /// Value used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::Scheduled => "planificada",
            Self::Fulfilled => "realizada",
            Self::Cancelled => "cancelada",
        }
    }

    /// Human-readable label shown in the admin console.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pendiente",
            Self::Scheduled => "Planificada",
            Self::Fulfilled => "Realizada",
            Self::Cancelled => "Cancelada",
        }
    }

    /// Whether no further transitions are allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check an admin-initiated status change.
    ///
    /// Admins may move a non-cancelled sale to any other status.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Terminal`] for cancelled sales and
    /// [`TransitionError::Unchanged`] when `next` equals the current status.
    pub fn transition_to(self, next: Self) -> Result<Self, TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::Terminal);
        }
        if self == next {
            return Err(TransitionError::Unchanged(self));
        }
        Ok(next)
    }

    /// Check a customer-initiated cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NotCancellable`] unless the sale is pending.
    pub const fn customer_cancel(self) -> Result<Self, TransitionError> {
        match self {
            Self::Pending => Ok(Self::Cancelled),
            other => Err(TransitionError::NotCancellable(other)),
        }
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaleStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendiente" | "pending" => Ok(Self::Pending),
            "planificada" | "scheduled" => Ok(Self::Scheduled),
            "realizada" | "fulfilled" => Ok(Self::Fulfilled),
            "cancelada" | "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError::new("sale status", s)),
        }
    }
}

// =============================================================================
// UserRole
// =============================================================================

/// Role of a storefront account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    /// Store administrator; may use the admin console.
    #[serde(rename = "admin")]
    Admin,
    /// Regular shopper.
    #[serde(rename = "cliente")]
    Customer,
}

impl UserRole {
    /// Value used on the wire and in the persisted role marker.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "cliente",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "cliente" | "customer" => Ok(Self::Customer),
            _ => Err(ParseEnumError::new("user role", s)),
        }
    }
}

// =============================================================================
// SectionKind
// =============================================================================

/// Kind of landing page section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    #[default]
    Hero,
    About,
    Features,
    Testimonials,
    Contact,
}

impl SectionKind {
    /// Value used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::About => "about",
            Self::Features => "features",
            Self::Testimonials => "testimonials",
            Self::Contact => "contact",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hero" => Ok(Self::Hero),
            "about" => Ok(Self::About),
            "features" => Ok(Self::Features),
            "testimonials" => Ok(Self::Testimonials),
            "contact" => Ok(Self::Contact),
            _ => Err(ParseEnumError::new("section type", s)),
        }
    }
}
