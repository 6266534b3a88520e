// Rust guideline compliant 2026-10-16

//! Shared domain types for the customer and job tracking tool.
//!
//! Defines `Customer`, `Measurement`, the closed catalogs (`Service`,
//! `PaymentMethod`, `Color`), the `AttendantRegistry`, the single write path
//! [`create_or_update`], and the `KeyValueStore` hexagonal port.
//! Every other crate in the workspace depends on this one.

mod attendants;
mod catalog;
mod customer;

pub use attendants::{AttendantRegistry, DEFAULT_ATTENDANTS};
pub use catalog::{Catalog, Color, PaymentMethod, Service};
pub use customer::{
    Customer, CustomerDetails, CustomerId, MAX_INSTALLMENTS, Measurement, MeasurementId,
    RequiredField, SaveOutcome, SaveRequest, Saved, create_or_update,
};

/// Storage key of the customer list document.
pub const CUSTOMERS_KEY: &str = "customers";
/// Storage key of the attendant list document.
pub const ATTENDANTS_KEY: &str = "attendants";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised by customer mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// `name`, `tax_id` and/or `address` were empty.
    #[error("missing required fields: {}", join_fields(.fields))]
    MissingRequiredFields {
        /// Every empty required field, in form order.
        fields: Vec<RequiredField>,
    },
    /// Installments only apply to credit card payments.
    #[error("installments require credit card payment")]
    InstallmentsRequireCreditCard,
    /// Installment count outside `1..=MAX_INSTALLMENTS`.
    #[error("installment count {count} outside 1..={max}", max = MAX_INSTALLMENTS)]
    InstallmentsOutOfRange { count: u8 },
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Errors from the key-value storage port.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or rejected the operation.
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Human-readable description.
        reason: String,
    },
    /// The write would exceed the backend's size quota.
    #[error("storage quota exceeded (limit: {limit} bytes)")]
    QuotaExceeded { limit: usize },
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Hexagonal port: durable key-value storage of whole JSON documents.
///
/// Each key holds one complete document that is rewritten in full on every
/// save; there are no partial writes. Implementations live in the binary
/// crate. `CustomerBook` depends exclusively on this trait.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait KeyValueStore {
    /// Read the document stored under `key`; `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` when the backend cannot be read.
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` on backend failure, or
    /// `StoreError::QuotaExceeded` when the backend is full.
    async fn save(&self, key: &str, value: String) -> Result<(), StoreError>;
}
