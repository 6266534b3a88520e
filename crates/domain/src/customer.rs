// Rust guideline compliant 2026-10-14

//! Customer and measurement records plus the single write path.
//!
//! Field names on the wire follow the stored customer documents (`nome`,
//! `cpf`, `endereco`, ...), so records written by earlier versions load
//! unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DomainError;
use crate::catalog::{self, Color, PaymentMethod, Service};

/// Highest installment count the card terminal accepts.
pub const MAX_INSTALLMENTS: u8 = 12;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Opaque customer identifier. Minted once, never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    /// Wrap an existing identifier (e.g. one read back from storage).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh UUID v4 identifier.
    #[must_use]
    pub fn mint() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Measurement identifier, unique within its owning customer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementId(String);

impl MeasurementId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh UUID v4 identifier.
    #[must_use]
    pub fn mint() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Measurement
// ---------------------------------------------------------------------------

/// One line item of a job. Dimensions are free text in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: MeasurementId,
    #[serde(
        default,
        deserialize_with = "catalog::lenient_option",
        serialize_with = "catalog::label_or_blank"
    )]
    pub service: Option<Service>,
    #[serde(
        default,
        deserialize_with = "catalog::lenient_option",
        serialize_with = "catalog::label_or_blank"
    )]
    pub color: Option<Color>,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub notes: String,
}

impl Measurement {
    /// A blank line item with a freshly minted id.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            id: MeasurementId::mint(),
            service: None,
            color: None,
            width: String::new(),
            height: String::new(),
            notes: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// CustomerDetails
// ---------------------------------------------------------------------------

/// Fields that must be non-empty before a customer can be saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Name,
    TaxId,
    Address,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::TaxId => "tax_id",
            Self::Address => "address",
        })
    }
}

/// Everything about a customer except its identity: the editable form state.
///
/// Payment invariant: `installment_count` is `Some` only while
/// `payment_method == Some(PaymentMethod::CreditCard)`. The setters below keep
/// it; [`normalize`](Self::normalize) restores it for values built by hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerDetails {
    #[serde(rename = "nome")]
    pub name: String,
    /// CPF, kept as typed.
    #[serde(rename = "cpf")]
    pub tax_id: String,
    #[serde(rename = "atendente", skip_serializing_if = "Option::is_none", deserialize_with = "blank_as_none")]
    pub attendant_name: Option<String>,
    #[serde(rename = "endereco")]
    pub address: String,
    #[serde(rename = "numero")]
    pub house_number: String,
    #[serde(rename = "complemento")]
    pub address_complement: String,
    #[serde(rename = "cep")]
    pub postal_code: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "estado")]
    pub state: String,
    #[serde(rename = "condominio")]
    pub condominium_name: String,
    #[serde(rename = "servicos", deserialize_with = "catalog::lenient_set")]
    pub services: Vec<Service>,
    #[serde(rename = "medidas")]
    pub measurements: Vec<Measurement>,
    #[serde(rename = "paymentMethod", deserialize_with = "catalog::lenient_option")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(rename = "creditCardInstallments")]
    pub installment_count: Option<u8>,
    /// Amount as typed, comma decimal separator (e.g. `"1500,00"`).
    #[serde(rename = "totalValue")]
    pub total_value: String,
    /// `YYYY-MM-DD` or empty.
    #[serde(rename = "budgetDate")]
    pub budget_date: String,
    /// `YYYY-MM-DD` or empty.
    #[serde(rename = "serviceDate")]
    pub service_date: String,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

impl CustomerDetails {
    /// Select or deselect a contracted service. Selecting twice is a no-op.
    pub fn toggle_service(&mut self, service: Service, selected: bool) {
        if selected {
            if !self.services.contains(&service) {
                self.services.push(service);
            }
        } else {
            self.services.retain(|s| *s != service);
        }
    }

    /// Append a blank measurement and return its id.
    pub fn add_measurement(&mut self) -> MeasurementId {
        let measurement = Measurement::blank();
        let id = measurement.id.clone();
        self.measurements.push(measurement);
        id
    }

    /// Mutable access to one measurement for in-place edits.
    pub fn measurement_mut(&mut self, id: &MeasurementId) -> Option<&mut Measurement> {
        self.measurements.iter_mut().find(|m| &m.id == id)
    }

    /// Remove a measurement. Returns `false` when `id` is unknown.
    pub fn remove_measurement(&mut self, id: &MeasurementId) -> bool {
        let before = self.measurements.len();
        self.measurements.retain(|m| &m.id != id);
        self.measurements.len() != before
    }

    /// Change the payment method, dropping installments unless it is a credit card.
    pub fn set_payment_method(&mut self, method: Option<PaymentMethod>) {
        self.payment_method = method;
        self.normalize();
    }

    /// Set or clear the installment count.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InstallmentsRequireCreditCard`] when a count is
    /// given while the payment method is not a credit card, or
    /// [`DomainError::InstallmentsOutOfRange`] outside `1..=12`.
    pub fn set_installments(&mut self, count: Option<u8>) -> Result<(), DomainError> {
        if let Some(count) = count {
            if self.payment_method != Some(PaymentMethod::CreditCard) {
                return Err(DomainError::InstallmentsRequireCreditCard);
            }
            if !(1..=MAX_INSTALLMENTS).contains(&count) {
                return Err(DomainError::InstallmentsOutOfRange { count });
            }
        }
        self.installment_count = count;
        Ok(())
    }

    /// Re-establish the payment invariant.
    pub fn normalize(&mut self) {
        if self.payment_method != Some(PaymentMethod::CreditCard) {
            self.installment_count = None;
        }
    }

    /// Check that the required fields are filled in.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingRequiredFields`] listing every empty field.
    pub fn validate(&self) -> Result<(), DomainError> {
        let missing: Vec<RequiredField> = [
            (RequiredField::Name, &self.name),
            (RequiredField::TaxId, &self.tax_id),
            (RequiredField::Address, &self.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::MissingRequiredFields { fields: missing })
        }
    }
}

// ---------------------------------------------------------------------------
// Customer + write path
// ---------------------------------------------------------------------------

/// A saved client record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(flatten)]
    pub details: CustomerDetails,
}

/// Input of [`create_or_update`]. `id == None` always creates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveRequest {
    pub id: Option<CustomerId>,
    pub details: CustomerDetails,
}

impl SaveRequest {
    /// Request creation of a new record.
    #[must_use]
    pub fn create(details: CustomerDetails) -> Self {
        Self { id: None, details }
    }

    /// Request replacement of the record with `id`.
    #[must_use]
    pub fn update(id: CustomerId, details: CustomerDetails) -> Self {
        Self { id: Some(id), details }
    }
}

impl From<Customer> for SaveRequest {
    fn from(customer: Customer) -> Self {
        Self::update(customer.id, customer.details)
    }
}

/// Whether a save appended a new record or replaced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// Result of a successful [`create_or_update`].
#[derive(Debug, Clone, PartialEq)]
pub struct Saved {
    /// The complete new list.
    pub customers: Vec<Customer>,
    /// Id of the record that was written.
    pub id: CustomerId,
    pub outcome: SaveOutcome,
}

/// Apply a save request to `customers`, returning the new list.
///
/// A request whose id matches an existing record replaces it at the same
/// position. Any other request (no id, blank id, or unknown id) gets a freshly
/// minted id and is appended. `customers` itself is never modified.
///
/// # Errors
///
/// Returns [`DomainError::MissingRequiredFields`] when `name`, `tax_id` or
/// `address` is empty; nothing is created in that case.
pub fn create_or_update(customers: &[Customer], request: SaveRequest) -> Result<Saved, DomainError> {
    let SaveRequest { id, mut details } = request;
    details.validate()?;
    details.normalize();

    let existing = id
        .filter(|id| !id.as_str().is_empty())
        .and_then(|id| customers.iter().position(|c| c.id == id).map(|pos| (pos, id)));

    let mut next = customers.to_vec();
    if let Some((pos, id)) = existing {
        tracing::debug!("domain.customer.updated: id={id}");
        next[pos] = Customer { id: id.clone(), details };
        return Ok(Saved { customers: next, id, outcome: SaveOutcome::Updated });
    }

    let id = mint_unique(customers);
    tracing::debug!("domain.customer.created: id={id}");
    next.push(Customer { id: id.clone(), details });
    Ok(Saved { customers: next, id, outcome: SaveOutcome::Created })
}

/// Mint an id that does not collide with any record in `customers`.
fn mint_unique(customers: &[Customer]) -> CustomerId {
    loop {
        let id = CustomerId::mint();
        if customers.iter().all(|c| c.id != id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(name: &str) -> CustomerDetails {
        CustomerDetails {
            name: name.to_owned(),
            tax_id: "123.456.789-00".to_owned(),
            address: "Rua das Flores".to_owned(),
            ..CustomerDetails::default()
        }
    }

    fn customer(id: &str, name: &str) -> Customer {
        Customer { id: CustomerId::new(id), details: details(name) }
    }

    // ------------------------------------------------------------------
    // create_or_update
    // ------------------------------------------------------------------

    #[test]
    fn update_keeps_id_and_replaces_fields() {
        let list = vec![customer("x", "Old")];
        let saved = create_or_update(&list, SaveRequest::update(CustomerId::new("x"), details("New")))
            .unwrap();
        assert_eq!(saved.customers.len(), 1);
        assert_eq!(saved.customers[0].id.as_str(), "x");
        assert_eq!(saved.customers[0].details.name, "New");
        assert_eq!(saved.outcome, SaveOutcome::Updated);
        // Input untouched.
        assert_eq!(list[0].details.name, "Old");
    }

    #[test]
    fn update_preserves_position() {
        let list = vec![customer("a", "A"), customer("b", "B"), customer("c", "C")];
        let saved =
            create_or_update(&list, SaveRequest::update(CustomerId::new("b"), details("B2"))).unwrap();
        let names: Vec<&str> = saved.customers.iter().map(|c| c.details.name.as_str()).collect();
        assert_eq!(names, ["A", "B2", "C"]);
    }

    #[test]
    fn create_mints_non_empty_id() {
        let saved = create_or_update(&[], SaveRequest::create(details("Z"))).unwrap();
        assert_eq!(saved.customers.len(), 1);
        assert!(!saved.customers[0].id.as_str().is_empty());
        assert_eq!(saved.customers[0].id, saved.id);
        assert_eq!(saved.outcome, SaveOutcome::Created);
    }

    #[test]
    fn create_appends_at_end() {
        let list = vec![customer("a", "A")];
        let saved = create_or_update(&list, SaveRequest::create(details("B"))).unwrap();
        assert_eq!(saved.customers.len(), 2);
        assert_eq!(saved.customers[1].details.name, "B");
        assert_ne!(saved.customers[1].id, list[0].id);
    }

    #[test]
    fn unknown_or_blank_id_creates() {
        let list = vec![customer("a", "A")];
        let unknown =
            create_or_update(&list, SaveRequest::update(CustomerId::new("zzz"), details("B"))).unwrap();
        assert_eq!(unknown.outcome, SaveOutcome::Created);
        assert_ne!(unknown.id.as_str(), "zzz");

        let blank =
            create_or_update(&list, SaveRequest::update(CustomerId::new(""), details("C"))).unwrap();
        assert_eq!(blank.outcome, SaveOutcome::Created);
        assert!(!blank.id.as_str().is_empty());
    }

    #[test]
    fn missing_required_fields_rejected() {
        let list = vec![customer("a", "A")];
        let err = create_or_update(&list, SaveRequest::create(CustomerDetails::default())).unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingRequiredFields {
                fields: vec![RequiredField::Name, RequiredField::TaxId, RequiredField::Address]
            }
        );
        assert_eq!(err.to_string(), "missing required fields: name, tax_id, address");
    }

    #[test]
    fn write_path_clears_stale_installments() {
        let mut d = details("A");
        d.payment_method = Some(PaymentMethod::Cash);
        d.installment_count = Some(6);
        let saved = create_or_update(&[], SaveRequest::create(d)).unwrap();
        assert_eq!(saved.customers[0].details.installment_count, None);
    }

    // ------------------------------------------------------------------
    // Payment invariant
    // ------------------------------------------------------------------

    #[test]
    fn leaving_credit_card_clears_installments() {
        let mut d = details("A");
        d.set_payment_method(Some(PaymentMethod::CreditCard));
        d.set_installments(Some(6)).unwrap();
        assert_eq!(d.installment_count, Some(6));

        d.set_payment_method(Some(PaymentMethod::InstantTransfer));
        assert_eq!(d.installment_count, None);
    }

    #[test]
    fn staying_on_credit_card_keeps_installments() {
        let mut d = details("A");
        d.set_payment_method(Some(PaymentMethod::CreditCard));
        d.set_installments(Some(3)).unwrap();
        d.set_payment_method(Some(PaymentMethod::CreditCard));
        assert_eq!(d.installment_count, Some(3));
    }

    #[test]
    fn installments_rejected_without_credit_card() {
        let mut d = details("A");
        d.set_payment_method(Some(PaymentMethod::BankSlip));
        assert_eq!(d.set_installments(Some(2)), Err(DomainError::InstallmentsRequireCreditCard));
        assert_eq!(d.installment_count, None);
        // Clearing is always allowed.
        assert_eq!(d.set_installments(None), Ok(()));
    }

    #[test]
    fn installments_range_checked() {
        let mut d = details("A");
        d.set_payment_method(Some(PaymentMethod::CreditCard));
        assert_eq!(d.set_installments(Some(0)), Err(DomainError::InstallmentsOutOfRange { count: 0 }));
        assert_eq!(d.set_installments(Some(13)), Err(DomainError::InstallmentsOutOfRange { count: 13 }));
        assert_eq!(d.set_installments(Some(12)), Ok(()));
    }

    // ------------------------------------------------------------------
    // Services and measurements
    // ------------------------------------------------------------------

    #[test]
    fn toggle_service_never_duplicates() {
        let mut d = details("A");
        d.toggle_service(Service::Blinds, true);
        d.toggle_service(Service::Netting, true);
        d.toggle_service(Service::Blinds, true);
        assert_eq!(d.services, [Service::Blinds, Service::Netting]);
        d.toggle_service(Service::Blinds, false);
        assert_eq!(d.services, [Service::Netting]);
    }

    #[test]
    fn measurements_add_edit_remove() {
        let mut d = details("A");
        let first = d.add_measurement();
        let second = d.add_measurement();
        assert_ne!(first, second);

        let m = d.measurement_mut(&second).unwrap();
        m.service = Some(Service::MosquitoScreen);
        m.width = "1,20".to_owned();

        assert!(d.remove_measurement(&first));
        assert!(!d.remove_measurement(&first));
        assert_eq!(d.measurements.len(), 1);
        assert_eq!(d.measurements[0].width, "1,20");
    }

    // ------------------------------------------------------------------
    // Wire format
    // ------------------------------------------------------------------

    #[test]
    fn decodes_stored_document() {
        let json = r#"{
            "id": "c-1",
            "nome": "Maria",
            "cpf": "111",
            "atendente": "",
            "endereco": "Rua A",
            "servicos": ["Varal", "Desconhecido", "Varal"],
            "medidas": [{"id": "m-1", "service": "", "color": "Fosco", "width": "1", "height": "2", "notes": ""}],
            "paymentMethod": "Cartão de Crédito",
            "creditCardInstallments": 4,
            "totalValue": "150,00",
            "serviceDate": "2024-05-10"
        }"#;
        let c: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(c.id.as_str(), "c-1");
        assert_eq!(c.details.name, "Maria");
        assert_eq!(c.details.attendant_name, None);
        assert_eq!(c.details.services, [Service::Clothesline]);
        assert_eq!(c.details.measurements[0].service, None);
        assert_eq!(c.details.measurements[0].color, Some(Color::Matte));
        assert_eq!(c.details.payment_method, Some(PaymentMethod::CreditCard));
        assert_eq!(c.details.installment_count, Some(4));
        assert_eq!(c.details.budget_date, "");
        assert_eq!(c.details.condominium_name, "");
    }

    #[test]
    fn encodes_unset_values_like_the_form() {
        let mut c = customer("c-2", "Ana");
        c.details.add_measurement();
        let value = serde_json::to_value(&c).unwrap();
        assert_eq!(value["nome"], "Ana");
        assert_eq!(value["paymentMethod"], serde_json::Value::Null);
        assert_eq!(value["medidas"][0]["service"], "");
        assert_eq!(value["medidas"][0]["color"], "");
        assert!(value.get("atendente").is_none());
    }

    #[test]
    fn unknown_payment_method_decodes_as_unset() {
        let json = r#"{"id": "c-3", "nome": "A", "paymentMethod": "Cheque"}"#;
        let c: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(c.details.payment_method, None);
    }
}
