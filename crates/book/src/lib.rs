// Rust guideline compliant 2026-10-16

//! Customer book: the in-process owner of the customer list and the
//! attendant registry.
//!
//! Entry points: [`CustomerBook::open`], [`CustomerBook::save_customer`],
//! [`CustomerBook::add_attendant`], [`CustomerBook::search`],
//! [`CustomerBook::dashboard`]. Configuration via [`BookConfig::builder`].
//!
//! Both documents are read once when the book is opened and rewritten in full
//! after every successful mutation. Storage is best-effort in both directions:
//! unreadable documents fall back to defaults, failed writes are logged and
//! the in-memory change is kept.

use domain::{
    ATTENDANTS_KEY, AttendantRegistry, CUSTOMERS_KEY, Customer, CustomerId, DomainError,
    KeyValueStore, SaveRequest, create_or_update,
};
use revenue::{PeriodType, RevenueConfig, RevenueSummary};
use search::FilterField;

// ---------------------------------------------------------------------------
// BookError
// ---------------------------------------------------------------------------

/// Errors surfaced to the caller of a book operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookError {
    /// The supplied configuration is invalid.
    #[error("invalid book configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// The mutation was rejected; nothing was changed.
    #[error("customer rejected: {0}")]
    Domain(#[from] DomainError),
}

// ---------------------------------------------------------------------------
// BookConfig + builder
// ---------------------------------------------------------------------------

/// Storage keys used by a [`CustomerBook`].
///
/// Construct via [`BookConfig::builder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookConfig {
    /// Key of the customer list document.
    pub customers_key: String,
    /// Key of the attendant list document.
    pub attendants_key: String,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self { customers_key: CUSTOMERS_KEY.to_owned(), attendants_key: ATTENDANTS_KEY.to_owned() }
    }
}

/// Builder for [`BookConfig`].
///
/// Obtain via [`BookConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct BookConfigBuilder {
    customers_key: String,
    attendants_key: String,
}

impl BookConfig {
    /// Create a builder. Default keys: `"customers"` and `"attendants"`.
    #[must_use]
    pub fn builder() -> BookConfigBuilder {
        let defaults = Self::default();
        BookConfigBuilder {
            customers_key: defaults.customers_key,
            attendants_key: defaults.attendants_key,
        }
    }
}

impl BookConfigBuilder {
    /// Override the customer list key.
    #[must_use]
    pub fn customers_key(mut self, key: impl Into<String>) -> Self {
        self.customers_key = key.into();
        self
    }

    /// Override the attendant list key.
    #[must_use]
    pub fn attendants_key(mut self, key: impl Into<String>) -> Self {
        self.attendants_key = key.into();
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::InvalidConfig`] when a key is empty or both keys
    /// are the same.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<BookConfig, BookError> {
        if self.customers_key.is_empty() || self.attendants_key.is_empty() {
            return Err(BookError::InvalidConfig { reason: "storage keys must not be empty".to_owned() });
        }
        if self.customers_key == self.attendants_key {
            return Err(BookError::InvalidConfig {
                reason: "customers_key and attendants_key must differ".to_owned(),
            });
        }
        Ok(BookConfig { customers_key: self.customers_key, attendants_key: self.attendants_key })
    }
}

// ---------------------------------------------------------------------------
// CustomerBook
// ---------------------------------------------------------------------------

/// Sole owner and writer of the customer list and attendant registry.
///
/// Generic over `S: KeyValueStore` per call for static dispatch; holds no
/// store reference itself.
#[derive(Debug)]
pub struct CustomerBook {
    config: BookConfig,
    customers: Vec<Customer>,
    attendants: AttendantRegistry,
}

impl CustomerBook {
    /// Load both documents from `store`.
    ///
    /// Never fails: a missing document, a read error or undecodable JSON
    /// yields the empty customer list / the seeded attendant registry.
    pub async fn open<S: KeyValueStore>(store: &S, config: BookConfig) -> Self {
        let customers: Vec<Customer> =
            load_or_default(store, &config.customers_key, Vec::new).await;
        let attendants: AttendantRegistry =
            load_or_default(store, &config.attendants_key, AttendantRegistry::default).await;
        tracing::info!(
            "book.open: customers={} attendants={}",
            customers.len(),
            attendants.names().len()
        );
        Self { config, customers, attendants }
    }

    #[must_use]
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    #[must_use]
    pub fn attendants(&self) -> &AttendantRegistry {
        &self.attendants
    }

    #[must_use]
    pub fn find(&self, id: &CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| &c.id == id)
    }

    /// Create or update a customer, then rewrite the customer document.
    ///
    /// A storage failure is logged and does not undo the in-memory change.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::Domain`] when required fields are missing; state
    /// and storage are left untouched.
    pub async fn save_customer<S: KeyValueStore>(
        &mut self,
        store: &S,
        request: SaveRequest,
    ) -> Result<CustomerId, BookError> {
        let saved = create_or_update(&self.customers, request)?;
        tracing::info!("book.customer.saved: id={} outcome={:?}", saved.id, saved.outcome);
        self.customers = saved.customers;
        persist(store, &self.config.customers_key, &self.customers).await;
        Ok(saved.id)
    }

    /// Register a new attendant name; rewrites the attendant document only
    /// when the registry changed.
    ///
    /// Returns `true` when `name` was added.
    pub async fn add_attendant<S: KeyValueStore>(&mut self, store: &S, name: &str) -> bool {
        if !self.attendants.add(name) {
            return false;
        }
        tracing::info!("book.attendant.added: name={name:?}");
        persist(store, &self.config.attendants_key, &self.attendants).await;
        true
    }

    /// Customers matching `term` on `field`, in list order.
    #[must_use]
    pub fn search(&self, field: FilterField, term: &str) -> Vec<&Customer> {
        search::filter(&self.customers, field, term)
    }

    /// Revenue figures for the period containing `reference_date`.
    #[must_use]
    pub fn dashboard(
        &self,
        period: PeriodType,
        reference_date: &str,
        config: &RevenueConfig,
    ) -> RevenueSummary {
        revenue::aggregate(&self.customers, period, reference_date, config)
    }
}

// ---------------------------------------------------------------------------
// Storage helpers
// ---------------------------------------------------------------------------

async fn load_or_default<S, T, F>(store: &S, key: &str, default: F) -> T
where
    S: KeyValueStore,
    T: serde::de::DeserializeOwned,
    F: FnOnce() -> T,
{
    match store.load(key).await {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!("book.open.corrupt: key={key} error={e}");
            default()
        }),
        Ok(None) => default(),
        Err(e) => {
            tracing::warn!("book.open.unreadable: key={key} error={e}");
            default()
        }
    }
}

async fn persist<S, T>(store: &S, key: &str, value: &T)
where
    S: KeyValueStore,
    T: serde::Serialize + ?Sized,
{
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("book.persist.encode_failed: key={key} error={e}");
            return;
        }
    };
    if let Err(e) = store.save(key, json).await {
        tracing::error!("book.persist.failed: key={key} error={e}");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{CustomerDetails, PaymentMethod, RequiredField, Service, StoreError};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    // ------------------------------------------------------------------
    // Mock adapter
    // ------------------------------------------------------------------

    /// In-memory store with switchable failures and a write counter.
    struct MockStore {
        docs: RefCell<HashMap<String, String>>,
        fail_loads: bool,
        fail_saves: Cell<bool>,
        saves: Cell<usize>,
    }

    impl MockStore {
        fn new() -> Self {
            Self {
                docs: RefCell::new(HashMap::new()),
                fail_loads: false,
                fail_saves: Cell::new(false),
                saves: Cell::new(0),
            }
        }

        fn with_doc(self, key: &str, json: &str) -> Self {
            self.docs.borrow_mut().insert(key.to_owned(), json.to_owned());
            self
        }

        fn doc(&self, key: &str) -> Option<String> {
            self.docs.borrow().get(key).cloned()
        }
    }

    impl KeyValueStore for MockStore {
        async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
            if self.fail_loads {
                return Err(StoreError::Unavailable { reason: "forced".to_owned() });
            }
            Ok(self.doc(key))
        }

        async fn save(&self, key: &str, value: String) -> Result<(), StoreError> {
            if self.fail_saves.get() {
                return Err(StoreError::QuotaExceeded { limit: 0 });
            }
            self.saves.set(self.saves.get() + 1);
            self.docs.borrow_mut().insert(key.to_owned(), value);
            Ok(())
        }
    }

    fn details(name: &str) -> CustomerDetails {
        CustomerDetails {
            name: name.to_owned(),
            tax_id: "000.000.000-00".to_owned(),
            address: "Rua A".to_owned(),
            ..CustomerDetails::default()
        }
    }

    async fn open(store: &MockStore) -> CustomerBook {
        CustomerBook::open(store, BookConfig::default()).await
    }

    // ------------------------------------------------------------------
    // Config builder
    // ------------------------------------------------------------------

    #[test]
    fn config_defaults_to_standard_keys() {
        let cfg = BookConfig::builder().build().unwrap();
        assert_eq!(cfg.customers_key, "customers");
        assert_eq!(cfg.attendants_key, "attendants");
    }

    #[test]
    fn config_rejects_empty_or_shared_keys() {
        assert!(matches!(
            BookConfig::builder().customers_key("").build(),
            Err(BookError::InvalidConfig { .. })
        ));
        assert!(matches!(
            BookConfig::builder().customers_key("x").attendants_key("x").build(),
            Err(BookError::InvalidConfig { .. })
        ));
    }

    // ------------------------------------------------------------------
    // open()
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn open_empty_store_uses_defaults() {
        let store = MockStore::new();
        let book = open(&store).await;
        assert!(book.customers().is_empty());
        assert_eq!(book.attendants(), &AttendantRegistry::default());
        assert_eq!(store.saves.get(), 0);
    }

    #[tokio::test]
    async fn open_reads_stored_documents() {
        let store = MockStore::new()
            .with_doc(CUSTOMERS_KEY, r#"[{"id": "a", "nome": "Ana", "cpf": "1", "endereco": "Rua"}]"#)
            .with_doc(ATTENDANTS_KEY, r#"["Paulo"]"#);
        let book = open(&store).await;
        assert_eq!(book.customers().len(), 1);
        assert_eq!(book.customers()[0].details.name, "Ana");
        assert_eq!(book.attendants().names(), ["Paulo"]);
    }

    #[tokio::test]
    async fn open_drops_blank_and_repeated_attendants() {
        let store = MockStore::new().with_doc(ATTENDANTS_KEY, r#"["Paulo", "", "Paulo", "Rita"]"#);
        let book = open(&store).await;
        assert_eq!(book.attendants().names(), ["Paulo", "Rita"]);
    }

    #[tokio::test]
    async fn open_corrupt_documents_fall_back() {
        let store = MockStore::new()
            .with_doc(CUSTOMERS_KEY, "{not json")
            .with_doc(ATTENDANTS_KEY, "42");
        let book = open(&store).await;
        assert!(book.customers().is_empty());
        assert_eq!(book.attendants(), &AttendantRegistry::default());
    }

    #[tokio::test]
    async fn open_read_errors_fall_back() {
        let mut store = MockStore::new().with_doc(CUSTOMERS_KEY, "[]");
        store.fail_loads = true;
        let book = open(&store).await;
        assert!(book.customers().is_empty());
        assert_eq!(book.attendants().names().len(), 4);
    }

    #[tokio::test]
    async fn open_honours_custom_keys() {
        let store = MockStore::new().with_doc("clientes", r#"[{"id": "z", "nome": "Zé"}]"#);
        let cfg = BookConfig::builder().customers_key("clientes").build().unwrap();
        let book = CustomerBook::open(&store, cfg).await;
        assert_eq!(book.customers()[0].id.as_str(), "z");
    }

    // ------------------------------------------------------------------
    // save_customer()
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn save_creates_and_persists_whole_list() {
        let store = MockStore::new();
        let mut book = open(&store).await;
        let first = book.save_customer(&store, SaveRequest::create(details("A"))).await.unwrap();
        let second = book.save_customer(&store, SaveRequest::create(details("B"))).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(store.saves.get(), 2);

        let stored: Vec<Customer> = serde_json::from_str(&store.doc(CUSTOMERS_KEY).unwrap()).unwrap();
        assert_eq!(stored, book.customers());
    }

    #[tokio::test]
    async fn save_updates_in_place() {
        let store = MockStore::new();
        let mut book = open(&store).await;
        let id = book.save_customer(&store, SaveRequest::create(details("Old"))).await.unwrap();
        let again =
            book.save_customer(&store, SaveRequest::update(id.clone(), details("New"))).await.unwrap();
        assert_eq!(again, id);
        assert_eq!(book.customers().len(), 1);
        assert_eq!(book.find(&id).unwrap().details.name, "New");
    }

    #[tokio::test]
    async fn invalid_save_changes_nothing() {
        let store = MockStore::new();
        let mut book = open(&store).await;
        let mut d = details("A");
        d.tax_id.clear();
        let err = book.save_customer(&store, SaveRequest::create(d)).await.unwrap_err();
        assert_eq!(
            err,
            BookError::Domain(DomainError::MissingRequiredFields { fields: vec![RequiredField::TaxId] })
        );
        assert!(book.customers().is_empty());
        assert_eq!(store.saves.get(), 0);
        assert!(store.doc(CUSTOMERS_KEY).is_none());
    }

    #[tokio::test]
    async fn failed_write_keeps_memory_state() {
        let store = MockStore::new();
        let mut book = open(&store).await;
        store.fail_saves.set(true);
        let id = book.save_customer(&store, SaveRequest::create(details("A"))).await.unwrap();
        assert!(book.find(&id).is_some());
        assert!(store.doc(CUSTOMERS_KEY).is_none());
    }

    #[tokio::test]
    async fn payment_change_round_trip_clears_installments() {
        let store = MockStore::new();
        let mut book = open(&store).await;
        let mut d = details("A");
        d.set_payment_method(Some(PaymentMethod::CreditCard));
        d.set_installments(Some(6)).unwrap();
        let id = book.save_customer(&store, SaveRequest::create(d)).await.unwrap();

        let mut edited = book.find(&id).unwrap().clone();
        edited.details.set_payment_method(Some(PaymentMethod::InstantTransfer));
        book.save_customer(&store, edited.into()).await.unwrap();
        assert_eq!(book.find(&id).unwrap().details.installment_count, None);
    }

    // ------------------------------------------------------------------
    // add_attendant()
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn add_attendant_persists_only_on_change() {
        let store = MockStore::new();
        let mut book = open(&store).await;
        assert!(book.add_attendant(&store, "Paulo").await);
        assert!(!book.add_attendant(&store, "Paulo").await);
        assert!(!book.add_attendant(&store, "").await);
        assert_eq!(store.saves.get(), 1);
        assert_eq!(
            store.doc(ATTENDANTS_KEY).as_deref(),
            Some(r#"["Thamires","Marco","Yasmin","Sarah","Paulo"]"#)
        );
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn search_and_dashboard_read_current_list() {
        let store = MockStore::new();
        let mut book = open(&store).await;
        let mut d = details("A");
        d.condominium_name = "Residencial Sol".to_owned();
        d.service_date = "2024-05-10".to_owned();
        d.total_value = "300,50".to_owned();
        d.toggle_service(Service::PoolFence, true);
        book.save_customer(&store, SaveRequest::create(d)).await.unwrap();
        book.save_customer(&store, SaveRequest::create(details("B"))).await.unwrap();

        assert_eq!(book.search(FilterField::CondominiumName, "sol").len(), 1);
        assert_eq!(book.search(FilterField::Address, "").len(), 2);

        let summary = book.dashboard(PeriodType::Year, "2024-01-01", &RevenueConfig::default());
        assert_eq!(summary.total_revenue.to_string(), "300.50");
        assert_eq!(summary.top_services.len(), 1);
        assert_eq!(summary.top_services[0].service, Service::PoolFence);
    }
}
