// Rust guideline compliant 2026-10-14

//! Customer list search.
//!
//! Entry point: [`filter`]. A pure, total function of the customer list, the
//! selected [`FilterField`] and the search term. Text fields match by
//! case-insensitive containment; date fields require the exact `YYYY-MM-DD`
//! string, since the date picker always produces canonical dates.

use domain::Customer;

/// The customer attribute the search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterField {
    /// Street address (`endereco`).
    #[default]
    Address,
    /// Condominium name (`condominio`).
    CondominiumName,
    /// Budget date, exact match.
    BudgetDate,
    /// Service date, exact match.
    ServiceDate,
}

impl FilterField {
    /// Every selector, in the order the search bar lists them.
    pub const ALL: [Self; 4] =
        [Self::Address, Self::CondominiumName, Self::BudgetDate, Self::ServiceDate];

    /// pt-BR label for the selector.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Address => "Filtrar por Endereço",
            Self::CondominiumName => "Filtrar por Condomínio",
            Self::BudgetDate => "Filtrar por Data de Orçamento",
            Self::ServiceDate => "Filtrar por Data de Serviço",
        }
    }

    /// `true` for the two date selectors.
    #[must_use]
    pub fn is_date(self) -> bool {
        matches!(self, Self::BudgetDate | Self::ServiceDate)
    }

    fn value(self, customer: &Customer) -> &str {
        let d = &customer.details;
        match self {
            Self::Address => &d.address,
            Self::CondominiumName => &d.condominium_name,
            Self::BudgetDate => &d.budget_date,
            Self::ServiceDate => &d.service_date,
        }
    }
}

/// Return the customers matching `term` on `field`, in input order.
///
/// - empty `term`: every customer;
/// - date fields: exact string equality, no prefix or calendar matching;
/// - text fields: case-insensitive substring; an empty field never matches.
#[must_use]
pub fn filter<'a>(customers: &'a [Customer], field: FilterField, term: &str) -> Vec<&'a Customer> {
    if term.is_empty() {
        return customers.iter().collect();
    }

    let matched: Vec<&Customer> = if field.is_date() {
        customers.iter().filter(|c| field.value(c) == term).collect()
    } else {
        let needle = term.to_lowercase();
        customers
            .iter()
            .filter(|c| {
                let value = field.value(c);
                !value.is_empty() && value.to_lowercase().contains(&needle)
            })
            .collect()
    };
    tracing::debug!(
        "search.filter: field={field:?} matched={} of {}",
        matched.len(),
        customers.len()
    );
    matched
}
