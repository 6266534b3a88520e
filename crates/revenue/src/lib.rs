// Rust guideline compliant 2026-10-16

//! Revenue dashboard aggregation.
//!
//! Entry point: [`aggregate`]. Configuration via [`RevenueConfig::builder`].
//!
//! A customer contributes when its service date falls in the selected period
//! and its total value parses. Each contributing customer adds its whole
//! value to every service it contracted, so per-service sums may add up to
//! more than the period total.

use std::collections::HashMap;
use std::str::FromStr as _;

use domain::{Customer, Service};
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// RevenueError
// ---------------------------------------------------------------------------

/// Errors raised while configuring the aggregation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RevenueError {
    /// The supplied configuration is invalid.
    #[error("invalid revenue configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// RevenueConfig + builder
// ---------------------------------------------------------------------------

/// Runtime configuration for [`aggregate`].
///
/// Construct via [`RevenueConfig::builder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueConfig {
    /// Maximum number of service categories in the ranking (`>= 1`).
    pub top_n: usize,
}

impl Default for RevenueConfig {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }
}

/// Ranking length shown on the dashboard.
pub const DEFAULT_TOP_N: usize = 5;

/// Builder for [`RevenueConfig`].
///
/// Obtain via [`RevenueConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct RevenueConfigBuilder {
    top_n: usize,
}

impl RevenueConfig {
    /// Create a builder. Default values: `top_n = 5`.
    #[must_use]
    pub fn builder() -> RevenueConfigBuilder {
        RevenueConfigBuilder { top_n: DEFAULT_TOP_N }
    }
}

impl RevenueConfigBuilder {
    /// Override the ranking length.
    #[must_use]
    pub fn top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RevenueError::InvalidConfig`] when `top_n` is zero.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<RevenueConfig, RevenueError> {
        if self.top_n == 0 {
            return Err(RevenueError::InvalidConfig { reason: "top_n must be >= 1".to_owned() });
        }
        Ok(RevenueConfig { top_n: self.top_n })
    }
}

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// Aggregation granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PeriodType {
    Day,
    #[default]
    Month,
    Year,
}

impl PeriodType {
    pub const ALL: [Self; 3] = [Self::Day, Self::Month, Self::Year];

    /// Number of leading characters of a `YYYY-MM-DD` date that must agree.
    #[must_use]
    pub fn prefix_len(self) -> usize {
        match self {
            Self::Day => 10,
            Self::Month => 7,
            Self::Year => 4,
        }
    }

    /// pt-BR label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Dia",
            Self::Month => "Mês",
            Self::Year => "Ano",
        }
    }

    /// Whether `service_date` falls into the period containing `reference_date`.
    #[must_use]
    pub fn contains(self, service_date: &str, reference_date: &str) -> bool {
        match self {
            Self::Day => service_date == reference_date,
            Self::Month | Self::Year => {
                let n = self.prefix_len();
                prefix(service_date, n) == prefix(reference_date, n)
            }
        }
    }
}

/// First `n` characters of `s`, or all of `s` when shorter.
fn prefix(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map_or(s, |(i, _)| &s[..i])
}

/// Reference date for a `YYYY-MM` month picker value (`"2024-05"` -> `"2024-05-01"`).
#[must_use]
pub fn reference_for_month(month: &str) -> String {
    format!("{month}-01")
}

/// Reference date for a year input; `None` unless exactly four ASCII digits.
#[must_use]
pub fn reference_for_year(year: &str) -> Option<String> {
    (year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit())).then(|| format!("{year}-01-01"))
}

// ---------------------------------------------------------------------------
// Amount parsing
// ---------------------------------------------------------------------------

/// Parse a typed amount such as `"1500,50"`.
///
/// The first comma becomes the decimal point, then the longest leading
/// `[+-]digits[.digits][e[+-]digits]` prefix is read; trailing text is ignored.
/// Returns `None` when no digit is found or the number does not fit a
/// `Decimal` (more than 28 significant digits, or an exponent pushing it past
/// that range), where a float parse would still yield a huge approximate value.
#[must_use]
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let normalized = text.trim().replacen(',', ".", 1);
    let (sign, rest) = match normalized.as_bytes().first() {
        Some(b'-') => ("-", &normalized[1..]),
        Some(b'+') => ("", &normalized[1..]),
        _ => ("", normalized.as_str()),
    };

    let int_len = leading_digits(rest);
    let (int_part, tail) = rest.split_at(int_len);
    let (frac_part, tail) = match tail.strip_prefix('.') {
        Some(frac) => frac.split_at(leading_digits(frac)),
        None => ("", tail),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let mantissa = if frac_part.is_empty() {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part}")
    };
    match exponent(tail) {
        Some(exp) => Decimal::from_scientific(&format!("{mantissa}e{exp}")).ok(),
        None => Decimal::from_str(&mantissa).ok(),
    }
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// `[eE][+-]digits` at the start of `tail`, as `"-digits"` or `"digits"`.
fn exponent(tail: &str) -> Option<String> {
    let body = tail.strip_prefix(['e', 'E'])?;
    let (negative, digits) = match body.as_bytes().first() {
        Some(b'-') => (true, &body[1..]),
        Some(b'+') => (false, &body[1..]),
        _ => (false, body),
    };
    let digits = &digits[..leading_digits(digits)];
    if digits.is_empty() {
        return None;
    }
    Some(if negative { format!("-{digits}") } else { digits.to_owned() })
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Revenue attributed to one service category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceRevenue {
    pub service: Service,
    pub total: Decimal,
}

/// Dashboard figures for one period.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RevenueSummary {
    /// Sum of the parsed total values of eligible customers.
    pub total_revenue: Decimal,
    /// Highest-grossing services, descending, at most `top_n` entries.
    pub top_services: Vec<ServiceRevenue>,
}

impl RevenueSummary {
    /// Largest per-service total, used to scale bar widths. Zero when empty.
    #[must_use]
    pub fn max_service_total(&self) -> Decimal {
        self.top_services.iter().map(|s| s.total).max().unwrap_or(Decimal::ZERO)
    }
}

/// Compute total revenue and the top services for the period of `reference_date`.
///
/// Customers without a service date, without a total value, or whose total
/// value does not parse contribute nothing. An empty `reference_date` yields
/// an empty summary. Ties in the ranking keep the order in which services were
/// first encountered.
#[must_use]
pub fn aggregate(
    customers: &[Customer],
    period: PeriodType,
    reference_date: &str,
    config: &RevenueConfig,
) -> RevenueSummary {
    if reference_date.is_empty() {
        return RevenueSummary::default();
    }

    let mut total_revenue = Decimal::ZERO;
    let mut per_service: HashMap<Service, Decimal> = HashMap::new();
    let mut discovery: Vec<Service> = Vec::new();
    let mut eligible = 0usize;

    for customer in customers {
        let d = &customer.details;
        if d.service_date.is_empty() || d.total_value.is_empty() {
            continue;
        }
        if !period.contains(&d.service_date, reference_date) {
            continue;
        }
        eligible += 1;
        let Some(value) = parse_amount(&d.total_value) else {
            tracing::debug!("revenue.aggregate.unparsable: id={} value={:?}", customer.id, d.total_value);
            continue;
        };
        // A customer either lands in the total and every service sum, or in none.
        let Some((next_total, staged)) = add_checked(total_revenue, &per_service, &d.services, value)
        else {
            tracing::debug!("revenue.aggregate.overflow: id={} value={value}", customer.id);
            continue;
        };
        total_revenue = next_total;
        for (service, total) in staged {
            if per_service.insert(service, total).is_none() {
                discovery.push(service);
            }
        }
    }

    let mut ranking: Vec<ServiceRevenue> = discovery
        .into_iter()
        .map(|service| ServiceRevenue { service, total: per_service[&service] })
        .collect();
    // Stable: equal totals keep discovery order.
    ranking.sort_by(|a, b| b.total.cmp(&a.total));
    ranking.truncate(config.top_n);

    tracing::debug!(
        "revenue.aggregate: period={period:?} reference={reference_date} eligible={eligible} total={total_revenue}"
    );
    RevenueSummary { total_revenue, top_services: ranking }
}

/// New running total and per-service sums after adding `value`, or `None`
/// if any of them would overflow.
fn add_checked(
    total: Decimal,
    per_service: &HashMap<Service, Decimal>,
    services: &[Service],
    value: Decimal,
) -> Option<(Decimal, Vec<(Service, Decimal)>)> {
    let next_total = total.checked_add(value)?;
    let mut staged: Vec<(Service, Decimal)> = Vec::with_capacity(services.len());
    for &service in services {
        let current = staged
            .iter()
            .rev()
            .find(|(s, _)| *s == service)
            .map(|&(_, t)| t)
            .or_else(|| per_service.get(&service).copied())
            .unwrap_or(Decimal::ZERO);
        staged.push((service, current.checked_add(value)?));
    }
    Some((next_total, staged))
}
