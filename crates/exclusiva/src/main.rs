// Rust guideline compliant 2026-10-16

//! `exclusiva` entry point: prints a printable report for the customer book.
//!
//! Configuration comes from the environment:
//!
//! | variable            | meaning                                   | default              |
//! |---------------------|-------------------------------------------|----------------------|
//! | `EXCLUSIVA_DB_URL`  | SQLite URL, or `memory` for a scratch store | `sqlite:exclusiva.db` |
//! | `EXCLUSIVA_PERIOD`  | `day`, `month` or `year`                  | `month`              |
//! | `EXCLUSIVA_DATE`    | `YYYY-MM-DD`; also `YYYY-MM` (month) or `YYYY` (year) | today |
//! | `EXCLUSIVA_QUOTE`   | customer id; prints that customer's quote | unset                |
//!
//! # Usage
//!
//! ```text
//! RUST_LOG=info EXCLUSIVA_PERIOD=year cargo run --bin exclusiva > painel.html
//! ```

mod adapters;

use std::io::Write as _;

use adapters::{InMemoryStore, SqliteStore};
use anyhow::Context as _;
use book::{BookConfig, CustomerBook};
use chrono::NaiveDate;
use domain::{CustomerId, KeyValueStore};
use revenue::{PeriodType, RevenueConfig};

const DEFAULT_DB_URL: &str = "sqlite:exclusiva.db";

/// `EXCLUSIVA_DB_URL` value selecting [`InMemoryStore`].
const MEMORY_DB_URL: &str = "memory";

/// Quota of the scratch store, the usual browser local-storage limit.
const MEMORY_QUOTA_BYTES: usize = 5 * 1024 * 1024;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    db_url: String,
    period: PeriodType,
    reference: NaiveDate,
    quote: Option<CustomerId>,
}

impl Settings {
    /// Read settings through `lookup`, falling back to defaults for unset
    /// variables.
    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        today: NaiveDate,
    ) -> anyhow::Result<Self> {
        let db_url = lookup("EXCLUSIVA_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.to_owned());
        let period = lookup("EXCLUSIVA_PERIOD")
            .map(|p| parse_period(&p))
            .transpose()?
            .unwrap_or_default();
        let reference = lookup("EXCLUSIVA_DATE")
            .map(|d| parse_reference(&d, period))
            .transpose()?
            .unwrap_or(today);
        let quote = lookup("EXCLUSIVA_QUOTE").filter(|id| !id.is_empty()).map(CustomerId::new);
        Ok(Self { db_url, period, reference, quote })
    }
}

/// Accept the dashboard's own input shapes: a month picker value for
/// `Month`, a bare year for `Year`, a full date otherwise.
fn parse_reference(text: &str, period: PeriodType) -> anyhow::Result<NaiveDate> {
    let full = match period {
        PeriodType::Month if text.len() == 7 => revenue::reference_for_month(text),
        PeriodType::Year => revenue::reference_for_year(text).unwrap_or_else(|| text.to_owned()),
        _ => text.to_owned(),
    };
    NaiveDate::parse_from_str(&full, DATE_FORMAT)
        .with_context(|| format!("EXCLUSIVA_DATE must be YYYY-MM-DD, got {text:?}"))
}

fn parse_period(text: &str) -> anyhow::Result<PeriodType> {
    match text.to_ascii_lowercase().as_str() {
        "day" => Ok(PeriodType::Day),
        "month" => Ok(PeriodType::Month),
        "year" => Ok(PeriodType::Year),
        other => anyhow::bail!("EXCLUSIVA_PERIOD must be day, month or year, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Open the book on `store` and render the requested report.
async fn render<S: KeyValueStore>(
    store: &S,
    settings: &Settings,
    today: NaiveDate,
) -> anyhow::Result<String> {
    let book_config = BookConfig::builder().build().context("failed to build book config")?;
    let book = CustomerBook::open(store, book_config).await;

    if let Some(id) = &settings.quote {
        let customer = book.find(id).with_context(|| format!("no customer with id {id}"))?;
        tracing::info!("main.quote: id={id}");
        return Ok(report::customer_quote(customer, today));
    }

    let revenue_config = RevenueConfig::builder().build().context("failed to build revenue config")?;
    let reference = settings.reference.format(DATE_FORMAT).to_string();
    let summary = book.dashboard(settings.period, &reference, &revenue_config);
    tracing::info!(
        "main.dashboard: period={:?} reference={reference} total={}",
        settings.period,
        summary.total_revenue
    );
    Ok(report::dashboard_report(&summary, settings.period, &reference, today))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize the tracing subscriber before any async work.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let today = chrono::Local::now().date_naive();
    let settings = Settings::from_lookup(|k| std::env::var(k).ok(), today)?;

    let html = if settings.db_url == MEMORY_DB_URL {
        let store = InMemoryStore::new(Some(MEMORY_QUOTA_BYTES));
        render(&store, &settings, today).await?
    } else {
        let store = SqliteStore::new(&settings.db_url)
            .await
            .with_context(|| format!("failed to open SQLite store at {}", settings.db_url))?;
        render(&store, &settings, today).await?
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(html.as_bytes()).context("failed to write report")?;
    stdout.flush().context("failed to flush report")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
