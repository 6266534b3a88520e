// Rust guideline compliant 2026-10-12

//! Closed value sets offered by the job form: services, payment methods and
//! finishes.
//!
//! Every enum is persisted with its pt-BR label, which is also the text shown
//! to staff. Decoding from storage is lenient: labels outside the closed set
//! never abort a load, they collapse to "unset" (or are dropped from a set).

use serde::{Deserialize, Deserializer, Serializer};

/// A closed enumeration with a stable display/persistence label per variant.
pub trait Catalog: Sized + Copy + PartialEq + 'static {
    /// Every variant, in the order the form lists them.
    const ALL: &'static [Self];

    /// The pt-BR label, identical to the persisted spelling.
    fn label(self) -> &'static str;

    /// Resolve a persisted label. Exact, case-sensitive match.
    #[must_use]
    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.label() == label)
    }
}

/// Service categories sold by the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Service {
    #[serde(rename = "Rede de Proteção")]
    Netting,
    #[serde(rename = "Tela Mosquiteira")]
    MosquitoScreen,
    #[serde(rename = "Varal")]
    Clothesline,
    #[serde(rename = "Persianas")]
    Blinds,
    #[serde(rename = "Cerca de Piscina")]
    PoolFence,
}

impl Catalog for Service {
    const ALL: &'static [Self] = &[
        Self::Netting,
        Self::MosquitoScreen,
        Self::Clothesline,
        Self::Blinds,
        Self::PoolFence,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Netting => "Rede de Proteção",
            Self::MosquitoScreen => "Tela Mosquiteira",
            Self::Clothesline => "Varal",
            Self::Blinds => "Persianas",
            Self::PoolFence => "Cerca de Piscina",
        }
    }
}

/// How the customer pays. "Unset" is modelled as `Option::None` by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Dinheiro")]
    Cash,
    #[serde(rename = "Pix")]
    InstantTransfer,
    #[serde(rename = "Cartão de Crédito")]
    CreditCard,
    #[serde(rename = "Boleto Bancario")]
    BankSlip,
}

impl Catalog for PaymentMethod {
    const ALL: &'static [Self] =
        &[Self::Cash, Self::InstantTransfer, Self::CreditCard, Self::BankSlip];

    fn label(self) -> &'static str {
        match self {
            Self::Cash => "Dinheiro",
            Self::InstantTransfer => "Pix",
            Self::CreditCard => "Cartão de Crédito",
            Self::BankSlip => "Boleto Bancario",
        }
    }
}

/// Frame/net finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Color {
    #[serde(rename = "Branco")]
    White,
    #[serde(rename = "Bronze")]
    Bronze,
    #[serde(rename = "Cinza")]
    Gray,
    #[serde(rename = "Cristal")]
    Crystal,
    #[serde(rename = "Fosco")]
    Matte,
    #[serde(rename = "Preto")]
    Black,
    #[serde(rename = "Marrom")]
    Brown,
}

impl Catalog for Color {
    const ALL: &'static [Self] = &[
        Self::White,
        Self::Bronze,
        Self::Gray,
        Self::Crystal,
        Self::Matte,
        Self::Black,
        Self::Brown,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::White => "Branco",
            Self::Bronze => "Bronze",
            Self::Gray => "Cinza",
            Self::Crystal => "Cristal",
            Self::Matte => "Fosco",
            Self::Black => "Preto",
            Self::Brown => "Marrom",
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient serde helpers (field-level)
// ---------------------------------------------------------------------------

/// Decode a list of labels, dropping unknown labels and duplicates.
pub(crate) fn lenient_set<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Catalog,
{
    let raw = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    let mut out: Vec<T> = Vec::with_capacity(raw.len());
    for label in raw {
        match T::from_label(&label) {
            Some(v) if !out.contains(&v) => out.push(v),
            Some(_) => {}
            None => tracing::warn!("domain.catalog.unknown_label: label={label:?}"),
        }
    }
    Ok(out)
}

/// Decode an optional label; `null`, `""` and unknown labels become `None`.
pub(crate) fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Catalog,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|label| {
        if label.is_empty() {
            return None;
        }
        let parsed = T::from_label(&label);
        if parsed.is_none() {
            tracing::warn!("domain.catalog.unknown_label: label={label:?}");
        }
        parsed
    }))
}

/// Encode an optional value as its label, or `""` when unset.
#[allow(clippy::ref_option, reason = "signature imposed by serde's serialize_with")]
pub(crate) fn label_or_blank<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Catalog,
{
    serializer.serialize_str(value.map_or("", Catalog::label))
}
