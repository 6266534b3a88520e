// Rust guideline compliant 2026-10-12

//! Growable, ordered set of attendant names.

use serde::{Deserialize, Serialize};

/// Names offered by the form before anyone adds a new one.
pub const DEFAULT_ATTENDANTS: [&str; 4] = ["Thamires", "Marco", "Yasmin", "Sarah"];

/// Append-only list of unique attendant names, in insertion order.
///
/// Persisted as a plain JSON array; decoding goes through
/// [`from_names`](Self::from_names) so stored blanks and repeats are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct AttendantRegistry {
    names: Vec<String>,
}

impl From<Vec<String>> for AttendantRegistry {
    fn from(names: Vec<String>) -> Self {
        Self::from_names(names)
    }
}

impl From<AttendantRegistry> for Vec<String> {
    fn from(registry: AttendantRegistry) -> Self {
        registry.names
    }
}

impl Default for AttendantRegistry {
    fn default() -> Self {
        Self { names: DEFAULT_ATTENDANTS.iter().map(|&n| n.to_owned()).collect() }
    }
}

impl AttendantRegistry {
    /// Build a registry from stored names, dropping blanks and repeats.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self { names: Vec::new() };
        for name in names {
            registry.add(name);
        }
        registry
    }

    /// Append `name` unless it is empty or already present (case-sensitive).
    ///
    /// Returns `true` when the registry changed.
    pub fn add(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name.is_empty() || self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
