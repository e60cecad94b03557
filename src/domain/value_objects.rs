use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable short identifier of an IDE profile, e.g. `VS2013`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        ProfileId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProfileId {
    fn from(id: &str) -> Self {
        ProfileId::new(id)
    }
}

/// Addresses a single named value inside a store location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKey {
    pub location: String,
    pub name: String,
}

impl StoreKey {
    pub fn new(location: &str, name: &str) -> Self {
        Self {
            location: location.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\\{}", self.location, self.name)
    }
}

/// Normalizes a location path so that lookups behave like registry keys:
/// either separator is accepted, surrounding separators are dropped and
/// comparison is case-insensitive.
///
/// # Arguments
/// * `location` - The raw location, e.g. `Software/Microsoft\VisualStudio`
///
/// # Returns
/// * The canonical form, e.g. `software\microsoft\visualstudio`
pub fn normalize_location(location: &str) -> String {
    location
        .split(['\\', '/'])
        .filter(|segment| !segment.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("\\")
}

/// A persisted scalar value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum StoreValue {
    String(String),
    DWord(u32),
    Bool(bool),
}

impl StoreValue {
    /// Interprets the value as a flag. Integers are true when non-zero;
    /// strings accept `true`/`false`/`1`/`0`.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            StoreValue::Bool(flag) => Some(*flag),
            StoreValue::DWord(n) => Some(*n != 0),
            StoreValue::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StoreValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn flag(enabled: bool) -> Self {
        StoreValue::DWord(u32::from(enabled))
    }
}
