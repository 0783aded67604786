//! City model used as the key of every travel table

use std::fmt;

use serde::{Deserialize, Serialize};

/// A canonical, lowercase city name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct City(String);

impl City {
    /// Normalize a raw city name
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.to_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for City {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
