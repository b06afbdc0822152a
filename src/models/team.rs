//! Team data structure.

use serde::{Deserialize, Serialize};

/// A team in the tournament. Teams are referenced from matches by name.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    /// Opaque logo reference (usually an image data URL). Never inspected.
    pub logo: Option<String>,
}

impl Team {
    pub fn new(name: impl Into<String>, logo: Option<String>) -> Self {
        Self {
            name: name.into(),
            logo,
        }
    }

    /// Names are unique ignoring case (full Unicode lowercasing).
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}
