//! Dual-key lookup: a path segment shaped like a UUID is an id, anything else
//! is an exact name.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

static UUID_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
});

/// How a single-resource identifier is resolved against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    ById(Uuid),
    ByName(String),
}

impl Identifier {
    pub fn classify(identifier: &str) -> Self {
        if UUID_SHAPE.is_match(identifier) {
            if let Ok(id) = Uuid::parse_str(identifier) {
                return Identifier::ById(id);
            }
        }
        Identifier::ByName(identifier.to_string())
    }
}
