//! Common types used throughout the storefront crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a table in the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Create a new TableName.
    ///
    /// # Preconditions
    /// - `name` must be non-empty
    /// - `name` must not contain whitespace or `.`
    ///
    /// # Errors
    /// - Returns `InvalidInput` if either precondition is violated
    pub fn new(name: impl Into<String>) -> crate::Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(crate::Error::InvalidInput(
                "Table name cannot be empty".to_string(),
            ));
        }
        if name.chars().any(|c| c.is_whitespace() || c == '.') {
            return Err(crate::Error::InvalidInput(format!(
                "Table name '{}' contains invalid characters",
                name
            )));
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TableName {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Self::new(value)
    }
}

impl From<TableName> for String {
    fn from(name: TableName) -> Self {
        name.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_creation() {
        let name = TableName::new("appointments").unwrap();
        assert_eq!(name.as_str(), "appointments");
        assert_eq!(name.to_string(), "appointments");
    }

    #[test]
    fn test_table_name_empty_fails() {
        assert!(TableName::new("").is_err());
    }

    #[test]
    fn test_table_name_rejects_separators() {
        assert!(TableName::new("public.products").is_err());
        assert!(TableName::new("order items").is_err());
    }

    #[test]
    fn test_table_name_deserialize_validates() {
        let ok: TableName = serde_json::from_str("\"services\"").unwrap();
        assert_eq!(ok.as_str(), "services");
        assert!(serde_json::from_str::<TableName>("\"\"").is_err());
    }
}
