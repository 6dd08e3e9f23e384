use derive_more::{AsRef, Display, Into};
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// A trimmed, non-empty display name.
#[derive(
    AsRef, Debug, Display, Into, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub fn new(name: &str) -> Result<Self, NameError> {
        let trimmed_name = name.trim();

        if trimmed_name.is_empty() {
            return Err(NameError::Empty);
        }

        Ok(Name(trimmed_name.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn eq_ignore_case(&self, other: &Name) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl TryFrom<String> for Name {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Name::new(&value)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
}

impl From<NameError> for ValidationError {
    fn from(value: NameError) -> Self {
        match value {
            NameError::Empty => ValidationError::EmptyName,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Alice", Ok(Name("Alice".to_string())))]
    #[case("  Bench Press  ", Ok(Name("Bench Press".to_string())))]
    #[case("", Err(NameError::Empty))]
    #[case(" \t ", Err(NameError::Empty))]
    fn test_name_new(#[case] name: &str, #[case] expected: Result<Name, NameError>) {
        assert_eq!(Name::new(name), expected);
    }

    #[rstest]
    #[case("Bench Press", "bench press", true)]
    #[case("Bench Press", "BENCH PRESS", true)]
    #[case("Bench Press", "Bench", false)]
    fn test_name_eq_ignore_case(#[case] a: &str, #[case] b: &str, #[case] expected: bool) {
        assert_eq!(
            Name::new(a).unwrap().eq_ignore_case(&Name::new(b).unwrap()),
            expected
        );
    }

    #[test]
    fn test_name_deserialize() {
        assert_eq!(
            serde_json::from_str::<Name>("\" Row \"").unwrap(),
            Name::new("Row").unwrap()
        );
        assert!(serde_json::from_str::<Name>("\"  \"").is_err());
        assert_eq!(
            serde_json::to_string(&Name::new("Row").unwrap()).unwrap(),
            "\"Row\""
        );
    }
}
