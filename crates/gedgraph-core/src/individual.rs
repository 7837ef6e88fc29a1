//! Individual (person) records

use serde::{Deserialize, Serialize};

/// Sex as recorded on an individual
///
/// Unrecognized codes are kept verbatim so nothing from the source is lost.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
    Other(String),
}

impl Sex {
    /// Code as written in the output graph
    pub fn code(&self) -> &str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unknown => "U",
            Self::Other(code) => code,
        }
    }
}

impl From<&str> for Sex {
    fn from(s: &str) -> Self {
        match s {
            "M" => Self::Male,
            "F" => Self::Female,
            "U" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Sex {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Sex> for String {
    fn from(sex: Sex) -> Self {
        sex.code().to_string()
    }
}

/// A person record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    /// Identifier with the `@` wrapper removed
    pub id: String,

    /// Display name with surname delimiters removed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub sex: Sex,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,

    /// Families this individual is a spouse in (`FAMS`)
    #[serde(default)]
    pub spouse_in: Vec<String>,

    /// Families this individual is a child in (`FAMC`)
    #[serde(default)]
    pub child_in: Vec<String>,
}

impl Individual {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            sex: Sex::Unknown,
            birth_year: None,
            spouse_in: Vec::new(),
            child_in: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_sex(mut self, sex: impl Into<Sex>) -> Self {
        self.sex = sex.into();
        self
    }

    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }
}

/// Turn a `NAME` value into a display name
///
/// `John /Smith/` becomes `John Smith`. Returns `None` when nothing but
/// delimiters and whitespace remain.
pub fn normalize_name(value: &str) -> Option<String> {
    let name = value
        .split(|c: char| c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Last token of exactly four ASCII digits, read as a year
pub fn extract_year(tokens: &[&str]) -> Option<i32> {
    tokens
        .iter()
        .rev()
        .find(|token| token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|token| token.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_individual_defaults() {
        let person = Individual::new("I1");
        assert_eq!(person.id, "I1");
        assert!(person.name.is_none());
        assert_eq!(person.sex, Sex::Unknown);
        assert!(person.birth_year.is_none());
        assert!(person.spouse_in.is_empty());
    }

    #[test]
    fn test_sex_codes() {
        assert_eq!(Sex::from("M"), Sex::Male);
        assert_eq!(Sex::from("F"), Sex::Female);
        assert_eq!(Sex::from("U"), Sex::Unknown);
        assert_eq!(Sex::from("X"), Sex::Other("X".to_string()));
        assert_eq!(Sex::from("X").code(), "X");
        assert_eq!(Sex::default().code(), "U");
    }

    #[test]
    fn test_sex_serializes_as_code() {
        let json = serde_json::to_string(&Sex::Female).unwrap();
        assert_eq!(json, "\"F\"");
        let sex: Sex = serde_json::from_str("\"M\"").unwrap();
        assert_eq!(sex, Sex::Male);
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("John /Smith/"), Some("John Smith".to_string()));
        assert_eq!(normalize_name("/Smith/"), Some("Smith".to_string()));
        assert_eq!(
            normalize_name("Mary Ann /Jones/ Jr"),
            Some("Mary Ann Jones Jr".to_string())
        );
        assert_eq!(normalize_name(" // "), None);
        assert_eq!(normalize_name(""), None);
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year(&["12", "JUN", "1950"]), Some(1950));
        assert_eq!(extract_year(&["ABT", "1820"]), Some(1820));
        assert_eq!(extract_year(&["BET", "1900", "AND", "1910"]), Some(1910));
        assert_eq!(extract_year(&["1950", "ABT"]), Some(1950));
        assert_eq!(extract_year(&["JUN", "50"]), None);
        assert_eq!(extract_year(&["12345"]), None);
        assert_eq!(extract_year(&[]), None);
    }
}
