//! Semantic field names

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A logical column a query needs, independent of how the live table spells it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SemanticField {
    /// State / union territory name
    State,
    /// Calendar year
    Year,
    /// Quarter of the year (1-4)
    Quarter,
    /// Payment category (transaction type)
    Category,
    /// Device brand
    Brand,
    /// Transaction, insurance policy or device count
    Count,
    /// Transaction or premium amount
    Amount,
    /// Registered users
    RegisteredUsers,
    /// App opens
    AppOpens,
}

impl SemanticField {
    /// All fields, in declaration order
    pub const ALL: [SemanticField; 9] = [
        SemanticField::State,
        SemanticField::Year,
        SemanticField::Quarter,
        SemanticField::Category,
        SemanticField::Brand,
        SemanticField::Count,
        SemanticField::Amount,
        SemanticField::RegisteredUsers,
        SemanticField::AppOpens,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticField::State => "state",
            SemanticField::Year => "year",
            SemanticField::Quarter => "quarter",
            SemanticField::Category => "category",
            SemanticField::Brand => "brand",
            SemanticField::Count => "count",
            SemanticField::Amount => "amount",
            SemanticField::RegisteredUsers => "registered_users",
            SemanticField::AppOpens => "app_opens",
        }
    }
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing a semantic field name
#[derive(Debug, Clone)]
pub struct ParseFieldError {
    pub input: String,
}

impl fmt::Display for ParseFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valid: Vec<&str> = SemanticField::ALL.iter().map(|s| s.as_str()).collect();
        write!(f, "Unknown semantic field '{}'. Valid options: {}", self.input, valid.join(", "))
    }
}

impl std::error::Error for ParseFieldError {}

impl FromStr for SemanticField {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "state" => Ok(SemanticField::State),
            "year" => Ok(SemanticField::Year),
            "quarter" => Ok(SemanticField::Quarter),
            "category" | "transaction_type" => Ok(SemanticField::Category),
            "brand" => Ok(SemanticField::Brand),
            "count" => Ok(SemanticField::Count),
            "amount" => Ok(SemanticField::Amount),
            "registered_users" | "users" => Ok(SemanticField::RegisteredUsers),
            "app_opens" => Ok(SemanticField::AppOpens),
            _ => Err(ParseFieldError { input: s.to_string() }),
        }
    }
}

impl<'de> Deserialize<'de> for SemanticField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SemanticField::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Serialize for SemanticField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
