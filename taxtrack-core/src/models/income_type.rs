use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of an income entry.
///
/// Used for display and grouping only; the tax estimate does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IncomeType {
    #[serde(rename = "W2")]
    W2,
    #[serde(rename = "1099")]
    Form1099,
    #[serde(rename = "Other")]
    Other,
}

impl IncomeType {
    pub const ALL: [IncomeType; 3] = [Self::W2, Self::Form1099, Self::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::W2 => "W2",
            Self::Form1099 => "1099",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "W2" => Some(Self::W2),
            "1099" => Some(Self::Form1099),
            "Other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for IncomeType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
