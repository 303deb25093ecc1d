//! Card conventions and the keywords that carry them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which embedding convention a card uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardVersion {
    /// Legacy flat card under the `chara` keyword.
    V2,
    /// V3 card under the `ccv3` keyword.
    V3,
}

impl CardVersion {
    /// The `tEXt` keyword this convention is stored under.
    pub const fn keyword(self) -> &'static str {
        match self {
            CardVersion::V2 => "chara",
            CardVersion::V3 => "ccv3",
        }
    }

    /// Look up the convention for a `tEXt` keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "chara" => Some(CardVersion::V2),
            "ccv3" => Some(CardVersion::V3),
            _ => None,
        }
    }
}

impl fmt::Display for CardVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardVersion::V2 => f.write_str("v2"),
            CardVersion::V3 => f.write_str("v3"),
        }
    }
}

impl FromStr for CardVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v2" | "2" | "chara" => Ok(CardVersion::V2),
            "v3" | "3" | "ccv3" => Ok(CardVersion::V3),
            other => Err(format!("unknown card version: {}", other)),
        }
    }
}

/// A decoded card together with the convention it was found under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub version: CardVersion,
    pub document: Value,
}
