//! Value objects for knowledge-base statements: property ids, snaks and statements.

use crate::error::{DataModelError, Result};
use crate::grouper::PropertyIdProvider;
use crate::rank::{Rank, RankProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a property, held in its canonical serialization (`P31`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyId(String);

impl PropertyId {
    /// Parse a property id. The prefix is case-insensitive; the stored form is uppercase.
    pub fn new(serialization: &str) -> Result<Self> {
        let invalid =
            || DataModelError::InvalidArgument(format!("invalid property id {serialization:?}"));
        let digits = serialization
            .strip_prefix('P')
            .or_else(|| serialization.strip_prefix('p'))
            .ok_or_else(invalid)?;
        if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        Ok(Self(format!("P{digits}")))
    }

    /// Build from a numeric id (`31` → `P31`).
    pub fn from_number(number: u64) -> Result<Self> {
        if number == 0 {
            return Err(DataModelError::InvalidArgument(
                "property numbers start at 1".to_string(),
            ));
        }
        Ok(Self(format!("P{number}")))
    }

    pub fn serialization(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PropertyId {
    type Err = DataModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for PropertyId {
    type Error = DataModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<PropertyId> for String {
    fn from(id: PropertyId) -> Self {
        id.0
    }
}

/// A property paired with a value, an unknown value, or the assertion of no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "snaktype", rename_all = "lowercase")]
pub enum Snak {
    Value {
        property: PropertyId,
        datavalue: serde_json::Value,
    },
    SomeValue {
        property: PropertyId,
    },
    NoValue {
        property: PropertyId,
    },
}

impl Snak {
    pub fn value(property: PropertyId, datavalue: serde_json::Value) -> Self {
        Snak::Value {
            property,
            datavalue,
        }
    }

    pub fn some_value(property: PropertyId) -> Self {
        Snak::SomeValue { property }
    }

    pub fn no_value(property: PropertyId) -> Self {
        Snak::NoValue { property }
    }

    pub fn property(&self) -> &PropertyId {
        match self {
            Snak::Value { property, .. }
            | Snak::SomeValue { property }
            | Snak::NoValue { property } => property,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Snak::Value { .. } => "value",
            Snak::SomeValue { .. } => "somevalue",
            Snak::NoValue { .. } => "novalue",
        }
    }
}

impl PropertyIdProvider for Snak {
    fn property_id(&self) -> &PropertyId {
        self.property()
    }
}

/// A ranked main snak with optional qualifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Statement GUID, absent until the statement has been saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub mainsnak: Snak,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<Snak>,
    #[serde(default)]
    pub rank: Rank,
}

impl Statement {
    pub fn new(mainsnak: Snak) -> Self {
        Self {
            id: None,
            mainsnak,
            qualifiers: Vec::new(),
            rank: Rank::Normal,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_qualifier(mut self, qualifier: Snak) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    pub fn set_rank(&mut self, rank: Rank) {
        self.rank = rank;
    }

    /// Set the rank from its ordinal. The rank is unchanged if the ordinal is rejected.
    pub fn set_rank_ordinal(&mut self, ordinal: i64) -> Result<()> {
        self.rank = Rank::from_ordinal(ordinal)?;
        Ok(())
    }

    /// Id if present, otherwise a short rendering of the main snak. Used for display.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{}:{}", self.mainsnak.property(), self.mainsnak.kind()),
        }
    }
}

impl PropertyIdProvider for Statement {
    fn property_id(&self) -> &PropertyId {
        self.mainsnak.property()
    }
}

impl RankProvider for Statement {
    fn rank(&self) -> Rank {
        self.rank
    }
}
