//! Attribute types and comparison keys
//!
//! Measures are selected by the pair of attribute types being compared.
//! A [`Comparison`] is that pair with the order removed: numerical vs
//! categorical and categorical vs numerical are the same key. Comparisons are
//! interned in a [`ComparisonTable`] so that equal keys share one instance.

use crate::error::{Error, Result};
use ahash::AHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

/// Semantic type of an attribute (column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AttrType {
    Categorical,
    Numerical,
}

impl AttrType {
    pub const ALL: [AttrType; 2] = [AttrType::Categorical, AttrType::Numerical];

    /// Resolve a type from its name
    pub fn get(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "numerical" | "number" | "numeric" => Ok(AttrType::Numerical),
            "categorical" | "category" => Ok(AttrType::Categorical),
            _ => Err(Error::UnknownType(name.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttrType::Categorical => "categorical",
            AttrType::Numerical => "numerical",
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttrType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AttrType::get(s)
    }
}

impl TryFrom<String> for AttrType {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        AttrType::get(&s)
    }
}

impl From<AttrType> for String {
    fn from(t: AttrType) -> Self {
        t.as_str().to_string()
    }
}

/// What is being compared: two whole attributes, or two row groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Attributes,
    Sets,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Attributes => f.write_str("attributes"),
            Scope::Sets => f.write_str("sets"),
        }
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attributes" | "attribute" => Ok(Scope::Attributes),
            "sets" | "set" => Ok(Scope::Sets),
            other => Err(Error::InvalidArgument(format!("unknown scope '{}'", other))),
        }
    }
}

/// Canonical (sorted) type pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComparisonKey {
    first: AttrType,
    second: AttrType,
}

impl ComparisonKey {
    /// Orders the two types by their canonical name
    pub fn new(a: AttrType, b: AttrType) -> Self {
        if a.as_str() <= b.as_str() {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn types(&self) -> (AttrType, AttrType) {
        (self.first, self.second)
    }
}

/// Unordered pair of attribute types, interned
#[derive(Clone)]
pub struct Comparison {
    key: Arc<ComparisonKey>,
}

impl Comparison {
    /// Interned comparison from the process-wide table
    pub fn get(a: AttrType, b: AttrType) -> Comparison {
        ComparisonTable::global().get(a, b)
    }

    pub fn key(&self) -> ComparisonKey {
        *self.key
    }

    pub fn types(&self) -> (AttrType, AttrType) {
        self.key.types()
    }

    /// Order-tolerant equality, also valid for instances built by
    /// different tables.
    pub fn equals(&self, other: &Comparison) -> bool {
        Arc::ptr_eq(&self.key, &other.key) || *self.key == *other.key
    }

    /// Whether this comparison covers the given pair, in either order
    pub fn compares(&self, a: AttrType, b: AttrType) -> bool {
        *self.key == ComparisonKey::new(a, b)
    }

    pub fn same_instance(&self, other: &Comparison) -> bool {
        Arc::ptr_eq(&self.key, &other.key)
    }
}

impl PartialEq for Comparison {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Comparison {}

impl Hash for Comparison {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Comparison({})", self)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.key.first, self.key.second)
    }
}

impl Serialize for Comparison {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Interning cache for comparisons
///
/// Append-only; concurrent first requests for the same pair may both build an
/// instance but only the first one stored is ever handed out.
#[derive(Default)]
pub struct ComparisonTable {
    entries: RwLock<AHashMap<ComparisonKey, Comparison>>,
}

static GLOBAL_TABLE: OnceLock<Arc<ComparisonTable>> = OnceLock::new();

impl ComparisonTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide table
    pub fn global() -> &'static Arc<ComparisonTable> {
        GLOBAL_TABLE.get_or_init(|| Arc::new(ComparisonTable::new()))
    }

    pub fn get(&self, a: AttrType, b: AttrType) -> Comparison {
        let key = ComparisonKey::new(a, b);
        if let Some(existing) = self.entries.read().get(&key) {
            return existing.clone();
        }

        let mut entries = self.entries.write();
        entries
            .entry(key)
            .or_insert_with(|| Comparison { key: Arc::new(key) })
            .clone()
    }

    /// Resolve both types by name, then intern
    pub fn get_by_name(&self, a: &str, b: &str) -> Result<Comparison> {
        Ok(self.get(AttrType::get(a)?, AttrType::get(b)?))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
