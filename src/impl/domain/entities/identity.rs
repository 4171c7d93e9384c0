use std::{collections::HashSet, fmt};

use serde_derive::Deserialize;

/// Shape of the messaging address owning every stored record:
/// `<country_code><digits>@<domain_suffix>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IdentityFormat {
    pub country_code: String,
    pub domain_suffix: String,
}

impl Default for IdentityFormat {
    fn default() -> Self {
        Self {
            country_code: "55".to_string(),
            domain_suffix: "s.whatsapp.net".to_string(),
        }
    }
}

/// Canonical messaging address of a user. Only produced by
/// `IdentityNormalizer`, so the shape is always valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalAddress(pub(crate) String);

impl CanonicalAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every textual form an owner key may have been stored under. Used for
/// read-side matching only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchKeySet {
    keys: Vec<String>,
}

impl MatchKeySet {
    /// Keeps the first occurrence of each key, and drops empty ones.
    pub fn from_candidates<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let keys = candidates
            .into_iter()
            .filter(|k| !k.is_empty())
            .filter(|k| seen.insert(k.clone()))
            .collect();
        Self { keys }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub canonical: CanonicalAddress,
    pub match_keys: MatchKeySet,
}
