use fractic_server_error::ServerError;
use serde_derive::Deserialize;

use crate::{
    entities::{IdentityFormat, StoreTag},
    errors::{InvalidConfig, MissingConfig},
};

/// Connection settings for the hosted backend.
///
/// Can be read from a RON document:
///
/// ```ron
/// (
///     url: "https://project.supabase.co",
///     anon_key: "...",
///     identity: (country_code: "55"),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    #[serde(default = "default_expense_table")]
    pub expense_table: String,
    #[serde(default = "default_income_table")]
    pub income_table: String,
    /// Column holding the owner's messaging address in both tables.
    #[serde(default = "default_owner_column")]
    pub owner_column: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub identity: IdentityFormat,
}

fn default_expense_table() -> String {
    "gastos".to_string()
}

fn default_income_table() -> String {
    "receitas".to_string()
}

fn default_owner_column() -> String {
    "user_number".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            expense_table: default_expense_table(),
            income_table: default_income_table(),
            owner_column: default_owner_column(),
            request_timeout_secs: default_request_timeout_secs(),
            identity: IdentityFormat::default(),
        }
    }

    pub fn from_ron(s: &str) -> Result<Self, ServerError> {
        let config: Self = ron::from_str(s).map_err(|e| InvalidConfig::with_debug(&e))?;
        config.validated()
    }

    /// Reads `FINANCE_BACKEND_URL` and `FINANCE_BACKEND_ANON_KEY`, plus the
    /// optional `FINANCE_EXPENSE_TABLE`, `FINANCE_INCOME_TABLE`,
    /// `FINANCE_COUNTRY_CODE` and `FINANCE_DOMAIN_SUFFIX` overrides.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| MissingConfig::new(key))
        };
        let mut config = Self::new(
            required("FINANCE_BACKEND_URL")?,
            required("FINANCE_BACKEND_ANON_KEY")?,
        );
        if let Some(table) = lookup("FINANCE_EXPENSE_TABLE") {
            config.expense_table = table;
        }
        if let Some(table) = lookup("FINANCE_INCOME_TABLE") {
            config.income_table = table;
        }
        if let Some(code) = lookup("FINANCE_COUNTRY_CODE") {
            config.identity.country_code = code;
        }
        if let Some(suffix) = lookup("FINANCE_DOMAIN_SUFFIX") {
            config.identity.domain_suffix = suffix;
        }
        config.validated()
    }

    pub fn table(&self, store: StoreTag) -> &str {
        match store {
            StoreTag::Expenses => &self.expense_table,
            StoreTag::Incomes => &self.income_table,
        }
    }

    fn validated(self) -> Result<Self, ServerError> {
        if self.url.trim().is_empty() {
            return Err(MissingConfig::new("url"));
        }
        if self.anon_key.trim().is_empty() {
            return Err(MissingConfig::new("anon_key"));
        }
        let country_code_is_digits = !self.identity.country_code.is_empty()
            && self.identity.country_code.chars().all(|c| c.is_ascii_digit());
        if !country_code_is_digits {
            return Err(InvalidConfig::with_debug(&self.identity));
        }
        if self.identity.domain_suffix.is_empty() || self.identity.domain_suffix.contains('@') {
            return Err(InvalidConfig::with_debug(&self.identity));
        }
        Ok(self)
    }
}
