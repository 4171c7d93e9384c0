use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

/// Which of the two record stores a row lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreTag {
    Expenses,
    Incomes,
}

impl StoreTag {
    pub fn kind(self) -> TransactionType {
        match self {
            StoreTag::Expenses => TransactionType::Expense,
            StoreTag::Incomes => TransactionType::Income,
        }
    }
}

impl fmt::Display for StoreTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreTag::Expenses => f.write_str("expenses"),
            StoreTag::Incomes => f.write_str("incomes"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn store(self) -> StoreTag {
        match self {
            TransactionType::Income => StoreTag::Incomes,
            TransactionType::Expense => StoreTag::Expenses,
        }
    }
}

/// Row ids are only unique within one store, so a transaction is identified
/// by the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionKey {
    pub origin: StoreTag,
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub owner: String,
    pub name: String,
    /// Positive for incomes, negative for expenses.
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
    pub origin: StoreTag,
}

impl Transaction {
    pub fn key(&self) -> TransactionKey {
        TransactionKey {
            origin: self.origin,
            id: self.id,
        }
    }

    pub fn kind(&self) -> TransactionType {
        self.origin.kind()
    }
}

/// User input for a new transaction. The amount is taken as a magnitude; the
/// sign comes from `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionForm {
    pub description: String,
    pub amount: f64,
    pub kind: TransactionType,
    pub category_id: String,
    pub date: NaiveDate,
}

/// Row to insert, already signed and routed.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPayload {
    pub store: StoreTag,
    pub owner: String,
    pub name: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
}
