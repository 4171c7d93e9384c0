use fractic_server_error::ServerError;

use super::transaction::{StoreTag, Transaction, TransactionKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Syncing,
    Synced,
    SyncFailed,
}

/// Merged transactions of both stores, newest first.
#[derive(Debug, Clone, Default)]
pub struct TransactionFeed {
    transactions: Vec<Transaction>,
    stale: bool,
}

impl TransactionFeed {
    /// Sorts by date, newest first. The sort is stable, so rows with equal
    /// dates keep their input order.
    pub(crate) fn from_unsorted(mut transactions: Vec<Transaction>) -> Self {
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Self {
            transactions,
            stale: false,
        }
    }

    /// Inserts ahead of any existing rows with the same date.
    pub(crate) fn insert(&mut self, tx: Transaction) {
        let at = self.transactions.partition_point(|t| t.date > tx.date);
        self.transactions.insert(at, tx);
    }

    pub(crate) fn remove(&mut self, key: TransactionKey) -> Option<Transaction> {
        let at = self.transactions.iter().position(|t| t.key() == key)?;
        Some(self.transactions.remove(at))
    }

    pub(crate) fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// True when the last sync failed and this feed is left over from an
    /// earlier one.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, key: TransactionKey) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.key() == key)
    }

    /// Case-insensitive match on name or category, in feed order.
    pub fn search(&self, query: &str) -> Vec<&Transaction> {
        let needle = query.trim().to_lowercase();
        self.transactions
            .iter()
            .filter(|t| {
                needle.is_empty()
                    || t.name.to_lowercase().contains(&needle)
                    || t.category.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct StoreFailure {
    pub store: StoreTag,
    pub error: ServerError,
}

#[derive(Debug)]
pub struct SyncReport {
    pub state: SyncState,
    pub rows: usize,
    /// Stores that could not be read. Non-empty on a degraded sync.
    pub failures: Vec<StoreFailure>,
}

impl SyncReport {
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;

    fn tx(id: i64, origin: StoreTag, day: u32, name: &str, category: &str) -> Transaction {
        Transaction {
            id,
            owner: "5581999990000@s.whatsapp.net".to_string(),
            name: name.to_string(),
            amount: 1.0,
            category: category.to_string(),
            date: Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
            created_at: None,
            origin,
        }
    }

    fn feed() -> TransactionFeed {
        TransactionFeed::from_unsorted(vec![
            tx(1, StoreTag::Expenses, 1, "Mercado", "Alimentação"),
            tx(1, StoreTag::Incomes, 5, "Salário", "Salário"),
            tx(2, StoreTag::Expenses, 3, "Uber", "Transporte"),
        ])
    }

    #[test]
    fn new_rows_go_ahead_of_equal_dates() {
        let mut feed = feed();
        feed.insert(tx(9, StoreTag::Expenses, 3, "Ônibus", "Transporte"));
        let ids: Vec<_> = feed.iter().map(|t| (t.origin, t.id)).collect();
        assert_eq!(
            ids,
            vec![
                (StoreTag::Incomes, 1),
                (StoreTag::Expenses, 9),
                (StoreTag::Expenses, 2),
                (StoreTag::Expenses, 1),
            ]
        );
    }

    #[test]
    fn remove_matches_origin_and_id() {
        let mut feed = feed();
        let removed = feed.remove(TransactionKey {
            origin: StoreTag::Incomes,
            id: 1,
        });
        assert_eq!(removed.map(|t| t.name), Some("Salário".to_string()));
        assert!(feed
            .get(TransactionKey {
                origin: StoreTag::Expenses,
                id: 1,
            })
            .is_some());
        assert_eq!(feed.len(), 2);
    }

    #[test]
    fn search_matches_name_or_category_ignoring_case() {
        let feed = feed();
        let names = |q: &str| feed.search(q).iter().map(|t| t.name.clone()).collect::<Vec<_>>();
        assert_eq!(names("MERC"), vec!["Mercado"]);
        assert_eq!(names("transp"), vec!["Uber"]);
        assert_eq!(names("  ").len(), 3);
        assert!(names("cinema").is_empty());
    }
}
