use async_trait::async_trait;
use fractic_server_error::ServerError;
use tokio::sync::watch;

use crate::{
    data::repositories::transactions_repository_impl::TransactionsRepositoryImpl,
    domain::{
        logic::record_mapper::RecordMapper,
        repositories::transactions_repository::TransactionsRepository,
    },
    entities::{
        ResolvedIdentity, StoreFailure, StoreTag, SyncReport, SyncState, Transaction,
        TransactionFeed, TransactionForm,
    },
    errors::{IdentityNotConfigured, StoreQueryFailed, StoreWriteFailed},
};

/// Owns the published transaction feed and routes reads and writes to the
/// expense and income stores.
///
/// Mutating methods take `&mut self`, so a single engine never runs two syncs
/// at once. Callers switching identity should await the running sync before
/// starting the next one.
#[async_trait]
pub trait ReconciliationUsecase: Send {
    /// Sets the identity and rebuilds the feed from both stores.
    async fn sync(&mut self, identity: ResolvedIdentity) -> Result<SyncReport, ServerError>;

    /// Rebuilds the feed for the identity of the last sync.
    async fn refresh(&mut self) -> Result<SyncReport, ServerError>;

    async fn add(&mut self, form: &TransactionForm) -> Result<Transaction, ServerError>;

    async fn remove(&mut self, transaction: &Transaction) -> Result<(), ServerError>;

    /// Drops identity and feed (e.g. on sign-out).
    fn reset(&mut self);

    fn state(&self) -> SyncState;

    /// Follows every state change, `Syncing` included.
    fn watch_state(&self) -> watch::Receiver<SyncState>;

    fn feed(&self) -> &TransactionFeed;

    fn identity(&self) -> Option<&ResolvedIdentity>;
}

pub struct ReconciliationUsecaseImpl<
    R = TransactionsRepositoryImpl, // Default.
> where
    R: TransactionsRepository,
{
    transactions_repository: R,
    identity: Option<ResolvedIdentity>,
    state: watch::Sender<SyncState>,
    feed: TransactionFeed,
}

#[async_trait]
impl<R> ReconciliationUsecase for ReconciliationUsecaseImpl<R>
where
    R: TransactionsRepository,
{
    async fn sync(&mut self, identity: ResolvedIdentity) -> Result<SyncReport, ServerError> {
        self.identity = Some(identity);
        self.rebuild_feed().await
    }

    async fn refresh(&mut self) -> Result<SyncReport, ServerError> {
        self.rebuild_feed().await
    }

    async fn add(&mut self, form: &TransactionForm) -> Result<Transaction, ServerError> {
        let owner = match &self.identity {
            Some(identity) => identity.canonical.clone(),
            None => return Err(IdentityNotConfigured::new()),
        };
        let payload = RecordMapper::to_payload(form, &owner);
        let stored = self
            .transactions_repository
            .insert(&payload)
            .await
            .map_err(|e| StoreWriteFailed::with_debug(&payload.store.to_string(), &e))?;

        // Only touch the feed once the store confirmed the write.
        let transaction = RecordMapper::to_transaction(stored);
        log::info!(
            "added {} row {} ({})",
            transaction.origin,
            transaction.id,
            transaction.amount
        );
        self.feed.insert(transaction.clone());
        Ok(transaction)
    }

    async fn remove(&mut self, transaction: &Transaction) -> Result<(), ServerError> {
        let store = transaction.origin;
        self.transactions_repository
            .delete(store, transaction.id)
            .await
            .map_err(|e| StoreWriteFailed::with_debug(&store.to_string(), &e))?;
        if self.feed.remove(transaction.key()).is_none() {
            log::debug!("removed {store} row {} was not in the feed", transaction.id);
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.identity = None;
        self.feed = TransactionFeed::default();
        self.state.send_replace(SyncState::Idle);
    }

    fn state(&self) -> SyncState {
        *self.state.borrow()
    }

    fn watch_state(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    fn feed(&self) -> &TransactionFeed {
        &self.feed
    }

    fn identity(&self) -> Option<&ResolvedIdentity> {
        self.identity.as_ref()
    }
}

impl<R> ReconciliationUsecaseImpl<R>
where
    R: TransactionsRepository,
{
    pub fn with_repository(transactions_repository: R) -> Self {
        Self {
            transactions_repository,
            identity: None,
            state: watch::channel(SyncState::Idle).0,
            feed: TransactionFeed::default(),
        }
    }

    async fn rebuild_feed(&mut self) -> Result<SyncReport, ServerError> {
        let keys = match &self.identity {
            Some(identity) => identity.match_keys.clone(),
            None => return Err(IdentityNotConfigured::new()),
        };
        let in_flight = SyncInFlight::begin(&self.state);
        log::debug!("querying both stores with {} owner keys", keys.len());

        // Both queries run to completion; one failing does not cancel the
        // other.
        let (expenses, incomes) = futures::join!(
            self.transactions_repository.fetch(StoreTag::Expenses, &keys),
            self.transactions_repository.fetch(StoreTag::Incomes, &keys),
        );

        let mut merged = Vec::new();
        let mut failures = Vec::new();
        for (store, result) in [(StoreTag::Expenses, expenses), (StoreTag::Incomes, incomes)] {
            match result {
                Ok(records) => {
                    log::debug!("{store} store returned {} rows", records.len());
                    merged.extend(records.into_iter().map(RecordMapper::to_transaction));
                }
                Err(error) => {
                    log::warn!("{store} store query failed: {error:?}");
                    failures.push(StoreFailure { store, error });
                }
            }
        }

        if failures.len() == 2 {
            log::error!("both stores failed; keeping the previous feed");
            self.feed.mark_stale();
            in_flight.settle(SyncState::SyncFailed);
            return Err(StoreQueryFailed::with_debug(&failures));
        }

        self.feed = TransactionFeed::from_unsorted(merged);
        in_flight.settle(SyncState::Synced);
        log::info!(
            "feed synced: {} transactions ({} store failures)",
            self.feed.len(),
            failures.len()
        );
        Ok(SyncReport {
            state: SyncState::Synced,
            rows: self.feed.len(),
            failures,
        })
    }
}

/// Marks the engine `Syncing` for the lifetime of one sync. If the sync is
/// dropped before it settles, the previous state is put back.
struct SyncInFlight<'a> {
    state: &'a watch::Sender<SyncState>,
    previous: SyncState,
    settled: bool,
}

impl<'a> SyncInFlight<'a> {
    fn begin(state: &'a watch::Sender<SyncState>) -> Self {
        let previous = state.send_replace(SyncState::Syncing);
        Self {
            state,
            previous,
            settled: false,
        }
    }

    fn settle(mut self, next: SyncState) {
        self.state.send_replace(next);
        self.settled = true;
    }
}

impl Drop for SyncInFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            log::warn!("sync interrupted; restoring {:?}", self.previous);
            self.state.send_replace(self.previous);
        }
    }
}
