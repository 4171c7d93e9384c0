use std::sync::Arc;

use fractic_server_error::ServerError;
use tokio::sync::{broadcast, watch};

use crate::{
    config::BackendConfig,
    data::{
        datasources::backend_client::BackendClient,
        repositories::{
            auth_repository_impl::AuthRepositoryImpl,
            transactions_repository_impl::TransactionsRepositoryImpl,
        },
    },
    domain::{
        logic::aggregation::{breakdown_by_category, summarize},
        usecases::{
            reconciliation_usecase::{ReconciliationUsecase, ReconciliationUsecaseImpl},
            session_usecase::{SessionUsecase, SessionUsecaseImpl},
        },
    },
    entities::{
        default_categories, Category, CategoryBreakdown, ProfileUpdate, ResolvedIdentity,
        Session, SessionEvent, SignUpOutcome, SignUpRequest, Summary, SyncReport, SyncState,
        Transaction, TransactionFeed, TransactionForm, TransactionType,
    },
};

/// Entry point for a dashboard: keeps the transaction feed in step with the
/// signed-in user and exposes the derived views.
pub struct FinanceFeedUtil<
    S = SessionUsecaseImpl,        // Default.
    R = ReconciliationUsecaseImpl, // Default.
> where
    S: SessionUsecase,
    R: ReconciliationUsecase,
{
    session_usecase: S,
    reconciliation_usecase: R,
    categories: Vec<Category>,
    session_sync_error: Option<ServerError>,
}

impl FinanceFeedUtil {
    pub fn new(config: BackendConfig) -> Result<Self, ServerError> {
        let identity_format = config.identity.clone();
        let client = Arc::new(BackendClient::new(config)?);
        Ok(Self::with_usecases(
            SessionUsecaseImpl::with_repository(
                AuthRepositoryImpl::new(client.clone()),
                identity_format,
            ),
            ReconciliationUsecaseImpl::with_repository(TransactionsRepositoryImpl::new(client)),
        ))
    }

    pub fn from_env() -> Result<Self, ServerError> {
        Self::new(BackendConfig::from_env()?)
    }
}

impl<S, R> FinanceFeedUtil<S, R>
where
    S: SessionUsecase,
    R: ReconciliationUsecase,
{
    pub fn with_usecases(session_usecase: S, reconciliation_usecase: R) -> Self {
        Self {
            session_usecase,
            reconciliation_usecase,
            categories: default_categories(),
            session_sync_error: None,
        }
    }

    /// Brings the feed in line with a session change. Returns the sync report
    /// if the stores were queried.
    ///
    /// Every sign-in and profile update queries both stores again. A user
    /// without a usable phone number gets an empty feed.
    pub async fn on_session_event(
        &mut self,
        event: &SessionEvent,
    ) -> Result<Option<SyncReport>, ServerError> {
        let profile = match event {
            SessionEvent::SignedIn(session) | SessionEvent::UserUpdated(session) => &session.user,
            SessionEvent::SignedOut => {
                log::info!("signed out; clearing feed");
                self.reconciliation_usecase.reset();
                return Ok(None);
            }
        };
        let identity = match self.session_usecase.resolve_identity(profile) {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                log::info!("user {} has no phone number; feed stays empty", profile.id);
                self.reconciliation_usecase.reset();
                return Ok(None);
            }
            Err(e) => {
                self.reconciliation_usecase.reset();
                return Err(e);
            }
        };
        self.reconciliation_usecase.sync(identity).await.map(Some)
    }

    /// Resumes the session held by the auth layer, if any, and syncs.
    pub async fn start(&mut self) -> Result<Option<SyncReport>, ServerError> {
        match self.session_usecase.current_session().await {
            Some(session) => self.on_session_event(&SessionEvent::SignedIn(session)).await,
            None => Ok(None),
        }
    }

    pub async fn resume(&mut self, access_token: &str) -> Result<Session, ServerError> {
        let session = self.session_usecase.resume(access_token).await?;
        self.follow(SessionEvent::SignedIn(session.clone())).await;
        Ok(session)
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, ServerError> {
        let session = self.session_usecase.sign_in(email, password).await?;
        self.follow(SessionEvent::SignedIn(session.clone())).await;
        Ok(session)
    }

    pub async fn sign_up(&mut self, request: SignUpRequest) -> Result<SignUpOutcome, ServerError> {
        let outcome = self.session_usecase.sign_up(request).await?;
        if let SignUpOutcome::SignedIn(session) = &outcome {
            self.follow(SessionEvent::SignedIn(session.clone())).await;
        }
        Ok(outcome)
    }

    pub async fn update_profile(&mut self, update: ProfileUpdate) -> Result<Session, ServerError> {
        let session = self.session_usecase.update_profile(update).await?;
        self.follow(SessionEvent::UserUpdated(session.clone())).await;
        Ok(session)
    }

    pub async fn sign_out(&mut self) -> Result<(), ServerError> {
        self.session_usecase.sign_out().await?;
        self.follow(SessionEvent::SignedOut).await;
        Ok(())
    }

    pub async fn refresh(&mut self) -> Result<SyncReport, ServerError> {
        self.reconciliation_usecase.refresh().await
    }

    /// Validates the form against the category catalog, then writes it to
    /// the store matching its type.
    pub async fn add_transaction(
        &mut self,
        form: &TransactionForm,
    ) -> Result<Transaction, ServerError> {
        form.validate(&self.categories)?;
        self.reconciliation_usecase.add(form).await
    }

    pub async fn remove_transaction(&mut self, transaction: &Transaction) -> Result<(), ServerError> {
        self.reconciliation_usecase.remove(transaction).await
    }

    pub fn feed(&self) -> &TransactionFeed {
        self.reconciliation_usecase.feed()
    }

    pub fn sync_state(&self) -> SyncState {
        self.reconciliation_usecase.state()
    }

    pub fn watch_sync_state(&self) -> watch::Receiver<SyncState> {
        self.reconciliation_usecase.watch_state()
    }

    /// Why the feed could not follow the last sign-in, sign-up, resume or
    /// profile update (e.g. `InvalidIdentity` for a malformed profile phone).
    /// `None` once a later session change syncs cleanly.
    pub fn session_sync_error(&self) -> Option<&ServerError> {
        self.session_sync_error.as_ref()
    }

    pub fn identity(&self) -> Option<&ResolvedIdentity> {
        self.reconciliation_usecase.identity()
    }

    pub fn summary(&self) -> Summary {
        summarize(self.feed().iter())
    }

    pub fn category_breakdown(&self) -> CategoryBreakdown {
        breakdown_by_category(self.feed().iter())
    }

    pub fn search(&self, query: &str) -> Vec<&Transaction> {
        self.feed().search(query)
    }

    /// Category catalog, optionally restricted to one transaction type.
    pub fn categories(&self, kind: Option<TransactionType>) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|c| kind.map_or(true, |k| c.kind == k))
            .collect()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.session_usecase.subscribe()
    }

    /// Auth already succeeded at this point, so a failed sync is kept in
    /// `session_sync_error` instead of failing the auth call.
    async fn follow(&mut self, event: SessionEvent) {
        self.session_sync_error = match self.on_session_event(&event).await {
            Ok(_) => None,
            Err(e) => {
                log::error!("feed sync after session change failed: {e:?}");
                Some(e)
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        domain::{
            repositories::transactions_repository::TransactionsRepository,
            usecases::session_usecase::resolve_profile_identity,
        },
        entities::{
            ExpenseRecord, IdentityFormat, IncomeRecord, MatchKeySet, RawAmount, RawRecord,
            RawRecordFields, RecordPayload, StoreTag, UserProfile,
        },
        errors::{BackendRequestFailed, NotSignedIn},
    };

    struct FakeSessionUsecase {
        format: IdentityFormat,
        events: broadcast::Sender<SessionEvent>,
        profile_phone: Mutex<String>,
    }

    impl FakeSessionUsecase {
        fn stored_session(&self) -> Session {
            let phone = self.profile_phone.lock().unwrap().clone();
            session(Some(phone.as_str()))
        }
    }

    #[async_trait]
    impl SessionUsecase for FakeSessionUsecase {
        fn resolve_identity(
            &self,
            profile: &UserProfile,
        ) -> Result<Option<ResolvedIdentity>, ServerError> {
            resolve_profile_identity(&self.format, profile)
        }

        async fn current_session(&self) -> Option<Session> {
            Some(self.stored_session())
        }

        async fn sign_in(&self, _email: &str, _password: &str) -> Result<Session, ServerError> {
            Ok(self.stored_session())
        }

        async fn sign_up(&self, _request: SignUpRequest) -> Result<SignUpOutcome, ServerError> {
            Err(NotSignedIn::new())
        }

        async fn resume(&self, _access_token: &str) -> Result<Session, ServerError> {
            Err(NotSignedIn::new())
        }

        async fn update_profile(&self, update: ProfileUpdate) -> Result<Session, ServerError> {
            Ok(session(update.phone_number.as_deref()))
        }

        async fn sign_out(&self) -> Result<(), ServerError> {
            Ok(())
        }

        fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
            self.events.subscribe()
        }
    }

    fn session(phone: Option<&str>) -> Session {
        Session {
            access_token: "jwt".to_string(),
            refresh_token: None,
            user: UserProfile {
                id: "u-1".to_string(),
                email: None,
                full_name: None,
                phone_number: phone.map(str::to_string),
            },
        }
    }

    /// Expense and income stores holding rows under the legacy owner format.
    #[derive(Default)]
    struct MemoryStores {
        fetches: Mutex<usize>,
        inserted: Mutex<Vec<RecordPayload>>,
        expenses_down: Mutex<bool>,
    }

    fn fields(id: i64, owner: &str, name: &str, amount: RawAmount) -> RawRecordFields {
        RawRecordFields {
            id,
            owner: Some(owner.to_string()),
            name: Some(name.to_string()),
            description: None,
            amount,
            category: Some("Outros".to_string()),
            created_at: None,
        }
    }

    #[async_trait]
    impl TransactionsRepository for Arc<MemoryStores> {
        async fn fetch(
            &self,
            store: StoreTag,
            keys: &MatchKeySet,
        ) -> Result<Vec<RawRecord>, ServerError> {
            *self.fetches.lock().unwrap() += 1;
            if store == StoreTag::Expenses && *self.expenses_down.lock().unwrap() {
                return Err(BackendRequestFailed::new("gastos"));
            }
            if !keys.contains("81999990000") {
                return Ok(Vec::new());
            }
            Ok(match store {
                StoreTag::Expenses => vec![RawRecord::Expense(ExpenseRecord {
                    fields: fields(1, "81999990000", "Mercado", RawAmount::Text("40,00".into())),
                    spent_on: Some("2024-05-02".to_string()),
                })],
                StoreTag::Incomes => vec![RawRecord::Income(IncomeRecord {
                    fields: fields(1, "81999990000", "Salário", RawAmount::Number(100.0)),
                    earned_on: Some("2024-05-01".to_string()),
                })],
            })
        }

        async fn insert(&self, payload: &RecordPayload) -> Result<RawRecord, ServerError> {
            self.inserted.lock().unwrap().push(payload.clone());
            Ok(RawRecord::Expense(ExpenseRecord {
                fields: fields(
                    2,
                    &payload.owner,
                    &payload.name,
                    RawAmount::Number(payload.amount),
                ),
                spent_on: Some(payload.date.to_string()),
            }))
        }

        async fn delete(&self, _store: StoreTag, _id: i64) -> Result<(), ServerError> {
            Ok(())
        }
    }

    fn util(
        stores: Arc<MemoryStores>,
    ) -> FinanceFeedUtil<FakeSessionUsecase, ReconciliationUsecaseImpl<Arc<MemoryStores>>> {
        FinanceFeedUtil::with_usecases(
            FakeSessionUsecase {
                format: IdentityFormat::default(),
                events: broadcast::channel(4).0,
                profile_phone: Mutex::new("81999990000".to_string()),
            },
            ReconciliationUsecaseImpl::with_repository(stores),
        )
    }

    #[tokio::test]
    async fn sign_in_syncs_feed_and_derives_summary() {
        let mut util = util(Arc::new(MemoryStores::default()));

        util.sign_in("ana@example.com", "secret").await.unwrap();

        assert_eq!(util.sync_state(), SyncState::Synced);
        assert_eq!(util.feed().len(), 2);
        assert_eq!(util.feed().as_slice()[0].name, "Mercado");
        assert_eq!(
            util.summary(),
            Summary {
                income_total: 100.0,
                expense_total: 40.0,
                net_balance: 60.0,
            }
        );
        assert_eq!(util.category_breakdown().get("Outros"), Some(&40.0));
        assert_eq!(util.search("salá").len(), 1);
    }

    #[tokio::test]
    async fn sign_in_rereads_a_store_that_failed_before() {
        let stores = Arc::new(MemoryStores::default());
        *stores.expenses_down.lock().unwrap() = true;
        let mut util = util(stores.clone());

        let report = util.start().await.unwrap().unwrap();
        assert!(report.is_degraded());
        assert_eq!(util.sync_state(), SyncState::Synced);
        assert_eq!(util.feed().len(), 1);

        *stores.expenses_down.lock().unwrap() = false;
        util.sign_in("ana@example.com", "secret").await.unwrap();

        assert_eq!(*stores.fetches.lock().unwrap(), 4);
        assert_eq!(util.feed().len(), 2);
        assert_eq!(util.feed().as_slice()[0].name, "Mercado");
    }

    #[tokio::test]
    async fn invalid_profile_phone_on_sign_in_is_reported() {
        let mut util = util(Arc::new(MemoryStores::default()));
        *util.session_usecase.profile_phone.lock().unwrap() = "1234".to_string();

        util.sign_in("ana@example.com", "secret").await.unwrap();

        assert!(util.session_sync_error().is_some());
        assert!(util.feed().is_empty());
        assert_eq!(util.identity(), None);

        *util.session_usecase.profile_phone.lock().unwrap() = "81999990000".to_string();
        util.sign_in("ana@example.com", "secret").await.unwrap();

        assert!(util.session_sync_error().is_none());
        assert_eq!(util.feed().len(), 2);
    }

    #[tokio::test]
    async fn sync_state_receiver_follows_the_facade() {
        let mut util = util(Arc::new(MemoryStores::default()));
        let states = util.watch_sync_state();
        assert_eq!(*states.borrow(), SyncState::Idle);

        util.start().await.unwrap();
        assert_eq!(*states.borrow(), SyncState::Synced);

        util.sign_out().await.unwrap();
        assert_eq!(*states.borrow(), SyncState::Idle);
    }

    #[tokio::test]
    async fn clearing_phone_or_signing_out_empties_feed() {
        let mut util = util(Arc::new(MemoryStores::default()));
        util.start().await.unwrap();

        util.update_profile(ProfileUpdate::default()).await.unwrap();
        assert!(util.feed().is_empty());
        assert_eq!(util.identity(), None);

        util.start().await.unwrap();
        util.sign_out().await.unwrap();
        assert!(util.feed().is_empty());
        assert_eq!(util.sync_state(), SyncState::Idle);
    }

    #[tokio::test]
    async fn invalid_profile_phone_resets_and_errors() {
        let mut util = util(Arc::new(MemoryStores::default()));
        util.start().await.unwrap();

        let result = util
            .on_session_event(&SessionEvent::UserUpdated(session(Some("1234"))))
            .await;

        assert!(result.is_err());
        assert!(util.feed().is_empty());
    }

    #[tokio::test]
    async fn invalid_forms_never_reach_the_store() {
        let stores = Arc::new(MemoryStores::default());
        let mut util = util(stores.clone());
        util.start().await.unwrap();
        let mut form = TransactionForm {
            description: "Padaria".to_string(),
            amount: 0.0,
            kind: TransactionType::Expense,
            category_id: "Alimentação".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
        };
        assert!(util.add_transaction(&form).await.is_err());
        assert!(stores.inserted.lock().unwrap().is_empty());

        form.amount = 12.5;
        let added = util.add_transaction(&form).await.unwrap();

        assert_eq!(added.amount, -12.5);
        assert_eq!(util.feed().as_slice()[0].id, 2);
        assert_eq!(
            stores.inserted.lock().unwrap()[0].owner,
            "5581999990000@s.whatsapp.net"
        );
    }

    #[test]
    fn categories_filter_by_type() {
        let util = util(Arc::new(MemoryStores::default()));
        assert_eq!(util.categories(None).len(), 14);
        assert!(util
            .categories(Some(TransactionType::Income))
            .iter()
            .all(|c| c.kind == TransactionType::Income));
    }
}
