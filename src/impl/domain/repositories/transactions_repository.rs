use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::{MatchKeySet, RawRecord, RecordPayload, StoreTag};

/// Table access for the two transaction stores.
#[async_trait]
pub trait TransactionsRepository: Send + Sync {
    /// All rows of `store` whose owner key is one of `keys`.
    async fn fetch(&self, store: StoreTag, keys: &MatchKeySet)
        -> Result<Vec<RawRecord>, ServerError>;

    /// Inserts the row into `payload.store` and returns it as stored,
    /// including the assigned id.
    async fn insert(&self, payload: &RecordPayload) -> Result<RawRecord, ServerError>;

    async fn delete(&self, store: StoreTag, id: i64) -> Result<(), ServerError>;
}
