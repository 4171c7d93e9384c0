use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::{
    config::BackendConfig,
    data::{
        datasources::{
            backend_client::BackendClient,
            table_datasource::{TableDatasource, TableDatasourceImpl},
        },
        models::transaction_row_model::{TransactionPayloadModel, TransactionRowModel},
    },
    domain::repositories::transactions_repository::TransactionsRepository,
    entities::{MatchKeySet, RawRecord, RecordPayload, StoreTag},
};

pub struct TransactionsRepositoryImpl<DS = TableDatasourceImpl>
where
    DS: TableDatasource,
{
    table_datasource: DS,
    config: BackendConfig,
}

#[async_trait]
impl<DS> TransactionsRepository for TransactionsRepositoryImpl<DS>
where
    DS: TableDatasource,
{
    async fn fetch(
        &self,
        store: StoreTag,
        keys: &MatchKeySet,
    ) -> Result<Vec<RawRecord>, ServerError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let values: Vec<&str> = keys.iter().collect();
        let rows: Vec<TransactionRowModel> = self
            .table_datasource
            .select_in(self.config.table(store), &self.config.owner_column, &values)
            .await?;
        Ok(rows.into_iter().map(|r| r.into_record(store)).collect())
    }

    async fn insert(&self, payload: &RecordPayload) -> Result<RawRecord, ServerError> {
        let row: TransactionRowModel = self
            .table_datasource
            .insert(
                self.config.table(payload.store),
                &TransactionPayloadModel::from(payload),
            )
            .await?;
        Ok(row.into_record(payload.store))
    }

    async fn delete(&self, store: StoreTag, id: i64) -> Result<(), ServerError> {
        self.table_datasource
            .delete_by_id(self.config.table(store), id)
            .await
    }
}

impl TransactionsRepositoryImpl {
    pub(crate) fn new(client: Arc<BackendClient>) -> Self {
        let config = client.config().clone();
        Self {
            table_datasource: TableDatasourceImpl::new(client),
            config,
        }
    }
}
