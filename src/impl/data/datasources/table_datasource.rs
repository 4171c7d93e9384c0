use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::InvalidBackendResponse;

use super::backend_client::BackendClient;

/// PostgREST-style table access.
#[async_trait]
pub trait TableDatasource: Send + Sync {
    /// `SELECT * FROM table WHERE column IN (values)`.
    async fn select_in<T>(
        &self,
        table: &str,
        column: &str,
        values: &[&str],
    ) -> Result<Vec<T>, ServerError>
    where
        T: DeserializeOwned + Send + 'static;

    /// Inserts one row and returns it as stored.
    async fn insert<P, T>(&self, table: &str, row: &P) -> Result<T, ServerError>
    where
        P: Serialize + Sync,
        T: DeserializeOwned + Send + 'static;

    async fn delete_by_id(&self, table: &str, id: i64) -> Result<(), ServerError>;
}

pub struct TableDatasourceImpl {
    client: Arc<BackendClient>,
}

impl TableDatasourceImpl {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

/// Quotes values for a PostgREST `in.(...)` filter, so commas, parentheses
/// and the like inside a value are taken literally.
pub(crate) fn in_filter(values: &[&str]) -> String {
    let quoted = values
        .iter()
        .map(|v| format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect::<Vec<_>>()
        .join(",");
    format!("in.({quoted})")
}

#[async_trait]
impl TableDatasource for TableDatasourceImpl {
    async fn select_in<T>(
        &self,
        table: &str,
        column: &str,
        values: &[&str],
    ) -> Result<Vec<T>, ServerError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let mut url = self.client.endpoint(&format!("rest/v1/{table}"))?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair(column, &in_filter(values));
        let request = self.client.request(Method::GET, url, None).await?;
        self.client
            .execute(table, request)
            .await?
            .json::<Vec<T>>()
            .await
            .map_err(|e| InvalidBackendResponse::with_debug(table, &e))
    }

    async fn insert<P, T>(&self, table: &str, row: &P) -> Result<T, ServerError>
    where
        P: Serialize + Sync,
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.client.endpoint(&format!("rest/v1/{table}"))?;
        let request = self
            .client
            .request(Method::POST, url, None)
            .await?
            .header("Prefer", "return=representation")
            .json(&[row]);
        self.client
            .execute(table, request)
            .await?
            .json::<Vec<T>>()
            .await
            .map_err(|e| InvalidBackendResponse::with_debug(table, &e))?
            .into_iter()
            .next()
            .ok_or_else(|| InvalidBackendResponse::with_debug(table, &"insert returned no rows"))
    }

    async fn delete_by_id(&self, table: &str, id: i64) -> Result<(), ServerError> {
        let mut url = self.client.endpoint(&format!("rest/v1/{table}"))?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        let request = self.client.request(Method::DELETE, url, None).await?;
        self.client.execute(table, request).await?;
        Ok(())
    }
}
