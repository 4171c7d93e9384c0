use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;
use reqwest::Method;

use crate::{
    data::models::user_model::{
        PasswordGrantModel, SessionModel, SignUpModel, SignUpResponseModel, UpdateUserModel,
        UserModel,
    },
    errors::InvalidBackendResponse,
};

use super::backend_client::BackendClient;

/// GoTrue-style auth endpoints.
#[async_trait]
pub trait AuthDatasource: Send + Sync {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionModel, ServerError>;

    async fn sign_up(&self, body: &SignUpModel<'_>) -> Result<SignUpResponseModel, ServerError>;

    async fn get_user(&self, access_token: &str) -> Result<UserModel, ServerError>;

    async fn update_user(
        &self,
        access_token: &str,
        body: &UpdateUserModel,
    ) -> Result<UserModel, ServerError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), ServerError>;
}

pub struct AuthDatasourceImpl {
    client: Arc<BackendClient>,
}

impl AuthDatasourceImpl {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthDatasource for AuthDatasourceImpl {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionModel, ServerError> {
        let mut url = self.client.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let request = self
            .client
            .request(Method::POST, url, None)
            .await?
            .json(&PasswordGrantModel { email, password });
        self.client
            .execute("auth/token", request)
            .await?
            .json::<SessionModel>()
            .await
            .map_err(|e| InvalidBackendResponse::with_debug("auth/token", &e))
    }

    async fn sign_up(&self, body: &SignUpModel<'_>) -> Result<SignUpResponseModel, ServerError> {
        let url = self.client.endpoint("auth/v1/signup")?;
        let request = self
            .client
            .request(Method::POST, url, None)
            .await?
            .json(body);
        self.client
            .execute("auth/signup", request)
            .await?
            .json::<SignUpResponseModel>()
            .await
            .map_err(|e| InvalidBackendResponse::with_debug("auth/signup", &e))
    }

    async fn get_user(&self, access_token: &str) -> Result<UserModel, ServerError> {
        let url = self.client.endpoint("auth/v1/user")?;
        let request = self
            .client
            .request(Method::GET, url, Some(access_token))
            .await?;
        self.client
            .execute("auth/user", request)
            .await?
            .json::<UserModel>()
            .await
            .map_err(|e| InvalidBackendResponse::with_debug("auth/user", &e))
    }

    async fn update_user(
        &self,
        access_token: &str,
        body: &UpdateUserModel,
    ) -> Result<UserModel, ServerError> {
        let url = self.client.endpoint("auth/v1/user")?;
        let request = self
            .client
            .request(Method::PUT, url, Some(access_token))
            .await?
            .json(body);
        self.client
            .execute("auth/user", request)
            .await?
            .json::<UserModel>()
            .await
            .map_err(|e| InvalidBackendResponse::with_debug("auth/user", &e))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ServerError> {
        let url = self.client.endpoint("auth/v1/logout")?;
        let request = self
            .client
            .request(Method::POST, url, Some(access_token))
            .await?;
        self.client.execute("auth/logout", request).await?;
        Ok(())
    }
}
