use async_trait::async_trait;
use fractic_server_error::ServerError;
use tokio::sync::broadcast;

use crate::entities::{ProfileUpdate, Session, SessionEvent, SignUpOutcome, SignUpRequest};

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn current_session(&self) -> Option<Session>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ServerError>;

    /// `request.phone_number` is expected to be canonical already.
    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, ServerError>;

    /// Restores a session from a previously issued access token.
    async fn resume(&self, access_token: &str) -> Result<Session, ServerError>;

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Session, ServerError>;

    async fn sign_out(&self) -> Result<(), ServerError>;

    /// Every successful session change is pushed to subscribers.
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}
