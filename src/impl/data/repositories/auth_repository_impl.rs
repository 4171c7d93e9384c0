use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;
use tokio::sync::{broadcast, RwLock};

use crate::{
    data::{
        datasources::{
            auth_datasource::{AuthDatasource, AuthDatasourceImpl},
            backend_client::{BackendClient, SharedAccessToken},
        },
        models::user_model::{SignUpModel, SignUpResponseModel, UpdateUserModel, UserMetadataModel},
    },
    domain::repositories::auth_repository::AuthRepository,
    entities::{ProfileUpdate, Session, SessionEvent, SignUpOutcome, SignUpRequest},
    errors::{AuthFailed, NotSignedIn},
};

const EVENT_CAPACITY: usize = 16;

pub struct AuthRepositoryImpl<DS = AuthDatasourceImpl>
where
    DS: AuthDatasource,
{
    auth_datasource: DS,
    access_token: SharedAccessToken,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

#[async_trait]
impl<DS> AuthRepository for AuthRepositoryImpl<DS>
where
    DS: AuthDatasource,
{
    async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ServerError> {
        let session: Session = self
            .auth_datasource
            .sign_in_with_password(email, password)
            .await
            .map_err(|e| AuthFailed::with_debug(&e))?
            .into();
        self.publish(Some(session.clone())).await;
        self.notify(SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, ServerError> {
        let body = SignUpModel {
            email: &request.email,
            password: &request.password,
            data: UserMetadataModel {
                full_name: Some(request.full_name.clone()),
                phone_number: Some(request.phone_number.clone()),
            },
        };
        let response = self
            .auth_datasource
            .sign_up(&body)
            .await
            .map_err(|e| AuthFailed::with_debug(&e))?;
        match response {
            SignUpResponseModel::Session(model) => {
                let session: Session = model.into();
                self.publish(Some(session.clone())).await;
                self.notify(SessionEvent::SignedIn(session.clone()));
                Ok(SignUpOutcome::SignedIn(session))
            }
            SignUpResponseModel::User(model) => Ok(SignUpOutcome::ConfirmationPending(model.into())),
        }
    }

    async fn resume(&self, access_token: &str) -> Result<Session, ServerError> {
        let user = self
            .auth_datasource
            .get_user(access_token)
            .await
            .map_err(|e| AuthFailed::with_debug(&e))?;
        let session = Session {
            access_token: access_token.to_string(),
            refresh_token: None,
            user: user.into(),
        };
        self.publish(Some(session.clone())).await;
        self.notify(SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Session, ServerError> {
        let current = self
            .current_session()
            .await
            .ok_or_else(NotSignedIn::new)?;
        let body = UpdateUserModel {
            data: UserMetadataModel {
                full_name: update.full_name.clone(),
                phone_number: update.phone_number.clone(),
            },
        };
        let user = self
            .auth_datasource
            .update_user(&current.access_token, &body)
            .await?;
        let session = Session {
            user: user.into(),
            ..current
        };
        self.publish(Some(session.clone())).await;
        self.notify(SessionEvent::UserUpdated(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), ServerError> {
        if let Some(current) = self.current_session().await {
            // The local session is dropped even if the backend call fails.
            if let Err(e) = self.auth_datasource.sign_out(&current.access_token).await {
                log::warn!("remote sign-out failed: {e:?}");
            }
        }
        self.publish(None).await;
        self.notify(SessionEvent::SignedOut);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

impl<DS> AuthRepositoryImpl<DS>
where
    DS: AuthDatasource,
{
    pub(crate) fn with_datasource(auth_datasource: DS, access_token: SharedAccessToken) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            auth_datasource,
            access_token,
            session: RwLock::new(None),
            events,
        }
    }

    async fn publish(&self, session: Option<Session>) {
        *self.access_token.write().await = session.as_ref().map(|s| s.access_token.clone());
        *self.session.write().await = session;
    }

    fn notify(&self, event: SessionEvent) {
        // Sending only fails when nobody is subscribed.
        if self.events.send(event).is_err() {
            log::debug!("session event had no subscribers");
        }
    }
}

impl AuthRepositoryImpl {
    pub(crate) fn new(client: Arc<BackendClient>) -> Self {
        let access_token = client.access_token();
        Self::with_datasource(AuthDatasourceImpl::new(client), access_token)
    }
}
