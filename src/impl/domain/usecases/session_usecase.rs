use async_trait::async_trait;
use fractic_server_error::ServerError;
use tokio::sync::broadcast;

use crate::{
    data::repositories::auth_repository_impl::AuthRepositoryImpl,
    domain::{
        logic::{
            identity_normalizer::IdentityNormalizer, search_term_expander::SearchTermExpander,
            utils::non_blank,
        },
        repositories::auth_repository::AuthRepository,
    },
    entities::{
        IdentityFormat, ProfileUpdate, ResolvedIdentity, Session, SessionEvent, SignUpOutcome,
        SignUpRequest, UserProfile,
    },
};

#[async_trait]
pub trait SessionUsecase: Send + Sync {
    /// Canonical address and match keys for the profile's phone number, or
    /// `None` if the profile has no phone number yet.
    fn resolve_identity(
        &self,
        profile: &UserProfile,
    ) -> Result<Option<ResolvedIdentity>, ServerError>;

    async fn current_session(&self) -> Option<Session>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ServerError>;

    async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpOutcome, ServerError>;

    async fn resume(&self, access_token: &str) -> Result<Session, ServerError>;

    async fn update_profile(&self, update: ProfileUpdate) -> Result<Session, ServerError>;

    async fn sign_out(&self) -> Result<(), ServerError>;

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}

pub struct SessionUsecaseImpl<
    A = AuthRepositoryImpl, // Default.
> where
    A: AuthRepository,
{
    auth_repository: A,
    identity_format: IdentityFormat,
}

#[async_trait]
impl<A> SessionUsecase for SessionUsecaseImpl<A>
where
    A: AuthRepository,
{
    fn resolve_identity(
        &self,
        profile: &UserProfile,
    ) -> Result<Option<ResolvedIdentity>, ServerError> {
        resolve_profile_identity(&self.identity_format, profile)
    }

    async fn current_session(&self) -> Option<Session> {
        self.auth_repository.current_session().await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ServerError> {
        self.auth_repository.sign_in(email.trim(), password).await
    }

    async fn sign_up(&self, mut request: SignUpRequest) -> Result<SignUpOutcome, ServerError> {
        // Rejected before anything reaches the backend.
        request.phone_number = IdentityNormalizer::new(&self.identity_format)
            .normalize(&request.phone_number)?
            .to_string();
        request.email = request.email.trim().to_string();
        self.auth_repository.sign_up(&request).await
    }

    async fn resume(&self, access_token: &str) -> Result<Session, ServerError> {
        self.auth_repository.resume(access_token).await
    }

    async fn update_profile(&self, mut update: ProfileUpdate) -> Result<Session, ServerError> {
        update.phone_number = match update.phone_number.take() {
            // Blank input clears the number.
            Some(phone) if phone.trim().is_empty() => Some(String::new()),
            Some(phone) => Some(
                IdentityNormalizer::new(&self.identity_format)
                    .normalize(&phone)?
                    .to_string(),
            ),
            None => None,
        };
        self.auth_repository.update_profile(&update).await
    }

    async fn sign_out(&self) -> Result<(), ServerError> {
        self.auth_repository.sign_out().await
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.auth_repository.subscribe()
    }
}

impl<A> SessionUsecaseImpl<A>
where
    A: AuthRepository,
{
    pub fn with_repository(auth_repository: A, identity_format: IdentityFormat) -> Self {
        Self {
            auth_repository,
            identity_format,
        }
    }
}

/// Canonical address from the profile's phone number; match keys from the
/// stored value as-is, so rows written with whatever format the profile
/// holds are found too.
pub fn resolve_profile_identity(
    format: &IdentityFormat,
    profile: &UserProfile,
) -> Result<Option<ResolvedIdentity>, ServerError> {
    let Some(phone) = non_blank(profile.phone_number.as_deref()) else {
        return Ok(None);
    };
    Ok(Some(ResolvedIdentity {
        canonical: IdentityNormalizer::new(format).normalize(phone)?,
        match_keys: SearchTermExpander::new(format).expand(phone),
    }))
}
