use serde_derive::{Deserialize, Serialize};

use crate::entities::{Session, UserProfile};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UserMetadataModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserModel {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Option<UserMetadataModel>,
}

impl From<UserModel> for UserProfile {
    fn from(model: UserModel) -> Self {
        let metadata = model.user_metadata.unwrap_or_default();
        UserProfile {
            id: model.id,
            email: model.email,
            full_name: metadata.full_name,
            phone_number: metadata.phone_number,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SessionModel {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: UserModel,
}

impl From<SessionModel> for Session {
    fn from(model: SessionModel) -> Self {
        Session {
            access_token: model.access_token,
            refresh_token: model.refresh_token,
            user: model.user.into(),
        }
    }
}

/// Sign-up answers with a session, or with the bare user while the e-mail
/// address awaits confirmation.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponseModel {
    Session(SessionModel),
    User(UserModel),
}

#[derive(Debug, Serialize)]
pub struct PasswordGrantModel<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignUpModel<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: UserMetadataModel,
}

#[derive(Debug, Serialize)]
pub struct UpdateUserModel {
    pub data: UserMetadataModel,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn session_response_maps_profile_metadata() {
        let model: SessionModel = serde_json::from_value(json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "refresh_token": "refresh",
            "user": {
                "id": "u-1",
                "email": "ana@example.com",
                "user_metadata": { "full_name": "Ana", "phone_number": "81999990000" }
            }
        }))
        .unwrap();
        let session: Session = model.into();
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.user.full_name.as_deref(), Some("Ana"));
        assert_eq!(session.user.phone_number.as_deref(), Some("81999990000"));
    }

    #[test]
    fn sign_up_response_distinguishes_pending_confirmation() {
        let pending: SignUpResponseModel =
            serde_json::from_value(json!({ "id": "u-2", "email": "bia@example.com" })).unwrap();
        assert!(matches!(pending, SignUpResponseModel::User(_)));

        let signed_in: SignUpResponseModel = serde_json::from_value(json!({
            "access_token": "jwt",
            "user": { "id": "u-2" }
        }))
        .unwrap();
        assert!(matches!(signed_in, SignUpResponseModel::Session(_)));
    }

    #[test]
    fn update_body_skips_unset_fields() {
        let body = serde_json::to_value(UpdateUserModel {
            data: UserMetadataModel {
                full_name: None,
                phone_number: Some("5581999990000@s.whatsapp.net".to_string()),
            },
        })
        .unwrap();
        assert_eq!(
            body,
            json!({ "data": { "phone_number": "5581999990000@s.whatsapp.net" } })
        );
    }
}
