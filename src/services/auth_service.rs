use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Contact, LoginRequest, LoginResponse, LoginStatus, SignUpRequest, User};
use crate::repository;
use crate::services::contact_service::split_and_capitalize_name;
use crate::store::DocumentStore;
use crate::validation;

/// Linear scan of the users collection for an exact email and password match.
pub async fn log_in(store: &dyn DocumentStore, req: &LoginRequest) -> Result<LoginResponse, AppError> {
    let users = repository::fetch_users(store).await?;

    let Some(user) = users
        .into_iter()
        .map(|keyed| keyed.record)
        .find(|user| user.email == req.email && user.password == req.password)
    else {
        warn!("Failed login for {}", req.email);
        return Err(AppError::Unauthorized);
    };

    info!("User {} logged in", user.name);
    Ok(LoginResponse {
        status: LoginStatus::User,
        name: Some(user.name),
    })
}

pub fn log_in_as_guest() -> LoginResponse {
    LoginResponse {
        status: LoginStatus::Guest,
        name: None,
    }
}

/// Stores the login record and a matching contact under one shared id.
pub async fn sign_up(store: &dyn DocumentStore, req: SignUpRequest) -> Result<Contact, AppError> {
    validation::validate_sign_up(&req)?;

    let id = Uuid::new_v4().to_string();
    let user = User {
        id: id.clone(),
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        password: req.password,
    };
    repository::insert_user(store, &user).await?;

    let (firstname, lastname) = split_and_capitalize_name(&user.name);
    let contact = Contact {
        id,
        firstname,
        lastname,
        email: user.email.clone(),
        phone: None,
        is_temporary: false,
    };
    repository::insert_contact(store, &contact).await?;

    info!("Signed up {} as {}", user.email, contact.id);
    Ok(contact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn sign_up_request(email: &str) -> SignUpRequest {
        SignUpRequest {
            name: "anna berg".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
            password_confirm: "secret".to_string(),
            accept_privacy: true,
        }
    }

    #[tokio::test]
    async fn test_sign_up_then_log_in() {
        let store = MemoryStore::new();
        let contact = sign_up(&store, sign_up_request("anna@example.com"))
            .await
            .expect("sign up should succeed");
        assert_eq!(contact.full_name(), "Anna Berg");

        let users = repository::fetch_users(&store).await.expect("users");
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].record.id, contact.id);

        let response = log_in(
            &store,
            &LoginRequest {
                email: "anna@example.com".to_string(),
                password: "secret".to_string(),
            },
        )
        .await
        .expect("login should succeed");
        assert_eq!(response.status, LoginStatus::User);
        assert_eq!(response.name.as_deref(), Some("anna berg"));
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let store = MemoryStore::new();
        sign_up(&store, sign_up_request("anna@example.com"))
            .await
            .expect("sign up should succeed");

        let result = log_in(
            &store,
            &LoginRequest {
                email: "anna@example.com".to_string(),
                password: "wrong".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_invalid_sign_up_writes_nothing() {
        let store = MemoryStore::new();
        let result = sign_up(&store, sign_up_request("not-an-email")).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(store.writes(), 0);
    }
}
