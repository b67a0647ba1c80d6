//! Account routes: registration, login, session status, logout and deletion

use axum::{Extension, Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    extract::AppJson,
    models::{Account, CurrentSession, NewAccount, SessionUser},
    repositories::account::{is_unique_violation, verify_password},
    state::AppState,
    validation::{derive_username, non_blank, normalize_email, validate_email, validate_username},
};

/// Request for account registration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub username: Option<String>,
}

/// Request for login
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request confirming account deletion
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteAccountRequest {
    pub password: Option<String>,
}

/// Response for register and login
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub message: String,
    pub email: String,
    pub username: String,
}

/// Response describing the caller's session
#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl RegisterRequest {
    /// Normalize the email, derive a missing username and check every field
    pub fn validate(&self) -> Result<NewAccount, ApiError> {
        let email = self.email.as_deref().map(normalize_email).unwrap_or_default();
        let password = non_blank(self.password.as_deref());

        let Some(password) = password.filter(|_| !email.is_empty()) else {
            return Err(ApiError::BadRequest(
                "Email and password are required".to_string(),
            ));
        };

        validate_email(&email).map_err(ApiError::BadRequest)?;

        let username = match non_blank(self.username.as_deref()) {
            Some(username) => username.to_string(),
            None => derive_username(&email),
        };
        validate_username(&username).map_err(ApiError::BadRequest)?;

        if let Some(confirm) = non_blank(self.confirm_password.as_deref()) {
            if confirm != password {
                return Err(ApiError::BadRequest("Passwords do not match".to_string()));
            }
        }

        Ok(NewAccount {
            email,
            username,
            password: password.to_string(),
        })
    }
}

async fn start_session(
    state: &AppState,
    jar: CookieJar,
    account: &Account,
) -> ApiResult<CookieJar> {
    let user = SessionUser {
        email: account.email.clone(),
        username: account.username.clone(),
    };
    let token = state.session_manager.create_session(&user).await.map_err(|e| {
        error!("Failed to create session: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(jar.add(state.session_manager.session_cookie(token)))
}

/// Create an account and log it in
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<RegisterRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<AccountResponse>)> {
    let new_account = payload.validate()?;

    let existing = state
        .account_repository
        .find_by_email(&new_account.email)
        .await
        .map_err(|e| {
            error!("Failed to look up account: {}", e);
            ApiError::InternalServerError
        })?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Email already in use.".to_string()));
    }

    let account = state
        .account_repository
        .create(&new_account)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("Email already in use.".to_string())
            } else {
                error!("Failed to create account: {}", e);
                ApiError::InternalServerError
            }
        })?;

    let jar = start_session(&state, jar, &account).await?;
    info!("Account created: {}", account.email);

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AccountResponse {
            message: "Account created".to_string(),
            email: account.email,
            username: account.username,
        }),
    ))
}

/// Log in with email and password
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> ApiResult<(CookieJar, Json<AccountResponse>)> {
    let email = payload.email.as_deref().map(normalize_email).unwrap_or_default();
    let password = non_blank(payload.password.as_deref());

    let Some(password) = password.filter(|_| !email.is_empty()) else {
        return Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        ));
    };

    let account = state
        .account_repository
        .find_by_email(&email)
        .await
        .map_err(|e| {
            error!("Failed to look up account: {}", e);
            ApiError::InternalServerError
        })?;

    let verified = match &account {
        Some(account) => verify_password(account, password).map_err(|e| {
            error!("Failed to verify password: {}", e);
            ApiError::InternalServerError
        })?,
        None => false,
    };

    let Some(account) = account.filter(|_| verified) else {
        warn!("Failed login for: {}", email);
        return Err(ApiError::Unauthorized(
            "Incorrect email or password".to_string(),
        ));
    };

    let jar = start_session(&state, jar, &account).await?;
    info!("Logged in: {}", account.email);

    Ok((
        jar,
        Json(AccountResponse {
            message: "Logged in".to_string(),
            email: account.email,
            username: account.username,
        }),
    ))
}

/// Report whether the caller has a session
pub async fn session_status(session: Option<Extension<CurrentSession>>) -> Json<SessionStatus> {
    let status = match session {
        Some(Extension(current)) => SessionStatus {
            authenticated: true,
            email: Some(current.user.email),
            username: Some(current.user.username),
        },
        None => SessionStatus {
            authenticated: false,
            email: None,
            username: None,
        },
    };

    Json(status)
}

/// Destroy the caller's session
///
/// The cookie is cleared even when Redis cannot be reached.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    session: Option<Extension<CurrentSession>>,
) -> (CookieJar, Json<serde_json::Value>) {
    if let Some(Extension(current)) = session {
        if let Err(e) = state.session_manager.delete_session(&current.token).await {
            warn!("Failed to delete session on logout: {}", e);
        }
    }

    (
        jar.add(state.session_manager.removal_cookie()),
        Json(serde_json::json!({ "message": "Logged out" })),
    )
}

/// Delete the caller's account after re-checking the password
pub async fn delete_account(
    State(state): State<AppState>,
    jar: CookieJar,
    session: Option<Extension<CurrentSession>>,
    AppJson(payload): AppJson<DeleteAccountRequest>,
) -> ApiResult<(CookieJar, Json<serde_json::Value>)> {
    let Some(Extension(current)) = session else {
        return Err(ApiError::Unauthorized("Not logged in".to_string()));
    };
    let Some(password) = non_blank(payload.password.as_deref()) else {
        return Err(ApiError::BadRequest(
            "Password is required to delete the account".to_string(),
        ));
    };

    let account = state
        .account_repository
        .find_by_email(&current.user.email)
        .await
        .map_err(|e| {
            error!("Failed to look up account: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    let verified = verify_password(&account, password).map_err(|e| {
        error!("Failed to verify password: {}", e);
        ApiError::InternalServerError
    })?;
    if !verified {
        return Err(ApiError::Unauthorized("Incorrect password".to_string()));
    }

    let deleted = state
        .account_repository
        .delete(account.id)
        .await
        .map_err(|e| {
            error!("Failed to delete account: {}", e);
            ApiError::InternalServerError
        })?;
    if !deleted {
        return Err(ApiError::NotFound("Account not found".to_string()));
    }

    if let Err(e) = state.session_manager.delete_session(&current.token).await {
        warn!("Account deleted but session cleanup failed: {}", e);
    }

    Ok((
        jar.add(state.session_manager.removal_cookie()),
        Json(serde_json::json!({ "message": "Account deleted" })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            confirm_password: None,
            username: None,
        }
    }

    #[test]
    fn test_register_normalizes_email_and_derives_username() {
        let account = request("  Anna.Svensson@Example.com ", "secret").validate().unwrap();
        assert_eq!(account.email, "anna.svensson@example.com");
        assert_eq!(account.username, "anna.svensson");
        assert_eq!(account.password, "secret");
    }

    #[test]
    fn test_register_requires_email_and_password() {
        for (email, password) in [("", "secret"), ("anna@example.com", "   ")] {
            let err = request(email, password).validate().unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_register_rejects_invalid_username() {
        let mut req = request("anna@example.com", "secret");
        req.username = Some("a b".to_string());
        assert!(matches!(req.validate(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_register_checks_password_confirmation() {
        let mut req = request("anna@example.com", "secret");
        req.confirm_password = Some("other".to_string());
        assert!(matches!(req.validate(), Err(ApiError::BadRequest(msg)) if msg == "Passwords do not match"));

        req.confirm_password = Some("secret".to_string());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_unknown_fields() {
        let json = r#"{"email":"a@example.com","password":"x","isAdmin":true}"#;
        assert!(serde_json::from_str::<RegisterRequest>(json).is_err());

        let json = r#"{"email":"a@example.com","password":"x","confirmPassword":"x"}"#;
        let parsed: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.confirm_password.as_deref(), Some("x"));
    }

    #[test]
    fn test_session_status_shape() {
        let anonymous = serde_json::to_value(SessionStatus {
            authenticated: false,
            email: None,
            username: None,
        })
        .unwrap();
        assert_eq!(anonymous, serde_json::json!({ "authenticated": false }));
    }
}
