//! Authentication endpoints and session persistence.
//!
//! Login and register return a bearer token plus the user record; both
//! are stored in the session on success so subsequent requests (and the
//! next application start) are authenticated.

use std::path::PathBuf;

use reqwest::Method;
use reqwest::multipart;
use seamline_core::Email;
use tracing::instrument;

use super::types::{AuthPayload, User};
use super::{ApiClient, ApiError};
use crate::session::Session;

/// Registration form. The avatar is an optional local image file sent as
/// a multipart part.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub username: String,
    pub email: Email,
    pub password: String,
    pub password_confirmation: String,
    pub avatar: Option<PathBuf>,
}

/// Authentication service: API calls plus session bookkeeping.
#[derive(Clone)]
pub struct AuthApi {
    api: ApiClient,
    session: Session,
}

impl AuthApi {
    /// Create an auth service over the given API client and session.
    #[must_use]
    pub const fn new(api: ApiClient, session: Session) -> Self {
        Self { api, session }
    }

    /// Log in with email and password. Stores the session on success.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for bad credentials, or any other
    /// error if the request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<User, ApiError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });
        let request = self.api.request(Method::POST, "login")?.json(&body);
        let payload: AuthPayload = self.api.send_json(request).await?;

        self.store_session(&payload);
        Ok(payload.user)
    }

    /// Register a new account. Stores the session on success.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for rejected input, `ApiError::Io`
    /// if the avatar file cannot be read, or any other error if the
    /// request fails.
    #[instrument(skip(self, form), fields(username = %form.username))]
    pub async fn register(&self, form: RegisterForm) -> Result<User, ApiError> {
        let mut multipart = multipart::Form::new()
            .text("username", form.username)
            .text("email", form.email.to_string())
            .text("password", form.password)
            .text("password_confirmation", form.password_confirmation);

        if let Some(path) = form.avatar {
            let bytes = std::fs::read(&path)?;
            let file_name = path
                .file_name()
                .map_or_else(|| "avatar".to_string(), |n| n.to_string_lossy().to_string());
            multipart = multipart.part("avatar", multipart::Part::bytes(bytes).file_name(file_name));
        }

        let request = self
            .api
            .request(Method::POST, "register")?
            .multipart(multipart);
        let payload: AuthPayload = self.api.send_json(request).await?;

        self.store_session(&payload);
        Ok(payload.user)
    }

    /// Log out locally: drop the token, the user record, and the
    /// persisted cart mirror. Purely a local side effect.
    pub fn logout(&self) {
        self.session.sign_out();
    }

    fn store_session(&self, payload: &AuthPayload) {
        self.session.sign_in(&payload.token, &payload.user);
    }
}
