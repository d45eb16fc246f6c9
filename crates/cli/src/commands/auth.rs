//! Account session commands.
//!
//! # Usage
//!
//! ```bash
//! seamline auth login -e user@example.com -p secret
//! seamline auth register -u ada -e ada@example.com -p secret --avatar me.png
//! seamline auth whoami
//! seamline auth logout
//! ```

use std::path::PathBuf;

use seamline_client::api::auth::{AuthApi, RegisterForm};
use seamline_core::Email;

use super::{AppContext, CliError};

/// Sign in and persist the session.
pub async fn login(ctx: &AppContext, email: &str, password: &str) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    let auth = AuthApi::new(ctx.api.clone(), ctx.session.clone());
    let user = auth.login(&email, password).await?;

    println!("Signed in as {} <{}>", user.username, user.email);
    Ok(())
}

/// Register a new account and persist the session.
pub async fn register(
    ctx: &AppContext,
    username: String,
    email: &str,
    password: String,
    avatar: Option<PathBuf>,
) -> Result<(), CliError> {
    let form = RegisterForm {
        username,
        email: Email::parse(email)?,
        password_confirmation: password.clone(),
        password,
        avatar,
    };

    let auth = AuthApi::new(ctx.api.clone(), ctx.session.clone());
    let user = auth.register(form).await?;

    println!("Registered and signed in as {} <{}>", user.username, user.email);
    Ok(())
}

/// Sign out, clearing the token, user record, and cart mirror.
pub fn logout(ctx: &AppContext) {
    let auth = AuthApi::new(ctx.api.clone(), ctx.session.clone());
    auth.logout();
    println!("Signed out.");
}

/// Show the signed-in user, if any.
pub fn whoami(ctx: &AppContext) {
    match ctx.session.current_user() {
        Some(user) => println!("{} <{}>", user.username, user.email),
        None => println!("Not signed in."),
    }
}
