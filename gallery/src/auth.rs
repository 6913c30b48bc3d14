//! Login and registration flows.
//!
//! Both flows validate locally first; a form that fails validation never
//! reaches the backend. Only a successful login touches the session, and only
//! while the [`LoginGate`] ticket it started with is still current.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::api::{ApiError, ImageApi};
use crate::guard::Route;
use crate::session::{StoreError, Token, TokenStore};
use crate::state::StateHandle;
use crate::types::Credentials;

/// Why a login or registration attempt did not go through.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Enter both email and password.")]
    MissingFields,
    #[error("Passwords do not match!")]
    PasswordMismatch,
    #[error("{0}")]
    Rejected(ApiError),
    #[error("Login response did not include a token.")]
    MissingToken,
    #[error("Could not save session: {0}")]
    Store(StoreError),
    #[error("Session is no longer available.")]
    Detached,
    /// The login view went away before the backend answered.
    #[error("Login was abandoned.")]
    Abandoned,
}

/// Generation counter for logins in flight.
///
/// Each login takes a ticket before it awaits the backend; leaving the login
/// view (or logging out) bumps the generation so older tickets can no longer
/// write a token.
#[derive(Clone, Debug, Default)]
pub struct LoginGate {
    generation: u64,
}

/// Handed to one login attempt; not `Clone`.
#[derive(Debug)]
pub struct LoginTicket {
    generation: u64,
}

impl LoginGate {
    pub fn issue(&mut self) -> LoginTicket {
        LoginTicket {
            generation: self.generation,
        }
    }

    /// Abandon every login started so far.
    pub fn leave(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    #[must_use]
    pub fn is_current(&self, ticket: &LoginTicket) -> bool {
        ticket.generation == self.generation
    }
}

/// Login view input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Trimmed credentials, or the local validation error.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingFields`] when either field is blank.
    pub fn validate(&self) -> Result<Credentials, AuthError> {
        credentials(&self.email, &self.password)
    }
}

/// Registration view input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm: String,
}

impl RegisterForm {
    /// # Errors
    ///
    /// Returns [`AuthError::MissingFields`] when email or password is blank
    /// and [`AuthError::PasswordMismatch`] when the confirmation differs.
    pub fn validate(&self) -> Result<Credentials, AuthError> {
        let creds = credentials(&self.email, &self.password)?;
        if self.password != self.confirm {
            return Err(AuthError::PasswordMismatch);
        }
        Ok(creds)
    }
}

fn credentials(email: &str, password: &str) -> Result<Credentials, AuthError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    Ok(Credentials {
        email: email.to_owned(),
        password: password.to_owned(),
    })
}

/// Log in and store the returned token.
///
/// Returns the view to navigate to on success. On any failure the session
/// is left exactly as it was. A login whose ticket went stale while the
/// backend answered returns [`AuthError::Abandoned`] and stores nothing.
///
/// # Errors
///
/// Returns the validation, backend or storage failure to show the user.
pub async fn login<S, H, A>(api: &A, state: &H, form: &LoginForm) -> Result<Route, AuthError>
where
    S: TokenStore,
    H: StateHandle<S>,
    A: ImageApi + ?Sized,
{
    let creds = form.validate()?;
    log::debug!("login attempt for {}", creds.email);
    let ticket = state.update(|s| s.login_gate.issue()).ok_or(AuthError::Detached)?;
    let response = api.login(&creds).await.map_err(|e| {
        log::warn!("login failed: {e}");
        AuthError::Rejected(e)
    })?;
    let token = Token::parse(response.token).ok_or(AuthError::MissingToken)?;
    state
        .update(|s| {
            if !s.login_gate.is_current(&ticket) {
                log::debug!("dropping token for abandoned login");
                return Err(AuthError::Abandoned);
            }
            s.session.login(token).map_err(AuthError::Store)
        })
        .ok_or(AuthError::Detached)??;
    Ok(Route::Dashboard)
}

/// Register an account. Registration does not log in; success returns the
/// login view.
///
/// # Errors
///
/// Returns the validation or backend failure to show the user.
pub async fn register<A>(api: &A, form: &RegisterForm) -> Result<Route, AuthError>
where
    A: ImageApi + ?Sized,
{
    let creds = form.validate()?;
    log::debug!("registering {}", creds.email);
    api.register(&creds).await.map_err(|e| {
        log::warn!("registration failed: {e}");
        AuthError::Rejected(e)
    })?;
    Ok(Route::Login)
}
