//! Sign-in flow against an external identity provider.
//!
//! The provider is abstracted behind [`IdentityProvider`]; [`AuthContext`]
//! drives it through password sign-in, an optional second factor and sign-out,
//! and turns the resulting claims into a [`Session`].

use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AppError, AppResult};
use crate::models::notice::{emit, NoticeSender};
use crate::models::{Notice, Role, Session};
use crate::utils::logging;

/// Identity claims attached to a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
    /// Raw role claim, e.g. `LAWYER`.
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MfaChallenge {
    pub challenge_id: String,
    /// Masked phone number or similar hint for the user.
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    SignedIn(Claims),
    MfaRequired(MfaChallenge),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("invalid credential")]
    InvalidCredential,
    #[error("invalid email")]
    InvalidEmail,
    #[error("invalid verification code")]
    InvalidCode,
    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInOutcome, ProviderError>;

    async fn verify_mfa(&self, challenge: &MfaChallenge, code: &str) -> Result<Claims, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    SignedOut,
    AwaitingMfa(MfaChallenge),
    SignedIn(Session),
}

pub struct AuthContext<P> {
    provider: P,
    state: AuthState,
    notices: Option<NoticeSender>,
}

impl<P: IdentityProvider> AuthContext<P> {
    pub fn new(provider: P, notices: Option<NoticeSender>) -> Self {
        Self { provider, state: AuthState::SignedOut, notices }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> AppResult<&AuthState> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::invalid_input("Email and password are required"));
        }

        match self.provider.sign_in(email, password).await {
            Ok(SignInOutcome::SignedIn(claims)) => self.establish(claims)?,
            Ok(SignInOutcome::MfaRequired(challenge)) => {
                info!("Second factor required for sign-in");
                self.state = AuthState::AwaitingMfa(challenge);
            }
            Err(e) => return Err(self.reject(e)),
        }

        Ok(&self.state)
    }

    pub async fn verify_mfa(&mut self, code: &str) -> AppResult<&Session> {
        let AuthState::AwaitingMfa(challenge) = &self.state else {
            return Err(AppError::auth("No verification is pending"));
        };
        let challenge = challenge.clone();

        let claims = match self.provider.verify_mfa(&challenge, code).await {
            Ok(claims) => claims,
            Err(e) => return Err(self.reject(e)),
        };
        self.establish(claims)?;

        self.session().ok_or_else(|| AppError::auth("Sign-in did not complete"))
    }

    /// Local state is cleared even when the provider call fails.
    pub async fn sign_out(&mut self) -> AppResult<()> {
        let user = match &self.state {
            AuthState::SignedIn(session) => session.user_id.clone(),
            _ => String::new(),
        };
        self.state = AuthState::SignedOut;
        logging::log_auth_event("Signed out", &user);

        self.provider
            .sign_out()
            .await
            .map_err(|e| AppError::auth(format!("Sign-out failed: {}", e)))
    }

    fn establish(&mut self, claims: Claims) -> AppResult<()> {
        let role = match Role::from_claim(&claims.role) {
            Ok(role) => role,
            Err(e) => {
                warn!("Rejected sign-in with role claim {:?}", claims.role);
                self.state = AuthState::SignedOut;
                return Err(AppError::auth(e));
            }
        };

        let mut session = Session::new(claims.user_id, claims.display_name, role);
        session.email = claims.email;
        logging::log_auth_event("Signed in", &session.user_id);

        emit(&self.notices, Notice::success("Signed In", format!("Welcome, {}.", session.display_name)));
        self.state = AuthState::SignedIn(session);
        Ok(())
    }

    fn reject(&mut self, error: ProviderError) -> AppError {
        let (title, description) = match &error {
            ProviderError::InvalidCredential => ("Invalid Credential", "Email or password is incorrect."),
            ProviderError::InvalidEmail => ("Invalid Email", "Enter a valid email address."),
            ProviderError::InvalidCode => ("Invalid Code", "The verification code is incorrect."),
            ProviderError::Other(_) => ("Sign-in Failed", "Please try again."),
        };
        warn!("Sign-in rejected: {}", error);
        emit(&self.notices, Notice::error(title, description));

        if !matches!(error, ProviderError::InvalidCode) {
            self.state = AuthState::SignedOut;
        }
        AppError::auth(error.to_string())
    }
}
