use std::sync::{Arc, RwLock};

use crate::domain::session::TOKEN_KEY;
use crate::domain::{
    ActionError, AuthApi, KeyValueStore, MessageResponse, Session, SessionInfo, SessionStatus,
};

// Fallback messages used when the backend gives no reason.
pub const LOGIN_FAILED: &str = "Login failed";
pub const SIGNUP_FAILED: &str = "Signup failed";
pub const OTP_FAILED: &str = "OTP verification failed";
pub const SEND_OTP_FAILED: &str = "Failed to send OTP";
pub const RESET_FAILED: &str = "Password reset failed";
pub const RESEND_FAILED: &str = "Failed to resend OTP";

struct Inner {
    session: Session,
    status: SessionStatus,
}

/// The one session of the application.
///
/// Built at start-up, initialized from durable storage, and shared by `Arc`
/// with every flow that sends requests. Only this type writes the token.
pub struct SessionContext {
    auth: Arc<dyn AuthApi>,
    storage: Arc<dyn KeyValueStore>,
    inner: RwLock<Inner>,
}

impl SessionContext {
    pub fn new(auth: Arc<dyn AuthApi>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            auth,
            storage,
            inner: RwLock::new(Inner {
                session: Session::default(),
                status: SessionStatus::Initializing,
            }),
        }
    }

    /// Reads the persisted token. A storage failure leaves the user logged out.
    pub async fn initialize(&self) {
        let token = match self.storage.get(TOKEN_KEY).await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(error) => {
                tracing::warn!(%error, "failed to read persisted token.");
                None
            }
        };
        tracing::debug!(restored = token.is_some(), "session initialized.");
        let mut inner = self.write();
        inner.session.token = token;
        inner.status = SessionStatus::Ready;
    }

    pub fn status(&self) -> SessionStatus {
        self.read().status
    }

    pub fn is_logged_in(&self) -> bool {
        self.read().session.token.is_some()
    }

    /// Credential attached to outgoing calls.
    pub fn token(&self) -> Option<String> {
        self.read().session.token.clone()
    }

    #[tracing::instrument(name = "session_login", skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionInfo, ActionError> {
        let info = self.auth.signin(email, password).await.map_err(|e| {
            tracing::warn!(error = %e, "login rejected.");
            ActionError::remote(&e, LOGIN_FAILED)
        })?;
        self.activate(&info.token).await;
        tracing::info!("logged in.");
        Ok(info)
    }

    /// Registers an unverified account; the session stays as it was.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<MessageResponse, ActionError> {
        self.signup_or(email, password, name, SIGNUP_FAILED).await
    }

    // Signup with a caller-chosen fallback; resending the OTP repeats this call.
    #[tracing::instrument(name = "session_signup", skip_all)]
    pub(crate) async fn signup_or(
        &self,
        email: &str,
        password: &str,
        name: &str,
        fallback: &str,
    ) -> Result<MessageResponse, ActionError> {
        self.auth
            .signup(email, password, name)
            .await
            .map_err(|e| ActionError::remote(&e, fallback))
    }

    #[tracing::instrument(name = "session_verify_otp", skip_all)]
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<SessionInfo, ActionError> {
        let info = self
            .auth
            .verify_otp(email, otp)
            .await
            .map_err(|e| ActionError::remote(&e, OTP_FAILED))?;
        self.activate(&info.token).await;
        tracing::info!("account verified and logged in.");
        Ok(info)
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<MessageResponse, ActionError> {
        self.request_password_reset_or(email, SEND_OTP_FAILED).await
    }

    pub(crate) async fn request_password_reset_or(
        &self,
        email: &str,
        fallback: &str,
    ) -> Result<MessageResponse, ActionError> {
        self.auth
            .forgot_password(email)
            .await
            .map_err(|e| ActionError::remote(&e, fallback))
    }

    pub async fn verify_reset_otp(
        &self,
        email: &str,
        otp: &str,
    ) -> Result<MessageResponse, ActionError> {
        self.auth
            .verify_reset_otp(email, otp)
            .await
            .map_err(|e| ActionError::remote(&e, OTP_FAILED))
    }

    pub async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ActionError> {
        self.auth
            .reset_password(email, new_password)
            .await
            .map_err(|e| ActionError::remote(&e, RESET_FAILED))
    }

    /// Tells the backend if possible, then always clears local state.
    #[tracing::instrument(name = "session_logout", skip_all)]
    pub async fn logout(&self) {
        if let Some(token) = self.token() {
            if let Err(error) = self.auth.logout(&token).await {
                tracing::warn!(%error, "logout call failed; clearing local session anyway.");
            }
        }
        self.write().session.token = None;
        if let Err(error) = self.storage.remove(TOKEN_KEY).await {
            tracing::warn!(%error, "failed to remove persisted token.");
        }
        tracing::info!("logged out.");
    }

    async fn activate(&self, token: &str) {
        {
            let mut inner = self.write();
            inner.session.token = Some(token.to_string());
            inner.status = SessionStatus::Ready;
        }
        // The in-memory session is already active; a failed write only costs a re-login later.
        if let Err(error) = self.storage.set(TOKEN_KEY, token).await {
            tracing::warn!(%error, "failed to persist token.");
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
