use std::sync::Arc;

use crate::domain::validation::{validate_email, validate_otp, validate_password};
use crate::domain::{ActionError, ValidationError};
use crate::use_cases::lifecycle::RequestLifecycle;
use crate::use_cases::route_guard::Route;
use crate::use_cases::session::{RESEND_FAILED, SIGNUP_FAILED, SessionContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupStep {
    Details,
    VerifyOtp,
    Complete,
}

#[derive(Debug, Clone)]
struct Details {
    email: String,
    password: String,
    name: String,
}

// Signup: details, then the emailed OTP, then an active session.
pub struct SignupFlow {
    session: Arc<SessionContext>,
    step: SignupStep,
    details: Option<Details>,
    request: RequestLifecycle<()>,
    error: Option<String>,
}

impl SignupFlow {
    pub fn new(session: Arc<SessionContext>) -> Self {
        Self {
            session,
            step: SignupStep::Details,
            details: None,
            request: RequestLifecycle::new(),
            error: None,
        }
    }

    pub fn step(&self) -> SignupStep {
        self.step
    }

    /// Inline error from the last failed action.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.request.is_pending()
    }

    /// Where to go once signup is complete.
    pub fn next_route(&self) -> Option<Route> {
        (self.step == SignupStep::Complete).then_some(Route::Home)
    }

    pub async fn submit(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<(), ActionError> {
        if name.trim().is_empty() {
            return self.reject(ValidationError::NameMissing);
        }
        if let Err(err) = validate_email(email).and_then(|()| validate_password(password)) {
            return self.reject(err);
        }
        let details = Details {
            email: email.trim().to_string(),
            password: password.to_string(),
            name: name.trim().to_string(),
        };
        self.send_signup(&details, SIGNUP_FAILED).await?;
        self.details = Some(details);
        self.step = SignupStep::VerifyOtp;
        Ok(())
    }

    pub async fn verify(&mut self, otp: &str) -> Result<(), ActionError> {
        let Some(email) = self.pending_details().map(|d| d.email) else {
            return self.fail(ActionError::OutOfOrder);
        };
        if let Err(err) = validate_otp(otp) {
            return self.reject(err);
        }
        let ticket = self.request.begin().ok_or(ActionError::Busy)?;
        let result = self.session.verify_otp(&email, otp.trim()).await;
        self.request
            .settle(ticket, result.as_ref().map(|_| ()).map_err(ActionError::message));
        match result {
            Ok(_) => {
                self.error = None;
                self.step = SignupStep::Complete;
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    /// Sends the signup call again with the stored details; the step is unchanged.
    pub async fn resend_otp(&mut self) -> Result<(), ActionError> {
        let Some(details) = self.pending_details() else {
            return self.fail(ActionError::OutOfOrder);
        };
        self.send_signup(&details, RESEND_FAILED).await
    }

    async fn send_signup(&mut self, details: &Details, fallback: &str) -> Result<(), ActionError> {
        let ticket = self.request.begin().ok_or(ActionError::Busy)?;
        let result = self
            .session
            .signup_or(&details.email, &details.password, &details.name, fallback)
            .await;
        self.request
            .settle(ticket, result.as_ref().map(|_| ()).map_err(ActionError::message));
        match result {
            Ok(response) => {
                self.error = None;
                if let Some(message) = response.message {
                    tracing::info!(%message, "signup acknowledged.");
                }
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    // Details of an accepted signup still waiting for its OTP.
    fn pending_details(&self) -> Option<Details> {
        if self.step != SignupStep::VerifyOtp {
            return None;
        }
        self.details.clone()
    }

    fn reject(&mut self, err: ValidationError) -> Result<(), ActionError> {
        self.error = Some(err.message().to_string());
        Err(ActionError::Invalid(err))
    }

    fn fail(&mut self, err: ActionError) -> Result<(), ActionError> {
        self.error = Some(err.message());
        Err(err)
    }
}
