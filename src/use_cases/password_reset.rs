use std::sync::Arc;

use crate::domain::validation::{validate_email, validate_otp, validate_password};
use crate::domain::{ActionError, ValidationError};
use crate::use_cases::lifecycle::RequestLifecycle;
use crate::use_cases::route_guard::Route;
use crate::use_cases::session::{RESEND_FAILED, SEND_OTP_FAILED, SessionContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    Request,
    Verify,
    Reset,
    Done,
}

/// Password recovery: request an OTP, verify it, set the new password.
///
/// A step only advances when its remote call succeeds; failures stay on the
/// same step with the message kept in `error()`.
pub struct PasswordResetFlow {
    session: Arc<SessionContext>,
    step: ResetStep,
    email: String,
    request: RequestLifecycle<()>,
    error: Option<String>,
}

impl PasswordResetFlow {
    pub fn new(session: Arc<SessionContext>) -> Self {
        Self {
            session,
            step: ResetStep::Request,
            email: String::new(),
            request: RequestLifecycle::new(),
            error: None,
        }
    }

    pub fn step(&self) -> ResetStep {
        self.step
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.request.is_pending()
    }

    pub fn next_route(&self) -> Option<Route> {
        (self.step == ResetStep::Done).then_some(Route::Login)
    }

    pub async fn request(&mut self, email: &str) -> Result<(), ActionError> {
        if let Err(err) = validate_email(email) {
            return self.reject(err);
        }
        let email = email.trim().to_string();
        self.send_otp(&email, SEND_OTP_FAILED).await?;
        self.email = email;
        self.step = ResetStep::Verify;
        Ok(())
    }

    /// Re-runs the request call; the current step does not change.
    pub async fn resend_otp(&mut self) -> Result<(), ActionError> {
        self.expect_step(ResetStep::Verify)?;
        let email = self.email.clone();
        self.send_otp(&email, RESEND_FAILED).await
    }

    pub async fn verify(&mut self, otp: &str) -> Result<(), ActionError> {
        self.expect_step(ResetStep::Verify)?;
        if let Err(err) = validate_otp(otp) {
            return self.reject(err);
        }
        let ticket = self.request.begin().ok_or(ActionError::Busy)?;
        let result = self.session.verify_reset_otp(&self.email, otp.trim()).await;
        self.request
            .settle(ticket, result.as_ref().map(|_| ()).map_err(ActionError::message));
        match result {
            Ok(_) => {
                self.error = None;
                self.step = ResetStep::Reset;
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    pub async fn reset(&mut self, new_password: &str) -> Result<(), ActionError> {
        self.expect_step(ResetStep::Reset)?;
        if let Err(err) = validate_password(new_password) {
            return self.reject(err);
        }
        let ticket = self.request.begin().ok_or(ActionError::Busy)?;
        let result = self.session.reset_password(&self.email, new_password).await;
        self.request
            .settle(ticket, result.as_ref().map(|_| ()).map_err(ActionError::message));
        match result {
            Ok(_) => {
                self.error = None;
                self.step = ResetStep::Done;
                tracing::info!("password reset; continue at login.");
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    async fn send_otp(&mut self, email: &str, fallback: &str) -> Result<(), ActionError> {
        let ticket = self.request.begin().ok_or(ActionError::Busy)?;
        let result = self.session.request_password_reset_or(email, fallback).await;
        self.request
            .settle(ticket, result.as_ref().map(|_| ()).map_err(ActionError::message));
        match result {
            Ok(_) => {
                self.error = None;
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    // Nothing is sent unless the flow is on `step`.
    fn expect_step(&mut self, step: ResetStep) -> Result<(), ActionError> {
        if self.step == step {
            return Ok(());
        }
        tracing::debug!(current = ?self.step, expected = ?step, "reset step out of order.");
        self.fail(ActionError::OutOfOrder)
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
