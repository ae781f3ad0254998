use async_trait::async_trait;

use crate::domain::email::{
    GeneratedEmail, GenerationRequest, HistoryPage, HistoryQuery, RegenerationRequest,
    SaveEmailRequest, ToneCatalog, ToneSuggestionRequest,
};
use crate::domain::errors::ApiError;
use crate::domain::session::{MessageResponse, SessionInfo};

// Use cases depend on these traits, not on the reqwest client.
// Dependencies point inwards to the domain layer.

// Port for the backend's /auth endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn signin(&self, email: &str, password: &str) -> Result<SessionInfo, ApiError>;
    async fn signup(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<MessageResponse, ApiError>;
    async fn verify_otp(&self, email: &str, otp: &str) -> Result<SessionInfo, ApiError>;
    async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError>;
    async fn verify_reset_otp(&self, email: &str, otp: &str) -> Result<MessageResponse, ApiError>;
    async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ApiError>;
    async fn logout(&self, token: &str) -> Result<(), ApiError>;
}

// Port for the /tone endpoints; both accept anonymous callers.
#[async_trait]
pub trait ToneApi: Send + Sync {
    async fn catalog(&self, token: Option<&str>) -> Result<ToneCatalog, ApiError>;
    async fn suggest(
        &self,
        token: Option<&str>,
        req: &ToneSuggestionRequest,
    ) -> Result<String, ApiError>;
}

// Port for the /email endpoints.
#[async_trait]
pub trait EmailApi: Send + Sync {
    async fn generate(
        &self,
        token: Option<&str>,
        req: &GenerationRequest,
    ) -> Result<GeneratedEmail, ApiError>;
    async fn rewrite(
        &self,
        token: Option<&str>,
        req: &RegenerationRequest,
    ) -> Result<GeneratedEmail, ApiError>;
    async fn save(&self, token: Option<&str>, req: &SaveEmailRequest) -> Result<(), ApiError>;
    async fn history(&self, token: Option<&str>, query: &HistoryQuery)
    -> Result<HistoryPage, ApiError>;
}

// Port for string key-value storage (durable token file, session scratch space).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, String>;
    async fn set(&self, key: &str, value: &str) -> Result<(), String>;
    async fn remove(&self, key: &str) -> Result<bool, String>;
}

// Port for the system clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

// Port for transient, non-blocking user notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotificationLevel, message: &str);
}
