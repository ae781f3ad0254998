use serde::{Deserialize, Serialize};
use serde_json::Value;

// Key the bearer token is persisted under in durable storage.
pub const TOKEN_KEY: &str = "token";

// Client-side session record. A present token means "logged in"; expiry is only
// discovered when a later call is rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    // The persisted token has not been read yet.
    Initializing,
    Ready,
}

// Returned by signin and verify-otp.
#[derive(Clone, Debug, Deserialize)]
pub struct SessionInfo {
    pub token: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
}

// Returned by the endpoints that only acknowledge.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct SigninRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct SignupRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

#[derive(Serialize)]
pub struct OtpRequest<'a> {
    pub email: &'a str,
    pub otp: &'a str,
}

#[derive(Serialize)]
pub struct EmailOnlyRequest<'a> {
    pub email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest<'a> {
    pub email: &'a str,
    pub new_password: &'a str,
}
