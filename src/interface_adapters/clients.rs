use crate::domain::session::{
    EmailOnlyRequest, OtpRequest, ResetPasswordRequest, SigninRequest, SignupRequest,
};
use crate::domain::{
    ApiError, AuthApi, EmailApi, GeneratedEmail, GenerationRequest, HistoryPage, HistoryQuery,
    MessageResponse, RegenerationRequest, SaveEmailRequest, SessionInfo, ToneApi, ToneCatalog,
    ToneSuggestionRequest,
};
use crate::interface_adapters::protocol::{EmailEnvelope, ErrorResponse, ToneSuggestionResponse};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

// Thin wrapper around reqwest for every backend endpoint.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // Joins a fixed endpoint path onto the base URL, keeping any base path prefix.
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url
    }

    fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> RequestBuilder {
        with_bearer(self.http.post(self.endpoint(path)).json(body), token)
    }
}

fn with_bearer(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

// Sends the request and maps the status: success bodies are decoded as `T`,
// failures keep the upstream status and message.
async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
    let res = checked(builder).await?;
    res.json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

async fn checked(builder: RequestBuilder) -> Result<Response, ApiError> {
    let res = builder
        .send()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    let status = res.status();

    // Keep upstream status/message so callers can surface the server's wording.
    if !status.is_success() {
        let message = res
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(ErrorResponse::into_message);
        return Err(ApiError::Upstream {
            status: status.as_u16(),
            message,
        });
    }
    Ok(res)
}

#[async_trait]
impl AuthApi for BackendClient {
    #[tracing::instrument(name = "signin", skip_all)]
    async fn signin(&self, email: &str, password: &str) -> Result<SessionInfo, ApiError> {
        send(self.post_json("auth/signin", None, &SigninRequest { email, password })).await
    }

    #[tracing::instrument(name = "signup", skip_all)]
    async fn signup(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<MessageResponse, ApiError> {
        let body = SignupRequest {
            email,
            password,
            name,
        };
        send(self.post_json("auth/signup", None, &body)).await
    }

    #[tracing::instrument(name = "verify_otp", skip_all)]
    async fn verify_otp(&self, email: &str, otp: &str) -> Result<SessionInfo, ApiError> {
        send(self.post_json("auth/verify-otp", None, &OtpRequest { email, otp })).await
    }

    #[tracing::instrument(name = "forgot_password", skip_all)]
    async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        send(self.post_json("auth/forgot-password", None, &EmailOnlyRequest { email })).await
    }

    #[tracing::instrument(name = "verify_reset_otp", skip_all)]
    async fn verify_reset_otp(&self, email: &str, otp: &str) -> Result<MessageResponse, ApiError> {
        send(self.post_json("auth/verify-reset-otp", None, &OtpRequest { email, otp })).await
    }

    #[tracing::instrument(name = "reset_password", skip_all)]
    async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let body = ResetPasswordRequest {
            email,
            new_password,
        };
        send(self.post_json("auth/reset-password", None, &body)).await
    }

    #[tracing::instrument(name = "logout", skip_all)]
    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        // Logout carries no body; only the status matters.
        let builder = self
            .http
            .post(self.endpoint("auth/logout"))
            .bearer_auth(token);
        checked(builder).await.map(|_| ())
    }
}

#[async_trait]
impl ToneApi for BackendClient {
    #[tracing::instrument(name = "tone_catalog", skip_all)]
    async fn catalog(&self, token: Option<&str>) -> Result<ToneCatalog, ApiError> {
        send(with_bearer(self.http.get(self.endpoint("tone/all")), token)).await
    }

    #[tracing::instrument(
        name = "tone_suggest",
        skip_all,
        fields(recipient = %req.recipient, occasion = %req.occasion)
    )]
    async fn suggest(
        &self,
        token: Option<&str>,
        req: &ToneSuggestionRequest,
    ) -> Result<String, ApiError> {
        let res: ToneSuggestionResponse = send(self.post_json("tone/suggest", token, req)).await?;
        Ok(res.tone)
    }
}

#[async_trait]
impl EmailApi for BackendClient {
    #[tracing::instrument(name = "email_generate", skip_all)]
    async fn generate(
        &self,
        token: Option<&str>,
        req: &GenerationRequest,
    ) -> Result<GeneratedEmail, ApiError> {
        let envelope: EmailEnvelope = send(self.post_json("email/generate", token, req)).await?;
        Ok(envelope.into_email())
    }

    #[tracing::instrument(name = "email_rewrite", skip_all)]
    async fn rewrite(
        &self,
        token: Option<&str>,
        req: &RegenerationRequest,
    ) -> Result<GeneratedEmail, ApiError> {
        let envelope: EmailEnvelope = send(self.post_json("email/rewrite", token, req)).await?;
        Ok(envelope.into_email())
    }

    #[tracing::instrument(name = "email_save", skip_all)]
    async fn save(&self, token: Option<&str>, req: &SaveEmailRequest) -> Result<(), ApiError> {
        checked(self.post_json("email/save", token, req))
            .await
            .map(|_| ())
    }

    #[tracing::instrument(name = "email_history", skip_all, fields(tone = %query.tone, page = query.page))]
    async fn history(
        &self,
        token: Option<&str>,
        query: &HistoryQuery,
    ) -> Result<HistoryPage, ApiError> {
        let mut url = self.endpoint("email/history");
        url.query_pairs_mut()
            .append_pair("tone", &query.tone)
            .append_pair("page", &query.page.to_string());
        send(with_bearer(self.http.get(url), token)).await
    }
}
