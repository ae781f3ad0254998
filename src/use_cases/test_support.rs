use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{
    ApiError, AuthApi, Clipboard, EmailApi, GeneratedEmail, GenerationRequest, HistoryEntry,
    HistoryPage, HistoryQuery, MessageResponse, NotificationLevel, Notifier, RegenerationRequest,
    SaveEmailRequest, SessionInfo, ToneApi, ToneCatalog, ToneSuggestionRequest,
};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::storage::InMemoryKeyValueStore;
use crate::use_cases::session::SessionContext;

pub(crate) const TEST_DEBOUNCE: Duration = Duration::from_millis(300);

// Which backend calls should fail with an upstream error.
#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub signin: bool,
    pub signup: bool,
    pub verify_otp: bool,
    pub forgot_password: bool,
    pub verify_reset_otp: bool,
    pub reset_password: bool,
    pub logout: bool,
    pub catalog: bool,
    pub suggest: bool,
    pub generate: bool,
    pub rewrite: bool,
    pub save: bool,
    pub history: bool,
}

// Every call the fake backend received, in order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Signin(String),
    Signup(String),
    VerifyOtp(String, String),
    ForgotPassword(String),
    VerifyResetOtp(String, String),
    ResetPassword(String),
    Logout(String),
    Catalog,
    Suggest(ToneSuggestionRequest),
    Generate(Option<String>, GenerationRequest),
    Rewrite(RegenerationRequest),
    Save(SaveEmailRequest),
    History(HistoryQuery),
}

#[derive(Clone)]
pub(crate) struct RecordingBackend {
    calls: Arc<Mutex<Vec<Call>>>,
    failures: Arc<Mutex<FailureFlags>>,
    // Message attached to simulated upstream failures.
    failure_message: Option<String>,
    history_entries: Vec<HistoryEntry>,
}

impl RecordingBackend {
    pub(crate) fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(FailureFlags::default())),
            failure_message: None,
            history_entries: Vec::new(),
        }
    }

    pub(crate) fn with_failures(self, failures: FailureFlags) -> Self {
        *self.failures.lock().expect("failures mutex poisoned") = failures;
        self
    }

    pub(crate) fn with_failure_message(mut self, message: &str) -> Self {
        self.failure_message = Some(message.to_string());
        self
    }

    pub(crate) fn with_history(mut self, entries: Vec<HistoryEntry>) -> Self {
        self.history_entries = entries;
        self
    }

    pub(crate) fn set_failures(&self, failures: FailureFlags) {
        *self.failures.lock().expect("failures mutex poisoned") = failures;
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub(crate) fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| matches(call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }

    fn fail_if(&self, pick: impl Fn(&FailureFlags) -> bool) -> Result<(), ApiError> {
        let failures = *self.failures.lock().expect("failures mutex poisoned");
        if pick(&failures) {
            return Err(ApiError::Upstream {
                status: 400,
                message: self.failure_message.clone(),
            });
        }
        Ok(())
    }
}

pub(crate) fn sample_email() -> GeneratedEmail {
    GeneratedEmail {
        subject: "Leave request".to_string(),
        body: "Hi,\nI would like Friday off.".to_string(),
        outro: "Thanks,\nAda".to_string(),
    }
}

fn session_info(token: &str) -> SessionInfo {
    SessionInfo {
        token: token.to_string(),
        message: None,
        user: None,
    }
}

#[async_trait]
impl AuthApi for RecordingBackend {
    async fn signin(&self, email: &str, _password: &str) -> Result<SessionInfo, ApiError> {
        self.record(Call::Signin(email.to_string()));
        self.fail_if(|f| f.signin)?;
        Ok(session_info("token-signin"))
    }

    async fn signup(
        &self,
        email: &str,
        _password: &str,
        _name: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.record(Call::Signup(email.to_string()));
        self.fail_if(|f| f.signup)?;
        Ok(MessageResponse {
            message: Some("OTP sent to your email".to_string()),
        })
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<SessionInfo, ApiError> {
        self.record(Call::VerifyOtp(email.to_string(), otp.to_string()));
        self.fail_if(|f| f.verify_otp)?;
        Ok(session_info("token-otp"))
    }

    async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        self.record(Call::ForgotPassword(email.to_string()));
        self.fail_if(|f| f.forgot_password)?;
        Ok(MessageResponse::default())
    }

    async fn verify_reset_otp(&self, email: &str, otp: &str) -> Result<MessageResponse, ApiError> {
        self.record(Call::VerifyResetOtp(email.to_string(), otp.to_string()));
        self.fail_if(|f| f.verify_reset_otp)?;
        Ok(MessageResponse::default())
    }

    async fn reset_password(
        &self,
        email: &str,
        _new_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.record(Call::ResetPassword(email.to_string()));
        self.fail_if(|f| f.reset_password)?;
        Ok(MessageResponse::default())
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        self.record(Call::Logout(token.to_string()));
        let failures = *self.failures.lock().expect("failures mutex poisoned");
        if failures.logout {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ToneApi for RecordingBackend {
    async fn catalog(&self, _token: Option<&str>) -> Result<ToneCatalog, ApiError> {
        self.record(Call::Catalog);
        self.fail_if(|f| f.catalog)?;
        Ok(ToneCatalog {
            designations: vec!["Manager".to_string(), "Team Lead".to_string()],
            occasions: vec!["Leave Request".to_string()],
            tones: vec!["Formal".to_string(), "Friendly".to_string()],
        })
    }

    async fn suggest(
        &self,
        _token: Option<&str>,
        req: &ToneSuggestionRequest,
    ) -> Result<String, ApiError> {
        self.record(Call::Suggest(req.clone()));
        self.fail_if(|f| f.suggest)?;
        Ok("Formal".to_string())
    }
}

#[async_trait]
impl EmailApi for RecordingBackend {
    async fn generate(
        &self,
        token: Option<&str>,
        req: &GenerationRequest,
    ) -> Result<GeneratedEmail, ApiError> {
        self.record(Call::Generate(token.map(str::to_string), req.clone()));
        self.fail_if(|f| f.generate)?;
        Ok(sample_email())
    }

    async fn rewrite(
        &self,
        _token: Option<&str>,
        req: &RegenerationRequest,
    ) -> Result<GeneratedEmail, ApiError> {
        self.record(Call::Rewrite(req.clone()));
        self.fail_if(|f| f.rewrite)?;
        Ok(sample_email())
    }

    async fn save(&self, _token: Option<&str>, req: &SaveEmailRequest) -> Result<(), ApiError> {
        self.record(Call::Save(req.clone()));
        self.fail_if(|f| f.save)
    }

    async fn history(
        &self,
        _token: Option<&str>,
        query: &HistoryQuery,
    ) -> Result<HistoryPage, ApiError> {
        self.record(Call::History(query.clone()));
        self.fail_if(|f| f.history)?;
        Ok(HistoryPage {
            emails: self.history_entries.clone(),
            pagination: crate::domain::email::Pagination { total_pages: 2 },
        })
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingNotifier {
    seen: Arc<Mutex<Vec<(NotificationLevel, String)>>>,
}

impl RecordingNotifier {
    pub(crate) fn messages(&self) -> Vec<(NotificationLevel, String)> {
        self.seen.lock().expect("notifier mutex poisoned").clone()
    }

    pub(crate) fn count(&self, level: NotificationLevel) -> usize {
        self.messages().iter().filter(|(l, _)| *l == level).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        self.seen
            .lock()
            .expect("notifier mutex poisoned")
            .push((level, message.to_string()));
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingClipboard {
    pub(crate) texts: Arc<Mutex<Vec<String>>>,
    pub(crate) fail: bool,
}

#[async_trait]
impl Clipboard for RecordingClipboard {
    async fn write_text(&self, text: &str) -> Result<(), String> {
        if self.fail {
            return Err("clipboard unavailable".to_string());
        }
        self.texts
            .lock()
            .expect("clipboard mutex poisoned")
            .push(text.to_string());
        Ok(())
    }
}

// Wiring used by orchestrator tests: every port backed by a recording fake.
pub(crate) struct Harness {
    pub backend: RecordingBackend,
    pub notifier: RecordingNotifier,
    pub clipboard: RecordingClipboard,
    pub durable: InMemoryKeyValueStore,
    pub scratch: InMemoryKeyValueStore,
    pub state: AppState,
}

impl Harness {
    pub(crate) async fn logged_in() -> Self {
        let harness = Self::with_backend(RecordingBackend::new());
        harness
            .state
            .session
            .login("ada@example.com", "Str0ng!pass")
            .await
            .expect("fake login succeeds");
        harness
    }

    pub(crate) fn with_backend(backend: RecordingBackend) -> Self {
        let notifier = RecordingNotifier::default();
        let clipboard = RecordingClipboard::default();
        let durable = InMemoryKeyValueStore::new();
        let scratch = InMemoryKeyValueStore::new();
        let session = Arc::new(SessionContext::new(
            Arc::new(backend.clone()),
            Arc::new(durable.clone()),
        ));
        let state = AppState {
            session,
            tones: Arc::new(backend.clone()),
            emails: Arc::new(backend.clone()),
            scratch: Arc::new(scratch.clone()),
            clipboard: Arc::new(clipboard.clone()),
            notifier: Arc::new(notifier.clone()),
            suggest_debounce: TEST_DEBOUNCE,
        };
        Self {
            backend,
            notifier,
            clipboard,
            durable,
            scratch,
            state,
        }
    }

    pub(crate) fn with_clipboard(mut self, clipboard: RecordingClipboard) -> Self {
        self.state.clipboard = Arc::new(clipboard.clone());
        self.clipboard = clipboard;
        self
    }
}
