use crate::domain::{Clipboard, EmailApi, KeyValueStore, Notifier, ToneApi};
use crate::use_cases::session::SessionContext;
use std::sync::Arc;
use std::time::Duration;

// Everything a view needs, built once at start-up and handed down.
#[derive(Clone)]
pub struct AppState {
    // We use Arc<dyn Trait> to hold any implementation (dependency injection).
    pub session: Arc<SessionContext>,
    pub tones: Arc<dyn ToneApi>,
    pub emails: Arc<dyn EmailApi>,
    // Session-scoped drafts; gone when the process ends.
    pub scratch: Arc<dyn KeyValueStore>,
    pub clipboard: Arc<dyn Clipboard>,
    pub notifier: Arc<dyn Notifier>,
    // Quiet period before a tone suggestion is requested.
    pub suggest_debounce: Duration,
}
