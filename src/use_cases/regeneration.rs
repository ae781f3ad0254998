use crate::domain::selection::with_other;
use crate::domain::validation::validate_regeneration;
use crate::domain::{
    ActionError, ApiError, GeneratedEmail, NotificationLevel, OTHER, RegenerationRequest,
    SaveEmailRequest, Selection,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::catalog::load_catalog;
use crate::use_cases::generation::FormView;
use crate::use_cases::lifecycle::{PendingSubmit, RequestLifecycle};
use crate::use_cases::result_actions::{SaveTracker, copy_to_clipboard};

pub const REWRITTEN: &str = "Email rewritten successfully!";
pub const REWRITE_FAILED: &str = "Failed to rewrite email. Please try again.";

// Scratch-storage keys for the draft.
pub const DRAFT_ORIGINAL_EMAIL: &str = "regen.originalEmail";
pub const DRAFT_TONE: &str = "regen.tone";
pub const DRAFT_WORD_COUNT: &str = "regen.numberOfWords";

/// The "rewrite an existing email" form. Its fields survive re-mounting
/// within one session through scratch storage.
pub struct RegenerationForm {
    state: AppState,
    tones: Vec<String>,
    original_email: String,
    tone: Selection<String>,
    word_count: String,
    request: RequestLifecycle<GeneratedEmail>,
    submitted_tone: Option<String>,
    save: SaveTracker,
    error: Option<String>,
}

impl RegenerationForm {
    /// Loads the tone list and restores any draft left by an earlier visit.
    pub async fn mount(state: AppState) -> Self {
        let token = state.session.token();
        let catalog = load_catalog(state.tones.as_ref(), token.as_deref()).await;
        let mut form = Self::new(state, catalog.tones);
        form.restore_draft().await;
        form
    }

    pub fn new(state: AppState, tones: Vec<String>) -> Self {
        Self {
            state,
            tones,
            original_email: String::new(),
            tone: Selection::Unset,
            word_count: String::new(),
            request: RequestLifecycle::new(),
            submitted_tone: None,
            save: SaveTracker::default(),
            error: None,
        }
    }

    pub fn tone_options(&self) -> Vec<String> {
        with_other(&self.tones)
    }

    pub fn original_email(&self) -> &str {
        &self.original_email
    }

    pub fn tone(&self) -> &Selection<String> {
        &self.tone
    }

    pub fn word_count(&self) -> &str {
        &self.word_count
    }

    pub async fn set_original_email(&mut self, text: &str) {
        self.original_email = text.to_string();
        self.inputs_changed();
        self.write_draft(DRAFT_ORIGINAL_EMAIL, text).await;
    }

    pub async fn set_tone(&mut self, tone: Selection<String>) {
        self.tone = tone;
        self.inputs_changed();
        let label = self.tone.picked_label().unwrap_or_default().to_string();
        self.write_draft(DRAFT_TONE, &label).await;
    }

    pub async fn set_word_count(&mut self, raw: &str) {
        self.word_count = raw.to_string();
        self.inputs_changed();
        self.write_draft(DRAFT_WORD_COUNT, raw).await;
    }

    pub fn view(&self) -> FormView {
        if self.request.value().is_some() {
            FormView::Result
        } else {
            FormView::Input
        }
    }

    pub fn email(&self) -> Option<&GeneratedEmail> {
        self.request.value()
    }

    pub fn is_pending(&self) -> bool {
        self.request.is_pending()
    }

    pub fn is_saved(&self) -> bool {
        self.save.is_saved()
    }

    pub fn can_save(&self) -> bool {
        self.email().is_some() && self.save.can_save()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn prepare_submit(&mut self) -> Result<PendingSubmit<RegenerationRequest>, ActionError> {
        let valid =
            match validate_regeneration(&self.original_email, &self.tone, &self.word_count) {
                Ok(valid) => valid,
                Err(err) => {
                    self.error = Some(err.message().to_string());
                    return Err(ActionError::Invalid(err));
                }
            };
        let ticket = self.request.begin().ok_or(ActionError::Busy)?;
        self.error = None;
        self.submitted_tone = Some(valid.tone.clone());
        let request = RegenerationRequest {
            original_email: valid.original_email,
            tone: valid.tone,
            number_of_words: valid.number_of_words,
        };
        Ok(PendingSubmit::new(request, ticket))
    }

    pub fn finish_submit(
        &mut self,
        pending: PendingSubmit<RegenerationRequest>,
        result: Result<GeneratedEmail, ApiError>,
    ) -> Result<bool, ActionError> {
        let ticket = pending.into_ticket();
        match result {
            Ok(email) => {
                if !self.request.settle(ticket, Ok(email)) {
                    tracing::debug!("rewrite answer arrived after the form moved on.");
                    return Ok(false);
                }
                self.save.reset();
                self.state
                    .notifier
                    .notify(NotificationLevel::Success, REWRITTEN);
                Ok(true)
            }
            Err(error) => {
                if !self.request.settle(ticket, Err(REWRITE_FAILED.to_string())) {
                    return Ok(false);
                }
                tracing::warn!(%error, "rewrite failed.");
                self.submitted_tone = None;
                self.state
                    .notifier
                    .notify(NotificationLevel::Error, REWRITE_FAILED);
                Err(ActionError::Remote(REWRITE_FAILED.to_string()))
            }
        }
    }

    #[tracing::instrument(name = "rewrite_email", skip_all)]
    pub async fn submit(&mut self) -> Result<(), ActionError> {
        let pending = self.prepare_submit()?;
        let token = self.state.session.token();
        let result = self
            .state
            .emails
            .rewrite(token.as_deref(), &pending.request)
            .await;
        self.finish_submit(pending, result).map(|_| ())
    }

    pub fn back(&mut self) {
        self.discard_result();
    }

    pub fn leave(&mut self) {
        self.discard_result();
    }

    pub async fn copy(&self) -> Result<(), ActionError> {
        let Some(email) = self.email() else {
            return Ok(());
        };
        copy_to_clipboard(
            self.state.clipboard.as_ref(),
            self.state.notifier.as_ref(),
            email,
        )
        .await
    }

    pub async fn save(&mut self) -> Result<bool, ActionError> {
        let (Some(email), Some(tone)) = (self.request.value(), self.submitted_tone.as_ref()) else {
            return Ok(false);
        };
        let record = SaveEmailRequest {
            is_generated: false,
            occasion: None,
            recipient_type: None,
            tone: tone.clone(),
            rewritten_email: email.clone(),
        };
        let token = self.state.session.token();
        self.save
            .save(
                self.state.emails.as_ref(),
                token.as_deref(),
                self.state.notifier.as_ref(),
                &record,
            )
            .await
    }

    // A shown or pending result no longer matches the inputs.
    fn inputs_changed(&mut self) {
        if self.view() == FormView::Result || self.request.is_pending() {
            self.discard_result();
        }
        self.error = None;
    }

    fn discard_result(&mut self) {
        self.request.reset();
        self.save.reset();
        self.submitted_tone = None;
    }

    async fn write_draft(&self, key: &str, value: &str) {
        if let Err(error) = self.state.scratch.set(key, value).await {
            tracing::warn!(key, %error, "failed to store draft field.");
        }
    }

    async fn read_draft(&self, key: &str) -> Option<String> {
        match self.state.scratch.get(key).await {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(key, %error, "failed to read draft field.");
                None
            }
        }
    }

    async fn restore_draft(&mut self) {
        if let Some(text) = self.read_draft(DRAFT_ORIGINAL_EMAIL).await {
            self.original_email = text;
        }
        if let Some(raw) = self.read_draft(DRAFT_WORD_COUNT).await {
            self.word_count = raw;
        }
        if let Some(tone) = self.read_draft(DRAFT_TONE).await {
            self.tone = if tone == OTHER {
                Selection::Other {
                    custom: String::new(),
                }
            } else if self.tones.iter().any(|t| *t == tone) {
                Selection::Option(tone)
            } else {
                if !tone.is_empty() {
                    tracing::debug!(%tone, "stored tone is no longer offered; dropping it.");
                }
                Selection::Unset
            };
        }
    }
}
