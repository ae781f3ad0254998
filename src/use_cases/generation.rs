use crate::domain::validation::validate_generation;
use crate::domain::{
    ActionError, ApiError, GeneratedEmail, GenerationRequest, NotificationLevel, RecipientType,
    SaveEmailRequest, Selection, ToneCatalog, ToneChoice, ToneSuggestionRequest,
};
use crate::domain::selection::with_other;
use crate::interface_adapters::state::AppState;
use crate::use_cases::catalog::load_catalog;
use crate::use_cases::lifecycle::{PendingSubmit, RequestLifecycle};
use crate::use_cases::result_actions::{SaveTracker, copy_to_clipboard};
use crate::use_cases::suggestion::{SuggestionOutcome, ToneSuggester};

pub const GENERATED: &str = "Email generated successfully!";
pub const GENERATE_FAILED: &str = "Failed to generate email. Please try again.";
pub const SUGGEST_FAILED: &str = "Could not suggest a tone. Please pick one yourself.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormView {
    Input,
    Result,
}

// What was sent for the email currently on screen; the save record derives from it.
#[derive(Debug, Clone)]
struct Submitted {
    request: GenerationRequest,
    recipient_type: RecipientType,
}

/// The "generate a new email" form.
///
/// Holds recipient, occasion, tone and word count; suggests a tone once
/// recipient and occasion are both known; submits, and flips to the result
/// view on success.
pub struct GenerationForm {
    state: AppState,
    catalog: ToneCatalog,
    recipient: Selection<String>,
    occasion: Selection<String>,
    tone: Selection<ToneChoice>,
    word_count: String,
    suggester: ToneSuggester,
    request: RequestLifecycle<GeneratedEmail>,
    submitted: Option<Submitted>,
    save: SaveTracker,
    error: Option<String>,
}

impl GenerationForm {
    pub fn new(state: AppState, catalog: ToneCatalog) -> Self {
        let suggester = ToneSuggester::new(state.tones.clone(), state.suggest_debounce);
        Self {
            state,
            catalog,
            recipient: Selection::Unset,
            occasion: Selection::Unset,
            tone: Selection::Unset,
            word_count: String::new(),
            suggester,
            request: RequestLifecycle::new(),
            submitted: None,
            save: SaveTracker::default(),
            error: None,
        }
    }

    /// Loads the catalog (or its defaults) and builds an empty form.
    pub async fn mount(state: AppState) -> Self {
        let token = state.session.token();
        let catalog = load_catalog(state.tones.as_ref(), token.as_deref()).await;
        Self::new(state, catalog)
    }

    pub fn recipient_options(&self) -> Vec<String> {
        with_other(&self.catalog.designations)
    }

    pub fn occasion_options(&self) -> Vec<String> {
        with_other(&self.catalog.occasions)
    }

    pub fn tone_options(&self) -> Vec<String> {
        with_other(&self.catalog.tones)
    }

    pub fn catalog(&self) -> &ToneCatalog {
        &self.catalog
    }

    pub fn recipient(&self) -> &Selection<String> {
        &self.recipient
    }

    pub fn occasion(&self) -> &Selection<String> {
        &self.occasion
    }

    pub fn tone(&self) -> &Selection<ToneChoice> {
        &self.tone
    }

    pub fn word_count(&self) -> &str {
        &self.word_count
    }

    pub fn set_recipient(&mut self, recipient: Selection<String>) {
        self.recipient = recipient;
        self.inputs_changed();
        self.refresh_suggestion();
    }

    pub fn set_occasion(&mut self, occasion: Selection<String>) {
        self.occasion = occasion;
        self.inputs_changed();
        self.refresh_suggestion();
    }

    /// A manual pick wins over any suggestion still waiting to fire.
    pub fn set_tone(&mut self, tone: Selection<ToneChoice>) {
        self.suggester.cancel();
        self.tone = tone;
        self.inputs_changed();
    }

    pub fn set_word_count(&mut self, raw: &str) {
        self.word_count = raw.to_string();
        self.inputs_changed();
    }

    pub fn is_suggesting(&self) -> bool {
        self.suggester.is_pending()
    }

    /// Waits for the scheduled suggestion and applies it. Returns false when
    /// nothing was scheduled or the answer no longer matches the form.
    pub async fn settle_suggestion(&mut self) -> bool {
        match self.suggester.next_outcome().await {
            Some(outcome) => self.apply_suggestion(outcome),
            None => false,
        }
    }

    /// Applies a suggestion that already arrived, without waiting.
    pub fn poll_suggestion(&mut self) -> bool {
        match self.suggester.try_outcome() {
            Some(outcome) => self.apply_suggestion(outcome),
            None => false,
        }
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

    /// Inline message from the last rejected submit.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validates and enters `Pending`. Nothing is sent on a validation error.
    pub fn prepare_submit(&mut self) -> Result<PendingSubmit<GenerationRequest>, ActionError> {
        let valid = match validate_generation(
            &self.recipient,
            &self.occasion,
            &self.tone,
            &self.word_count,
        ) {
            Ok(valid) => valid,
            Err(err) => {
                self.error = Some(err.message().to_string());
                return Err(ActionError::Invalid(err));
            }
        };
        let ticket = self.request.begin().ok_or(ActionError::Busy)?;
        self.error = None;

        let recipient_type = match self.recipient {
            Selection::Other { .. } => RecipientType::Individual,
            _ => RecipientType::for_recipient(&valid.recipient),
        };
        let request = GenerationRequest {
            designation: valid.recipient,
            occasion: valid.occasion,
            tone: valid.tone,
            number_of_words: valid.number_of_words,
        };
        self.submitted = Some(Submitted {
            request: request.clone(),
            recipient_type,
        });
        Ok(PendingSubmit::new(request, ticket))
    }

    /// Applies the backend's answer. `Ok(false)` means the form had moved on
    /// and the answer was dropped.
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmit<GenerationRequest>,
        result: Result<GeneratedEmail, ApiError>,
    ) -> Result<bool, ActionError> {
        let ticket = pending.into_ticket();
        match result {
            Ok(email) => {
                if !self.request.settle(ticket, Ok(email)) {
                    tracing::debug!("generation answer arrived after the form moved on.");
                    return Ok(false);
                }
                self.save.reset();
                self.state
                    .notifier
                    .notify(NotificationLevel::Success, GENERATED);
                Ok(true)
            }
            Err(error) => {
                if !self.request.settle(ticket, Err(GENERATE_FAILED.to_string())) {
                    return Ok(false);
                }
                tracing::warn!(%error, "generation failed.");
                self.submitted = None;
                self.state
                    .notifier
                    .notify(NotificationLevel::Error, GENERATE_FAILED);
                Err(ActionError::Remote(GENERATE_FAILED.to_string()))
            }
        }
    }

    #[tracing::instrument(name = "generate_email", skip_all)]
    pub async fn submit(&mut self) -> Result<(), ActionError> {
        let pending = self.prepare_submit()?;
        let token = self.state.session.token();
        let result = self
            .state
            .emails
            .generate(token.as_deref(), &pending.request)
            .await;
        self.finish_submit(pending, result).map(|_| ())
    }

    /// "Back" / "Edit Details": drop the email and return to the inputs.
    pub fn back(&mut self) {
        self.discard_result();
    }

    /// The view is going away; late answers must not land on it.
    pub fn leave(&mut self) {
        self.suggester.cancel();
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

    /// Saves the displayed email once. Repeated calls are no-ops.
    pub async fn save(&mut self) -> Result<bool, ActionError> {
        let (Some(email), Some(submitted)) = (self.request.value(), self.submitted.as_ref()) else {
            return Ok(false);
        };
        let record = SaveEmailRequest {
            is_generated: true,
            occasion: Some(submitted.request.occasion.clone()),
            recipient_type: Some(submitted.recipient_type),
            tone: submitted.request.tone.clone(),
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
        self.submitted = None;
    }

    fn suggestion_pair(&self) -> Option<ToneSuggestionRequest> {
        Some(ToneSuggestionRequest {
            recipient: self.recipient.resolved()?.to_string(),
            occasion: self.occasion.resolved()?.to_string(),
        })
    }

    fn refresh_suggestion(&mut self) {
        match self.suggestion_pair() {
            Some(pair) => self.suggester.schedule(pair, self.state.session.token()),
            None => self.suggester.cancel(),
        }
    }

    fn apply_suggestion(&mut self, outcome: SuggestionOutcome) -> bool {
        if self.suggestion_pair().as_ref() != Some(&outcome.request) {
            return false;
        }
        match outcome.result {
            Ok(tone) => {
                tracing::debug!(%tone, "tone suggested.");
                self.tone = Selection::Option(ToneChoice::suggested(tone));
            }
            Err(error) => {
                tracing::warn!(%error, "tone suggestion failed.");
                self.tone = Selection::Unset;
                self.state
                    .notifier
                    .notify(NotificationLevel::Warning, SUGGEST_FAILED);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationError;
    use crate::use_cases::test_support::{Call, FailureFlags, Harness, RecordingBackend};
    use std::time::Duration;

    fn picked(value: &str) -> Selection<String> {
        Selection::Option(value.to_string())
    }

    fn other(custom: &str) -> Selection<String> {
        Selection::Other {
            custom: custom.to_string(),
        }
    }

    async fn filled_form(harness: &Harness) -> GenerationForm {
        let mut form = GenerationForm::mount(harness.state.clone()).await;
        form.set_recipient(picked("Team Lead"));
        form.set_occasion(picked("Leave Request"));
        form.set_tone(Selection::Option(ToneChoice::picked("Formal")));
        form
    }

    fn generate_calls(harness: &Harness) -> Vec<GenerationRequest> {
        harness
            .backend
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Generate(_, request) => Some(request),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn when_pair_changes_within_the_quiet_period_then_one_suggestion_for_the_latest_pair() {
        let harness = Harness::logged_in().await;
        let mut form = GenerationForm::mount(harness.state.clone()).await;

        form.set_recipient(picked("Manager"));
        form.set_occasion(picked("Leave Request"));
        tokio::time::sleep(Duration::from_millis(150)).await;
        form.set_recipient(other("Landlord"));
        assert!(form.is_suggesting());

        assert!(form.settle_suggestion().await);

        let suggests: Vec<Call> = harness
            .backend
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Suggest(_)))
            .collect();
        assert_eq!(
            suggests,
            vec![Call::Suggest(ToneSuggestionRequest {
                recipient: "Landlord".to_string(),
                occasion: "Leave Request".to_string(),
            })]
        );
        assert_eq!(form.tone(), &Selection::Option(ToneChoice::suggested("Formal")));
        assert_eq!(form.tone().resolved(), Some("Formal"));
    }

    #[tokio::test(start_paused = true)]
    async fn when_other_recipient_has_no_text_then_no_suggestion_is_scheduled() {
        let harness = Harness::logged_in().await;
        let mut form = GenerationForm::mount(harness.state.clone()).await;

        form.set_recipient(other("  "));
        form.set_occasion(picked("Leave Request"));
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(!form.is_suggesting());
        assert_eq!(
            harness.backend.count(|c| matches!(c, Call::Suggest(_))),
            0
        );
    }

    #[tokio::test(start_paused = true)]
    async fn when_suggestion_fails_then_tone_is_cleared_and_a_warning_is_shown() {
        let backend = RecordingBackend::new().with_failures(FailureFlags {
            suggest: true,
            ..FailureFlags::default()
        });
        let harness = Harness::with_backend(backend);
        let mut form = GenerationForm::mount(harness.state.clone()).await;
        form.set_tone(Selection::Option(ToneChoice::picked("Casual")));

        form.set_recipient(picked("HR"));
        form.set_occasion(picked("Leave Request"));
        assert!(form.settle_suggestion().await);

        assert_eq!(form.tone(), &Selection::Unset);
        assert_eq!(harness.notifier.count(NotificationLevel::Warning), 1);

        // Manual selection is still possible afterwards.
        form.set_tone(Selection::Option(ToneChoice::picked("Casual")));
        assert_eq!(form.tone(), &Selection::Option(ToneChoice::picked("Casual")));
    }

    #[tokio::test]
    async fn when_word_count_is_out_of_range_then_nothing_is_sent() {
        let harness = Harness::logged_in().await;
        let mut form = filled_form(&harness).await;
        form.set_word_count("25");

        let result = form.submit().await;

        assert_eq!(
            result,
            Err(ActionError::Invalid(ValidationError::WordCountOutOfRange))
        );
        assert_eq!(form.error(), Some("Number of words must be between 50 and 400."));
        assert!(generate_calls(&harness).is_empty());
        assert_eq!(form.view(), FormView::Input);
    }

    #[tokio::test]
    async fn when_word_count_is_valid_then_it_is_sent_as_an_integer() {
        let harness = Harness::logged_in().await;
        let mut form = filled_form(&harness).await;
        form.set_word_count("200");

        form.submit().await.expect("submit succeeds");

        assert_eq!(generate_calls(&harness)[0].number_of_words, Some(200));
        assert_eq!(form.view(), FormView::Result);
        assert_eq!(
            harness.notifier.messages(),
            vec![(NotificationLevel::Success, GENERATED.to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn when_tone_was_suggested_then_the_bare_value_is_sent() {
        let harness = Harness::logged_in().await;
        let mut form = GenerationForm::mount(harness.state.clone()).await;
        form.set_recipient(picked("Manager"));
        form.set_occasion(picked("Leave Request"));
        assert!(form.settle_suggestion().await);

        form.submit().await.expect("submit succeeds");

        let sent = &generate_calls(&harness)[0];
        assert_eq!(sent.tone, "Formal");
        assert_eq!(sent.number_of_words, None);
        assert_eq!(sent.designation, "Manager");
    }

    #[tokio::test]
    async fn when_generation_fails_then_form_stays_on_input_with_a_notification() {
        let backend = RecordingBackend::new().with_failures(FailureFlags {
            generate: true,
            ..FailureFlags::default()
        });
        let harness = Harness::with_backend(backend);
        let mut form = filled_form(&harness).await;

        let result = form.submit().await;

        assert_eq!(result, Err(ActionError::Remote(GENERATE_FAILED.to_string())));
        assert_eq!(form.view(), FormView::Input);
        assert!(!form.is_pending());
        assert_eq!(
            harness.notifier.messages(),
            vec![(NotificationLevel::Error, GENERATE_FAILED.to_string())]
        );
    }

    #[tokio::test]
    async fn when_pending_then_a_second_submit_is_busy() {
        let harness = Harness::logged_in().await;
        let mut form = filled_form(&harness).await;

        let pending = form.prepare_submit().expect("valid form");
        assert!(form.is_pending());
        assert_eq!(form.prepare_submit().err(), Some(ActionError::Busy));

        let applied = form
            .finish_submit(pending, Ok(crate::use_cases::test_support::sample_email()))
            .expect("applied");
        assert!(applied);
    }

    #[tokio::test]
    async fn when_view_was_left_then_a_late_answer_is_ignored() {
        let harness = Harness::logged_in().await;
        let mut form = filled_form(&harness).await;
        let pending = form.prepare_submit().expect("valid form");

        form.leave();
        let applied = form
            .finish_submit(pending, Ok(crate::use_cases::test_support::sample_email()))
            .expect("no error");

        assert!(!applied);
        assert_eq!(form.view(), FormView::Input);
        assert!(harness.notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn when_saved_twice_then_one_save_call_with_team_recipient_type() {
        let harness = Harness::logged_in().await;
        let mut form = filled_form(&harness).await;
        form.submit().await.expect("submit succeeds");

        assert_eq!(form.save().await, Ok(true));
        assert_eq!(form.save().await, Ok(false));

        let saves: Vec<SaveEmailRequest> = harness
            .backend
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Save(record) => Some(record),
                _ => None,
            })
            .collect();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].recipient_type, Some(RecipientType::Team));
        assert!(saves[0].is_generated);
        assert!(form.is_saved());
        assert!(!form.can_save());
    }

    #[tokio::test]
    async fn when_recipient_is_custom_then_save_uses_individual() {
        let harness = Harness::logged_in().await;
        let mut form = filled_form(&harness).await;
        form.set_recipient(other("HR"));
        form.set_tone(Selection::Option(ToneChoice::picked("Formal")));
        form.submit().await.expect("submit succeeds");

        form.save().await.expect("save succeeds");

        assert!(harness.backend.calls().iter().any(|c| matches!(
            c,
            Call::Save(record) if record.recipient_type == Some(RecipientType::Individual)
        )));
    }

    #[tokio::test]
    async fn when_going_back_then_email_is_dropped_and_save_is_enabled_for_the_next_one() {
        let harness = Harness::logged_in().await;
        let mut form = filled_form(&harness).await;
        form.submit().await.expect("submit succeeds");
        form.save().await.expect("save succeeds");

        form.back();
        assert_eq!(form.view(), FormView::Input);
        assert!(form.email().is_none());
        assert!(!form.is_saved());

        form.submit().await.expect("submit succeeds");
        assert_eq!(form.save().await, Ok(true));
        assert_eq!(harness.backend.count(|c| matches!(c, Call::Save(_))), 2);
    }

    #[tokio::test]
    async fn when_logged_in_then_generate_carries_the_bearer_token() {
        let harness = Harness::logged_in().await;
        let mut form = filled_form(&harness).await;

        form.submit().await.expect("submit succeeds");

        assert!(harness.backend.calls().iter().any(|c| matches!(
            c,
            Call::Generate(Some(token), _) if token == "token-signin"
        )));
    }

    #[tokio::test]
    async fn when_copied_from_result_view_then_clipboard_receives_the_email() {
        let harness = Harness::logged_in().await;
        let mut form = filled_form(&harness).await;
        form.submit().await.expect("submit succeeds");

        form.copy().await.expect("copy succeeds");

        assert_eq!(
            harness
                .clipboard
                .texts
                .lock()
                .expect("clipboard mutex poisoned")
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn when_a_field_changes_while_generating_then_the_late_answer_is_dropped() {
        let harness = Harness::logged_in().await;
        let mut form = filled_form(&harness).await;
        let pending = form.prepare_submit().expect("valid form");

        form.set_word_count("60");
        let applied = form
            .finish_submit(pending, Ok(crate::use_cases::test_support::sample_email()))
            .expect("no error");

        assert!(!applied);
        assert!(!form.is_pending());
        assert_eq!(form.view(), FormView::Input);
        assert!(form.email().is_none());
        assert!(harness.notifier.messages().is_empty());
    }
}
