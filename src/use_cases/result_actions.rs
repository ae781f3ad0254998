use crate::domain::{
    ActionError, Clipboard, EmailApi, GeneratedEmail, NotificationLevel, Notifier,
    SaveEmailRequest,
};
use crate::interface_adapters::presenter::clipboard_text;
use crate::use_cases::lifecycle::RequestLifecycle;

pub const COPIED: &str = "Email copied to clipboard!";
pub const COPY_FAILED: &str = "Failed to copy email.";
pub const SAVED: &str = "Email saved to history!";
pub const SAVE_FAILED: &str = "Failed to save email. Please try again.";

/// Puts subject, body and outro on the clipboard and confirms with a notification.
pub async fn copy_to_clipboard(
    clipboard: &dyn Clipboard,
    notifier: &dyn Notifier,
    email: &GeneratedEmail,
) -> Result<(), ActionError> {
    match clipboard.write_text(&clipboard_text(email)).await {
        Ok(()) => {
            notifier.notify(NotificationLevel::Success, COPIED);
            Ok(())
        }
        Err(error) => {
            tracing::warn!(%error, "copy failed.");
            notifier.notify(NotificationLevel::Error, COPY_FAILED);
            Err(ActionError::Remote(COPY_FAILED.to_string()))
        }
    }
}

// Save state for one displayed email. Once saved, further saves are no-ops
// until `reset` (a new email).
#[derive(Debug, Default)]
pub struct SaveTracker {
    saved: bool,
    request: RequestLifecycle<()>,
}

impl SaveTracker {
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn is_pending(&self) -> bool {
        self.request.is_pending()
    }

    /// A save control is enabled only while neither saved nor saving.
    pub fn can_save(&self) -> bool {
        !self.saved && !self.is_pending()
    }

    pub fn reset(&mut self) {
        self.saved = false;
        self.request.reset();
    }

    /// Returns `Ok(true)` when a save call was made and succeeded, `Ok(false)`
    /// when the email was already saved.
    pub async fn save(
        &mut self,
        emails: &dyn EmailApi,
        token: Option<&str>,
        notifier: &dyn Notifier,
        record: &SaveEmailRequest,
    ) -> Result<bool, ActionError> {
        if self.saved {
            return Ok(false);
        }
        let ticket = self.request.begin().ok_or(ActionError::Busy)?;
        match emails.save(token, record).await {
            Ok(()) => {
                self.request.settle(ticket, Ok(()));
                self.saved = true;
                notifier.notify(NotificationLevel::Success, SAVED);
                Ok(true)
            }
            Err(error) => {
                tracing::warn!(%error, "save failed.");
                self.request.settle(ticket, Err(SAVE_FAILED.to_string()));
                notifier.notify(NotificationLevel::Error, SAVE_FAILED);
                Err(ActionError::remote(&error, SAVE_FAILED))
            }
        }
    }
}
