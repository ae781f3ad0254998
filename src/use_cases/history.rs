use crate::domain::{
    ActionError, GeneratedEmail, HistoryEntry, HistoryQuery, NotificationLevel, OTHER,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::lifecycle::RequestLifecycle;
use crate::use_cases::result_actions::copy_to_clipboard;

pub const HISTORY_FAILED: &str = "Failed to fetch email history. Please try again.";
pub const NOT_IN_HISTORY: &str = "Email not found in history.";

// Filter value meaning "no tone filter".
pub const ALL_TONES: &str = "all";

// Tone filters offered when the catalog cannot be loaded.
const FALLBACK_TONES: [&str; 3] = ["Friendly", "Professional", "Casual"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryTab {
    #[default]
    Generated,
    Regenerated,
}

/// Paginated, tone-filtered view over saved emails.
pub struct HistoryBrowser {
    state: AppState,
    filters: Vec<String>,
    filter: String,
    page: u32,
    total_pages: u32,
    entries: Vec<HistoryEntry>,
    tab: HistoryTab,
    request: RequestLifecycle<()>,
}

impl HistoryBrowser {
    /// Loads the tone filters and the first page.
    pub async fn mount(state: AppState) -> Self {
        let token = state.session.token();
        let tones = match state.tones.catalog(token.as_deref()).await {
            Ok(catalog) => catalog.tones,
            Err(error) => {
                tracing::warn!(%error, "failed to load tones for history filter.");
                FALLBACK_TONES.map(String::from).to_vec()
            }
        };
        let mut browser = Self::new(state, tones);
        // A failed first load has already been reported; the browser stays empty.
        let _ = browser.load(ALL_TONES.to_string(), 1).await;
        browser
    }

    pub fn new(state: AppState, tones: Vec<String>) -> Self {
        let mut filters = Vec::with_capacity(tones.len() + 2);
        filters.push(ALL_TONES.to_string());
        filters.extend(tones.into_iter().filter(|t| t != OTHER && t != ALL_TONES));
        filters.push(OTHER.to_string());
        Self {
            state,
            filters,
            filter: ALL_TONES.to_string(),
            page: 1,
            total_pages: 1,
            entries: Vec::new(),
            tab: HistoryTab::default(),
            request: RequestLifecycle::new(),
        }
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn tab(&self) -> HistoryTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: HistoryTab) {
        self.tab = tab;
    }

    pub fn is_loading(&self) -> bool {
        self.request.is_pending()
    }

    /// Entries of the current page that belong to the selected tab.
    pub fn visible(&self) -> Vec<&HistoryEntry> {
        let generated = self.tab == HistoryTab::Generated;
        self.entries
            .iter()
            .filter(|entry| entry.is_generated == generated)
            .collect()
    }

    /// A new filter always starts from the first page.
    pub async fn set_filter(&mut self, tone: &str) -> Result<(), ActionError> {
        self.load(tone.to_string(), 1).await
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<(), ActionError> {
        let page = page.clamp(1, self.total_pages.max(1));
        self.load(self.filter.clone(), page).await
    }

    pub async fn next_page(&mut self) -> Result<(), ActionError> {
        if self.page >= self.total_pages {
            return Ok(());
        }
        self.go_to_page(self.page + 1).await
    }

    pub async fn previous_page(&mut self) -> Result<(), ActionError> {
        if self.page <= 1 {
            return Ok(());
        }
        self.go_to_page(self.page - 1).await
    }

    pub async fn refresh(&mut self) -> Result<(), ActionError> {
        self.load(self.filter.clone(), self.page).await
    }

    /// Entry `id` on the loaded page.
    pub fn entry(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// The stored email for `id`; blank when the entry or its email is missing.
    pub fn open(&self, id: &str) -> GeneratedEmail {
        self.entry(id)
            .and_then(|entry| entry.rewritten_email.clone())
            .unwrap_or_default()
    }

    /// Copies entry `id`; an id not on the loaded page leaves the clipboard alone.
    pub async fn copy(&self, id: &str) -> Result<(), ActionError> {
        if self.entry(id).is_none() {
            tracing::warn!(id, "copy requested for unknown history entry.");
            self.state
                .notifier
                .notify(NotificationLevel::Error, NOT_IN_HISTORY);
            return Err(ActionError::Remote(NOT_IN_HISTORY.to_string()));
        }
        let email = self.open(id);
        copy_to_clipboard(
            self.state.clipboard.as_ref(),
            self.state.notifier.as_ref(),
            &email,
        )
        .await
    }

    // On failure the previous page, filter and entries stay in place.
    #[tracing::instrument(name = "load_history", skip(self))]
    async fn load(&mut self, filter: String, page: u32) -> Result<(), ActionError> {
        let ticket = self.request.begin().ok_or(ActionError::Busy)?;
        let query = HistoryQuery {
            tone: query_tone(&filter),
            page,
        };
        let token = self.state.session.token();
        match self.state.emails.history(token.as_deref(), &query).await {
            Ok(result) => {
                self.request.settle(ticket, Ok(()));
                self.filter = filter;
                self.page = page;
                self.total_pages = result.pagination.total_pages.max(1);
                self.entries = result.emails;
                tracing::debug!(entries = self.entries.len(), "history page loaded.");
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "history request failed.");
                self.request.settle(ticket, Err(HISTORY_FAILED.to_string()));
                self.state
                    .notifier
                    .notify(NotificationLevel::Error, HISTORY_FAILED);
                Err(ActionError::Remote(HISTORY_FAILED.to_string()))
            }
        }
    }
}

// The backend expects the escape filter in lower case.
fn query_tone(filter: &str) -> String {
    if filter == OTHER {
        "other".to_string()
    } else {
        filter.to_string()
    }
}
