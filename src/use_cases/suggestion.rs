// Debounced tone suggestion.
//
// Each qualifying edit reschedules a single timer task; when the quiet period
// elapses the task calls the backend and reports through a channel. Only the
// most recent schedule can report: rescheduling or cancelling aborts the task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::{ApiError, ToneApi, ToneSuggestionRequest};

#[derive(Debug)]
pub struct SuggestionOutcome {
    pub request: ToneSuggestionRequest,
    pub result: Result<String, ApiError>,
    // Schedule this outcome answers; older ones are discarded on receipt.
    seq: u64,
}

pub struct ToneSuggester {
    api: Arc<dyn ToneApi>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    seq: u64,
    tx: mpsc::UnboundedSender<SuggestionOutcome>,
    rx: mpsc::UnboundedReceiver<SuggestionOutcome>,
}

impl ToneSuggester {
    pub fn new(api: Arc<dyn ToneApi>, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            delay,
            pending: None,
            seq: 0,
            tx,
            rx,
        }
    }

    /// True from scheduling until the outcome has been taken.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts (or restarts) the quiet-period timer for `request`.
    pub fn schedule(&mut self, request: ToneSuggestionRequest, token: Option<String>) {
        self.cancel();
        self.seq += 1;
        let seq = self.seq;
        let api = Arc::clone(&self.api);
        let delay = self.delay;
        let tx = self.tx.clone();
        tracing::debug!(recipient = %request.recipient, occasion = %request.occasion, "tone suggestion scheduled.");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = api.suggest(token.as_deref(), &request).await;
            // The receiver only goes away with the form; nothing to report to then.
            let _ = tx.send(SuggestionOutcome {
                request,
                result,
                seq,
            });
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        // An aborted task may still have sent; bumping the sequence makes that stale.
        self.seq += 1;
    }

    /// Waits for the scheduled suggestion. Returns `None` when nothing is scheduled.
    pub async fn next_outcome(&mut self) -> Option<SuggestionOutcome> {
        self.pending.as_ref()?;
        while let Some(outcome) = self.rx.recv().await {
            if outcome.seq == self.seq {
                self.pending = None;
                return Some(outcome);
            }
        }
        None
    }

    /// Takes a finished outcome without waiting.
    pub fn try_outcome(&mut self) -> Option<SuggestionOutcome> {
        while let Ok(outcome) = self.rx.try_recv() {
            if outcome.seq == self.seq {
                self.pending = None;
                return Some(outcome);
            }
        }
        None
    }
}

impl Drop for ToneSuggester {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
