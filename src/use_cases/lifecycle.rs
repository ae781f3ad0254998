// Request lifecycle shared by every orchestrator action.
//
// One action has at most one request in flight. Each `begin` hands out a
// ticket stamped with the current generation; `reset` bumps the generation so
// a response that arrives after the view moved on is dropped on `settle`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(String),
}

/// Proof that a request was started; consumed when it settles.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct Ticket {
    generation: u64,
}

/// A validated request waiting to be sent, tied to the lifecycle that began it.
#[derive(Debug)]
#[must_use]
pub struct PendingSubmit<R> {
    pub request: R,
    ticket: Ticket,
}

impl<R> PendingSubmit<R> {
    pub(crate) fn new(request: R, ticket: Ticket) -> Self {
        Self { request, ticket }
    }

    pub(crate) fn into_ticket(self) -> Ticket {
        self.ticket
    }
}

#[derive(Debug)]
pub struct RequestLifecycle<T> {
    state: RequestState<T>,
    generation: u64,
}

impl<T> Default for RequestLifecycle<T> {
    fn default() -> Self {
        Self {
            state: RequestState::Idle,
            generation: 0,
        }
    }
}

impl<T> RequestLifecycle<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState<T> {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, RequestState::Pending)
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            RequestState::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Enters `Pending`. Returns `None` while a request is already in flight.
    pub fn begin(&mut self) -> Option<Ticket> {
        if self.is_pending() {
            return None;
        }
        self.generation += 1;
        self.state = RequestState::Pending;
        Some(Ticket {
            generation: self.generation,
        })
    }

    /// Applies an outcome. Returns false when the ticket is stale, in which
    /// case the state is left untouched.
    pub fn settle(&mut self, ticket: Ticket, outcome: Result<T, String>) -> bool {
        if ticket.generation != self.generation || !self.is_pending() {
            return false;
        }
        self.state = match outcome {
            Ok(value) => RequestState::Succeeded(value),
            Err(message) => RequestState::Failed(message),
        };
        true
    }

    /// Back to `Idle`; outstanding tickets become stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = RequestState::Idle;
    }
}
