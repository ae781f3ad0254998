// Use cases layer: session, navigation and form workflows of the client.

pub mod catalog;
pub mod generation;
pub mod history;
pub mod lifecycle;
pub mod password_reset;
pub mod regeneration;
pub mod result_actions;
pub mod route_guard;
pub mod session;
pub mod signup;
pub mod suggestion;

#[cfg(test)]
pub(crate) mod test_support;

pub use generation::{FormView, GenerationForm};
pub use history::{HistoryBrowser, HistoryTab};
pub use lifecycle::{RequestLifecycle, RequestState};
pub use password_reset::{PasswordResetFlow, ResetStep};
pub use regeneration::RegenerationForm;
pub use route_guard::{GuardDecision, Route};
pub use session::SessionContext;
pub use signup::{SignupFlow, SignupStep};
