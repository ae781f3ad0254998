pub mod email;
pub mod errors;
pub mod ports;
pub mod selection;
pub mod session;
pub mod validation;

// Re-export the domain boundary types and ports.
pub use email::{
    GeneratedEmail, GenerationRequest, HistoryEntry, HistoryPage, HistoryQuery, RecipientType,
    RegenerationRequest, SaveEmailRequest, ToneCatalog, ToneSuggestionRequest,
};
pub use errors::{ActionError, ApiError};
pub use ports::{AuthApi, Clipboard, EmailApi, KeyValueStore, NotificationLevel, Notifier, ToneApi};
pub use selection::{OTHER, Selection, ToneChoice};
pub use session::{MessageResponse, Session, SessionInfo, SessionStatus};
pub use validation::ValidationError;
