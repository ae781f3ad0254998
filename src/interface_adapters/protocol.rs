use crate::domain::GeneratedEmail;
use serde::Deserialize;

// Error body returned by the backend; older endpoints use `message`, newer ones `error`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn into_message(self) -> Option<String> {
        self.error
            .filter(|e| !e.trim().is_empty())
            .or(self.message.filter(|m| !m.trim().is_empty()))
    }
}

// Body of POST /tone/suggest.
#[derive(Debug, Deserialize)]
pub struct ToneSuggestionResponse {
    #[serde(alias = "suggestedTone")]
    pub tone: String,
}

// An unwrapped email must at least carry a subject, so unrelated bodies fail to decode.
#[derive(Debug, Deserialize)]
pub struct BareEmail {
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub outro: String,
}

// Generate and rewrite answer either with the email itself or wrapped in a key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EmailEnvelope {
    Wrapped { email: GeneratedEmail },
    Rewritten {
        #[serde(rename = "rewrittenEmail")]
        rewritten_email: GeneratedEmail,
    },
    Bare(BareEmail),
}

impl EmailEnvelope {
    pub fn into_email(self) -> GeneratedEmail {
        match self {
            EmailEnvelope::Wrapped { email } => email,
            EmailEnvelope::Rewritten { rewritten_email } => rewritten_email,
            EmailEnvelope::Bare(BareEmail {
                subject,
                body,
                outro,
            }) => GeneratedEmail {
                subject,
                body,
                outro,
            },
        }
    }
}
