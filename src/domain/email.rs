use serde::{Deserialize, Serialize};

// The serialization within this layer is a dependency leak, but its a pragmatic approach:
// these shapes are exactly what the backend speaks, so the adapters pass them through.

// Recipients that address a group rather than a single person.
pub const TEAM_RECIPIENTS: [&str; 3] = ["Team Lead", "HR", "Client"];

// Inclusive bounds for the optional word count.
pub const MIN_WORDS: u32 = 50;
pub const MAX_WORDS: u32 = 400;

/// A drafted or rewritten email as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedEmail {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub outro: String,
}

/// Payload for `POST /email/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub designation: String,
    pub occasion: String,
    pub tone: String,
    // Omitted entirely when the user left it blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_words: Option<u32>,
}

/// Payload for `POST /email/rewrite`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerationRequest {
    pub original_email: String,
    pub tone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_words: Option<u32>,
}

/// Payload for `POST /tone/suggest`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ToneSuggestionRequest {
    pub recipient: String,
    pub occasion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecipientType {
    Team,
    Individual,
}

impl RecipientType {
    // "Other" and every custom recipient count as an individual.
    pub fn for_recipient(recipient: &str) -> Self {
        if TEAM_RECIPIENTS.contains(&recipient) {
            RecipientType::Team
        } else {
            RecipientType::Individual
        }
    }
}

/// Record submitted to `POST /email/save`; the server assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEmailRequest {
    pub is_generated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_type: Option<RecipientType>,
    pub tone: String,
    pub rewritten_email: GeneratedEmail,
}

/// Lists offered by `GET /tone/all`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToneCatalog {
    #[serde(default)]
    pub designations: Vec<String>,
    #[serde(default)]
    pub occasions: Vec<String>,
    #[serde(default)]
    pub tones: Vec<String>,
}

impl ToneCatalog {
    // Used whenever the catalog endpoint is unreachable.
    pub fn fallback() -> Self {
        Self {
            designations: ["Manager", "Team Lead", "HR", "Client", "Colleague"]
                .map(String::from)
                .to_vec(),
            occasions: [
                "Leave Request",
                "Meeting Request",
                "Follow Up",
                "Thank You",
                "Apology",
            ]
            .map(String::from)
            .to_vec(),
            tones: ["Friendly", "Professional", "Casual"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// One row of `GET /email/history`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub is_generated: bool,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub recipient_type: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub rewritten_email: Option<GeneratedEmail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default = "first_page")]
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { total_pages: 1 }
    }
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub emails: Vec<HistoryEntry>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Query for one page of history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub tone: String,
    pub page: u32,
}
