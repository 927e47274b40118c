//! Request and response payloads exchanged over the HTTP API.

use serde::{Deserialize, Serialize};

/// Returned after a successful save; carries the system-generated record id.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub record_id: String,
}

/// Query string for the report listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring filter on the identity column.
    pub search: Option<String>,
}

/// Payload for `POST /api/notify`. `recipients` is comma-separated free text,
/// trimmed per entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct NotifyRequest {
    pub recipients: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub attachment_url: Option<String>,
}

/// Invitation metadata sent alongside an optional document part on
/// `POST /api/notify/invite`.
#[derive(Debug, Serialize, Deserialize)]
pub struct InviteRequest {
    pub recipients: String,
    pub subject: String,
    pub case_number: String,
}

/// Delivery result for a single recipient. Failures are independent: one
/// rejected address never stops the rest of the batch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecipientOutcome {
    pub recipient: String,
    pub accepted: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotifySummary {
    pub sent: usize,
    pub failed: usize,
    pub outcomes: Vec<RecipientOutcome>,
}

impl NotifySummary {
    pub fn from_outcomes(outcomes: Vec<RecipientOutcome>) -> Self {
        let sent = outcomes.iter().filter(|o| o.accepted).count();
        NotifySummary {
            sent,
            failed: outcomes.len() - sent,
            outcomes,
        }
    }
}

/// Locator returned by the media upload endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub id: String,
    pub url: String,
    pub md5: String,
    pub file_name: String,
}
