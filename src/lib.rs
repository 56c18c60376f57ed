pub mod api;
pub mod cli;
pub mod gesture;
pub mod queue;
pub mod store;
pub mod tui;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted review status of a script on the store side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReviewStatus::Pending),
            "approved" => Ok(ReviewStatus::Approved),
            "rejected" => Ok(ReviewStatus::Rejected),
            other => Err(format!("unknown review status: {other}")),
        }
    }
}

/// Client-local lifecycle of a queued script.
///
/// `Approving`/`Rejecting` are the optimistic in-flight states; they resolve
/// to the terminal state when the store call succeeds, or back to `Pending`
/// when it fails. Only a `Pending` item accepts a new decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionState {
    Pending,
    Approving,
    Approved,
    Rejecting,
    Rejected,
}

/// The two review decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Wire representation used by the review endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "approved",
            Decision::Reject => "rejected",
        }
    }
}

/// Metadata shown as card chrome. Read-only from the review core's
/// perspective; `extra` carries category-specific attributes verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptMetadata {
    pub script_id: String,
    pub filename: String,
    pub dj: String,
    #[serde(default)]
    pub content_type: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub word_count: usize,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An AI-generated script awaiting a decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub metadata: ScriptMetadata,
    pub content: String,
}

/// Queue entry: a script plus its client-local decision state.
#[derive(Debug, Clone)]
pub struct ReviewItem {
    pub script: Script,
    pub state: DecisionState,
}

impl ReviewItem {
    pub fn pending(script: Script) -> Self {
        Self {
            script,
            state: DecisionState::Pending,
        }
    }

    pub fn id(&self) -> &str {
        &self.script.metadata.script_id
    }
}

/// A pre-defined rejection reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionReason {
    pub id: String,
    pub label: String,
    pub category: String,
}

/// Catalogue id of the free-text reason; rejecting with it requires a comment.
pub const OTHER_REASON_ID: &str = "other";

/// The built-in rejection reason catalogue, used by the local library and as
/// a fallback when the server's catalogue is unavailable.
pub fn default_reasons() -> Vec<RejectionReason> {
    fn reason(id: &str, label: &str, category: &str) -> RejectionReason {
        RejectionReason {
            id: id.to_string(),
            label: label.to_string(),
            category: category.to_string(),
        }
    }

    vec![
        reason("tone_mismatch", "Tone doesn't match DJ personality", "personality"),
        reason("factual_error", "Contains factual errors", "accuracy"),
        reason("temporal_violation", "References wrong time period", "lore"),
        reason("too_generic", "Too generic/boring", "quality"),
        reason("inappropriate", "Inappropriate content", "content"),
        reason(OTHER_REASON_ID, "Other (please specify)", "other"),
    ]
}

/// Per-DJ review tally.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DjTally {
    #[serde(default)]
    pub pending: usize,
    #[serde(default)]
    pub approved: usize,
    #[serde(default)]
    pub rejected: usize,
}

/// Review statistics, display-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewStats {
    #[serde(default)]
    pub total_pending: usize,
    #[serde(default)]
    pub total_approved: usize,
    #[serde(default)]
    pub total_rejected: usize,
    #[serde(default)]
    pub by_dj: std::collections::BTreeMap<String, DjTally>,
}
