//! The review queue: loaded scripts, a cursor, and optimistic decisions.
//!
//! The controller is the single writer of the queue and cursor. A decision
//! flows through `Pending -> Approving/Rejecting -> Approved/Rejected`, or
//! rolls back to `Pending` when the store call fails; the cursor advances
//! only on success. Event-driven callers split a decision into `begin`
//! (guard + validation + optimistic transition) and `settle` (resolution),
//! so the store call can run detached while the UI stays live; `approve`/
//! `reject` wrap the whole flow for callers that can await it.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ScriptFilters, ScriptStore, StoreError};
use crate::{Decision, DecisionState, OTHER_REASON_ID, ReviewItem};

/// Local validation failures, caught before any store call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("a rejection reason is required")]
    MissingReason,
    #[error("a comment is required for the free-text reason")]
    MissingComment,
}

/// What the presentation layer should show after a queue change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueSignal {
    /// Show the item at the cursor.
    Show,
    /// Queue exhausted: show the empty state.
    Empty,
}

/// A decision begun optimistically, to be executed against the store and
/// then settled.
#[derive(Debug, Clone)]
pub struct DecisionTicket {
    pub script_id: String,
    pub decision: Decision,
    pub reason_id: Option<String>,
    pub comment: Option<String>,
}

/// Resolution of an in-flight decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleSignal {
    /// Store accepted the decision; if it was the current item the cursor
    /// has advanced.
    Advanced,
    /// Store call failed; the item is back to `Pending` and the cursor is
    /// unchanged. Carries the message to surface.
    RolledBack(String),
    /// Response for an item that is no longer in flight (already settled or
    /// evicted by a reload). Ignored by design.
    Stale,
}

/// Result of a whole `approve`/`reject` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Guard rejected the call: nothing current, or the item already left
    /// `Pending`.
    Ignored,
    /// Decision persisted and cursor advanced; `current()` may now be
    /// `None`.
    Advanced,
    /// Store call failed after the optimistic transition; rolled back,
    /// retry allowed.
    Failed(String),
}

pub struct ReviewQueueController {
    store: Arc<dyn ScriptStore>,
    filters: ScriptFilters,
    items: Vec<ReviewItem>,
    cursor: usize,
    page: u32,
    page_size: u32,
    has_more: bool,
    total_pages: u32,
}

impl ReviewQueueController {
    pub fn new(store: Arc<dyn ScriptStore>, filters: ScriptFilters, page_size: u32) -> Self {
        Self {
            store,
            filters,
            items: Vec::new(),
            cursor: 0,
            page: 1,
            page_size,
            has_more: false,
            total_pages: 0,
        }
    }

    /// Fetch the current page from the store, replacing the queue and
    /// resetting the cursor.
    pub async fn load_page(&mut self) -> Result<QueueSignal, StoreError> {
        let page = self
            .store
            .list_scripts(&self.filters, self.page, self.page_size)
            .await?;

        info!(
            count = page.scripts.len(),
            page = self.page,
            total = page.total_count,
            "loaded script page"
        );

        self.items = page.scripts.into_iter().map(ReviewItem::pending).collect();
        self.cursor = 0;
        self.has_more = page.has_more;
        self.total_pages = page.total_pages;
        Ok(self.signal())
    }

    /// Replace the filter set and reload from page 1. A hard reset: nothing
    /// from the previous filter set is retained.
    pub async fn set_filters(&mut self, filters: ScriptFilters) -> Result<QueueSignal, StoreError> {
        self.filters = filters;
        self.page = 1;
        self.load_page().await
    }

    /// Load the next page if the store reported one.
    pub async fn next_page(&mut self) -> Result<QueueSignal, StoreError> {
        if self.has_more {
            self.page += 1;
        }
        self.load_page().await
    }

    pub fn filters(&self) -> &ScriptFilters {
        &self.filters
    }

    /// Item presented to the user, or `None` when the queue is exhausted.
    pub fn current(&self) -> Option<&ReviewItem> {
        self.items.get(self.cursor)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.items.len()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cursor position for display: 1-based index and page count.
    pub fn position(&self) -> (usize, usize, u32, u32) {
        (
            (self.cursor + 1).min(self.items.len().max(1)),
            self.items.len(),
            self.page,
            self.total_pages.max(self.page),
        )
    }

    pub fn signal(&self) -> QueueSignal {
        if self.is_exhausted() {
            QueueSignal::Empty
        } else {
            QueueSignal::Show
        }
    }

    /// Start a decision on the current item.
    ///
    /// Returns `Ok(None)` when the guard declines (no current item, or a
    /// decision already in flight for it): the caller treats that as a
    /// no-op, which is what makes a rapid double-tap submit exactly once.
    /// Rejections are validated here, before any network traffic.
    pub fn begin(
        &mut self,
        decision: Decision,
        reason_id: Option<String>,
        comment: Option<String>,
    ) -> Result<Option<DecisionTicket>, QueueError> {
        let Some(item) = self.items.get_mut(self.cursor) else {
            return Ok(None);
        };
        if item.state != DecisionState::Pending {
            return Ok(None);
        }

        if decision == Decision::Reject {
            let reason = reason_id.as_deref().unwrap_or("");
            if reason.is_empty() {
                return Err(QueueError::MissingReason);
            }
            if reason == OTHER_REASON_ID
                && comment.as_deref().is_none_or(|c| c.trim().is_empty())
            {
                return Err(QueueError::MissingComment);
            }
        }

        item.state = match decision {
            Decision::Approve => DecisionState::Approving,
            Decision::Reject => DecisionState::Rejecting,
        };

        Ok(Some(DecisionTicket {
            script_id: item.script.metadata.script_id.clone(),
            decision,
            reason_id,
            comment,
        }))
    }

    /// Resolve a decision begun earlier.
    ///
    /// Matches by script id and in-flight state, so a late response for an
    /// item that has already settled (or was evicted by a reload) cannot
    /// disturb whatever is displayed now.
    pub fn settle(
        &mut self,
        script_id: &str,
        decision: Decision,
        result: Result<(), String>,
    ) -> SettleSignal {
        let in_flight = match decision {
            Decision::Approve => DecisionState::Approving,
            Decision::Reject => DecisionState::Rejecting,
        };

        let Some(idx) = self
            .items
            .iter()
            .position(|item| item.id() == script_id && item.state == in_flight)
        else {
            return SettleSignal::Stale;
        };

        match result {
            Ok(()) => {
                self.items[idx].state = match decision {
                    Decision::Approve => DecisionState::Approved,
                    Decision::Reject => DecisionState::Rejected,
                };
                if idx == self.cursor {
                    self.cursor += 1;
                }
                info!(script_id, decision = decision.as_str(), "decision persisted");
                SettleSignal::Advanced
            }
            Err(message) => {
                warn!(script_id, %message, "review call failed, rolling back");
                self.items[idx].state = DecisionState::Pending;
                SettleSignal::RolledBack(message)
            }
        }
    }

    /// Approve the current item: optimistic transition, store call, settle.
    pub async fn approve(&mut self) -> Result<CommitOutcome, QueueError> {
        self.commit(Decision::Approve, None, None).await
    }

    /// Reject the current item with a reason (and a comment when the reason
    /// is the free-text one).
    pub async fn reject(
        &mut self,
        reason_id: String,
        comment: Option<String>,
    ) -> Result<CommitOutcome, QueueError> {
        self.commit(Decision::Reject, Some(reason_id), comment).await
    }

    async fn commit(
        &mut self,
        decision: Decision,
        reason_id: Option<String>,
        comment: Option<String>,
    ) -> Result<CommitOutcome, QueueError> {
        let Some(ticket) = self.begin(decision, reason_id, comment)? else {
            return Ok(CommitOutcome::Ignored);
        };

        let result = self
            .store
            .review_script(
                &ticket.script_id,
                ticket.decision,
                ticket.reason_id.as_deref(),
                ticket.comment.as_deref(),
            )
            .await
            .map_err(|e| e.to_string());

        match self.settle(&ticket.script_id, ticket.decision, result) {
            SettleSignal::Advanced => Ok(CommitOutcome::Advanced),
            SettleSignal::RolledBack(message) => Ok(CommitOutcome::Failed(message)),
            // Unreachable while we hold &mut self between begin and settle.
            SettleSignal::Stale => Ok(CommitOutcome::Ignored),
        }
    }
}
