use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use script_review::api::{
    Result as StoreResult, ScriptFilters, ScriptPage, ScriptStore, StoreError,
};
use script_review::queue::{CommitOutcome, QueueSignal, ReviewQueueController};
use script_review::store::ScriptLibrary;
use script_review::{Decision, DecisionState, RejectionReason, ReviewStats, ReviewStatus};

fn seed_scripts(root: &Path) {
    let julie = root.join("julie");
    fs::create_dir_all(&julie).unwrap();
    fs::write(
        julie.join("2102-05-15_0800_julie_weather.txt"),
        "Mornin' Appalachia. Rain's rolling in over the ridge today.",
    )
    .unwrap();
    fs::write(
        julie.join("2102-05-15_0900_julie_news.txt"),
        "Word from Charleston: the caps exchange is back open.",
    )
    .unwrap();
    fs::write(
        julie.join("2102-05-16_0800_julie_story.txt"),
        "Got a story for you today, about a dog and a water purifier.",
    )
    .unwrap();

    let vegas = root.join("mr_new_vegas");
    fs::create_dir_all(&vegas).unwrap();
    fs::write(
        vegas.join("2281-10-19_2100_mr_new_vegas_gossip.txt"),
        "Rumor has it the Strip's newest act never misses a note.",
    )
    .unwrap();
}

fn seeded_library(dir: &tempfile::TempDir) -> Arc<ScriptLibrary> {
    let scripts = dir.path().join("scripts");
    fs::create_dir_all(&scripts).unwrap();
    seed_scripts(&scripts);

    let library = ScriptLibrary::open(&dir.path().join("review.db")).unwrap();
    assert_eq!(library.import_dir(&scripts).unwrap(), 4);
    Arc::new(library)
}

#[tokio::test]
async fn review_session_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let library = seeded_library(&dir);

    let filters = ScriptFilters {
        status: Some(ReviewStatus::Pending),
        ..Default::default()
    };
    let mut queue =
        ReviewQueueController::new(Arc::clone(&library) as Arc<dyn ScriptStore>, filters, 20);

    assert_eq!(queue.load_page().await.unwrap(), QueueSignal::Show);
    assert_eq!(queue.len(), 4);

    // Approve the first script, reject the second with a reason.
    assert_eq!(queue.approve().await.unwrap(), CommitOutcome::Advanced);
    assert_eq!(
        queue
            .reject("too_generic".to_string(), None)
            .await
            .unwrap(),
        CommitOutcome::Advanced
    );

    let stats = library.stats().await.unwrap();
    assert_eq!(stats.total_approved, 1);
    assert_eq!(stats.total_rejected, 1);
    assert_eq!(stats.total_pending, 2);

    // The decisions are persisted: a reload of pending scripts no longer
    // includes the two reviewed ones.
    assert_eq!(queue.load_page().await.unwrap(), QueueSignal::Show);
    assert_eq!(queue.len(), 2);
}

#[tokio::test]
async fn pagination_across_the_whole_library() {
    let dir = tempfile::tempdir().unwrap();
    let library = seeded_library(&dir);

    // No status filter, so reviewing does not change page membership.
    let mut queue =
        ReviewQueueController::new(Arc::clone(&library) as Arc<dyn ScriptStore>, ScriptFilters::default(), 2);

    assert_eq!(queue.load_page().await.unwrap(), QueueSignal::Show);
    assert_eq!(queue.len(), 2);
    assert!(queue.has_more());

    assert_eq!(queue.approve().await.unwrap(), CommitOutcome::Advanced);
    assert_eq!(queue.approve().await.unwrap(), CommitOutcome::Advanced);
    assert!(queue.is_exhausted());

    assert_eq!(queue.next_page().await.unwrap(), QueueSignal::Show);
    assert_eq!(queue.len(), 2);
    assert!(!queue.is_exhausted());
}

#[tokio::test]
async fn library_refuses_a_second_decision_for_the_same_script() {
    let dir = tempfile::tempdir().unwrap();
    let library = seeded_library(&dir);

    let mut queue = ReviewQueueController::new(
        Arc::clone(&library) as Arc<dyn ScriptStore>,
        ScriptFilters::default(),
        20,
    );
    queue.load_page().await.unwrap();

    let ticket = queue.begin(Decision::Approve, None, None).unwrap().unwrap();
    // A stray second gesture while the first decision is in flight is a
    // guarded no-op.
    assert!(queue.begin(Decision::Approve, None, None).unwrap().is_none());

    library
        .review_script(&ticket.script_id, Decision::Approve, None, None)
        .await
        .unwrap();
    queue.settle(&ticket.script_id, Decision::Approve, Ok(()));

    // Even if a duplicate call did reach the store, it is refused there too.
    let err = library
        .review_script(&ticket.script_id, Decision::Approve, None, None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("already reviewed"));
}

/// Delegating store whose review calls can be made to fail, for driving the
/// rollback path against the real library.
struct FlakyStore {
    inner: Arc<ScriptLibrary>,
    fail_reviews: AtomicUsize,
}

#[async_trait]
impl ScriptStore for FlakyStore {
    async fn list_scripts(
        &self,
        filters: &ScriptFilters,
        page: u32,
        page_size: u32,
    ) -> StoreResult<ScriptPage> {
        self.inner.list_scripts(filters, page, page_size).await
    }

    async fn review_script(
        &self,
        script_id: &str,
        decision: Decision,
        reason_id: Option<&str>,
        comment: Option<&str>,
    ) -> StoreResult<()> {
        if self
            .fail_reviews
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::Other("connection reset".to_string()));
        }
        self.inner
            .review_script(script_id, decision, reason_id, comment)
            .await
    }

    async fn rejection_reasons(&self) -> StoreResult<Vec<RejectionReason>> {
        self.inner.rejection_reasons().await
    }

    async fn stats(&self) -> StoreResult<ReviewStats> {
        self.inner.stats().await
    }
}

#[tokio::test]
async fn store_failure_rolls_back_and_retry_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let library = seeded_library(&dir);
    let flaky = Arc::new(FlakyStore {
        inner: Arc::clone(&library),
        fail_reviews: AtomicUsize::new(0),
    });

    let mut queue = ReviewQueueController::new(
        Arc::clone(&flaky) as Arc<dyn ScriptStore>,
        ScriptFilters::default(),
        20,
    );
    queue.load_page().await.unwrap();

    // First approval lands, the next one hits a dead connection.
    assert_eq!(queue.approve().await.unwrap(), CommitOutcome::Advanced);
    flaky.fail_reviews.store(1, Ordering::SeqCst);
    let outcome = queue
        .reject("factual_error".to_string(), None)
        .await
        .unwrap();
    assert!(matches!(outcome, CommitOutcome::Failed(_)));

    // Rolled back: same script still current, pending again, retryable.
    let current = queue.current().unwrap();
    assert_eq!(current.state, DecisionState::Pending);
    assert_eq!(
        queue
            .reject("factual_error".to_string(), None)
            .await
            .unwrap(),
        CommitOutcome::Advanced
    );

    // Nothing about the failure leaked into the library.
    let stats = library.stats().await.unwrap();
    assert_eq!(stats.total_approved, 1);
    assert_eq!(stats.total_rejected, 1);
}
