/*!
 * End-to-end tests: parse -> align -> poll -> resolve, plus progress
 * persistence across a simulated session switch.
 */

use std::sync::Arc;
use std::time::Duration;

use subsync::resolver::find_active;
use subsync::session::Session;
use subsync::store::Repository;
use subsync::sync_poller::{PlaybackClock, SyncPoller};

use crate::common::{self, MockClock};

/// Poll until the published sample matches, or give up
async fn wait_for_sample<F>(poller: &SyncPoller, mut predicate: F) -> bool
where
    F: FnMut(&subsync::sync_poller::SyncSample) -> bool,
{
    for _ in 0..100 {
        if poller.latest().as_ref().is_some_and(&mut predicate) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}

#[tokio::test]
async fn test_workflow_bilingualSession_shouldTrackTheClock() {
    let session =
        Session::build("vid00000001", common::PRIMARY_SRT, Some(common::SECONDARY_SRT)).unwrap();

    let clock = MockClock::new(2.0);
    let poller = SyncPoller::start(
        Arc::clone(&clock) as Arc<dyn PlaybackClock>,
        session.primary_subs.clone(),
        session.secondary_subs.clone(),
        Duration::from_millis(5),
    );

    // t=2.0 sits inside the first block (1.0 - 4.0)
    assert!(
        wait_for_sample(&poller, |s| {
            s.primary.as_ref().is_some_and(|e| e.text == "This is a test subtitle.")
                && s.secondary.as_ref().is_some_and(|e| e.text == "這是測試字幕。")
        })
        .await
    );

    // t=4.5 falls into the gap between blocks
    clock.set_time(4.5);
    assert!(wait_for_sample(&poller, |s| s.time == 4.5 && s.primary.is_none()).await);

    // t=10.0 starts the third block
    clock.set_time(10.0);
    assert!(
        wait_for_sample(&poller, |s| {
            s.primary.as_ref().is_some_and(|e| e.text == "For testing purposes.")
        })
        .await
    );

    poller.stop();
}

#[tokio::test]
async fn test_workflow_pollerBeforeClockReady_shouldPublishNothing() {
    let session = Session::build("vid00000001", common::PRIMARY_SRT, None).unwrap();

    let clock = MockClock::new(2.0);
    clock.set_ready(false);

    let poller = SyncPoller::start(
        Arc::clone(&clock) as Arc<dyn PlaybackClock>,
        session.primary_subs.clone(),
        Vec::new(),
        Duration::from_millis(5),
    );

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(poller.latest().is_none());

    // Once the player comes up, samples start flowing
    clock.set_ready(true);
    assert!(wait_for_sample(&poller, |s| s.time == 2.0).await);

    poller.stop();
}

#[tokio::test]
async fn test_workflow_sessionSwitch_shouldReplacePollerCleanly() {
    let first = Session::build("vid00000001", common::PRIMARY_SRT, None).unwrap();
    let second = Session::build(
        "vid00000002",
        "1\n00:00:00,000 --> 00:01:00,000\nOther video.",
        None,
    )
    .unwrap();

    let clock = MockClock::new(2.0);
    let poller = SyncPoller::start(
        Arc::clone(&clock) as Arc<dyn PlaybackClock>,
        first.primary_subs.clone(),
        Vec::new(),
        Duration::from_millis(5),
    );
    assert!(wait_for_sample(&poller, |s| s.primary.is_some()).await);

    // Dropping the old poller aborts it before the replacement starts
    drop(poller);

    let poller = SyncPoller::start(
        Arc::clone(&clock) as Arc<dyn PlaybackClock>,
        second.primary_subs.clone(),
        Vec::new(),
        Duration::from_millis(5),
    );
    assert!(
        wait_for_sample(&poller, |s| {
            s.primary.as_ref().is_some_and(|e| e.text == "Other video.")
        })
        .await
    );

    poller.stop();
}

#[tokio::test]
async fn test_workflow_progressPersistence_shouldSurviveSessionReplacement() {
    let repo = Repository::new_in_memory().unwrap();
    let video_id = "vid00000001";

    // Mid-playback saves land in the store, floored to whole seconds
    repo.save_progress(video_id, 42.7).await.unwrap();

    // A new session for the same video resumes past the threshold
    let saved = repo.get_progress(video_id).await.unwrap();
    assert_eq!(saved, Some(42));

    let clock = MockClock::new(0.0);
    if let Some(position) = saved {
        clock.seek(position as f64).await.unwrap();
    }
    assert_eq!(clock.current_time().await.unwrap(), 42.0);
}

#[tokio::test]
async fn test_workflow_resolverAgainstAlignedOutput_shouldHonorSlotBoundaries() {
    // One dense primary block against a sparse secondary: slots subdivide
    let primary_raw = "1\n00:00:00,000 --> 00:00:10,000\nFirst thought. Second thought.";
    let secondary_raw = "1\n00:00:00,000 --> 00:00:10,000\n同一句。";

    let session = Session::build("vid00000001", primary_raw, Some(secondary_raw)).unwrap();
    assert_eq!(session.primary_subs.len(), 2);

    // Both slots resolve consistently on both tracks
    let p = find_active(&session.primary_subs, 2.0).unwrap();
    let s = find_active(&session.secondary_subs, 2.0).unwrap();
    assert_eq!(p.text, "First thought.");
    assert_eq!(s.text, "同一句。");
    assert_eq!(p.start, s.start);
    assert_eq!(p.end, s.end);

    let p_late = find_active(&session.primary_subs, 9.0).unwrap();
    assert_eq!(p_late.text, "Second thought.");
}
