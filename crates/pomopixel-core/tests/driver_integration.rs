//! Integration tests for the tokio session driver.
//!
//! Runs on paused tokio time, so a 25 minute session finishes instantly.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast::error::TryRecvError;
use pomopixel_core::runtime;
use pomopixel_core::timer::POLL_INTERVAL;
use pomopixel_core::{
    Clock, Event, Intent, Mode, RecordingPlayer, SessionMachine, TimerStatus, TokioClock,
};

fn spawn_driver() -> (runtime::DriverHandle, Arc<RecordingPlayer>, TokioClock) {
    let clock = TokioClock::new(Utc::now());
    let player = Arc::new(RecordingPlayer::default());
    let machine = SessionMachine::new(Arc::new(clock.clone()), player.clone());
    let (handle, _task) = runtime::spawn(machine, POLL_INTERVAL);
    (handle, player, clock)
}

#[tokio::test(start_paused = true)]
async fn test_focus_rolls_into_short_break() {
    let (handle, player, clock) = spawn_driver();
    let mut events = handle.subscribe();

    handle.dispatch(Intent::Start).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1500)).await;

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.status, TimerStatus::SessionAlert);
    assert_eq!(snap.title, "Focus session finished!");
    assert_eq!(player.played().len(), 1);

    tokio::time::sleep(Duration::from_secs(2)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.mode, Mode::ShortBreak);
    assert!(snap.running);
    let deadline = snap.deadline.unwrap();
    let until_deadline = deadline - clock.now();
    assert!(until_deadline <= chrono::Duration::seconds(300));
    assert!(until_deadline > chrono::Duration::seconds(299));

    // Per-second ticks overflow the channel; only the tail is kept.
    let mut saw_expired = false;
    loop {
        match events.try_recv() {
            Ok(Event::SessionExpired {
                finished_mode,
                next_mode,
                ..
            }) => {
                assert_eq!(finished_mode, Mode::Focus);
                assert_eq!(next_mode, Mode::ShortBreak);
                saw_expired = true;
            }
            Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    assert!(saw_expired);
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_alert_cancels_continuation() {
    let (handle, _player, _clock) = spawn_driver();
    handle
        .dispatch(Intent::SwitchMode {
            mode: Mode::ShortBreak,
        })
        .await
        .unwrap();
    handle.dispatch(Intent::Start).await.unwrap();
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert!(handle.snapshot().await.unwrap().alert.is_some());

    handle.dispatch(Intent::Stop).await.unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.status, TimerStatus::Idle);
    assert_eq!(snap.mode, Mode::ShortBreak);
    assert_eq!(snap.remaining_text, "05:00");
}
