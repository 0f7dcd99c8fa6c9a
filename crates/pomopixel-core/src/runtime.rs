//! Async driver for a [`SessionMachine`].
//!
//! A single tokio task owns the machine, so no locks are involved. It waits
//! on the intent channel and, only while the machine needs it, on a poll
//! interval. Events are fanned out on a broadcast channel.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::error::{CoreError, Result};
use crate::events::{Event, Snapshot};
use crate::intent::{Intent, Outcome};
use crate::session::SessionMachine;

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 256;

enum Command {
    Intent(Intent, oneshot::Sender<Outcome>),
    Snapshot(oneshot::Sender<Snapshot>),
}

/// Cheap, cloneable access to a running driver.
///
/// The driver exits once every handle has been dropped.
#[derive(Clone)]
pub struct DriverHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<Event>,
}

impl DriverHandle {
    pub async fn dispatch(&self, intent: Intent) -> Result<Outcome> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Intent(intent, reply))
            .await
            .map_err(|_| CoreError::DriverClosed)?;
        rx.await.map_err(|_| CoreError::DriverClosed)
    }

    pub async fn snapshot(&self) -> Result<Snapshot> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Snapshot(reply))
            .await
            .map_err(|_| CoreError::DriverClosed)?;
        rx.await.map_err(|_| CoreError::DriverClosed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}

/// Spawn the driver on the current tokio runtime.
///
/// The join handle yields the machine back once all handles are dropped.
pub fn spawn(
    machine: SessionMachine,
    poll_interval: Duration,
) -> (DriverHandle, JoinHandle<SessionMachine>) {
    let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
    let (events, _) = broadcast::channel(EVENT_BUFFER);
    let handle = DriverHandle {
        commands,
        events: events.clone(),
    };
    let task = tokio::spawn(drive(machine, rx, events, poll_interval));
    (handle, task)
}

async fn drive(
    mut machine: SessionMachine,
    mut commands: mpsc::Receiver<Command>,
    events: broadcast::Sender<Event>,
    poll_interval: Duration,
) -> SessionMachine {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let needs_poll = machine.needs_poll();
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Intent(intent, reply)) => {
                    let outcome = machine.dispatch(intent);
                    if reply.send(outcome).is_err() {
                        debug!(?intent, "intent caller went away");
                    }
                }
                Some(Command::Snapshot(reply)) => {
                    let _ = reply.send(machine.snapshot());
                }
                None => break,
            },
            _ = ticker.tick(), if needs_poll => machine.poll(),
        }

        for event in machine.drain_events() {
            // Having no subscribers is not an error.
            let _ = events.send(event);
        }
    }

    if machine.state().is_running() {
        warn!("session driver stopped while the timer was running");
    }
    machine
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::cue::SilentPlayer;
    use crate::timer::{Mode, TokioClock, POLL_INTERVAL};

    fn spawn_machine() -> (DriverHandle, JoinHandle<SessionMachine>) {
        let clock = Arc::new(TokioClock::new(Utc::now()));
        let machine = SessionMachine::new(clock, Arc::new(SilentPlayer::default()));
        spawn(machine, POLL_INTERVAL)
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_returns_outcome() {
        let (handle, _task) = spawn_machine();
        let outcome = handle.dispatch(Intent::Pause).await.unwrap();
        assert!(!outcome.is_applied());
        assert!(handle.dispatch(Intent::Start).await.unwrap().is_applied());
        assert!(handle.snapshot().await.unwrap().running);
    }

    #[tokio::test(start_paused = true)]
    async fn driver_stops_when_handles_drop() {
        let (handle, task) = spawn_machine();
        handle
            .dispatch(Intent::SwitchMode {
                mode: Mode::LongBreak,
            })
            .await
            .unwrap();
        drop(handle);
        let machine = task.await.unwrap();
        assert_eq!(machine.state().mode(), Mode::LongBreak);
    }
}
