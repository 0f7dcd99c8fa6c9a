//! Interactive terminal session.
//!
//! Reads one command per line from stdin, forwards it to the session driver
//! and prints whatever the driver reports back. The terminal bell is the
//! alert cue.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pomopixel_core::runtime::{self, DriverHandle};
use pomopixel_core::{
    AlertCue, Config, CuePlayer, Event, Intent, Mode, SessionMachine, Snapshot, SystemClock,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

const HELP: &str = "\
commands:
  start | s          start, or pause when running
  pause | p          pause
  stop               stop and restore the full duration
  reset              back to defaults
  edit | e           toggle duration editing
  + | -              lengthen / shorten the current mode by 5 minutes
  mode <focus|short|long>
  interval+ | interval-
  auto               toggle automatic sequence
  continue | c       continue after a finished session
  cue <short|medium_01|medium_02|long>
  mute               toggle the alert sound
  status             show the timer
  help | ?           this text
  quit | q           exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Status,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let verb = words.next()?.to_lowercase();
    let arg = words.next();
    let intent = match (verb.as_str(), arg) {
        ("start" | "s", None) => Intent::Start,
        ("pause" | "p", None) => Intent::Pause,
        ("stop", None) => Intent::Stop,
        ("reset", None) => Intent::Reset,
        ("edit" | "e", None) => Intent::ToggleEdit,
        ("+" | "up", None) => Intent::IncreaseDuration,
        ("-" | "down", None) => Intent::DecreaseDuration,
        ("mode", Some(mode)) => Intent::SwitchMode {
            mode: Mode::from_str(mode)?,
        },
        ("interval+", None) => Intent::IncreaseLongBreakInterval,
        ("interval-", None) => Intent::DecreaseLongBreakInterval,
        ("auto", None) => Intent::ToggleAutomaticSequence,
        ("continue" | "c", None) => Intent::ConfirmContinue,
        ("cue", Some(cue)) => Intent::SelectAlertCue {
            cue: AlertCue::from_str(cue)?,
        },
        ("mute", None) => Intent::ToggleMute,
        ("status", None) => return Some(Command::Status),
        ("help" | "?", None) => return Some(Command::Help),
        ("quit" | "q" | "exit", None) => return Some(Command::Quit),
        _ => return None,
    };
    Some(Command::Intent(intent))
}

/// Rings the terminal bell for every cue.
#[derive(Debug, Default)]
struct TerminalBell {
    muted: AtomicBool,
}

impl CuePlayer for TerminalBell {
    fn play(&self, cue: AlertCue) {
        if self.is_muted() {
            return;
        }
        debug!(cue = cue.as_str(), "bell");
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }

    fn mute(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }
}

pub fn run(
    mut config: Config,
    no_auto: bool,
    cue: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if no_auto {
        config.timer.automatic_sequence = false;
    }
    if let Some(name) = cue {
        config.alerts.cue = AlertCue::from_str(&name).ok_or_else(|| format!("unknown cue: {name}"))?;
    }
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(session_loop(config))
}

async fn session_loop(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let machine = SessionMachine::with_config(
        Arc::new(SystemClock),
        Arc::new(TerminalBell::default()),
        &config,
    );
    let (handle, task) = runtime::spawn(machine, config.poll_interval());
    let mut events = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    print_status(&handle.snapshot().await?);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Some(Command::Quit) => break,
                    Some(Command::Help) => println!("{HELP}"),
                    Some(Command::Status) => print_status(&handle.snapshot().await?),
                    Some(Command::Intent(intent)) => {
                        if let Some(reason) = handle.dispatch(intent).await?.rejection() {
                            println!("ignored: {reason}");
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => println!("unknown command: {} (try `help`)", line.trim()),
                }
            }
            event = events.recv() => match event {
                Ok(event) => render(&event, &handle).await?,
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "renderer fell behind"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    drop(events);
    drop(handle);
    task.await?;
    Ok(())
}

async fn render(event: &Event, handle: &DriverHandle) -> Result<(), Box<dyn std::error::Error>> {
    match event {
        Event::Tick { .. } => {
            let snapshot = handle.snapshot().await?;
            print!("\r{}  ", snapshot.title);
            std::io::stdout().flush()?;
        }
        Event::SessionExpired { .. } | Event::TimerReset { .. } | Event::ModeSwitched { .. } => {
            println!();
            print_status(&handle.snapshot().await?);
        }
        Event::TimerStarted { .. }
        | Event::TimerPaused { .. }
        | Event::TimerStopped { .. }
        | Event::SessionContinued { .. }
        | Event::DurationAdjusted { .. }
        | Event::EditingToggled { .. }
        | Event::LongBreakIntervalChanged { .. }
        | Event::AutomaticSequenceToggled { .. }
        | Event::AlertCueSelected { .. }
        | Event::MuteToggled { .. }
        | Event::StateSnapshot(_) => print_status(&handle.snapshot().await?),
    }
    Ok(())
}

fn print_status(snapshot: &Snapshot) {
    println!("{}", status_line(snapshot));
}

fn status_line(snapshot: &Snapshot) -> String {
    if let Some(alert) = &snapshot.alert {
        let hint = if alert.awaiting_confirmation {
            " (type `continue`)"
        } else {
            ""
        };
        return format!(
            "{} finished! next: {}{hint}",
            alert.label,
            mode_label(alert.next_mode)
        );
    }
    let mut flags = Vec::new();
    if snapshot.running {
        flags.push("running");
    }
    if snapshot.editing {
        flags.push("editing");
    }
    if !snapshot.automatic_sequence {
        flags.push("manual");
    }
    if snapshot.muted {
        flags.push("muted");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", flags.join(", "))
    };
    format!(
        "{:<11} {}  session {}{flags}",
        mode_label(snapshot.mode),
        snapshot.remaining_text,
        snapshot.counter
    )
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Focus => "focus",
        Mode::ShortBreak => "short break",
        Mode::LongBreak => "long break",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomopixel_core::SilentPlayer;

    #[test]
    fn parses_plain_commands() {
        assert_eq!(parse_command("start"), Some(Command::Intent(Intent::Start)));
        assert_eq!(parse_command("  S "), Some(Command::Intent(Intent::Start)));
        assert_eq!(
            parse_command("+"),
            Some(Command::Intent(Intent::IncreaseDuration))
        );
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn parses_arguments() {
        assert_eq!(
            parse_command("mode long"),
            Some(Command::Intent(Intent::SwitchMode {
                mode: Mode::LongBreak
            }))
        );
        assert_eq!(
            parse_command("cue medium_01"),
            Some(Command::Intent(Intent::SelectAlertCue {
                cue: AlertCue::Medium01
            }))
        );
        assert_eq!(parse_command("mode nap"), None);
        assert_eq!(parse_command("start now"), None);
    }

    #[test]
    fn status_line_shows_mode_and_counter() {
        let mut machine =
            SessionMachine::new(Arc::new(SystemClock), Arc::new(SilentPlayer::default()));
        machine.dispatch(Intent::ToggleAutomaticSequence);
        let line = status_line(&machine.snapshot());
        assert!(line.starts_with("focus"));
        assert!(line.contains("25:00"));
        assert!(line.contains("session 1 / 4"));
        assert!(line.contains("manual"));
    }
}
