use std::sync::Arc;

use pomopixel_core::{Config, Event, SessionMachine, SilentPlayer, SystemClock};

/// Print the state a fresh session starts in.
pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let machine = SessionMachine::with_config(
        Arc::new(SystemClock),
        Arc::new(SilentPlayer::default()),
        config,
    );
    let snapshot = Event::StateSnapshot(machine.snapshot());
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
