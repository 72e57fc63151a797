use clap::{Subcommand, ValueEnum};
use lifedash_core::{Config, Event, PomodoroMode, PomodoroSessionRecord};

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start (or resume) the countdown
    Start,
    /// Pause the countdown in place
    Pause,
    /// Return to the full duration of the current mode
    Reset,
    /// End the current interval and advance
    Skip,
    /// Advance the countdown by elapsed seconds
    Tick {
        /// Seconds elapsed since the last tick
        #[arg(long, default_value = "1")]
        seconds: u32,
    },
    /// Switch mode explicitly
    Mode {
        #[arg(value_enum)]
        mode: ModeArg,
    },
    /// Print current timer state as JSON
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Work,
    ShortBreak,
    LongBreak,
}

impl From<ModeArg> for PomodoroMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Work => PomodoroMode::Work,
            ModeArg::ShortBreak => PomodoroMode::ShortBreak,
            ModeArg::LongBreak => PomodoroMode::LongBreak,
        }
    }
}

pub fn run(action: TimerAction) -> CliResult {
    let config = Config::load()?;
    let mut engine = common::load_engine(&config);

    match action {
        TimerAction::Start => match engine.start() {
            Some(event) => print_event(&event)?,
            None => println!("already running"),
        },
        TimerAction::Pause => match engine.pause() {
            Some(event) => print_event(&event)?,
            None => println!("not running"),
        },
        TimerAction::Reset => {
            let event = engine.reset();
            submit_if_recorded(&config, &event);
            print_event(&event)?;
        }
        TimerAction::Skip => {
            let event = engine.skip();
            submit_if_recorded(&config, &event);
            print_event(&event)?;
        }
        TimerAction::Tick { seconds } => {
            for _ in 0..seconds {
                if let Some(event) = engine.tick() {
                    submit_if_recorded(&config, &event);
                    print_event(&event)?;
                    // Interval ended; the engine stopped, further ticks no-op.
                    break;
                }
            }
            print_event(&engine.snapshot())?;
        }
        TimerAction::Mode { mode } => {
            let event = engine.set_mode(mode.into());
            print_event(&event)?;
        }
        TimerAction::Status => print_event(&engine.snapshot())?,
    }

    common::save_engine(&engine)
}

fn print_event(event: &Event) -> CliResult {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

/// Submit the session record an ending event carries. Failure is reported
/// but never blocks the timer: local state already advanced, the record is
/// dropped (no retry queue).
fn submit_if_recorded(config: &Config, event: &Event) {
    let record = match event {
        Event::IntervalEnded { record, .. } | Event::TimerReset { record, .. } => record.as_ref(),
        _ => None,
    };
    let Some(record) = record else {
        return;
    };
    if let Err(e) = submit(config, record) {
        log::warn!("session submission failed: {e}");
        eprintln!("warning: session not recorded remotely: {e}");
    }
}

fn submit(config: &Config, record: &PomodoroSessionRecord) -> CliResult {
    let client = common::api_client(config)?;
    let runtime = common::runtime()?;
    runtime.block_on(client.submit_session(record))?;
    Ok(())
}
