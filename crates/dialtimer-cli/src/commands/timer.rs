use std::future::Future;
use std::time::Duration;

use clap::Subcommand;
use dialtimer_core::{
    format_hms, AlarmPlayer, AlarmPool, ClipSettings, Config, DialDuration, Event, Result, Screen,
    ScreenMode, ScreenMsg, TerminalBell,
};
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Open the interactive timer screen
    Run,
    /// Count down without a screen, printing each tick
    Countdown {
        #[arg(long, default_value = "0")]
        hours: u32,
        #[arg(long, default_value = "0")]
        minutes: u32,
        #[arg(long, default_value = "0")]
        seconds: u32,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
        /// Do not ring the alarm at zero
        #[arg(long)]
        no_alarm: bool,
    },
    /// Print milliseconds as HH:MM:SS
    Format {
        /// Remaining milliseconds
        ms: u64,
    },
}

impl TimerAction {
    pub fn is_interactive(&self) -> bool {
        matches!(self, TimerAction::Run)
    }
}

/// Load the alarm clip, or an empty pool when alarms are off.
pub fn alarm_pool(config: &Config, muted: bool) -> AlarmPool<TerminalBell> {
    let settings = config.clip_settings();
    if muted || !config.alarm.enabled {
        AlarmPool::unloaded(settings)
    } else {
        AlarmPool::load(TerminalBell::new(), settings)
    }
}

pub fn run(action: TimerAction) -> Result<()> {
    match action {
        TimerAction::Format { ms } => {
            println!("{}", format_hms(ms));
            Ok(())
        }
        TimerAction::Run => {
            let config = Config::load_or_default();
            runtime()?.block_on(crate::tui::run(&config))
        }
        TimerAction::Countdown {
            hours,
            minutes,
            seconds,
            json,
            no_alarm,
        } => {
            let dial = DialDuration::new(hours, minutes, seconds)?;
            let config = Config::load_or_default();
            runtime()?.block_on(countdown(&config, dial, json, no_alarm))
        }
    }
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    // One thread: countdown callbacks and input share a single loop.
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

async fn countdown(config: &Config, dial: DialDuration, json: bool, no_alarm: bool) -> Result<()> {
    let pool = alarm_pool(config, no_alarm);
    let ring_for = ring_duration(pool.is_loaded(), pool.settings());
    let (mut screen, mut rx) = Screen::new(pool, config.screen_settings());
    screen.set_dial(dial);
    screen.start();
    print_events(&mut screen, json)?;

    let interrupt = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    drive(&mut screen, &mut rx, ring_for, json, interrupt).await?;

    screen.stop();
    print_events(&mut screen, json)?;
    Ok(())
}

/// Feed countdown messages to `screen` until it finishes and the alarm has
/// rung out, or until `interrupt` resolves.
async fn drive<A, I>(
    screen: &mut Screen<A>,
    rx: &mut UnboundedReceiver<ScreenMsg>,
    ring_for: Duration,
    json: bool,
    interrupt: I,
) -> Result<()>
where
    A: AlarmPlayer,
    I: Future<Output = ()>,
{
    // One future for the whole run so a signal between passes is not lost.
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            msg = rx.recv() => {
                let Some(msg) = msg else { break };
                screen.apply(msg);
                print_events(screen, json)?;
                if screen.state().mode() == ScreenMode::Finished {
                    tokio::select! {
                        _ = tokio::time::sleep(ring_for) => {}
                        _ = &mut interrupt => tracing::debug!("interrupted"),
                    }
                    break;
                }
            }
            _ = &mut interrupt => {
                tracing::debug!("interrupted");
                break;
            }
        }
    }
    Ok(())
}

fn ring_duration(loaded: bool, settings: &ClipSettings) -> Duration {
    if !loaded {
        return Duration::ZERO;
    }
    settings.period * settings.loops.saturating_add(1)
}

fn print_events<A: AlarmPlayer>(screen: &mut Screen<A>, json: bool) -> Result<()> {
    for event in screen.take_events() {
        if json {
            println!("{}", serde_json::to_string(&event)?);
            continue;
        }
        match event {
            Event::CountdownStarted { total_ms, .. } => println!("{}", format_hms(total_ms)),
            Event::CountdownTick { display, .. } => println!("{display}"),
            Event::CountdownFinished { .. } => println!("{}", screen.display()),
            _ => {}
        }
    }
    Ok(())
}
