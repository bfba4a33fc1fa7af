//! Interactive timer screen.
//!
//! One `tokio::select!` loop owns the [`Screen`]: terminal input and
//! countdown messages are handled in arrival order, and the frame is
//! redrawn after each.

mod input;
mod view;

use std::io::{self, Stdout, Write};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, EventStream};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use dialtimer_core::{Config, Result, Screen};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::commands::timer::alarm_pool;
use input::{Flow, InputState};
use view::HitMap;

/// Raw mode, alternate screen and mouse capture for as long as it lives.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        install_panic_hook();
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore(self.terminal.backend_mut());
        let _ = self.terminal.show_cursor();
    }
}

/// Leave raw mode and the alternate screen before the panic message is
/// printed. Release builds abort on panic, so `Drop` never runs there.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore(&mut io::stdout());
        previous(info);
    }));
}

fn restore<W: Write>(out: &mut W) -> io::Result<()> {
    let _ = disable_raw_mode();
    execute!(out, LeaveAlternateScreen, DisableMouseCapture)
}

pub async fn run(config: &Config) -> Result<()> {
    let initial = config.initial_dial()?;
    let (mut screen, mut rx) = Screen::new(alarm_pool(config, false), config.screen_settings());
    screen.set_dial(initial);

    let mut guard = TerminalGuard::enter()?;
    let mut events = EventStream::new();
    let mut hits = HitMap::default();
    let mut input = InputState::default();

    loop {
        guard
            .terminal
            .draw(|frame| view::draw(frame, &screen, &mut hits))?;

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(event)) => {
                        if input.handle(&mut screen, &hits, event) == Flow::Quit {
                            break;
                        }
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }
            Some(msg) = rx.recv() => {
                screen.apply(msg);
            }
        }

        for event in screen.take_events() {
            tracing::debug!(kind = event.kind(), "{}", screen.display());
        }
    }

    screen.stop();
    Ok(())
}
