//! Terminal input to screen actions.
//!
//! Mouse gestures are translated into the pixel deltas the dial expects:
//! one wheel notch or one dragged row counts as [`PX_PER_STEP`] pixels,
//! which is a single step at the default sensitivity. Pixels that do not
//! add up to a whole step carry over to the next event on the same column.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use dialtimer_core::{AlarmPlayer, Screen, TimeUnit};

use super::view::HitMap;

pub const PX_PER_STEP: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Drag {
    unit: TimeUnit,
    row: u16,
}

#[derive(Debug, Default)]
pub struct InputState {
    drag: Option<Drag>,
    /// Raw pixels not yet turned into a step.
    pending: Option<(TimeUnit, f64)>,
}

impl InputState {
    pub fn handle<A: AlarmPlayer>(
        &mut self,
        screen: &mut Screen<A>,
        hits: &HitMap,
        event: Event,
    ) -> Flow {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(screen, key),
            Event::Mouse(mouse) => {
                self.handle_mouse(screen, hits, mouse);
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    fn handle_mouse<A: AlarmPlayer>(
        &mut self,
        screen: &mut Screen<A>,
        hits: &HitMap,
        mouse: MouseEvent,
    ) {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                if let Some(unit) = hits.unit_at(column, row) {
                    self.scroll(screen, unit, -PX_PER_STEP);
                }
            }
            MouseEventKind::ScrollDown => {
                if let Some(unit) = hits.unit_at(column, row) {
                    self.scroll(screen, unit, PX_PER_STEP);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.pending = None;
                if hits.on_button(column, row) {
                    screen.press();
                    self.drag = None;
                } else if let Some(unit) = hits.unit_at(column, row) {
                    screen.set_focus(unit);
                    self.drag = Some(Drag { unit, row });
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(drag) = self.drag {
                    let rows = f64::from(row) - f64::from(drag.row);
                    if rows != 0.0 {
                        self.drag = Some(Drag { row, ..drag });
                        self.scroll(screen, drag.unit, rows * PX_PER_STEP);
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag = None;
                self.pending = None;
            }
            _ => {}
        }
    }

    /// Add `raw_delta` to the pixels pending on `unit` and hand them to the
    /// dial once they make at least one whole step.
    fn scroll<A: AlarmPlayer>(&mut self, screen: &mut Screen<A>, unit: TimeUnit, raw_delta: f64) {
        if screen.is_running() {
            self.pending = None;
            return;
        }
        let total = match self.pending {
            Some((pending_unit, px)) if pending_unit == unit => px + raw_delta,
            _ => raw_delta,
        };
        let steps = (-total * screen.settings().sensitivity).trunc();
        if steps == 0.0 {
            self.pending = Some((unit, total));
        } else {
            screen.scroll(unit, total);
            self.pending = None;
        }
    }
}

fn handle_key<A: AlarmPlayer>(screen: &mut Screen<A>, key: KeyEvent) -> Flow {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Flow::Quit;
    }
    match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Esc => {
            if !screen.stop() {
                return Flow::Quit;
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => screen.press(),
        KeyCode::Up | KeyCode::Char('k') => {
            screen.nudge(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            screen.nudge(-1);
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => screen.focus_prev(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => screen.focus_next(),
        _ => {}
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use dialtimer_core::{ScreenSettings, StreamHandle};
    use ratatui::layout::Rect;

    struct Silent;

    impl AlarmPlayer for Silent {
        fn play(&mut self) -> StreamHandle {
            StreamHandle::None
        }

        fn stop(&mut self, _handle: StreamHandle) {}
    }

    fn hits() -> HitMap {
        HitMap {
            columns: [
                Rect::new(0, 0, 10, 20),
                Rect::new(10, 0, 10, 20),
                Rect::new(20, 0, 10, 20),
            ],
            button: Rect::new(0, 20, 30, 3),
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn wheel_moves_the_column_under_the_pointer() {
        let (mut screen, _rx) = Screen::new(Silent, ScreenSettings::default());
        let mut input = InputState::default();
        let hits = hits();

        for _ in 0..3 {
            input.handle(&mut screen, &hits, mouse(MouseEventKind::ScrollUp, 15, 4));
        }
        input.handle(&mut screen, &hits, mouse(MouseEventKind::ScrollDown, 15, 4));
        input.handle(&mut screen, &hits, mouse(MouseEventKind::ScrollDown, 2, 4));

        assert_eq!(screen.dial().minute, 2);
        assert_eq!(screen.dial().hour, 0);
        assert_eq!(screen.focus(), TimeUnit::Hour);
    }

    #[test]
    fn dragging_up_increases_the_value() {
        let (mut screen, _rx) = Screen::new(Silent, ScreenSettings::default());
        let mut input = InputState::default();
        let hits = hits();

        input.handle(&mut screen, &hits, mouse(MouseEventKind::Down(MouseButton::Left), 25, 15));
        input.handle(&mut screen, &hits, mouse(MouseEventKind::Drag(MouseButton::Left), 25, 10));
        assert_eq!(screen.dial().second, 5);
        input.handle(&mut screen, &hits, mouse(MouseEventKind::Drag(MouseButton::Left), 25, 12));
        assert_eq!(screen.dial().second, 3);
        input.handle(&mut screen, &hits, mouse(MouseEventKind::Up(MouseButton::Left), 25, 12));
        input.handle(&mut screen, &hits, mouse(MouseEventKind::Drag(MouseButton::Left), 25, 0));
        assert_eq!(screen.dial().second, 3);
    }

    #[test]
    fn keys_adjust_focus_and_quit() {
        let (mut screen, _rx) = Screen::new(Silent, ScreenSettings::default());
        let mut input = InputState::default();
        let hits = hits();

        input.handle(&mut screen, &hits, key(KeyCode::Right));
        input.handle(&mut screen, &hits, key(KeyCode::Up));
        input.handle(&mut screen, &hits, key(KeyCode::Up));
        assert_eq!(screen.dial().minute, 2);

        assert_eq!(input.handle(&mut screen, &hits, key(KeyCode::Esc)), Flow::Quit);
        assert_eq!(input.handle(&mut screen, &hits, key(KeyCode::Char('q'))), Flow::Quit);
    }

    #[test]
    fn low_sensitivity_carries_pixels_between_events() {
        let settings = ScreenSettings {
            sensitivity: 0.02,
            ..ScreenSettings::default()
        };
        let (mut screen, _rx) = Screen::new(Silent, settings);
        let mut input = InputState::default();
        let hits = hits();

        // 20px per notch at 0.02 is 0.4 of a step; every third notch lands one.
        for _ in 0..2 {
            input.handle(&mut screen, &hits, mouse(MouseEventKind::ScrollUp, 15, 4));
        }
        assert_eq!(screen.dial().minute, 0);
        input.handle(&mut screen, &hits, mouse(MouseEventKind::ScrollUp, 15, 4));
        assert_eq!(screen.dial().minute, 1);
        for _ in 0..47 {
            input.handle(&mut screen, &hits, mouse(MouseEventKind::ScrollUp, 15, 4));
        }
        assert_eq!(screen.dial().minute, 16);

        input.handle(&mut screen, &hits, mouse(MouseEventKind::Down(MouseButton::Left), 25, 19));
        for row in (0..19).rev() {
            input.handle(&mut screen, &hits, mouse(MouseEventKind::Drag(MouseButton::Left), 25, row));
        }
        assert_eq!(screen.dial().second, 6);
    }

    #[test]
    fn pending_pixels_stay_with_their_column() {
        let settings = ScreenSettings {
            sensitivity: 0.03,
            ..ScreenSettings::default()
        };
        let (mut screen, _rx) = Screen::new(Silent, settings);
        let mut input = InputState::default();
        let hits = hits();

        input.handle(&mut screen, &hits, mouse(MouseEventKind::ScrollUp, 15, 4));
        input.handle(&mut screen, &hits, mouse(MouseEventKind::ScrollUp, 2, 4));
        assert_eq!(screen.dial().minute, 0);
        assert_eq!(screen.dial().hour, 0);
        input.handle(&mut screen, &hits, mouse(MouseEventKind::ScrollUp, 2, 4));
        assert_eq!(screen.dial().hour, 1);
        assert_eq!(screen.dial().minute, 0);
    }

    #[tokio::test]
    async fn button_click_starts_and_stops() {
        let (mut screen, _rx) = Screen::new(Silent, ScreenSettings::default());
        let mut input = InputState::default();
        let hits = hits();

        input.handle(&mut screen, &hits, mouse(MouseEventKind::Down(MouseButton::Left), 5, 21));
        assert!(screen.is_running());
        assert_eq!(screen.button_label(), "STOP");

        // the dial ignores gestures while counting down
        input.handle(&mut screen, &hits, mouse(MouseEventKind::ScrollUp, 15, 4));
        assert_eq!(screen.dial().minute, 0);

        input.handle(&mut screen, &hits, key(KeyCode::Enter));
        assert!(!screen.is_running());
    }
}
