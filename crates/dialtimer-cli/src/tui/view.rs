use dialtimer_core::{AlarmPlayer, Screen, TimeUnit, View};
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

const ORANGE: Color = Color::Rgb(235, 94, 11);
const PAPER: Color = Color::Rgb(248, 241, 241);
const INK: Color = Color::Rgb(33, 65, 81);
const COLUMN_BG: [Color; 3] = [
    Color::Rgb(94, 170, 168),
    Color::Rgb(163, 210, 202),
    Color::Rgb(248, 241, 241),
];

const BUTTON_HEIGHT: u16 = 3;

/// Screen regions from the last frame, used to route mouse input.
#[derive(Debug, Default, Clone, Copy)]
pub struct HitMap {
    /// Dial columns in hour, minute, second order. Empty while counting down.
    pub columns: [Rect; 3],
    pub button: Rect,
}

impl HitMap {
    pub fn unit_at(&self, column: u16, row: u16) -> Option<TimeUnit> {
        let pos = Position::new(column, row);
        self.columns
            .iter()
            .zip(TimeUnit::ALL)
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, unit)| unit)
    }

    pub fn on_button(&self, column: u16, row: u16) -> bool {
        self.button.contains(Position::new(column, row))
    }
}

pub fn draw<A: AlarmPlayer>(frame: &mut Frame, screen: &Screen<A>, hits: &mut HitMap) {
    let [body, button] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(BUTTON_HEIGHT)])
            .areas(frame.area());

    match screen.view() {
        View::Selector { dial, focus } => {
            let columns: [Rect; 3] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(body);
            for ((area, unit), bg) in columns.iter().zip(TimeUnit::ALL).zip(COLUMN_BG) {
                draw_dial(frame, *area, unit, dial.get(unit), unit == focus, bg);
            }
            hits.columns = columns;
        }
        View::Countdown { display } => {
            frame.render_widget(
                centered(vec![Line::from(Span::styled(
                    display.to_string(),
                    Style::default().fg(PAPER).add_modifier(Modifier::BOLD),
                ))], body.height)
                .block(Block::default().style(Style::default().bg(ORANGE))),
                body,
            );
            hits.columns = [Rect::default(); 3];
        }
    }

    frame.render_widget(
        centered(
            vec![Line::from(Span::styled(
                screen.button_label(),
                Style::default().fg(PAPER).add_modifier(Modifier::BOLD),
            ))],
            button.height,
        )
        .block(Block::default().style(Style::default().bg(ORANGE))),
        button,
    );
    hits.button = button;
}

fn draw_dial(frame: &mut Frame, area: Rect, unit: TimeUnit, value: u32, focused: bool, bg: Color) {
    let mut title = Style::default().fg(INK);
    if focused {
        title = title.add_modifier(Modifier::REVERSED);
    }
    let lines = vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(INK).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(format!(" {} ", unit.title()), title)),
    ];
    frame.render_widget(
        centered(lines, area.height).block(Block::default().style(Style::default().bg(bg))),
        area,
    );
}

/// Paragraph with `lines` centered both ways inside `height` rows.
fn centered(lines: Vec<Line<'static>>, height: u16) -> Paragraph<'static> {
    Paragraph::new(pad_vertically(lines, height)).alignment(Alignment::Center)
}

fn pad_vertically(lines: Vec<Line<'static>>, height: u16) -> Vec<Line<'static>> {
    let pad = usize::from(height).saturating_sub(lines.len()) / 2;
    let mut padded = vec![Line::default(); pad];
    padded.extend(lines);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_map_routes_columns_and_button() {
        let hits = HitMap {
            columns: [
                Rect::new(0, 0, 10, 20),
                Rect::new(10, 0, 10, 20),
                Rect::new(20, 0, 10, 20),
            ],
            button: Rect::new(0, 20, 30, 3),
        };
        assert_eq!(hits.unit_at(3, 5), Some(TimeUnit::Hour));
        assert_eq!(hits.unit_at(15, 5), Some(TimeUnit::Minute));
        assert_eq!(hits.unit_at(29, 19), Some(TimeUnit::Second));
        assert_eq!(hits.unit_at(29, 21), None);
        assert!(hits.on_button(5, 21));
        assert!(!hits.on_button(5, 2));
    }

    #[test]
    fn pads_to_the_middle() {
        let padded = pad_vertically(vec![Line::from("x")], 5);
        assert_eq!(padded.len(), 3);
        assert_eq!(padded[2], Line::from("x"));
        assert_eq!(pad_vertically(vec![Line::from("x"); 4], 2).len(), 4);
    }
}
